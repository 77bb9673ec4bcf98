use std::fmt;

/// A named function token. Functions bind tighter than every operator and
/// are applied to a parenthesized argument list; arity is fixed per
/// function and checked by the evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    Abs,
    Arccos,
    Arcsin,
    Arctan,
    Arctan2,
    Ceil,
    Cos,
    Exp,
    Floor,
    Lb,
    Ln,
    Log,
    Max,
    Min,
    Pow,
    Result,
    Sin,
    Sqrt,
    Tan,
}

impl Function {
    pub fn arity(self) -> usize {
        use Function::*;
        match self {
            Arctan2 | Max | Min | Pow => 2,
            _ => 1,
        }
    }

    /// Lower-case name as written in source, also used in error messages.
    pub(crate) fn name(self) -> &'static str {
        use Function::*;
        match self {
            Abs => "abs",
            Arccos => "arccos",
            Arcsin => "arcsin",
            Arctan => "arctan",
            Arctan2 => "arctan2",
            Ceil => "ceil",
            Cos => "cos",
            Exp => "exp",
            Floor => "floor",
            Lb => "lb",
            Ln => "ln",
            Log => "log",
            Max => "max",
            Min => "min",
            Pow => "pow",
            Result => "result",
            Sin => "sin",
            Sqrt => "sqrt",
            Tan => "tan",
        }
    }

    fn canonical(self) -> &'static str {
        use Function::*;
        match self {
            Abs => "Abs",
            Arccos => "Arccos",
            Arcsin => "Arcsin",
            Arctan => "Arctan",
            Arctan2 => "Arctan2",
            Ceil => "Ceil",
            Cos => "Cos",
            Exp => "Exp",
            Floor => "Floor",
            Lb => "Lb",
            Ln => "Ln",
            Log => "Log",
            Max => "Max",
            Min => "Min",
            Pow => "Pow",
            Result => "Result",
            Sin => "Sin",
            Sqrt => "Sqrt",
            Tan => "Tan",
        }
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.canonical())
    }
}
