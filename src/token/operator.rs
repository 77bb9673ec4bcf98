use std::fmt;

/// Operator precedence levels, low to high.
///
/// Equality and inequality share one level; the four ordering comparisons
/// share the level directly above it and below additive. This ordering
/// drives the parser's reduction loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    Assignment,
    LogicalOr,
    LogicalXor,
    LogicalAnd,
    Equality,
    Relational,
    Additive,
    Multiplicative,
    Unary,
    Power,
    Postfix,
}

/// How an operator groups with neighbors of equal precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Associativity {
    Left,
    Right,
    /// Unary prefix/postfix operators: never take part in the parser's
    /// reduction loop.
    None,
}

/// An operator token. Precedence, associativity and arity are plain data
/// queried through methods rather than a type hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    // right-associative binary
    Power,
    Assignment,
    // left-associative binary
    Addition,
    Subtraction,
    Multiplication,
    Division,
    Modulus,
    And,
    Or,
    Xor,
    Nand,
    Nor,
    Xnor,
    Equality,
    Inequality,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    // unary prefix
    Identity,
    Negation,
    Not,
    // unary postfix
    Factorial,
}

impl Operator {
    pub fn precedence(self) -> Precedence {
        use Operator::*;
        match self {
            Assignment => Precedence::Assignment,
            Or | Nor => Precedence::LogicalOr,
            Xor | Xnor => Precedence::LogicalXor,
            And | Nand => Precedence::LogicalAnd,
            Equality | Inequality => Precedence::Equality,
            Less | LessEqual | Greater | GreaterEqual => Precedence::Relational,
            Addition | Subtraction => Precedence::Additive,
            Multiplication | Division | Modulus => Precedence::Multiplicative,
            Identity | Negation | Not => Precedence::Unary,
            Power => Precedence::Power,
            Factorial => Precedence::Postfix,
        }
    }

    pub fn associativity(self) -> Associativity {
        use Operator::*;
        match self {
            Power | Assignment => Associativity::Right,
            Identity | Negation | Not | Factorial => Associativity::None,
            _ => Associativity::Left,
        }
    }

    pub fn arity(self) -> usize {
        use Operator::*;
        match self {
            Identity | Negation | Not | Factorial => 1,
            _ => 2,
        }
    }

    /// True for operators written after their operand.
    pub fn is_postfix(self) -> bool {
        matches!(self, Operator::Factorial)
    }

    /// Lower-case name used in error messages.
    pub(crate) fn name(self) -> &'static str {
        use Operator::*;
        match self {
            Power => "power",
            Assignment => "assignment",
            Addition => "addition",
            Subtraction => "subtraction",
            Multiplication => "multiplication",
            Division => "division",
            Modulus => "modulus",
            And => "and",
            Or => "or",
            Xor => "xor",
            Nand => "nand",
            Nor => "nor",
            Xnor => "xnor",
            Equality => "equality",
            Inequality => "inequality",
            Less => "less",
            LessEqual => "less-equal",
            Greater => "greater",
            GreaterEqual => "greater-equal",
            Identity => "identity",
            Negation => "negation",
            Not => "not",
            Factorial => "factorial",
        }
    }

    fn canonical(self) -> &'static str {
        use Operator::*;
        match self {
            Power => "Power",
            Assignment => "Assignment",
            Addition => "Addition",
            Subtraction => "Subtraction",
            Multiplication => "Multiplication",
            Division => "Division",
            Modulus => "Modulus",
            And => "And",
            Or => "Or",
            Xor => "Xor",
            Nand => "Nand",
            Nor => "Nor",
            Xnor => "Xnor",
            Equality => "Equality",
            Inequality => "Inequality",
            Less => "Less",
            LessEqual => "LessEqual",
            Greater => "Greater",
            GreaterEqual => "GreaterEqual",
            Identity => "Identity",
            Negation => "Negation",
            Not => "Not",
            Factorial => "Factorial",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.canonical())
    }
}
