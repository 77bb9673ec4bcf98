use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_traits::Signed;

/// A value-carrying token.
///
/// Integers are exact arbitrary-precision values; reals are high-precision
/// decimals (the decimal backend keeps at least 100 significant digits
/// through division). Mixed integer/real arithmetic promotes the integer
/// side exactly, digit for digit, never through a binary float.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// Arbitrary-precision signed integer.
    Integer(BigInt),

    /// High-precision decimal number.
    Real(BigDecimal),

    /// Boolean truth value.
    Boolean(bool),

    /// A named variable (shared value cell, possibly unbound).
    Variable(Variable),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Integer(value) => write!(f, "{}", value),
            Operand::Real(value) => f.write_str(&format_real(value)),
            Operand::Boolean(true) => f.write_str("True"),
            Operand::Boolean(false) => f.write_str("False"),
            Operand::Variable(var) => match var.value() {
                Some(value) => write!(f, "{}", value),
                None => f.write_str("Variable: null"),
            },
        }
    }
}

/// A shared variable cell.
///
/// Cloning a `Variable` clones the *handle*, not the cell: all occurrences
/// of one identifier within a lexer instance alias the same cell, so
/// assignment through any of them rebinds all of them. Two variables compare
/// equal only when they are the same cell.
#[derive(Debug, Clone, Default)]
pub struct Variable {
    cell: Rc<RefCell<Option<Operand>>>,
}

impl Variable {
    /// Creates a fresh, unbound variable cell.
    pub fn new() -> Self {
        Self::default()
    }

    /// The bound value, if any.
    pub fn value(&self) -> Option<Operand> {
        self.cell.borrow().clone()
    }

    /// True once a value has been assigned.
    pub fn is_bound(&self) -> bool {
        self.cell.borrow().is_some()
    }

    /// Rebinds the cell. Assignment always stores a concrete value, never
    /// another variable.
    pub fn bind(&self, value: Operand) {
        *self.cell.borrow_mut() = Some(value);
    }
}

impl PartialEq for Variable {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.cell, &other.cell)
    }
}

/// Fixed-point rendering with trailing zeros (and a bare trailing decimal
/// point) stripped: `2.50` renders as `"2.5"`, `3.0` as `"3"`.
pub(crate) fn format_real(value: &BigDecimal) -> String {
    let (int_val, scale) = value.normalized().as_bigint_and_exponent();
    let negative = int_val.is_negative();
    let digits = int_val.magnitude().to_string();

    let mut rendered = if scale <= 0 {
        let mut whole = digits;
        for _ in 0..(-scale) {
            whole.push('0');
        }
        whole
    } else {
        let scale = scale as usize;
        if digits.len() > scale {
            let split = digits.len() - scale;
            format!("{}.{}", &digits[..split], &digits[split..])
        } else {
            format!("0.{}{}", "0".repeat(scale - digits.len()), digits)
        }
    };

    if negative {
        rendered.insert(0, '-');
    }
    rendered
}
