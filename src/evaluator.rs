use std::fmt;

use bigdecimal::{BigDecimal, RoundingMode};
use num_bigint::BigInt;
use num_traits::{One, Signed, ToPrimitive, Zero};

use crate::token::{Function, Operand, Operator, Token};

/// Evaluation failure. Message strings are stable; callers and tests key
/// on them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    /// An operation needed more operands than the stack held, or the
    /// final stack was empty.
    InsufficientOperands,
    /// More than one value left on the stack at the end.
    TooManyOperands,
    /// An operation dereferenced an unbound variable.
    VariableNotInitialized,
    /// Assignment whose target is not a variable.
    AssignmentToNonVariable,
    DivisionByZero,
    /// Operand kind the operation does not accept.
    InvalidOperand { operation: &'static str },
    /// Argument outside the operation's mathematical domain.
    Domain { operation: &'static str },
    /// `result(n)` with a non-positive, non-integer or out-of-range index.
    InvalidResultIndex,
    /// A structural token leaked into the postfix sequence.
    UnexpectedToken,
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalError::InsufficientOperands => f.write_str("Error: insufficient operands"),
            EvalError::TooManyOperands => f.write_str("Error: too many operands"),
            EvalError::VariableNotInitialized => {
                f.write_str("Error: variable not initialized")
            }
            EvalError::AssignmentToNonVariable => {
                f.write_str("Error: assignment to a non-variable.")
            }
            EvalError::DivisionByZero => f.write_str("Error: division by zero"),
            EvalError::InvalidOperand { operation } => {
                write!(f, "Error: invalid operand for {}", operation)
            }
            EvalError::Domain { operation } => {
                write!(f, "Error: domain error in {}", operation)
            }
            EvalError::InvalidResultIndex => f.write_str("Error: invalid result index"),
            EvalError::UnexpectedToken => {
                f.write_str("Error: unexpected token in postfix expression")
            }
        }
    }
}

impl std::error::Error for EvalError {}

/// Binary numeric operands after promotion: two exact integers, or two
/// decimals with any integer side widened digit for digit.
enum Promoted {
    Integers(BigInt, BigInt),
    Reals(BigDecimal, BigDecimal),
}

/// Postfix (RPN) stack machine.
///
/// Walks the token sequence left to right with an explicit operand stack.
/// Operands push; operators and functions pop their arity, compute, and
/// push one result. Variables are dereferenced only when consumed, so a
/// lone unbound variable is a legal result.
#[derive(Debug, Default, Clone, Copy)]
pub struct RpnEvaluator;

impl RpnEvaluator {
    pub fn new() -> Self {
        RpnEvaluator
    }

    pub fn evaluate(&self, rpn: &[Token]) -> Result<Operand, EvalError> {
        self.evaluate_with_history(rpn, &[])
    }

    /// Evaluates with a 1-based result history for `result(n)`.
    pub fn evaluate_with_history(
        &self,
        rpn: &[Token],
        history: &[Operand],
    ) -> Result<Operand, EvalError> {
        let mut stack: Vec<Operand> = Vec::new();

        for token in rpn {
            match token {
                Token::Operand(operand) => stack.push(operand.clone()),
                Token::Operator(op) => {
                    if stack.len() < op.arity() {
                        return Err(EvalError::InsufficientOperands);
                    }
                    let result = apply_operator(*op, &mut stack)?;
                    stack.push(result);
                }
                Token::Function(func) => {
                    if stack.len() < func.arity() {
                        return Err(EvalError::InsufficientOperands);
                    }
                    let result = apply_function(*func, &mut stack, history)?;
                    stack.push(result);
                }
                Token::Pseudo(_) => return Err(EvalError::UnexpectedToken),
            }
        }

        let result = stack.pop().ok_or(EvalError::InsufficientOperands)?;
        if !stack.is_empty() {
            return Err(EvalError::TooManyOperands);
        }
        Ok(result)
    }
}

fn apply_operator(op: Operator, stack: &mut Vec<Operand>) -> Result<Operand, EvalError> {
    use Operator::*;

    // Assignment keeps its left operand raw; everything else dereferences.
    if op == Assignment {
        let value = pop_resolved(stack)?;
        let target = stack.pop().ok_or(EvalError::InsufficientOperands)?;
        let Operand::Variable(var) = target else {
            return Err(EvalError::AssignmentToNonVariable);
        };
        var.bind(value);
        return Ok(Operand::Variable(var));
    }

    if op.arity() == 1 {
        let operand = pop_resolved(stack)?;
        return apply_unary(op, operand);
    }

    let rhs = pop_resolved(stack)?;
    let lhs = pop_resolved(stack)?;

    match op {
        Addition => match promote(lhs, rhs, op.name())? {
            Promoted::Integers(a, b) => Ok(Operand::Integer(a + b)),
            Promoted::Reals(a, b) => Ok(Operand::Real(a + b)),
        },
        Subtraction => match promote(lhs, rhs, op.name())? {
            Promoted::Integers(a, b) => Ok(Operand::Integer(a - b)),
            Promoted::Reals(a, b) => Ok(Operand::Real(a - b)),
        },
        Multiplication => match promote(lhs, rhs, op.name())? {
            Promoted::Integers(a, b) => Ok(Operand::Integer(a * b)),
            Promoted::Reals(a, b) => Ok(Operand::Real(a * b)),
        },
        Division => match promote(lhs, rhs, op.name())? {
            Promoted::Integers(a, b) => {
                if b.is_zero() {
                    return Err(EvalError::DivisionByZero);
                }
                // BigInt division already truncates toward zero.
                Ok(Operand::Integer(a / b))
            }
            Promoted::Reals(a, b) => {
                if b.is_zero() {
                    return Err(EvalError::DivisionByZero);
                }
                Ok(Operand::Real(a / b))
            }
        },
        Modulus => match (lhs, rhs) {
            (Operand::Integer(a), Operand::Integer(b)) => {
                if b.is_zero() {
                    return Err(EvalError::DivisionByZero);
                }
                Ok(Operand::Integer(a % b))
            }
            _ => Err(EvalError::InvalidOperand {
                operation: op.name(),
            }),
        },
        Power => power(lhs, rhs, op.name()),
        And | Or | Xor | Nand | Nor | Xnor => match (lhs, rhs) {
            (Operand::Boolean(a), Operand::Boolean(b)) => {
                let value = match op {
                    And => a && b,
                    Or => a || b,
                    Xor => a != b,
                    Nand => !(a && b),
                    Nor => !(a || b),
                    _ => a == b,
                };
                Ok(Operand::Boolean(value))
            }
            _ => Err(EvalError::InvalidOperand {
                operation: op.name(),
            }),
        },
        Equality | Inequality | Less | LessEqual | Greater | GreaterEqual => {
            let ordering = compare(lhs, rhs, op.name())?;
            let value = match op {
                Equality => ordering.is_eq(),
                Inequality => ordering.is_ne(),
                Less => ordering.is_lt(),
                LessEqual => ordering.is_le(),
                Greater => ordering.is_gt(),
                _ => ordering.is_ge(),
            };
            Ok(Operand::Boolean(value))
        }
        _ => Err(EvalError::InvalidOperand {
            operation: op.name(),
        }),
    }
}

fn apply_unary(op: Operator, operand: Operand) -> Result<Operand, EvalError> {
    match op {
        Operator::Identity => match operand {
            Operand::Integer(_) | Operand::Real(_) => Ok(operand),
            _ => Err(EvalError::InvalidOperand {
                operation: op.name(),
            }),
        },
        Operator::Negation => match operand {
            Operand::Integer(value) => Ok(Operand::Integer(-value)),
            Operand::Real(value) => Ok(Operand::Real(-value)),
            _ => Err(EvalError::InvalidOperand {
                operation: op.name(),
            }),
        },
        Operator::Not => match operand {
            Operand::Boolean(value) => Ok(Operand::Boolean(!value)),
            _ => Err(EvalError::InvalidOperand {
                operation: op.name(),
            }),
        },
        Operator::Factorial => match operand {
            Operand::Integer(value) => factorial(&value).map(Operand::Integer),
            _ => Err(EvalError::InvalidOperand {
                operation: op.name(),
            }),
        },
        _ => Err(EvalError::InvalidOperand {
            operation: op.name(),
        }),
    }
}

fn apply_function(
    func: Function,
    stack: &mut Vec<Operand>,
    history: &[Operand],
) -> Result<Operand, EvalError> {
    use Function::*;

    if func.arity() == 2 {
        let rhs = pop_resolved(stack)?;
        let lhs = pop_resolved(stack)?;
        return match func {
            Pow => power(lhs, rhs, func.name()),
            // Ties go to the right operand, in the promoted domain.
            Max | Min => match promote(lhs, rhs, func.name())? {
                Promoted::Integers(a, b) => {
                    let left_wins = if func == Max { a > b } else { a < b };
                    Ok(Operand::Integer(if left_wins { a } else { b }))
                }
                Promoted::Reals(a, b) => {
                    let left_wins = if func == Max { a > b } else { a < b };
                    Ok(Operand::Real(if left_wins { a } else { b }))
                }
            },
            _ => {
                // arctan2(y, x)
                let y = to_float(&as_real(lhs, func.name())?, func.name())?;
                let x = to_float(&as_real(rhs, func.name())?, func.name())?;
                real_from_float(y.atan2(x), func.name()).map(Operand::Real)
            }
        };
    }

    let operand = pop_resolved(stack)?;

    match func {
        Abs => match operand {
            Operand::Integer(value) => Ok(Operand::Integer(value.abs())),
            Operand::Real(value) => Ok(Operand::Real(value.abs())),
            _ => Err(EvalError::InvalidOperand {
                operation: func.name(),
            }),
        },
        Ceil => {
            let value = as_real(operand, func.name())?;
            Ok(Operand::Real(value.with_scale_round(0, RoundingMode::Ceiling)))
        }
        Floor => {
            let value = as_real(operand, func.name())?;
            Ok(Operand::Real(value.with_scale_round(0, RoundingMode::Floor)))
        }
        Sqrt => {
            let value = as_real(operand, func.name())?;
            value
                .sqrt()
                .map(Operand::Real)
                .ok_or(EvalError::Domain {
                    operation: func.name(),
                })
        }
        Result => result_lookup(operand, history),
        Sin | Cos | Tan | Arcsin | Arccos | Arctan | Exp | Ln | Log | Lb => {
            let x = to_float(&as_real(operand, func.name())?, func.name())?;
            let y = match func {
                Sin => x.sin(),
                Cos => x.cos(),
                Tan => x.tan(),
                Arcsin => x.asin(),
                Arccos => x.acos(),
                Arctan => x.atan(),
                Exp => x.exp(),
                Ln => x.ln(),
                Log => x.log10(),
                _ => x.log2(),
            };
            real_from_float(y, func.name()).map(Operand::Real)
        }
        _ => Err(EvalError::InvalidOperand {
            operation: func.name(),
        }),
    }
}

/// 1-based lookup into the facade's result history.
fn result_lookup(index: Operand, history: &[Operand]) -> Result<Operand, EvalError> {
    let Operand::Integer(n) = index else {
        return Err(EvalError::InvalidResultIndex);
    };
    let n = n.to_usize().ok_or(EvalError::InvalidResultIndex)?;
    if n == 0 || n > history.len() {
        return Err(EvalError::InvalidResultIndex);
    }
    Ok(history[n - 1].clone())
}

/// Pops an operand and dereferences it if it is a variable.
fn pop_resolved(stack: &mut Vec<Operand>) -> Result<Operand, EvalError> {
    let operand = stack.pop().ok_or(EvalError::InsufficientOperands)?;
    resolve(operand)
}

/// Dereferences a bound variable to its value; passes every other operand
/// through.
pub(crate) fn resolve(operand: Operand) -> Result<Operand, EvalError> {
    match operand {
        Operand::Variable(var) => var.value().ok_or(EvalError::VariableNotInitialized),
        other => Ok(other),
    }
}

fn promote(
    lhs: Operand,
    rhs: Operand,
    operation: &'static str,
) -> Result<Promoted, EvalError> {
    match (lhs, rhs) {
        (Operand::Integer(a), Operand::Integer(b)) => Ok(Promoted::Integers(a, b)),
        (Operand::Real(a), Operand::Real(b)) => Ok(Promoted::Reals(a, b)),
        (Operand::Integer(a), Operand::Real(b)) => {
            Ok(Promoted::Reals(BigDecimal::from(a), b))
        }
        (Operand::Real(a), Operand::Integer(b)) => {
            Ok(Promoted::Reals(a, BigDecimal::from(b)))
        }
        _ => Err(EvalError::InvalidOperand { operation }),
    }
}

/// Total order over comparable operand pairs: two booleans (False < True)
/// or two numbers after promotion. Boolean against number is invalid.
fn compare(
    lhs: Operand,
    rhs: Operand,
    operation: &'static str,
) -> Result<std::cmp::Ordering, EvalError> {
    match (lhs, rhs) {
        (Operand::Boolean(a), Operand::Boolean(b)) => Ok(a.cmp(&b)),
        (lhs @ (Operand::Integer(_) | Operand::Real(_)), rhs @ (Operand::Integer(_) | Operand::Real(_))) => {
            match promote(lhs, rhs, operation)? {
                Promoted::Integers(a, b) => Ok(a.cmp(&b)),
                Promoted::Reals(a, b) => Ok(a.cmp(&b)),
            }
        }
        _ => Err(EvalError::InvalidOperand { operation }),
    }
}

fn power(lhs: Operand, rhs: Operand, operation: &'static str) -> Result<Operand, EvalError> {
    match promote(lhs, rhs, operation)? {
        Promoted::Integers(base, exp) => {
            if exp.is_negative() {
                // Exact reciprocal in the decimal domain.
                let positive = (-&exp).to_i64().ok_or(EvalError::Domain { operation })?;
                let denominator = dec_pow(&BigDecimal::from(base), positive);
                if denominator.is_zero() {
                    return Err(EvalError::DivisionByZero);
                }
                Ok(Operand::Real(BigDecimal::one() / denominator))
            } else {
                let exp = exp.to_u64().ok_or(EvalError::Domain { operation })?;
                Ok(Operand::Integer(int_pow(&base, exp)))
            }
        }
        Promoted::Reals(base, exp) => {
            if let Some(n) = integral_exponent(&exp) {
                if n < 0 && base.is_zero() {
                    return Err(EvalError::DivisionByZero);
                }
                Ok(Operand::Real(dec_pow(&base, n)))
            } else {
                let b = to_float(&base, operation)?;
                let e = to_float(&exp, operation)?;
                real_from_float(b.powf(e), operation).map(Operand::Real)
            }
        }
    }
}

/// Exact integer power by squaring.
fn int_pow(base: &BigInt, exp: u64) -> BigInt {
    let mut result = BigInt::one();
    let mut b = base.clone();
    let mut e = exp;
    while e > 0 {
        if e & 1 == 1 {
            result *= &b;
        }
        b = &b * &b;
        e >>= 1;
    }
    result
}

/// Exact decimal power by squaring for integer exponents; negative
/// exponents go through the (100-digit) decimal reciprocal.
fn dec_pow(base: &BigDecimal, exp: i64) -> BigDecimal {
    if exp == 0 {
        return BigDecimal::one();
    }
    if exp < 0 {
        return BigDecimal::one() / dec_pow(base, -exp);
    }
    let mut result = BigDecimal::one();
    let mut b = base.clone();
    let mut e = exp;
    while e > 0 {
        if e & 1 == 1 {
            result *= &b;
        }
        b = &b * &b;
        e >>= 1;
    }
    result
}

/// The exponent as an `i64` when the decimal holds an integral value small
/// enough; `None` sends the power through the float path.
fn integral_exponent(value: &BigDecimal) -> Option<i64> {
    let truncated = value.with_scale_round(0, RoundingMode::Down);
    if truncated != *value {
        return None;
    }
    truncated.as_bigint_and_exponent().0.to_i64()
}

fn factorial(n: &BigInt) -> Result<BigInt, EvalError> {
    if n.is_negative() {
        return Err(EvalError::Domain {
            operation: "factorial",
        });
    }
    let n = n.to_u64().ok_or(EvalError::Domain {
        operation: "factorial",
    })?;
    let mut product = BigInt::one();
    for i in 2..=n {
        product *= i;
    }
    Ok(product)
}

fn as_real(operand: Operand, operation: &'static str) -> Result<BigDecimal, EvalError> {
    match operand {
        Operand::Integer(value) => Ok(BigDecimal::from(value)),
        Operand::Real(value) => Ok(value),
        _ => Err(EvalError::InvalidOperand { operation }),
    }
}

fn to_float(value: &BigDecimal, operation: &'static str) -> Result<f64, EvalError> {
    value.to_f64().ok_or(EvalError::Domain { operation })
}

/// Converts a float result back to a decimal through its shortest decimal
/// representation; a non-finite float is a domain failure.
fn real_from_float(value: f64, operation: &'static str) -> Result<BigDecimal, EvalError> {
    if !value.is_finite() {
        return Err(EvalError::Domain { operation });
    }
    format!("{}", value)
        .parse()
        .map_err(|_| EvalError::Domain { operation })
}
