//! # Tally Expression Language - Token Model
//!
//! Tokens are the common currency of the whole pipeline: the lexer produces
//! them, the parser reorders them, and the evaluator consumes them.
//!
//! The model is organized into focused submodules:
//!
//! - **[operand]** - Value-carrying tokens (integers, reals, booleans,
//!   variables)
//! - **[operator]** - Operator tokens with precedence, associativity and
//!   arity carried as data
//! - **[function]** - Named function tokens (`abs`, `sin`, `max`, ...)
//! - **[pseudo]** - Structural tokens consumed only by the parser
//!
//! ## Core Concepts
//!
//! ### Operands vs. operations
//!
//! An *operand* carries a value and is pushed onto the evaluation stack. An
//! *operation* (operator or function) consumes a fixed number of operands
//! and produces exactly one result. Pseudo-operations (parentheses, the
//! argument separator) shape the parse and never reach the evaluator.
//!
//! ### Shared variable cells
//!
//! A `Variable` operand is a shared, mutable value cell. The lexer hands out
//! clones of the *same* cell for every occurrence of an identifier, so an
//! assignment through one occurrence is visible through all of them.
//!
//! ### Rendering
//!
//! Every token has a canonical textual form used both for user-facing output
//! and for comparing token sequences in tests: operands render their value,
//! operations render a bracketed name such as `<Addition>`.
pub mod function;
pub mod operand;
pub mod operator;
pub mod pseudo;

pub use function::Function;
pub use operand::{Operand, Variable};
pub use operator::{Associativity, Operator, Precedence};
pub use pseudo::Pseudo;

use std::fmt;

/// A single lexical/parse/evaluation token.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// A value-carrying token.
    Operand(Operand),

    /// An operator with precedence and associativity.
    Operator(Operator),

    /// A named function.
    Function(Function),

    /// A structural token (parentheses, argument separator).
    Pseudo(Pseudo),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Operand(operand) => write!(f, "{}", operand),
            Token::Operator(op) => write!(f, "{}", op),
            Token::Function(func) => write!(f, "{}", func),
            Token::Pseudo(pseudo) => write!(f, "{}", pseudo),
        }
    }
}

impl From<Operand> for Token {
    fn from(operand: Operand) -> Self {
        Token::Operand(operand)
    }
}

impl From<Operator> for Token {
    fn from(op: Operator) -> Self {
        Token::Operator(op)
    }
}

impl From<Function> for Token {
    fn from(func: Function) -> Self {
        Token::Function(func)
    }
}

impl From<Pseudo> for Token {
    fn from(pseudo: Pseudo) -> Self {
        Token::Pseudo(pseudo)
    }
}
