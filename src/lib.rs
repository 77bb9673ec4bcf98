pub mod evaluator;
pub mod expression;
pub mod lexer;
pub mod parser;
pub mod token;

pub use evaluator::{EvalError, RpnEvaluator};
pub use expression::{Error, ExpressionEvaluator};
pub use lexer::{Lexer, LexError};
pub use parser::{Parser, ParseError};
pub use token::{Function, Operand, Operator, Pseudo, Token, Variable};
