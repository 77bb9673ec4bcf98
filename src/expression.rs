use std::fmt;

use crate::evaluator::{resolve, EvalError, RpnEvaluator};
use crate::lexer::{LexError, Lexer};
use crate::parser::{ParseError, Parser};
use crate::token::{Operand, Token};

/// Any stage failure, wrapped for callers that run the full pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    Lex(LexError),
    Parse(ParseError),
    Eval(EvalError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Lex(e) => write!(f, "{}", e),
            Error::Parse(e) => write!(f, "{}", e),
            Error::Eval(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Lex(e) => Some(e),
            Error::Parse(e) => Some(e),
            Error::Eval(e) => Some(e),
        }
    }
}

impl From<LexError> for Error {
    fn from(e: LexError) -> Self {
        Error::Lex(e)
    }
}

impl From<ParseError> for Error {
    fn from(e: ParseError) -> Self {
        Error::Parse(e)
    }
}

impl From<EvalError> for Error {
    fn from(e: EvalError) -> Self {
        Error::Eval(e)
    }
}

/// The fused pipeline: tokenize, parse, evaluate.
///
/// One instance keeps its variable table and result history across calls,
/// so `"x=12"` followed by `"x*3/(4+x)"` sees the binding, and `result(n)`
/// can reach back to the n-th prior result. Bindings made by earlier
/// successful calls survive later failing ones.
#[derive(Default)]
pub struct ExpressionEvaluator {
    lexer: Lexer,
    parser: Parser,
    evaluator: RpnEvaluator,
    results: Vec<Operand>,
}

impl ExpressionEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs the full pipeline over one expression.
    pub fn evaluate(&mut self, expression: &str) -> Result<Operand, Error> {
        let infix = self.lexer.tokenize(expression)?;
        let rpn = self.parser.parse(&infix)?;
        let result = self.evaluator.evaluate_with_history(&rpn, &self.results)?;

        // History stores concrete values; a lone unbound variable is kept
        // as-is since it has nothing to dereference to.
        let entry = resolve(result.clone()).unwrap_or_else(|_| result.clone());
        self.results.push(entry);
        Ok(result)
    }

    /// Stops after the parse, exposing the postfix token sequence.
    pub fn postfix(&mut self, expression: &str) -> Result<Vec<Token>, Error> {
        let infix = self.lexer.tokenize(expression)?;
        Ok(self.parser.parse(&infix)?)
    }

    /// Results of prior successful evaluations, oldest first.
    pub fn history(&self) -> &[Operand] {
        &self.results
    }
}
