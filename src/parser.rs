use std::fmt;

use crate::token::{Associativity, Pseudo, Token};

/// Parse failure. The parser only sees structure, so everything it can
/// report is about parenthesization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// A `)` with no matching `(`.
    UnmatchedRightParenthesis,
    /// End of input with a `(` still open.
    MissingRightParenthesis,
    /// A structural token the algorithm has no rule for.
    UnknownToken,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            ParseError::UnmatchedRightParenthesis => "Error: right parenthesis, has no matching left parenthesis",
            ParseError::MissingRightParenthesis => "Error: missing right parenthesis",
            ParseError::UnknownToken => "Error: unknown token",
        };
        f.write_str(message)
    }
}

impl std::error::Error for ParseError {}

/// Shunting-yard reordering of an infix token sequence into postfix (RPN).
///
/// Stateless: all context lives in the output queue and the operator stack
/// for the duration of one `parse` call.
#[derive(Debug, Default, Clone, Copy)]
pub struct Parser;

impl Parser {
    pub fn new() -> Self {
        Parser
    }

    pub fn parse(&self, infix: &[Token]) -> Result<Vec<Token>, ParseError> {
        let mut output: Vec<Token> = Vec::with_capacity(infix.len());
        let mut stack: Vec<Token> = Vec::new();

        for token in infix {
            match token {
                Token::Operand(_) => output.push(token.clone()),
                Token::Function(_) => stack.push(token.clone()),
                Token::Pseudo(Pseudo::ArgumentSeparator) => {
                    // Flush the current argument; the parenthesis stays put.
                    while let Some(top) = stack.last() {
                        if matches!(top, Token::Pseudo(Pseudo::LeftParenthesis)) {
                            break;
                        }
                        output.push(stack.pop().ok_or(ParseError::UnknownToken)?);
                    }
                }
                Token::Pseudo(Pseudo::LeftParenthesis) => stack.push(token.clone()),
                Token::Pseudo(Pseudo::RightParenthesis) => {
                    loop {
                        let top = stack
                            .pop()
                            .ok_or(ParseError::UnmatchedRightParenthesis)?;
                        if matches!(top, Token::Pseudo(Pseudo::LeftParenthesis)) {
                            break;
                        }
                        output.push(top);
                    }
                    if matches!(stack.last(), Some(Token::Function(_))) {
                        output.push(stack.pop().ok_or(ParseError::UnknownToken)?);
                    }
                }
                Token::Operator(op) => {
                    while let Some(Token::Operator(top)) = stack.last() {
                        let reduce = match op.associativity() {
                            Associativity::Left => op.precedence() <= top.precedence(),
                            Associativity::Right => op.precedence() < top.precedence(),
                            Associativity::None => false,
                        };
                        if !reduce {
                            break;
                        }
                        output.push(stack.pop().ok_or(ParseError::UnknownToken)?);
                    }
                    stack.push(token.clone());
                }
            }
        }

        while let Some(top) = stack.pop() {
            if matches!(top, Token::Pseudo(Pseudo::LeftParenthesis)) {
                return Err(ParseError::MissingRightParenthesis);
            }
            output.push(top);
        }

        Ok(output)
    }
}
