use std::collections::HashMap;
use std::fmt;

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use once_cell::sync::Lazy;

use crate::token::{Function, Operand, Operator, Pseudo, Token, Variable};

/// Lexing failure with the offending expression and 0-based character
/// offset attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    /// A character that starts no token.
    BadCharacter { expression: String, offset: usize },
    /// A numeric literal that could not be converted.
    NumericOverflow { expression: String, offset: usize },
}

impl LexError {
    pub fn expression(&self) -> &str {
        match self {
            LexError::BadCharacter { expression, .. }
            | LexError::NumericOverflow { expression, .. } => expression,
        }
    }

    pub fn offset(&self) -> usize {
        match self {
            LexError::BadCharacter { offset, .. }
            | LexError::NumericOverflow { offset, .. } => *offset,
        }
    }
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexError::BadCharacter { expression, offset } => write!(
                f,
                "Error: bad character '{}' at offset {} in \"{}\"",
                expression.chars().nth(*offset).unwrap_or('?'),
                offset,
                expression
            ),
            LexError::NumericOverflow { offset, .. } => {
                write!(f, "Error: unconvertible numeric literal at offset {}", offset)
            }
        }
    }
}

impl std::error::Error for LexError {}

/// Keyword table entries: words that lex to something other than a variable.
enum Keyword {
    Operator(Operator),
    Function(Function),
    True,
    False,
    Pi,
    E,
}

/// 100 decimal digits of pi, matching the evaluator's working precision.
static PI: Lazy<BigDecimal> = Lazy::new(|| {
    "3.1415926535897932384626433832795028841971693993751058209749445923078164062862089986280348253421170679"
        .parse()
        .unwrap_or_else(|_| BigDecimal::default())
});

/// 100 decimal digits of e.
static E: Lazy<BigDecimal> = Lazy::new(|| {
    "2.7182818284590452353602874713526624977572470936999595749669676277240766303535475945713821785251664274"
        .parse()
        .unwrap_or_else(|_| BigDecimal::default())
});

static KEYWORDS: Lazy<HashMap<&'static str, Keyword>> = Lazy::new(|| {
    let mut map = HashMap::new();
    map.insert("mod", Keyword::Operator(Operator::Modulus));
    map.insert("and", Keyword::Operator(Operator::And));
    map.insert("or", Keyword::Operator(Operator::Or));
    map.insert("xor", Keyword::Operator(Operator::Xor));
    map.insert("nand", Keyword::Operator(Operator::Nand));
    map.insert("nor", Keyword::Operator(Operator::Nor));
    map.insert("xnor", Keyword::Operator(Operator::Xnor));
    map.insert("not", Keyword::Operator(Operator::Not));
    map.insert("true", Keyword::True);
    map.insert("false", Keyword::False);
    map.insert("pi", Keyword::Pi);
    map.insert("e", Keyword::E);
    map.insert("abs", Keyword::Function(Function::Abs));
    map.insert("arccos", Keyword::Function(Function::Arccos));
    map.insert("arcsin", Keyword::Function(Function::Arcsin));
    map.insert("arctan", Keyword::Function(Function::Arctan));
    map.insert("arctan2", Keyword::Function(Function::Arctan2));
    map.insert("ceil", Keyword::Function(Function::Ceil));
    map.insert("cos", Keyword::Function(Function::Cos));
    map.insert("exp", Keyword::Function(Function::Exp));
    map.insert("floor", Keyword::Function(Function::Floor));
    map.insert("lb", Keyword::Function(Function::Lb));
    map.insert("ln", Keyword::Function(Function::Ln));
    map.insert("log", Keyword::Function(Function::Log));
    map.insert("max", Keyword::Function(Function::Max));
    map.insert("min", Keyword::Function(Function::Min));
    map.insert("pow", Keyword::Function(Function::Pow));
    map.insert("result", Keyword::Function(Function::Result));
    map.insert("sin", Keyword::Function(Function::Sin));
    map.insert("sqrt", Keyword::Function(Function::Sqrt));
    map.insert("tan", Keyword::Function(Function::Tan));
    map
});

/// Converts expression text into an infix token sequence.
///
/// The lexer owns the variable table: each distinct identifier (matched
/// case-sensitively) maps to one shared variable cell for the lifetime of
/// the lexer, so `"x=4"` followed by `"x+1"` through the same lexer sees
/// the binding. Keywords are matched case-insensitively.
#[derive(Default)]
pub struct Lexer {
    variables: HashMap<String, Variable>,
}

impl Lexer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tokenize(&mut self, expression: &str) -> Result<Vec<Token>, LexError> {
        let mut scan = Scan::new(expression);
        let mut tokens: Vec<Token> = Vec::new();

        loop {
            scan.skip_whitespace();
            let Some(ch) = scan.current_char() else {
                return Ok(tokens);
            };

            let token = if ch.is_ascii_digit() {
                scan.read_number(expression)?
            } else if ch.is_alphabetic() {
                self.read_word(&mut scan)
            } else {
                scan.read_symbol(expression, tokens.last())?
            };
            tokens.push(token);
        }
    }

    fn read_word(&mut self, scan: &mut Scan) -> Token {
        let word = scan.read_identifier();
        match KEYWORDS.get(word.to_lowercase().as_str()) {
            Some(Keyword::Operator(op)) => Token::Operator(*op),
            Some(Keyword::Function(func)) => Token::Function(*func),
            Some(Keyword::True) => Token::Operand(Operand::Boolean(true)),
            Some(Keyword::False) => Token::Operand(Operand::Boolean(false)),
            Some(Keyword::Pi) => Token::Operand(Operand::Real(PI.clone())),
            Some(Keyword::E) => Token::Operand(Operand::Real(E.clone())),
            None => {
                let var = self.variables.entry(word).or_default();
                Token::Operand(Operand::Variable(var.clone()))
            }
        }
    }
}

struct Scan {
    input: Vec<char>,
    position: usize,
}

impl Scan {
    fn new(input: &str) -> Self {
        Scan {
            input: input.chars().collect(),
            position: 0,
        }
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn read_identifier(&mut self) -> String {
        let mut result = String::new();
        while let Some(ch) = self.current_char() {
            if ch.is_alphanumeric() {
                result.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        result
    }

    fn read_number(&mut self, expression: &str) -> Result<Token, LexError> {
        let start = self.position;
        let mut number = String::new();
        let mut is_real = false;

        while let Some(ch) = self.current_char() {
            if ch.is_ascii_digit() {
                number.push(ch);
                self.advance();
            } else if ch == '.' && !is_real {
                // A dot after a digit run always starts the fraction,
                // which may be empty: "7." is the real 7.
                is_real = true;
                number.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        // Values come from the exact source digit string; no detour
        // through a binary float.
        if is_real {
            let literal = number.strip_suffix('.').unwrap_or(&number);
            let value: BigDecimal = literal.parse().map_err(|_| LexError::NumericOverflow {
                expression: expression.to_string(),
                offset: start,
            })?;
            Ok(Token::Operand(Operand::Real(value)))
        } else {
            let value: BigInt = number.parse().map_err(|_| LexError::NumericOverflow {
                expression: expression.to_string(),
                offset: start,
            })?;
            Ok(Token::Operand(Operand::Integer(value)))
        }
    }

    fn read_symbol(
        &mut self,
        expression: &str,
        previous: Option<&Token>,
    ) -> Result<Token, LexError> {
        let offset = self.position;
        let Some(ch) = self.current_char() else {
            return Err(LexError::BadCharacter {
                expression: expression.to_string(),
                offset,
            });
        };

        let token = match ch {
            '<' => {
                if self.peek_char(1) == Some('=') {
                    self.advance();
                    Token::Operator(Operator::LessEqual)
                } else {
                    Token::Operator(Operator::Less)
                }
            }
            '>' => {
                if self.peek_char(1) == Some('=') {
                    self.advance();
                    Token::Operator(Operator::GreaterEqual)
                } else {
                    Token::Operator(Operator::Greater)
                }
            }
            '=' => {
                if self.peek_char(1) == Some('=') {
                    self.advance();
                    Token::Operator(Operator::Equality)
                } else {
                    Token::Operator(Operator::Assignment)
                }
            }
            '!' => {
                if self.peek_char(1) == Some('=') {
                    self.advance();
                    Token::Operator(Operator::Inequality)
                } else {
                    Token::Operator(Operator::Factorial)
                }
            }
            '*' => {
                if self.peek_char(1) == Some('*') {
                    self.advance();
                    Token::Operator(Operator::Power)
                } else {
                    Token::Operator(Operator::Multiplication)
                }
            }
            '/' => Token::Operator(Operator::Division),
            '%' => Token::Operator(Operator::Modulus),
            '(' => Token::Pseudo(Pseudo::LeftParenthesis),
            ')' => Token::Pseudo(Pseudo::RightParenthesis),
            ',' => Token::Pseudo(Pseudo::ArgumentSeparator),
            '+' => {
                if binds_binary(previous) {
                    Token::Operator(Operator::Addition)
                } else {
                    Token::Operator(Operator::Identity)
                }
            }
            '-' => {
                if binds_binary(previous) {
                    Token::Operator(Operator::Subtraction)
                } else {
                    Token::Operator(Operator::Negation)
                }
            }
            _ => {
                return Err(LexError::BadCharacter {
                    expression: expression.to_string(),
                    offset,
                });
            }
        };

        self.advance();
        Ok(token)
    }
}

/// A `+`/`-` is binary when the preceding token can end a subexpression:
/// an operand, a closing parenthesis, or a postfix operator.
fn binds_binary(previous: Option<&Token>) -> bool {
    match previous {
        Some(Token::Operand(_)) => true,
        Some(Token::Pseudo(Pseudo::RightParenthesis)) => true,
        Some(Token::Operator(op)) => op.is_postfix(),
        _ => false,
    }
}
