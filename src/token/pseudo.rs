use std::fmt;

/// Structural tokens that shape the parse and never reach the evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pseudo {
    LeftParenthesis,
    RightParenthesis,
    ArgumentSeparator,
}

impl fmt::Display for Pseudo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Pseudo::LeftParenthesis => "LeftParenthesis",
            Pseudo::RightParenthesis => "RightParenthesis",
            Pseudo::ArgumentSeparator => "ArgumentSeparator",
        };
        write!(f, "<{}>", name)
    }
}
