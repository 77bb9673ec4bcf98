// tests/lexer_tests.rs

use tally_lang::lexer::{LexError, Lexer};
use tally_lang::token::{Operand, Token};

fn tokens(expression: &str) -> Vec<String> {
    let mut lexer = Lexer::new();
    lexer
        .tokenize(expression)
        .unwrap()
        .iter()
        .map(|t| t.to_string())
        .collect()
}

// ============================================================================
// Operators and Pseudo-Operations
// ============================================================================

#[test]
fn test_symbol_operators() {
    let test_cases = vec![
        ("1*2", vec!["1", "<Multiplication>", "2"]),
        ("1/2", vec!["1", "<Division>", "2"]),
        ("1%2", vec!["1", "<Modulus>", "2"]),
        ("1**2", vec!["1", "<Power>", "2"]),
        ("1<2", vec!["1", "<Less>", "2"]),
        ("1<=2", vec!["1", "<LessEqual>", "2"]),
        ("1>2", vec!["1", "<Greater>", "2"]),
        ("1>=2", vec!["1", "<GreaterEqual>", "2"]),
        ("1==2", vec!["1", "<Equality>", "2"]),
        ("1!=2", vec!["1", "<Inequality>", "2"]),
        ("x=2", vec!["Variable: null", "<Assignment>", "2"]),
        ("3!", vec!["3", "<Factorial>"]),
    ];

    for (input, expected) in test_cases {
        assert_eq!(tokens(input), expected, "input: {}", input);
    }
}

#[test]
fn test_word_operators() {
    assert_eq!(
        tokens("true and false or true xor false"),
        vec!["True", "<And>", "False", "<Or>", "True", "<Xor>", "False"]
    );
    assert_eq!(
        tokens("true nand false nor true xnor false"),
        vec!["True", "<Nand>", "False", "<Nor>", "True", "<Xnor>", "False"]
    );
    assert_eq!(tokens("not true"), vec!["<Not>", "True"]);
    assert_eq!(tokens("7 mod 3"), vec!["7", "<Modulus>", "3"]);
}

#[test]
fn test_pseudo_operations() {
    assert_eq!(
        tokens("(1,2)"),
        vec![
            "<LeftParenthesis>",
            "1",
            "<ArgumentSeparator>",
            "2",
            "<RightParenthesis>"
        ]
    );
}

// ============================================================================
// Context-Sensitive Plus and Minus
// ============================================================================

#[test]
fn test_sign_disambiguation() {
    let test_cases = vec![
        ("-4", vec!["<Negation>", "4"]),
        ("+4", vec!["<Identity>", "4"]),
        ("1-4", vec!["1", "<Subtraction>", "4"]),
        ("1+4", vec!["1", "<Addition>", "4"]),
        ("1+-4", vec!["1", "<Addition>", "<Negation>", "4"]),
        ("1--4", vec!["1", "<Subtraction>", "<Negation>", "4"]),
        (
            "(1)-4",
            vec![
                "<LeftParenthesis>",
                "1",
                "<RightParenthesis>",
                "<Subtraction>",
                "4",
            ],
        ),
        ("2!-4", vec!["2", "<Factorial>", "<Subtraction>", "4"]),
        (
            "sin-4",
            vec!["<Sin>", "<Negation>", "4"],
        ),
    ];

    for (input, expected) in test_cases {
        assert_eq!(tokens(input), expected, "input: {}", input);
    }
}

// ============================================================================
// Literals, Keywords, Variables
// ============================================================================

#[test]
fn test_numeric_literals() {
    assert_eq!(tokens("0"), vec!["0"]);
    assert_eq!(tokens("007"), vec!["7"]);
    assert_eq!(tokens("1.25"), vec!["1.25"]);
    assert_eq!(tokens("0.125"), vec!["0.125"]);
    assert_eq!(tokens("7."), vec!["7"]);
}

#[test]
fn test_trailing_dot_literal_is_a_real() {
    let mut lexer = Lexer::new();
    let parsed = lexer.tokenize("7.").unwrap();
    assert_eq!(parsed.len(), 1);
    assert!(matches!(parsed[0], Token::Operand(Operand::Real(_))));
    assert_eq!(tokens("7./2"), vec!["7", "<Division>", "2"]);
}

#[test]
fn test_literal_wider_than_machine_words() {
    let digits = "99999999999999999999999999999999999999999999999999999999999999999999";
    assert_eq!(tokens(digits), vec![digits]);
}

#[test]
fn test_function_keywords_any_case() {
    assert_eq!(tokens("sqrt(4)")[0], "<Sqrt>");
    assert_eq!(tokens("SQRT(4)")[0], "<Sqrt>");
    assert_eq!(tokens("Sqrt(4)")[0], "<Sqrt>");
    assert_eq!(tokens("arctan2(1,1)")[0], "<Arctan2>");
    assert_eq!(tokens("result(1)")[0], "<Result>");
}

#[test]
fn test_constants_are_reals() {
    let mut lexer = Lexer::new();
    for word in ["pi", "PI", "e", "E"] {
        let parsed = lexer.tokenize(word).unwrap();
        assert!(
            matches!(parsed[0], Token::Operand(Operand::Real(_))),
            "constant: {}",
            word
        );
    }
}

#[test]
fn test_variable_identity_within_one_lexer() {
    let mut lexer = Lexer::new();
    let a = lexer.tokenize("alpha").unwrap();
    let b = lexer.tokenize("alpha + beta").unwrap();
    assert_eq!(a[0], b[0]);
    assert_ne!(a[0], b[2]);

    // A fresh lexer mints fresh cells.
    let mut other = Lexer::new();
    let c = other.tokenize("alpha").unwrap();
    assert_ne!(a[0], c[0]);
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_bad_character_reports_offset() {
    let mut lexer = Lexer::new();
    let err = lexer.tokenize("12 @ 3").unwrap_err();
    match err {
        LexError::BadCharacter { expression, offset } => {
            assert_eq!(expression, "12 @ 3");
            assert_eq!(offset, 3);
        }
        other => panic!("unexpected error: {:?}", other),
    }
}
