// tests/evaluator_tests.rs

use tally_lang::evaluator::{EvalError, RpnEvaluator};
use tally_lang::lexer::Lexer;
use tally_lang::parser::Parser;
use tally_lang::token::Operand;

fn eval(expression: &str) -> Result<Operand, EvalError> {
    let infix = Lexer::new().tokenize(expression).unwrap();
    let rpn = Parser::new().parse(&infix).unwrap();
    RpnEvaluator::new().evaluate(&rpn)
}

fn eval_str(expression: &str) -> String {
    eval(expression).unwrap().to_string()
}

fn eval_close(expression: &str, expected: f64) {
    let result = eval(expression).unwrap();
    let Operand::Real(value) = result else {
        panic!("{}: expected a real, got {}", expression, result);
    };
    let actual: f64 = value.to_string().parse().unwrap();
    assert!(
        (actual - expected).abs() < 1e-9,
        "{}: {} != {}",
        expression,
        actual,
        expected
    );
}

// ============================================================================
// Exact Integer Arithmetic
// ============================================================================

#[test]
fn test_integer_arithmetic() {
    assert_eq!(eval_str("2+3"), "5");
    assert_eq!(eval_str("2-3"), "-1");
    assert_eq!(eval_str("6*7"), "42");
    assert_eq!(eval_str("7/2"), "3");
    assert_eq!(eval_str("-7/2"), "-3");
    assert_eq!(eval_str("7%3"), "1");
    assert_eq!(eval_str("-7%3"), "-1");
    assert_eq!(eval_str("7 mod 3"), "1");
}

#[test]
fn test_factorial_of_100_is_exact() {
    assert_eq!(
        eval_str("100!"),
        "93326215443944152681699238856266700490715968264381621468592963895217599993229915608941463976156518286253697920827223758251185210916864000000000000000000000000"
    );
}

#[test]
fn test_huge_integer_power_is_exact() {
    assert_eq!(
        eval_str("123**123"),
        "114374367934617190099880295228066276746218078451850229775887975052369504785666896446606568365201542169649974727730628842345343196581134895919942820874449837212099476648958359023796078549041949007807220625356526926729664064846685758382803707100766740220839267"
    );
}

#[test]
fn test_power_tower_is_right_associative() {
    assert_eq!(eval_str("4**3**2"), "262144");
}

#[test]
fn test_negative_integer_exponent() {
    assert_eq!(eval_str("2**-2"), "0.25");
    assert_eq!(eval_str("4**-2"), "0.0625");
}

// ============================================================================
// Decimal Arithmetic and Promotion
// ============================================================================

#[test]
fn test_mixed_arithmetic_promotes_exactly() {
    assert_eq!(eval_str("2+0.5"), "2.5");
    assert_eq!(eval_str("0.5+2"), "2.5");
    assert_eq!(eval_str("7.0/2"), "3.5");
    assert_eq!(eval_str("1.5*2"), "3");
    assert_eq!(eval_str("0.1+0.2"), "0.3");
}

#[test]
fn test_division_carries_at_least_fifty_digits() {
    let rendered = eval_str("1/3.0");
    let fifty_threes = "3".repeat(50);
    assert!(
        rendered.starts_with(&format!("0.{}", fifty_threes)),
        "got {}",
        rendered
    );
}

#[test]
fn test_integral_real_exponent_stays_exact() {
    assert_eq!(eval_str("1.5**2"), "2.25");
    assert_eq!(eval_str("0.5**10"), "0.0009765625");
}

#[test]
fn test_unary_operators() {
    assert_eq!(eval_str("-4"), "-4");
    assert_eq!(eval_str("+4"), "4");
    assert_eq!(eval_str("--4"), "4");
    assert_eq!(eval_str("-4.5"), "-4.5");
}

// ============================================================================
// Booleans, Comparisons
// ============================================================================

#[test]
fn test_boolean_operators() {
    assert_eq!(eval_str("true and true"), "True");
    assert_eq!(eval_str("true and false"), "False");
    assert_eq!(eval_str("false or true"), "True");
    assert_eq!(eval_str("true xor true"), "False");
    assert_eq!(eval_str("true nand true"), "False");
    assert_eq!(eval_str("false nor false"), "True");
    assert_eq!(eval_str("true xnor true"), "True");
    assert_eq!(eval_str("not false"), "True");
}

#[test]
fn test_comparisons() {
    assert_eq!(eval_str("1<2"), "True");
    assert_eq!(eval_str("2<=2"), "True");
    assert_eq!(eval_str("3>4"), "False");
    assert_eq!(eval_str("4>=4"), "True");
    assert_eq!(eval_str("2==2.0"), "True");
    assert_eq!(eval_str("2!=3"), "True");
    assert_eq!(eval_str("false<true"), "True");
    assert_eq!(eval_str("false==false"), "True");
}

#[test]
fn test_boolean_number_comparison_is_invalid() {
    assert!(matches!(
        eval("true==1"),
        Err(EvalError::InvalidOperand { .. })
    ));
}

// ============================================================================
// Functions
// ============================================================================

#[test]
fn test_abs() {
    assert_eq!(eval_str("abs(-4)"), "4");
    assert_eq!(eval_str("abs(4)"), "4");
    assert_eq!(eval_str("abs(-4.5)"), "4.5");
}

#[test]
fn test_rounding() {
    assert_eq!(eval_str("ceil(2.1)"), "3");
    assert_eq!(eval_str("ceil(-2.1)"), "-2");
    assert_eq!(eval_str("floor(2.9)"), "2");
    assert_eq!(eval_str("floor(-2.1)"), "-3");
}

#[test]
fn test_sqrt() {
    assert_eq!(eval_str("sqrt(16)"), "4");
    eval_close("sqrt(2)", std::f64::consts::SQRT_2);
    assert!(matches!(eval("sqrt(-4)"), Err(EvalError::Domain { .. })));
}

#[test]
fn test_trigonometry() {
    eval_close("sin(0.0)", 0.0);
    eval_close("cos(0.0)", 1.0);
    eval_close("sin(1.0)", 1f64.sin());
    eval_close("tan(1.0)", 1f64.tan());
    eval_close("arcsin(1.0)", std::f64::consts::FRAC_PI_2);
    eval_close("arccos(1.0)", 0.0);
    eval_close("arctan(1.0)", std::f64::consts::FRAC_PI_4);
    eval_close("arctan2(1,1)", std::f64::consts::FRAC_PI_4);
    assert!(matches!(eval("arcsin(2)"), Err(EvalError::Domain { .. })));
}

#[test]
fn test_pythagorean_identity() {
    eval_close("sin(1.0)**2+cos(1.0)**2", 1.0);
}

#[test]
fn test_exponentials_and_logarithms() {
    eval_close("exp(1)", std::f64::consts::E);
    eval_close("ln(e)", 1.0);
    eval_close("log(1000)", 3.0);
    eval_close("lb(8)", 3.0);
    eval_close("pow(2,0.5)", std::f64::consts::SQRT_2);
    assert!(matches!(eval("ln(0)"), Err(EvalError::Domain { .. })));
    assert!(matches!(eval("log(-1)"), Err(EvalError::Domain { .. })));
}

#[test]
fn test_max_min() {
    assert_eq!(eval_str("max(2,3)"), "3");
    assert_eq!(eval_str("max(3,2)"), "3");
    assert_eq!(eval_str("min(2,3)"), "2");
    assert_eq!(eval_str("max(2,2.5)"), "2.5");
    assert_eq!(eval_str("min(2,2.5)"), "2");
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_division_by_zero() {
    assert_eq!(eval("1/0"), Err(EvalError::DivisionByZero));
    assert_eq!(eval("1.0/0.0"), Err(EvalError::DivisionByZero));
    assert_eq!(eval("1%0"), Err(EvalError::DivisionByZero));
    assert_eq!(eval("0**-1"), Err(EvalError::DivisionByZero));
}

#[test]
fn test_modulus_rejects_reals() {
    assert!(matches!(
        eval("1.5%2"),
        Err(EvalError::InvalidOperand { .. })
    ));
}

#[test]
fn test_factorial_rejects_negative_and_real() {
    assert!(matches!(eval("(-3)!"), Err(EvalError::Domain { .. })));
    assert!(matches!(
        eval("2.5!"),
        Err(EvalError::InvalidOperand { .. })
    ));
}

#[test]
fn test_stack_discipline() {
    assert_eq!(eval("1 2"), Err(EvalError::TooManyOperands));
    assert_eq!(eval("1+"), Err(EvalError::InsufficientOperands));
}
