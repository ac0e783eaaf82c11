//! Formula compiler for curves of a single parameter.
//!
//! Turns text such as `sin(2*t)+t^2` into an immutable expression tree that
//! has been constant-folded and whose chains of functions have been fused
//! into single callables, then evaluates it at values of its free variable.
//!
//! # Example
//!
//! ```rust
//! use rope_expr::*;
//!
//! let x = compile::<f64>("2(t + 1) - sqrt(4)", "t").unwrap();
//! let x = x.bind('t').unwrap();
//! assert_eq!(x(0.5), 1.0);
//!
//! let error = compile::<f64>("(1 + 2", "t").unwrap_err();
//! assert_eq!(error.to_string(), "Unterminated parenthesis");
//! ```

mod alphabet;
mod build;
mod classify;
mod compile;
mod error;
mod evaluate;
mod expression;
mod function;
mod optimize;
mod parse;

/// Lexical classes are declared with the [`pest`] parsing expression grammar language.
///
/// ```text
#[doc = include_str!("grammar.pest")]
/// ```
pub mod grammar_doc {}

pub use alphabet::Alphabet;
pub use compile::{compile, Compiler};
pub use error::{CompileError, EvaluationError};
pub use expression::{Binding, Expression};

pub trait FloatExt:
    num_traits::Float
    + num_traits::FloatConst
    + std::str::FromStr
    + std::fmt::Debug
    + std::fmt::Display
    + Send
    + Sync
    + 'static
{
}
impl FloatExt for f32 {}
impl FloatExt for f64 {}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn value(formula: &str) -> f64 {
        compile::<f64>(formula, "t")
            .unwrap()
            .evaluate_without_parameter()
            .unwrap()
    }

    #[rstest]
    #[case("2+3*4", 14.0)]
    #[case("(2+3)*4", 20.0)]
    #[case("8 / 4 * 3", 6.0)]
    #[case("1 * 2 + 3 * 4", 14.0)]
    #[case("10-4-3", 3.0)]
    #[case("2^3^2", 64.0)]
    #[case("2^-1", 0.5)]
    #[case("2*-3", -6.0)]
    #[case("-2^2", -4.0)]
    #[case("((((1))))", 1.0)]
    #[case("1.5e1 + .5", 15.5)]
    fn real_op_precedence(#[case] formula: &str, #[case] expected: f64) {
        assert_eq!(value(formula), expected);
    }

    #[rstest]
    #[case("2(3+4)", 14.0)]
    #[case("(1+1)(2+2)", 8.0)]
    #[case("3 (2)", 6.0)]
    fn implicit_multiplication(#[case] formula: &str, #[case] expected: f64) {
        assert_eq!(value(formula), expected);
    }

    #[rstest]
    #[case("--5", 5.0)]
    #[case("-+-5", 5.0)]
    #[case("+-5", -5.0)]
    #[case("-5", -5.0)]
    #[case("+5", 5.0)]
    #[case("3 - - 2", 5.0)]
    #[case("-(2+3)", -5.0)]
    #[case("2*+(1+2)", 6.0)]
    #[case("2^+sqrt(4)", 4.0)]
    fn sign_folding(#[case] formula: &str, #[case] expected: f64) {
        assert_eq!(value(formula), expected);
    }

    #[rstest]
    #[case("sin(0)", 0.0)]
    #[case("sqrt(4)", 2.0)]
    #[case("abs(-5)", 5.0)]
    #[case("cbrt(27)", 3.0)]
    #[case("exp(0)", 1.0)]
    #[case("ln(1)", 0.0)]
    #[case("log(e)", 1.0)]
    #[case("cos(pi)", -1.0)]
    #[case("asin(1)*2 - pi", 0.0)]
    #[case("acos(1)", 0.0)]
    #[case("atan(0)", 0.0)]
    #[case("tan(0)", 0.0)]
    #[case("sqrt 16 + 1", 5.0)]
    #[case("abs(-2)^2", 4.0)]
    fn functions(#[case] formula: &str, #[case] expected: f64) {
        let actual = value(formula);
        assert!((actual - expected).abs() < 1e-12, "{formula}: {actual} != {expected}");
    }

    // `%` sits with `*` and `/` and truncates its operands.
    #[rstest]
    #[case("7%4", 3.0)]
    #[case("7%4*2", 6.0)]
    #[case("2*7%4", 2.0)]
    #[case("1+7%4", 4.0)]
    #[case("7.9%4.2", 3.0)]
    #[case("2^3%5", 3.0)]
    fn modulus(#[case] formula: &str, #[case] expected: f64) {
        assert_eq!(value(formula), expected);
    }

    #[test]
    fn parameter_binding() {
        let f = compile::<f64>("t^2+1", "t").unwrap();
        let f = f.bind('t').unwrap();
        assert_eq!(f(3.0), 10.0);
        assert_eq!(f(0.0), 1.0);
    }

    #[rstest]
    #[case("t-t", 3.0, 0.0)]
    #[case("-t^2", 3.0, -9.0)]
    #[case("-t+1", 3.0, -2.0)]
    #[case("2^-t*3", 1.0, 1.5)]
    #[case("t/2/2", 8.0, 2.0)]
    #[case("sin(t)^2 + cos(t)^2", 0.7, 1.0)]
    #[case("2*sin(t)", 0.5, 2.0 * 0.5_f64.sin())]
    #[case("sin(t)*2", 0.5, 2.0 * 0.5_f64.sin())]
    #[case("t - sin(t)", 0.5, 0.5 - 0.5_f64.sin())]
    #[case("sin(t) - t", 0.5, 0.5_f64.sin() - 0.5)]
    #[case("exp(t)/ln(t)", 2.0, 2.0_f64.exp() / 2.0_f64.ln())]
    #[case("ln(t)/exp(t)", 2.0, 2.0_f64.ln() / 2.0_f64.exp())]
    #[case("abs(t-5)", 2.0, 3.0)]
    #[case("2*+t", 3.0, 6.0)]
    fn parameterized(#[case] formula: &str, #[case] t: f64, #[case] expected: f64) {
        let expression = compile::<f64>(formula, "t").unwrap();
        let actual = expression.bind('t').unwrap()(t);
        assert!(
            (actual - expected).abs() < 1e-12,
            "{formula} at {t}: {actual} != {expected}"
        );
    }

    #[rstest]
    #[case("(1+2", CompileError::UnterminatedParenthesis)]
    #[case("1+2)", CompileError::UnmatchedClosingParenthesis)]
    #[case("1+@", CompileError::UnexpectedToken("@".to_string()))]
    #[case("y", CompileError::UnexpectedToken("y".to_string()))]
    #[case("2t", CompileError::Malformed)]
    #[case("2t(1)", CompileError::Malformed)]
    #[case("sin", CompileError::MissingOperands)]
    #[case("1+", CompileError::MissingOperands)]
    fn compile_errors(#[case] formula: &str, #[case] expected: CompileError) {
        assert_eq!(compile::<f64>(formula, "t").unwrap_err(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("()")]
    fn empty_input(#[case] formula: &str) {
        let expression = compile::<f64>(formula, "t").unwrap();
        assert!(expression.is_valid());
        assert_eq!(expression.evaluate_without_parameter(), Ok(0.0));
    }

    #[test]
    fn constant_formulas_fold_completely() {
        for names in ["", "t", "xyz"] {
            let expression = compile::<f64>("sqrt(2^4) * (1 + 2) - abs(-3)", names).unwrap();
            assert!(expression.parameters().is_empty());
            assert_eq!(expression.to_string(), "9");
            assert_eq!(expression.evaluate(None), Ok(9.0));
        }
    }

    #[test]
    fn parameters_survive_optimization() {
        let expression = compile::<f64>("t * (x + 1)", "tx").unwrap();
        let parameters = expression.parameters();
        assert!(parameters.contains(&'t'), "{parameters:?}");
        assert!(parameters.contains(&'x'), "{parameters:?}");
        assert!(expression.bind('t').is_err());
    }

    #[test]
    fn expressions_are_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Expression<f32>>();
        assert_send_sync::<Expression<f64>>();
    }

    #[test]
    fn single_precision() {
        let f = compile::<f32>("t/4 + pi", "t").unwrap().into_fn('t').unwrap();
        assert_eq!(f(2.0), 0.5 + std::f32::consts::PI);
    }

    #[test]
    fn deep_formulas_are_rejected() {
        let parentheses = format!("{}1{}", "(".repeat(20_000), ")".repeat(20_000));
        assert_eq!(compile::<f64>(&parentheses, "t").unwrap_err(), CompileError::TooDeep);

        let sum = format!("{}t", "t+".repeat(10_000));
        assert_eq!(compile::<f64>(&sum, "t").unwrap_err(), CompileError::TooDeep);
    }

    #[test]
    fn formulas_at_the_depth_limit_evaluate() {
        let sum = format!("t{}", "+t".repeat(255));
        let f = compile::<f64>(&sum, "t").unwrap();
        assert_eq!(f.bind('t').unwrap()(1.0), 256.0);

        let nested = format!("{}t{}", "abs(".repeat(255), ")".repeat(255));
        let f = compile::<f64>(&nested, "t").unwrap();
        assert_eq!(f.bind('t').unwrap()(-2.0), 2.0);
    }

    #[test]
    fn long_formulas_compile_in_linear_time() {
        // A balanced sum of 2^15 terms: about 131k characters, 16 levels deep.
        fn balanced(levels: u32) -> String {
            match levels {
                0 => "t".to_string(),
                _ => {
                    let half = balanced(levels - 1);
                    format!("({half}+{half})")
                }
            }
        }
        let formula = balanced(15);
        assert!(formula.len() > 100_000);

        let start = std::time::Instant::now();
        let f = compile::<f64>(&formula, "t").unwrap();
        let elapsed = start.elapsed();
        assert!(elapsed < std::time::Duration::from_secs(10), "took {elapsed:?}");
        assert_eq!(f.bind('t').unwrap()(1.0), 32768.0);
    }

    #[test]
    fn malformed_input_never_panics() {
        let inputs = [
            "", "(", ")", "()", ")(", "((", "+", "-", "*", "^^", "%%", "sin", "sin(", "sin()",
            "1e", "e", "ee", "pipi", "π(", "t t", "(t)(t)", "1..2", "..", "--", "+-+", "2*-",
            "abs(-)", "√", "tan(1)+", "*t", "t*", "(((t)))", "¿", "1 2", "sqrt sqrt",
        ];
        for input in inputs {
            // Either outcome is fine; reaching this line is the point.
            if let Ok(expression) = compile::<f64>(input, "t") {
                assert!(expression.is_valid());
            }
        }
    }
}
