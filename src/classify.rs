//! Prefix matchers over the unconsumed part of a formula.
//!
//! Every matcher returns the byte length it consumed alongside the matched
//! value, so the caller can advance with `&text[len..]`. The pest rules only
//! ever see a short window of the text, which keeps a whole formula linear.

use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;

use crate::alphabet::Alphabet;
use crate::function::Function;
use crate::FloatExt;

#[derive(Parser)]
#[grammar = "grammar.pest"] // relative to project `src`
struct FormulaLexer;

/// Characters in the longest keyword: function names, `pi`, and `-` plus the
/// character that decides whether it is a negation.
const KEYWORD_WINDOW: usize = 4;

fn match_rule(rule: Rule, text: &str) -> Option<Pair<'_, Rule>> {
    FormulaLexer::parse(rule, text).ok()?.next()
}

/// At most the first `chars` characters of `text`.
fn window(text: &str, chars: usize) -> &str {
    match text.char_indices().nth(chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

/// The prefix of `text` a numeric literal could span: an optional sign,
/// digits with at most one `.`, then an optional exponent.
fn number_window(text: &str) -> &str {
    let bytes = text.as_bytes();
    let digits = |from: usize| {
        from + bytes[from..]
            .iter()
            .take_while(|byte| byte.is_ascii_digit())
            .count()
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    end = digits(end);
    if bytes.get(end) == Some(&b'.') {
        end = digits(end + 1);
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        end += 1;
        if matches!(bytes.get(end), Some(b'+' | b'-')) {
            end += 1;
        }
        end = digits(end);
    }
    &text[..end]
}

/// Longest decimal literal at the start of `text`.
///
/// A leading `+`/`-` is only part of the literal when `signed` is set.
pub(crate) fn match_number<R: FloatExt>(text: &str, signed: bool) -> Option<(R, usize)> {
    let rule = if signed {
        Rule::signed_number
    } else {
        Rule::number
    };
    let text = number_window(text);
    if text.is_empty() {
        return None;
    }
    let literal = match_rule(rule, text)?.as_str();
    let value = literal.parse::<R>().ok()?;
    Some((value, literal.len()))
}

/// Named function at the start of `text`.
///
/// In operand position a `-` that is not directly followed by a digit is the
/// negation function rather than a binary minus.
pub(crate) fn match_function(text: &str, operand_position: bool) -> Option<(Function, usize)> {
    let text = window(text, KEYWORD_WINDOW);
    if operand_position {
        if let Some(negation) = match_rule(Rule::negation, text) {
            return Some((Function::Negate, negation.as_str().len()));
        }
    }
    let pair = match_rule(Rule::function, text)?;
    let len = pair.as_str().len();
    let function = match pair.into_inner().next()?.as_rule() {
        Rule::sin => Function::Sin,
        Rule::cos => Function::Cos,
        Rule::tan => Function::Tan,
        Rule::asin => Function::Asin,
        Rule::acos => Function::Acos,
        Rule::atan => Function::Atan,
        Rule::ln | Rule::log => Function::Ln,
        Rule::exp => Function::Exp,
        Rule::abs => Function::Abs,
        Rule::sqrt => Function::Sqrt,
        Rule::cbrt => Function::Cbrt,
        x => unreachable!("Unexpected function rule {x:?}"),
    };
    Some((function, len))
}

pub(crate) fn match_pi(text: &str) -> Option<usize> {
    match_rule(Rule::pi, window(text, KEYWORD_WINDOW)).map(|pair| pair.as_str().len())
}

pub(crate) fn match_euler(text: &str) -> Option<usize> {
    match_rule(Rule::euler, window(text, 1)).map(|pair| pair.as_str().len())
}

pub(crate) fn match_parameter(text: &str, alphabet: &Alphabet) -> Option<char> {
    text.chars().next().filter(|&c| alphabet.contains(c))
}
