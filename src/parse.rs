use crate::alphabet::Alphabet;
use crate::build::MAX_DEPTH;
use crate::classify::{match_euler, match_function, match_number, match_parameter, match_pi};
use crate::error::CompileError;
use crate::expression::Symbol;
use crate::function::{Function, Operator};
use crate::FloatExt;

/// Normalizes raw user text before flattening.
///
/// Drops whitespace, folds runs of `+`/`-` into one sign (`--` is `+`, `+-`
/// is `-`) and turns `2(` and `)(` into `2*(` and `)*(`.
pub(crate) fn preprocess(raw: &str) -> String {
    let chars: Vec<char> = raw.chars().filter(|c| !c.is_whitespace()).collect();
    let mut output = String::with_capacity(chars.len() + 8);

    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        match c {
            '+' | '-' => {
                let mut sign = c;
                while let Some(&(next @ ('+' | '-'))) = chars.get(i + 1) {
                    sign = if sign == next { '+' } else { '-' };
                    i += 1;
                }
                output.push(sign);
            }
            '(' if i > 0 && (chars[i - 1] == ')' || chars[i - 1].is_ascii_digit()) => {
                output.push_str("*(");
            }
            _ => output.push(c),
        }
        i += 1;
    }
    output
}

/// Entry of the operator stack used while flattening.
#[derive(Clone, Copy, Debug)]
enum Pending {
    Function(Function),
    Operator(Operator),
}

impl Pending {
    fn priority(self) -> u8 {
        match self {
            Self::Function(function) => function.priority(),
            Self::Operator(operator) => operator.priority(),
        }
    }

    fn into_symbol<R: FloatExt>(self) -> Symbol<R> {
        match self {
            Self::Function(function) => Symbol::Unary(function.into()),
            Self::Operator(operator) => Symbol::Binary(operator.into()),
        }
    }
}

/// Flattens preprocessed text into postfix order.
///
/// An empty formula, or one whose output stays empty such as `()`, becomes
/// the single constant `0`.
pub(crate) fn linearize<R: FloatExt>(
    text: &str,
    alphabet: &Alphabet,
) -> Result<Vec<Symbol<R>>, CompileError> {
    let mut output = Vec::new();
    flatten(text, alphabet, &mut output, 0)?;
    if output.is_empty() {
        output.push(Symbol::Constant(R::zero()));
    }
    Ok(output)
}

fn flatten<R: FloatExt>(
    mut line: &str,
    alphabet: &Alphabet,
    output: &mut Vec<Symbol<R>>,
    depth: usize,
) -> Result<(), CompileError> {
    let mut pending: Vec<Pending> = Vec::new();
    let mut expect_operand = true;

    // A leading sign reads as `0 + ...` or `0 - ...`, unless it is a negation.
    let leading_operator = line.chars().next().and_then(Operator::from_char);
    if leading_operator.is_some() && match_function(line, true).is_none() {
        output.push(Symbol::Constant(R::zero()));
        expect_operand = false;
    }

    while let Some(c) = line.chars().next() {
        if let Some((function, len)) = match_function(line, expect_operand) {
            pending.push(Pending::Function(function));
            line = &line[len..];
            expect_operand = true;
        } else if let Some((value, len)) = expect_operand
            .then(|| match_number::<R>(line, true))
            .flatten()
        {
            output.push(Symbol::Constant(value));
            line = &line[len..];
            expect_operand = false;
        } else if expect_operand && c == '+' {
            // Unary plus.
            line = &line[1..];
        } else if let Some(operator) = Operator::from_char(c) {
            while let Some(&top) = pending.last() {
                if top.priority() < operator.priority() {
                    break;
                }
                pending.pop();
                output.push(top.into_symbol());
            }
            pending.push(Pending::Operator(operator));
            line = &line[c.len_utf8()..];
            expect_operand = true;
        } else if let Some((value, len)) = match_number::<R>(line, false) {
            output.push(Symbol::Constant(value));
            line = &line[len..];
            expect_operand = false;
        } else if c == '(' {
            if depth == MAX_DEPTH {
                return Err(CompileError::TooDeep);
            }
            let close = matching_parenthesis(line).ok_or(CompileError::UnterminatedParenthesis)?;
            flatten(&line[1..close], alphabet, output, depth + 1)?;
            line = &line[close + 1..];
            expect_operand = false;
        } else if c == ')' {
            return Err(CompileError::UnmatchedClosingParenthesis);
        } else if let Some(len) = match_pi(line) {
            output.push(Symbol::Constant(R::PI()));
            line = &line[len..];
            expect_operand = false;
        } else if let Some(len) = match_euler(line) {
            output.push(Symbol::Constant(R::E()));
            line = &line[len..];
            expect_operand = false;
        } else if let Some(name) = match_parameter(line, alphabet) {
            output.push(Symbol::Parameter(name));
            line = &line[name.len_utf8()..];
            expect_operand = false;
        } else {
            return Err(CompileError::UnexpectedToken(line.to_string()));
        }
    }

    while let Some(top) = pending.pop() {
        output.push(top.into_symbol());
    }
    Ok(())
}

/// Byte index of the `)` closing the `(` that starts `line`.
fn matching_parenthesis(line: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (index, c) in line.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(index);
                }
            }
            _ => {}
        }
    }
    None
}
