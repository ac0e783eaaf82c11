use thiserror::Error;

/// Why a formula failed to compile. The `Display` text is meant for end users.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CompileError {
    #[error("Unterminated parenthesis")]
    UnterminatedParenthesis,
    #[error("Closing parenthesis without a matching opening one")]
    UnmatchedClosingParenthesis,
    #[error("Unexpected token in parsing: {0}")]
    UnexpectedToken(String),
    #[error("Bad parsing or semantics: operands without an operator joining them")]
    Malformed,
    #[error("Function or operator without arguments")]
    MissingOperands,
    #[error("Invalid parameter name `{0}`: parameters must be ASCII letters")]
    InvalidParameterName(char),
    #[error("Formula nests deeper than {} levels", crate::build::MAX_DEPTH)]
    TooDeep,
}

/// Why a compiled expression could not be evaluated.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum EvaluationError {
    #[error("Found parameter `{0}` in parameter-less evaluation")]
    Unbound(char),
    #[error("Wrong parameter name: expected `{expected}`, found `{found}`")]
    Mismatch { expected: char, found: char },
    #[error("Cannot evaluate a null expression")]
    Null,
}
