//! Built-in operators and named functions.

use num_traits::Float;

use crate::expression::{BinaryFunction, UnaryFunction};
use crate::FloatExt;

/// Named unary functions, plus unary negation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Function {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Ln,
    Exp,
    Abs,
    Sqrt,
    Cbrt,
    Negate,
}

/// Binary infix operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Operator {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    Rem,
}

impl Function {
    pub(crate) fn name(self) -> &'static str {
        match self {
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::Tan => "tan",
            Self::Asin => "asin",
            Self::Acos => "acos",
            Self::Atan => "atan",
            Self::Ln => "ln",
            Self::Exp => "exp",
            Self::Abs => "abs",
            Self::Sqrt => "sqrt",
            Self::Cbrt => "cbrt",
            Self::Negate => "neg",
        }
    }

    /// Negation binds tighter than `*` and looser than `^`, so `-t^2` is
    /// `-(t^2)`. Named functions bind tightest.
    pub(crate) fn priority(self) -> u8 {
        match self {
            Self::Negate => 2,
            _ => 4,
        }
    }

    pub(crate) fn apply<R: Float>(self, only: R) -> R {
        match self {
            Self::Sin => only.sin(),
            Self::Cos => only.cos(),
            Self::Tan => only.tan(),
            Self::Asin => only.asin(),
            Self::Acos => only.acos(),
            Self::Atan => only.atan(),
            Self::Ln => only.ln(),
            Self::Exp => only.exp(),
            Self::Abs => only.abs(),
            Self::Sqrt => only.sqrt(),
            Self::Cbrt => only.cbrt(),
            Self::Negate => -only,
        }
    }
}

impl Operator {
    pub(crate) fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Self::Add),
            '-' => Some(Self::Sub),
            '*' => Some(Self::Mul),
            '/' => Some(Self::Div),
            '^' => Some(Self::Pow),
            '%' => Some(Self::Rem),
            _ => None,
        }
    }

    pub(crate) fn symbol(self) -> char {
        match self {
            Self::Add => '+',
            Self::Sub => '-',
            Self::Mul => '*',
            Self::Div => '/',
            Self::Pow => '^',
            Self::Rem => '%',
        }
    }

    pub(crate) fn priority(self) -> u8 {
        match self {
            Self::Add | Self::Sub => 0,
            Self::Mul | Self::Div | Self::Rem => 1,
            Self::Pow => 3,
        }
    }

    pub(crate) fn apply<R: Float>(self, lhs: R, rhs: R) -> R {
        match self {
            Self::Add => lhs + rhs,
            Self::Sub => lhs - rhs,
            Self::Mul => lhs * rhs,
            Self::Div => lhs / rhs,
            Self::Pow => lhs.powf(rhs),
            // Remainder of the truncated operands; a zero divisor gives NaN.
            Self::Rem => lhs.trunc() % rhs.trunc(),
        }
    }
}

impl<R: FloatExt> From<Function> for UnaryFunction<R> {
    fn from(function: Function) -> Self {
        UnaryFunction::new(function.name(), move |only| function.apply(only))
    }
}

impl<R: FloatExt> From<Operator> for BinaryFunction<R> {
    fn from(operator: Operator) -> Self {
        BinaryFunction::new(operator.symbol(), move |lhs, rhs| operator.apply(lhs, rhs))
    }
}
