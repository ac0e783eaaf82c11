use log::{debug, trace};

use crate::alphabet::Alphabet;
use crate::build::build;
use crate::error::CompileError;
use crate::expression::Expression;
use crate::optimize::optimize;
use crate::parse::{linearize, preprocess};
use crate::FloatExt;

/// Compiles `formula`, allowing every character of `parameter_names` as the
/// free variable.
///
/// Malformed user input is always reported as a [`CompileError`], never as a
/// panic.
pub fn compile<R: FloatExt>(formula: &str, parameter_names: &str) -> Result<Expression<R>, CompileError> {
    Compiler::new(parameter_names)?.compile(formula)
}

/// Reusable compilation settings.
#[derive(Clone, Debug)]
pub struct Compiler {
    alphabet: Alphabet,
    optimize: bool,
}

impl Compiler {
    pub fn new(parameter_names: &str) -> Result<Self, CompileError> {
        Ok(Self::with_alphabet(Alphabet::new(parameter_names)?))
    }

    pub fn with_alphabet(alphabet: Alphabet) -> Self {
        Self {
            alphabet,
            optimize: true,
        }
    }

    /// Whether to run constant folding and function fusion. Enabled by default.
    pub fn optimize(mut self, enabled: bool) -> Self {
        self.optimize = enabled;
        self
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    pub fn compile<R: FloatExt>(&self, formula: &str) -> Result<Expression<R>, CompileError> {
        let text = preprocess(formula);
        trace!("preprocessed `{formula}` into `{text}`");

        let symbols = linearize::<R>(&text, &self.alphabet)?;
        trace!("flattened `{text}` into {} symbols", symbols.len());

        let mut tree = build(symbols)?;
        if self.optimize {
            let size = tree.size();
            tree = optimize(tree);
            debug_assert!(!tree.contains_empty());
            debug_assert_eq!(tree.is_foldable(), tree.as_constant().is_some());
            trace!("optimized {size} nodes down to {}", tree.size());
        }
        debug!("compiled `{formula}` into {tree}");

        Ok(Expression::new(tree))
    }
}
