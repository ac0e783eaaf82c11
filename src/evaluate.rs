use crate::error::EvaluationError;
use crate::expression::{Binding, Expression, Node, Symbol};
use crate::FloatExt;

#[cfg(feature = "rayon")]
use rayon::prelude::{IntoParallelRefIterator, ParallelIterator};

impl<R: FloatExt> Expression<R> {
    /// Evaluates the expression, giving `binding` to its free variable.
    pub fn evaluate(&self, binding: Option<Binding<R>>) -> Result<R, EvaluationError> {
        self.root()
            .ok_or(EvaluationError::Null)?
            .evaluate(binding)
    }

    pub fn evaluate_without_parameter(&self) -> Result<R, EvaluationError> {
        self.evaluate(None)
    }

    /// Fixes the name of the free variable, returning a plain numeric
    /// function of its value that borrows the expression.
    ///
    /// Fails if the tree refers to any other parameter name, so the returned
    /// function itself cannot fail.
    pub fn bind(&self, name: char) -> Result<impl Fn(R) -> R + Send + Sync + '_, EvaluationError> {
        self.check_binding(name)?;
        Ok(move |value| self.evaluate_bound(name, value))
    }

    /// Like [`Expression::bind`], but the returned function owns the expression.
    pub fn into_fn(self, name: char) -> Result<impl Fn(R) -> R + Send + Sync + 'static, EvaluationError> {
        self.check_binding(name)?;
        Ok(move |value| self.evaluate_bound(name, value))
    }

    /// Evaluates the expression at every value of its free variable `name`.
    pub fn sample(&self, name: char, values: &[R]) -> Result<Vec<R>, EvaluationError> {
        let function = self.bind(name)?;

        #[cfg(feature = "rayon")]
        {
            Ok(values.par_iter().map(|value| function(*value)).collect())
        }
        #[cfg(not(feature = "rayon"))]
        {
            Ok(values.iter().map(|value| function(*value)).collect())
        }
    }

    fn check_binding(&self, name: char) -> Result<(), EvaluationError> {
        if !self.is_valid() {
            return Err(EvaluationError::Null);
        }
        match self.parameters().into_iter().find(|expected| *expected != name) {
            Some(expected) => Err(EvaluationError::Mismatch {
                expected,
                found: name,
            }),
            None => Ok(()),
        }
    }

    fn evaluate_bound(&self, name: char, value: R) -> R {
        match self.evaluate(Some(Binding::new(name, value))) {
            Ok(result) => result,
            Err(error) => unreachable!("binding of `{name}` was checked: {error}"),
        }
    }
}

impl<R: FloatExt> Node<R> {
    pub(crate) fn evaluate(&self, binding: Option<Binding<R>>) -> Result<R, EvaluationError> {
        match &self.symbol {
            Symbol::Constant(value) => Ok(*value),
            Symbol::Parameter(name) => match binding {
                Some(binding) if binding.name == *name => Ok(binding.value),
                Some(binding) => Err(EvaluationError::Mismatch {
                    expected: *name,
                    found: binding.name,
                }),
                None => Err(EvaluationError::Unbound(*name)),
            },
            Symbol::Unary(function) => Ok(function.call(self.operand(&self.left).evaluate(binding)?)),
            // The right child holds the operand written first.
            Symbol::Binary(function) => {
                let first = self.operand(&self.right).evaluate(binding)?;
                let second = self.operand(&self.left).evaluate(binding)?;
                Ok(function.call(first, second))
            }
            Symbol::Empty => panic!("Found (literally) nothing: placeholder reached during evaluation"),
        }
    }

    fn operand<'a>(&self, slot: &'a Option<Box<Node<R>>>) -> &'a Node<R> {
        match slot {
            Some(child) => child,
            None => panic!("Malformed tree: operator without operand in {self:?}"),
        }
    }
}
