use std::collections::HashSet;
use std::fmt;

use crate::FloatExt;

/// A compiled formula of a single free variable.
///
/// Produced by [`compile`](crate::compile) or [`Compiler::compile`](crate::Compiler::compile)
/// and never mutated afterwards. The default value is the null expression,
/// which owns no tree.
pub struct Expression<R = f64> {
    root: Option<Node<R>>,
}

/// Value given to the free variable called `name` during evaluation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Binding<R = f64> {
    pub name: char,
    pub value: R,
}

impl<R> Binding<R> {
    pub fn new(name: char, value: R) -> Self {
        Self { name, value }
    }
}

impl<R> Default for Expression<R> {
    fn default() -> Self {
        Self { root: None }
    }
}

impl<R: FloatExt> Expression<R> {
    pub(crate) fn new(root: Node<R>) -> Self {
        Self { root: Some(root) }
    }

    pub(crate) fn root(&self) -> Option<&Node<R>> {
        self.root.as_ref()
    }

    /// `true` iff the expression owns a tree.
    pub fn is_valid(&self) -> bool {
        self.root.is_some()
    }

    /// Names of the free variables the compiled tree still refers to.
    ///
    /// Empty when the whole formula folded to a constant.
    pub fn parameters(&self) -> HashSet<char> {
        let mut names = HashSet::new();
        if let Some(root) = &self.root {
            root.collect_parameters(&mut names);
        }
        names
    }
}

impl<R: FloatExt> fmt::Display for Expression<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.root {
            Some(root) => write!(f, "{root}"),
            None => f.write_str("null"),
        }
    }
}

impl<R: FloatExt> fmt::Debug for Expression<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Expression")
            .field("root", &self.root)
            .finish()
    }
}

/// One tree node. Leaves hold a constant or a parameter, unary functions own
/// their operand in `left`, binary functions own both slots.
#[derive(Debug)]
pub(crate) struct Node<R> {
    pub(crate) symbol: Symbol<R>,
    pub(crate) left: Option<Box<Node<R>>>,
    pub(crate) right: Option<Box<Node<R>>>,
}

#[derive(Debug)]
pub(crate) enum Symbol<R> {
    // Pending right slot of a unary node while the tree is being built.
    Empty,

    Constant(R),
    Parameter(char),

    Unary(UnaryFunction<R>),
    Binary(BinaryFunction<R>),
}

pub(crate) struct UnaryFunction<R> {
    name: String,
    apply: Box<dyn Fn(R) -> R + Send + Sync>,
}

pub(crate) struct BinaryFunction<R> {
    name: String,
    apply: Box<dyn Fn(R, R) -> R + Send + Sync>,
}

impl<R: FloatExt> UnaryFunction<R> {
    pub(crate) fn new(name: impl Into<String>, apply: impl Fn(R) -> R + Send + Sync + 'static) -> Self {
        Self {
            name: name.into(),
            apply: Box::new(apply),
        }
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn call(&self, only: R) -> R {
        (self.apply)(only)
    }
}

impl<R: FloatExt> BinaryFunction<R> {
    pub(crate) fn new(
        name: impl Into<String>,
        apply: impl Fn(R, R) -> R + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            apply: Box::new(apply),
        }
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    /// `first` is the operand that comes first in the source text.
    pub(crate) fn call(&self, first: R, second: R) -> R {
        (self.apply)(first, second)
    }
}

impl<R> fmt::Debug for UnaryFunction<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<unary-fn {}>", self.name)
    }
}

impl<R> fmt::Debug for BinaryFunction<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<binary-fn {}>", self.name)
    }
}

impl<R: FloatExt> Node<R> {
    pub(crate) fn leaf(symbol: Symbol<R>) -> Self {
        Self {
            symbol,
            left: None,
            right: None,
        }
    }

    pub(crate) fn constant(value: R) -> Self {
        Self::leaf(Symbol::Constant(value))
    }

    pub(crate) fn unary(function: UnaryFunction<R>, only: Node<R>) -> Self {
        Self {
            symbol: Symbol::Unary(function),
            left: Some(Box::new(only)),
            right: None,
        }
    }

    pub(crate) fn binary(function: BinaryFunction<R>, left: Node<R>, right: Node<R>) -> Self {
        Self {
            symbol: Symbol::Binary(function),
            left: Some(Box::new(left)),
            right: Some(Box::new(right)),
        }
    }

    pub(crate) fn as_constant(&self) -> Option<R> {
        match self.symbol {
            Symbol::Constant(value) => Some(value),
            _ => None,
        }
    }

    /// Whether the subtree can be evaluated without any parameter binding.
    pub(crate) fn is_foldable(&self) -> bool {
        match &self.symbol {
            Symbol::Constant(_) => true,
            Symbol::Parameter(_) | Symbol::Empty => false,
            Symbol::Unary(_) | Symbol::Binary(_) => [&self.left, &self.right]
                .into_iter()
                .flatten()
                .filter(|child| !matches!(child.symbol, Symbol::Empty))
                .all(|child| child.is_foldable()),
        }
    }

    /// Number of nodes reachable from this one, placeholders included.
    pub(crate) fn size(&self) -> usize {
        1 + [&self.left, &self.right]
            .into_iter()
            .flatten()
            .map(|child| child.size())
            .sum::<usize>()
    }

    pub(crate) fn contains_empty(&self) -> bool {
        matches!(self.symbol, Symbol::Empty)
            || [&self.left, &self.right]
                .into_iter()
                .flatten()
                .any(|child| child.contains_empty())
    }

    fn collect_parameters(&self, names: &mut HashSet<char>) {
        if let Symbol::Parameter(name) = self.symbol {
            names.insert(name);
        }
        for child in [&self.left, &self.right].into_iter().flatten() {
            child.collect_parameters(names);
        }
    }
}

/// Prefix notation, binary operands listed in source order.
impl<R: FloatExt> fmt::Display for Node<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.symbol {
            Symbol::Empty => f.write_str("_"),
            Symbol::Constant(value) => write!(f, "{value}"),
            Symbol::Parameter(name) => write!(f, "{name}"),
            Symbol::Unary(function) => {
                write!(f, "({}", function.name())?;
                if let Some(only) = &self.left {
                    write!(f, " {only}")?;
                }
                f.write_str(")")
            }
            Symbol::Binary(function) => {
                write!(f, "({}", function.name())?;
                for operand in [&self.right, &self.left].into_iter().flatten() {
                    write!(f, " {operand}")?;
                }
                f.write_str(")")
            }
        }
    }
}
