use crate::error::CompileError;
use crate::expression::{Node, Symbol};
use crate::FloatExt;

/// Deepest tree, and deepest parenthesis nesting, a formula may produce.
///
/// Every pass after building walks the tree recursively.
pub(crate) const MAX_DEPTH: usize = 256;

/// Node under construction; children are indices into the arena.
struct Slot<R> {
    symbol: Symbol<R>,
    left: Option<usize>,
    right: Option<usize>,
}

impl<R> Slot<R> {
    fn is_full(&self) -> bool {
        self.left.is_some() && self.right.is_some()
    }
}

/// Rebuilds the tree from a postfix symbol sequence, reading it back to front.
///
/// Each symbol fills the first free slot (left, then right) of the innermost
/// operator still waiting for operands. Unary nodes get an [`Symbol::Empty`]
/// right child straight away so that they count as full once their operand
/// arrives. As a consequence the right child of a binary node is the operand
/// that comes first in the source text.
pub(crate) fn build<R: FloatExt>(symbols: Vec<Symbol<R>>) -> Result<Node<R>, CompileError> {
    let len = symbols.len();
    let mut symbols = symbols.into_iter().rev();
    let Some(root) = symbols.next() else {
        return Ok(Node::constant(R::zero()));
    };
    match root {
        Symbol::Constant(_) | Symbol::Parameter(_) if len > 1 => {
            return Err(CompileError::Malformed)
        }
        Symbol::Unary(_) | Symbol::Binary(_) if len == 1 => {
            return Err(CompileError::MissingOperands)
        }
        _ => {}
    }

    let mut arena = Vec::with_capacity(2 * len);
    let mut open = Vec::new();
    push_slot(&mut arena, &mut open, root);

    for symbol in symbols {
        let parent = loop {
            // Every operator is saturated but symbols remain: juxtaposed operands.
            let &top = open.last().ok_or(CompileError::Malformed)?;
            if arena[top].is_full() {
                open.pop();
            } else {
                break top;
            }
        };
        // `open` holds the chain of ancestors, so its length is the new node's depth.
        if open.len() >= MAX_DEPTH {
            return Err(CompileError::TooDeep);
        }
        let index = push_slot(&mut arena, &mut open, symbol);
        let parent: &mut Slot<R> = &mut arena[parent];
        if parent.left.is_none() {
            parent.left = Some(index);
        } else {
            parent.right = Some(index);
        }
    }

    let mut arena: Vec<Option<Slot<R>>> = arena.into_iter().map(Some).collect();
    assemble(&mut arena, 0)
}

fn push_slot<R>(arena: &mut Vec<Slot<R>>, open: &mut Vec<usize>, symbol: Symbol<R>) -> usize {
    let index = arena.len();
    let is_unary = matches!(symbol, Symbol::Unary(_));
    let is_binary = matches!(symbol, Symbol::Binary(_));
    arena.push(Slot {
        symbol,
        left: None,
        right: None,
    });
    if is_unary {
        arena.push(Slot {
            symbol: Symbol::Empty,
            left: None,
            right: None,
        });
        arena[index].right = Some(index + 1);
    }
    if is_unary || is_binary {
        open.push(index);
    }
    index
}

/// Moves the arena into an owned tree, checking every operator got its operands.
fn assemble<R: FloatExt>(
    arena: &mut [Option<Slot<R>>],
    index: usize,
) -> Result<Node<R>, CompileError> {
    let Some(Slot {
        symbol,
        left,
        right,
    }) = arena[index].take()
    else {
        unreachable!("slot {index} attached twice");
    };
    let left = left
        .map(|child| assemble(arena, child))
        .transpose()?
        .map(Box::new);
    let right = right
        .map(|child| assemble(arena, child))
        .transpose()?
        .map(Box::new);

    let complete = match symbol {
        Symbol::Unary(_) => left.is_some(),
        Symbol::Binary(_) => left.is_some() && right.is_some(),
        _ => true,
    };
    if !complete {
        return Err(CompileError::MissingOperands);
    }
    Ok(Node {
        symbol,
        left,
        right,
    })
}
