use crate::expression::{BinaryFunction, Node, Symbol, UnaryFunction};
use crate::FloatExt;

/// One bottom-up rewriting pass: folds parameter-free subtrees into constants
/// and fuses chains of functions into single composed callables.
///
/// After a node is optimized, it is a constant exactly when it was foldable,
/// and it never has a unary child. A second pass is therefore a no-op.
pub(crate) fn optimize<R: FloatExt>(node: Node<R>) -> Node<R> {
    match (node.symbol, node.left, node.right) {
        (Symbol::Binary(function), Some(left), Some(right)) => {
            optimize_binary(function, optimize(*left), optimize(*right))
        }
        // Drops the placeholder in the right slot.
        (Symbol::Unary(function), Some(only), _) => optimize_unary(function, optimize(*only)),
        (symbol, left, right) => Node {
            symbol,
            left,
            right,
        },
    }
}

fn optimize_binary<R: FloatExt>(function: BinaryFunction<R>, left: Node<R>, right: Node<R>) -> Node<R> {
    if let (Some(first), Some(second)) = (right.as_constant(), left.as_constant()) {
        return Node::constant(function.call(first, second));
    }

    // The right child is the first operand, the left child the second one.
    match (split_unary(right), split_unary(left)) {
        (Ok((g, first)), Ok((h, second))) => {
            let name = format!("{}∘({}, {})", function.name(), g.name(), h.name());
            let fused = BinaryFunction::new(name, move |a, b| function.call(g.call(a), h.call(b)));
            Node::binary(fused, second, first)
        }
        (Ok((g, first)), Err(second)) => {
            let name = format!("{}∘({}, id)", function.name(), g.name());
            let fused = BinaryFunction::new(name, move |a, b| function.call(g.call(a), b));
            Node::binary(fused, second, first)
        }
        (Err(first), Ok((h, second))) => {
            let name = format!("{}∘(id, {})", function.name(), h.name());
            let fused = BinaryFunction::new(name, move |a, b| function.call(a, h.call(b)));
            Node::binary(fused, second, first)
        }
        (Err(first), Err(second)) => Node::binary(function, second, first),
    }
}

fn optimize_unary<R: FloatExt>(function: UnaryFunction<R>, only: Node<R>) -> Node<R> {
    if let Some(value) = only.as_constant() {
        return Node::constant(function.call(value));
    }

    match (only.symbol, only.left, only.right) {
        (Symbol::Unary(inner), Some(grandchild), _) => {
            let name = format!("{}∘{}", function.name(), inner.name());
            let fused = UnaryFunction::new(name, move |a| function.call(inner.call(a)));
            Node::unary(fused, *grandchild)
        }
        (Symbol::Binary(inner), Some(left), Some(right)) => {
            let name = format!("{}∘{}", function.name(), inner.name());
            let fused = BinaryFunction::new(name, move |a, b| function.call(inner.call(a, b)));
            Node::binary(fused, *left, *right)
        }
        (symbol, left, right) => Node::unary(
            function,
            Node {
                symbol,
                left,
                right,
            },
        ),
    }
}

/// Separates a unary node from its operand, or hands the node back untouched.
fn split_unary<R: FloatExt>(node: Node<R>) -> Result<(UnaryFunction<R>, Node<R>), Node<R>> {
    match (node.symbol, node.left, node.right) {
        (Symbol::Unary(function), Some(only), _) => Ok((function, *only)),
        (symbol, left, right) => Err(Node {
            symbol,
            left,
            right,
        }),
    }
}
