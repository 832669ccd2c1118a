//! Rotation primitives.
//!
//! All six rotations relink handles inside the arena and hand back the new
//! subtree root; the caller is responsible for pointing the old root's
//! parent (or the tree root) at the returned handle. The checked variants
//! encode the balance-factor preconditions of insertion rebalancing as
//! `debug_assert!`s; [`rebalance`] dispatches on the actual balance factors
//! and also accepts the removal-only case of a balanced heavy child.

use super::arena::Arena;
use super::handle::Handle;
use super::node::AvlNode;

type Nodes<T> = Arena<AvlNode<T>>;

/// Left rotation that only relinks child handles. Balance factors are left
/// untouched; `bottom` must be `top`'s right child.
pub(crate) fn rotate_left_raw<T>(nodes: &mut Nodes<T>, top: Handle, bottom: Handle) -> Handle {
    debug_assert_eq!(nodes.get(top).right, Some(bottom));

    let inner = nodes.get(bottom).left;
    nodes.get_mut(top).right = inner;
    nodes.get_mut(bottom).left = Some(top);

    bottom
}

/// Right rotation that only relinks child handles. Balance factors are left
/// untouched; `bottom` must be `top`'s left child.
pub(crate) fn rotate_right_raw<T>(nodes: &mut Nodes<T>, top: Handle, bottom: Handle) -> Handle {
    debug_assert_eq!(nodes.get(top).left, Some(bottom));

    let inner = nodes.get(bottom).right;
    nodes.get_mut(top).left = inner;
    nodes.get_mut(bottom).right = Some(top);

    bottom
}

/// Left rotation around a right-heavy pair: `top` must have balance factor
/// +2 and its right child `bottom` +1. Both end up balanced.
pub(crate) fn rotate_left<T>(nodes: &mut Nodes<T>, top: Handle, bottom: Handle) -> Handle {
    debug_assert_eq!(nodes.get(top).balance_factor, 2);
    debug_assert_eq!(nodes.get(bottom).balance_factor, 1);

    rotate_left_raw(nodes, top, bottom);
    nodes.get_mut(top).balance_factor = 0;
    nodes.get_mut(bottom).balance_factor = 0;

    bottom
}

/// Right rotation around a left-heavy pair: `top` must have balance factor
/// -2 and its left child `bottom` -1. Both end up balanced.
pub(crate) fn rotate_right<T>(nodes: &mut Nodes<T>, top: Handle, bottom: Handle) -> Handle {
    debug_assert_eq!(nodes.get(top).balance_factor, -2);
    debug_assert_eq!(nodes.get(bottom).balance_factor, -1);

    rotate_right_raw(nodes, top, bottom);
    nodes.get_mut(top).balance_factor = 0;
    nodes.get_mut(bottom).balance_factor = 0;

    bottom
}

/// Right rotation around `middle` followed by a left rotation around `top`,
/// for the right-left shape: `top` has balance factor +2, its right child
/// `middle` -1, and `bottom` is `middle`'s left child. `bottom` becomes the
/// subtree root; its pre-rotation balance factor determines which of the
/// other two inherits the slack.
pub(crate) fn rotate_right_left<T>(nodes: &mut Nodes<T>, top: Handle, middle: Handle, bottom: Handle) -> Handle {
    debug_assert_eq!(nodes.get(top).balance_factor, 2);
    debug_assert_eq!(nodes.get(top).right, Some(middle));
    debug_assert_eq!(nodes.get(middle).balance_factor, -1);
    debug_assert_eq!(nodes.get(middle).left, Some(bottom));

    let bottom_factor = nodes.get(bottom).balance_factor;

    let unrolled = rotate_right_raw(nodes, middle, bottom);
    nodes.get_mut(top).right = Some(unrolled);
    rotate_left_raw(nodes, top, bottom);

    let (top_factor, middle_factor) = match bottom_factor {
        1 => (-1, 0),
        0 => (0, 0),
        _ => {
            debug_assert_eq!(bottom_factor, -1);
            (0, 1)
        }
    };

    nodes.get_mut(top).balance_factor = top_factor;
    nodes.get_mut(middle).balance_factor = middle_factor;
    nodes.get_mut(bottom).balance_factor = 0;

    bottom
}

/// Left rotation around `middle` followed by a right rotation around `top`,
/// for the left-right shape: `top` has balance factor -2, its left child
/// `middle` +1, and `bottom` is `middle`'s right child. Mirror of
/// [`rotate_right_left`].
pub(crate) fn rotate_left_right<T>(nodes: &mut Nodes<T>, top: Handle, middle: Handle, bottom: Handle) -> Handle {
    debug_assert_eq!(nodes.get(top).balance_factor, -2);
    debug_assert_eq!(nodes.get(top).left, Some(middle));
    debug_assert_eq!(nodes.get(middle).balance_factor, 1);
    debug_assert_eq!(nodes.get(middle).right, Some(bottom));

    let bottom_factor = nodes.get(bottom).balance_factor;

    let unrolled = rotate_left_raw(nodes, middle, bottom);
    nodes.get_mut(top).left = Some(unrolled);
    rotate_right_raw(nodes, top, bottom);

    let (top_factor, middle_factor) = match bottom_factor {
        -1 => (1, 0),
        0 => (0, 0),
        _ => {
            debug_assert_eq!(bottom_factor, 1);
            (0, -1)
        }
    };

    nodes.get_mut(top).balance_factor = top_factor;
    nodes.get_mut(middle).balance_factor = middle_factor;
    nodes.get_mut(bottom).balance_factor = 0;

    bottom
}

/// Restores the AVL invariant below a node whose balance factor has reached
/// ±2, picking the rotation from the heavy child's balance factor.
///
/// Returns the new subtree root and whether the subtree is now one level
/// shorter than it was before the imbalance appeared. The shorter-subtree
/// answer is what the removal retrace keys on: `false` only in the
/// balanced-heavy-child case, which removal alone can produce.
pub(crate) fn rebalance<T>(nodes: &mut Nodes<T>, top: Handle) -> (Handle, bool) {
    let top_factor = nodes.get(top).balance_factor;

    if top_factor == 2 {
        let child = nodes.get(top).right.expect("right-heavy node has a right child");

        match nodes.get(child).balance_factor {
            1 => (rotate_left(nodes, top, child), true),
            0 => {
                let new_root = rotate_left_raw(nodes, top, child);
                nodes.get_mut(top).balance_factor = 1;
                nodes.get_mut(child).balance_factor = -1;
                (new_root, false)
            }
            _ => {
                let grandchild = nodes.get(child).left.expect("left-heavy node has a left child");
                (rotate_right_left(nodes, top, child, grandchild), true)
            }
        }
    } else {
        debug_assert_eq!(top_factor, -2);
        let child = nodes.get(top).left.expect("left-heavy node has a left child");

        match nodes.get(child).balance_factor {
            -1 => (rotate_right(nodes, top, child), true),
            0 => {
                let new_root = rotate_right_raw(nodes, top, child);
                nodes.get_mut(top).balance_factor = -1;
                nodes.get_mut(child).balance_factor = 1;
                (new_root, false)
            }
            _ => {
                let grandchild = nodes.get(child).right.expect("right-heavy node has a right child");
                (rotate_left_right(nodes, top, child, grandchild), true)
            }
        }
    }
}
