use core::cmp::Ordering;

use smallvec::SmallVec;

use super::arena::Arena;
use super::bit_stack::BitStack;
use super::handle::Handle;
use super::node::AvlNode;
use super::rotate;

// 32-bit handles cap the node count below 2^32, and the AVL height bound
// ceil(1.44 * log2(2^32)) = 47 then caps every root-to-leaf path; 64 inline
// slots keep mutation scratch space off the heap for every reachable shape.
const PATH_INLINE: usize = 64;

type NodePath = SmallVec<[Handle; PATH_INLINE]>;

/// The AVL tree interior backing [`AvlMap`](crate::AvlMap) and
/// [`AvlSet`](crate::AvlSet).
///
/// The interior is element-agnostic: every operation takes the ordering it
/// needs as a closure, either homogeneous (`FnMut(&T, &T)`) when an element
/// is being placed or heterogeneous (`FnMut(&T)`) when a probe key is
/// compared against resident elements. All closures passed to one tree must
/// induce the same strict total order over its elements; the facades
/// guarantee this by deriving every comparison from `Ord`.
#[derive(Clone)]
pub(crate) struct RawAvlTree<T> {
    nodes: Arena<AvlNode<T>>,
    root: Option<Handle>,
    len: usize,
}

/// Outcome of the shared insertion descent.
enum Probe<P> {
    /// An equal element is already resident; the probe is handed back.
    Existing(Handle, P),
    /// The probe was materialized and attached as a new leaf.
    Inserted(Handle),
}

impl<T> RawAvlTree<T> {
    pub(crate) const fn new() -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
            len: 0,
        }
    }

    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub(crate) fn element(&self, handle: Handle) -> &T {
        &self.nodes.get(handle).element
    }

    #[inline]
    pub(crate) fn element_mut(&mut self, handle: Handle) -> &mut T {
        &mut self.nodes.get_mut(handle).element
    }

    /// Descends from the root comparing the probe against each element:
    /// left when `cmp` says the probe is less, right when greater, done on
    /// equal. No mutation.
    pub(crate) fn find_with<C>(&self, mut cmp: C) -> Option<Handle>
    where
        C: FnMut(&T) -> Ordering,
    {
        let mut current = self.root;

        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            current = match cmp(&node.element) {
                Ordering::Equal => return Some(handle),
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
            };
        }

        None
    }

    /// The least element's node, if any.
    pub(crate) fn first(&self) -> Option<Handle> {
        let mut current = self.root?;
        while let Some(left) = self.nodes.get(current).left {
            current = left;
        }
        Some(current)
    }

    /// The greatest element's node, if any.
    pub(crate) fn last(&self) -> Option<Handle> {
        let mut current = self.root?;
        while let Some(right) = self.nodes.get(current).right {
            current = right;
        }
        Some(current)
    }

    /// Inserts an element, or swaps it into the resident node that compares
    /// equal and returns the displaced element. `cmp` receives the incoming
    /// element first.
    pub(crate) fn insert_with<C>(&mut self, element: T, mut cmp: C) -> Option<T>
    where
        C: FnMut(&T, &T) -> Ordering,
    {
        match self.probe_or_insert(element, |incoming, resident| cmp(incoming, resident), |incoming| incoming) {
            Probe::Existing(handle, incoming) => Some(core::mem::replace(self.element_mut(handle), incoming)),
            Probe::Inserted(_) => None,
        }
    }

    /// Single-pass lookup-or-insert: returns the node holding an element
    /// equal to the probe, materializing one with `make` only on a miss.
    /// The element `make` builds must compare equal to the probe.
    pub(crate) fn get_or_insert_with<P, C, F>(&mut self, probe: P, cmp: C, make: F) -> (Handle, bool)
    where
        C: FnMut(&P, &T) -> Ordering,
        F: FnOnce(P) -> T,
    {
        match self.probe_or_insert(probe, cmp, make) {
            Probe::Existing(handle, _) => (handle, false),
            Probe::Inserted(handle) => (handle, true),
        }
    }

    /// The insertion descent shared by [`insert_with`](Self::insert_with)
    /// and [`get_or_insert_with`](Self::get_or_insert_with).
    ///
    /// The descent tracks the pivot: the deepest ancestor of the insertion
    /// point whose balance factor is non-zero, the only node at which the
    /// tree can tip out of balance. Nodes below it are all perfectly
    /// balanced, so attaching the leaf tilts each of them by one and the
    /// pivot by one; a single rotation at the pivot then restores the
    /// subtree to its pre-insertion height, which is why no ancestor above
    /// the pivot ever needs adjusting.
    fn probe_or_insert<P, C, F>(&mut self, probe: P, mut cmp: C, make: F) -> Probe<P>
    where
        C: FnMut(&P, &T) -> Ordering,
        F: FnOnce(P) -> T,
    {
        let Some(root) = self.root else {
            let handle = self.nodes.alloc(AvlNode::new(make(probe)));
            self.root = Some(handle);
            self.len = 1;
            return Probe::Inserted(handle);
        };

        let mut pivot = root;
        let mut pivot_parent: Option<Handle> = None;
        let mut pivot_path = BitStack::new();
        let mut parent: Option<Handle> = None;
        let mut current = root;

        loop {
            let node = self.nodes.get(current);
            let went_left = match cmp(&probe, &node.element) {
                Ordering::Equal => return Probe::Existing(current, probe),
                Ordering::Less => true,
                Ordering::Greater => false,
            };

            if node.balance_factor != 0 {
                pivot = current;
                pivot_parent = parent;
                pivot_path.clear();
            }
            pivot_path.push(went_left);

            match node.child(went_left) {
                Some(child) => {
                    parent = Some(current);
                    current = child;
                }
                None => {
                    let handle = self.nodes.alloc(AvlNode::new(make(probe)));
                    *self.nodes.get_mut(current).child_mut(went_left) = Some(handle);
                    self.len += 1;

                    self.rebalance_after_insert(pivot, pivot_parent, &pivot_path);

                    return Probe::Inserted(handle);
                }
            }
        }
    }

    /// Replays the recorded pivot-to-leaf path, tilting each visited
    /// balance factor one step toward the insertion, then applies at most
    /// one rotation at the pivot.
    fn rebalance_after_insert(&mut self, pivot: Handle, pivot_parent: Option<Handle>, pivot_path: &BitStack) {
        let mut walk = pivot;

        for step in 0..pivot_path.len() {
            let went_left = pivot_path.get(step);
            let node = self.nodes.get_mut(walk);
            node.balance_factor += if went_left { -1 } else { 1 };

            if step + 1 < pivot_path.len() {
                walk = node.child(went_left).expect("recorded path descends along existing nodes");
            }
        }

        let pivot_factor = self.nodes.get(pivot).balance_factor;
        if pivot_factor == 2 || pivot_factor == -2 {
            let (subtree, _) = rotate::rebalance(&mut self.nodes, pivot);
            self.relink(pivot_parent, pivot, Some(subtree));
        }
    }

    /// Removes the element the probe compares equal to, handing its
    /// ownership back to the caller. Absent keys leave the tree untouched.
    pub(crate) fn remove_with<C>(&mut self, mut cmp: C) -> Option<T>
    where
        C: FnMut(&T) -> Ordering,
    {
        // Locate, recording the descent on the scratch stacks: every
        // visited node on one, the direction of every edge taken on the
        // other.
        let mut path: NodePath = SmallVec::new();
        let mut dirs = BitStack::new();
        let mut current = self.root?;

        let target = loop {
            path.push(current);
            let node = self.nodes.get(current);
            let went_left = match cmp(&node.element) {
                Ordering::Equal => break current,
                Ordering::Less => true,
                Ordering::Greater => false,
            };
            current = node.child(went_left)?;
            dirs.push(went_left);
        };

        let target_index = path.len() - 1;
        let target_node = self.nodes.get(target);
        let (target_left, target_right) = (target_node.left, target_node.right);

        if let (Some(_), Some(right)) = (target_left, target_right) {
            // Two children: extend the recorded path down to the inorder
            // successor, the left-chain end of the right subtree.
            dirs.push(false);
            let mut successor = right;
            path.push(successor);
            while let Some(next) = self.nodes.get(successor).left {
                dirs.push(true);
                successor = next;
                path.push(successor);
            }

            // Splice the successor out of its slot; any child it has is on
            // its right.
            let successor_right = self.nodes.get(successor).right;
            let successor_parent = path[path.len() - 2];
            *self
                .nodes
                .get_mut(successor_parent)
                .child_mut(successor_parent != target) = successor_right;

            // Move it into the target's slot, inheriting the target's
            // children, balance factor, and position on the recorded path
            // so the retrace adjusts the survivor, not the leaver.
            let target_node = self.nodes.get(target);
            let (inherited_left, inherited_right, inherited_factor) =
                (target_node.left, target_node.right, target_node.balance_factor);
            let successor_node = self.nodes.get_mut(successor);
            successor_node.left = inherited_left;
            successor_node.right = inherited_right;
            successor_node.balance_factor = inherited_factor;

            path[target_index] = successor;
            let parent = target_index.checked_sub(1).map(|index| path[index]);
            self.relink(parent, target, Some(successor));
        } else {
            // Zero or one child: the child (if any) takes the target's slot.
            let parent = target_index.checked_sub(1).map(|index| path[index]);
            self.relink(parent, target, target_left.or(target_right));
        }

        // The top of the path is now the detached position; below it the
        // stacks hold (ancestor, direction-of-removal) pairs.
        path.pop();
        debug_assert_eq!(path.len(), dirs.len());

        self.retrace_after_remove(&mut path, &mut dirs);

        self.len -= 1;
        Some(self.nodes.take(target).element)
    }

    /// Walks the ancestor chain of a detached node bottom-up, tilting each
    /// balance factor away from the removal and rotating where the tilt
    /// reaches two. The walk stops at the first ancestor whose subtree kept
    /// its height: above that point nothing changed.
    fn retrace_after_remove(&mut self, path: &mut NodePath, dirs: &mut BitStack) {
        loop {
            let Some(ancestor) = path.pop() else {
                return;
            };
            let removed_on_left = dirs.pop().expect("one direction bit per path edge");

            let factor = {
                let node = self.nodes.get_mut(ancestor);
                node.balance_factor += if removed_on_left { 1 } else { -1 };
                node.balance_factor
            };

            if factor == 1 || factor == -1 {
                // The shorter side was the lighter one: subtree height is
                // unchanged and every ancestor's balance still holds.
                return;
            }
            if factor == 0 {
                // This subtree shrank by one; its parent tilts next.
                continue;
            }

            debug_assert!(factor == 2 || factor == -2);
            let parent = path.last().copied();
            let (subtree, shorter) = rotate::rebalance(&mut self.nodes, ancestor);
            self.relink(parent, ancestor, Some(subtree));

            if !shorter {
                return;
            }
        }
    }

    /// Points the tree (or `parent`'s matching child link) away from
    /// `old_child` to `new_child`. Parents are identified by comparison,
    /// which is what lets nodes go without parent handles.
    fn relink(&mut self, parent: Option<Handle>, old_child: Handle, new_child: Option<Handle>) {
        match parent {
            None => self.root = new_child,
            Some(parent) => {
                let node = self.nodes.get_mut(parent);
                if node.left == Some(old_child) {
                    node.left = new_child;
                } else {
                    debug_assert_eq!(node.right, Some(old_child));
                    node.right = new_child;
                }
            }
        }
    }

    /// Drops every element and resets the tree to empty.
    ///
    /// Teardown rotates the current node's left child up until none
    /// remains, drops the node, and continues into its right child: one
    /// pass, constant auxiliary space, no recursion. Elements drop in
    /// ascending order. The rotation walk stays safe even on shapes whose
    /// balance bookkeeping has been abandoned mid-teardown, which is why
    /// `Drop` can reuse it unconditionally.
    pub(crate) fn clear(&mut self) {
        let mut current = self.root.take();

        while let Some(mut handle) = current {
            while let Some(left) = self.nodes.get(handle).left {
                handle = rotate::rotate_right_raw(&mut self.nodes, handle, left);
            }
            current = self.nodes.take(handle).right;
        }

        self.nodes.clear();
        self.len = 0;
    }

    /// Visits every element in ascending order.
    pub(crate) fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(&T),
    {
        let mut stack: NodePath = SmallVec::new();
        let mut current = self.root;

        while let Some(handle) = current {
            stack.push(handle);
            current = self.nodes.get(handle).left;
        }

        while let Some(handle) = stack.pop() {
            f(&self.nodes.get(handle).element);

            let mut current = self.nodes.get(handle).right;
            while let Some(next) = current {
                stack.push(next);
                current = self.nodes.get(next).left;
            }
        }
    }

    /// Visits every element in ascending order, mutably. Callers must not
    /// change an element's position in the ordering; the facades only hand
    /// out the value half of map entries here.
    pub(crate) fn for_each_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(&mut T),
    {
        let mut stack: NodePath = SmallVec::new();
        let mut current = self.root;

        while let Some(handle) = current {
            stack.push(handle);
            current = self.nodes.get(handle).left;
        }

        while let Some(handle) = stack.pop() {
            let node = self.nodes.get_mut(handle);
            f(&mut node.element);

            let mut current = node.right;
            while let Some(next) = current {
                stack.push(next);
                current = self.nodes.get(next).left;
            }
        }
    }
}

impl<T> Drop for RawAvlTree<T> {
    fn drop(&mut self) {
        self.clear();
    }
}

#[cfg(test)]
impl<T> RawAvlTree<T> {
    /// Exhaustive audit of the structural invariants: strict inorder
    /// ascent, stored balance factors equal to recomputed height
    /// differences, the AVL height bound, and `len` accounting.
    pub(crate) fn assert_invariants<C>(&self, mut cmp: C)
    where
        C: FnMut(&T, &T) -> Ordering,
    {
        let mut count = 0_usize;
        let mut previous: Option<Handle> = None;
        let mut stack: NodePath = SmallVec::new();
        let mut current = self.root;

        while current.is_some() || !stack.is_empty() {
            while let Some(handle) = current {
                stack.push(handle);
                current = self.nodes.get(handle).left;
            }

            let handle = stack.pop().expect("loop condition guarantees a pending node");
            if let Some(previous) = previous {
                assert_eq!(
                    cmp(self.element(previous), self.element(handle)),
                    Ordering::Less,
                    "inorder sequence must strictly ascend"
                );
            }
            previous = Some(handle);
            count += 1;
            current = self.nodes.get(handle).right;
        }

        assert_eq!(count, self.len, "len must equal the number of reachable nodes");

        let height = self.assert_balance(self.root);

        #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let bound = (1.44 * (self.len as f64 + 1.065).log2() - 0.328).ceil().max(0.0) as usize;
        assert!(
            height <= bound,
            "height {height} exceeds the AVL bound {bound} for len {len}",
            len = self.len
        );
    }

    /// Recomputes subtree heights, checking each stored balance factor on
    /// the way up. Test-only, so recursion is fine here.
    fn assert_balance(&self, link: Option<Handle>) -> usize {
        let Some(handle) = link else {
            return 0;
        };

        let node = self.nodes.get(handle);
        let left = self.assert_balance(node.left);
        let right = self.assert_balance(node.right);

        #[allow(clippy::cast_possible_wrap)]
        let difference = right as isize - left as isize;
        assert!(difference.abs() <= 1, "AVL balance violated");
        assert_eq!(isize::from(node.balance_factor), difference, "stored balance factor is stale");

        1 + left.max(right)
    }
}
