use super::handle::Handle;

/// A tree node: two optional child handles, a balance factor, and the
/// element itself.
///
/// The balance factor is the height of the right subtree minus the height
/// of the left. Between public operations it is always -1, 0, or +1; the
/// rebalancing code drives it to ±2 transiently. No parent handle is
/// stored — mutation paths are reconstructed with scratch stacks instead,
/// which keeps the node at two words of linkage plus the element.
#[derive(Clone)]
pub(crate) struct AvlNode<T> {
    pub(crate) left: Option<Handle>,
    pub(crate) right: Option<Handle>,
    pub(crate) balance_factor: i8,
    pub(crate) element: T,
}

impl<T> AvlNode<T> {
    pub(crate) const fn new(element: T) -> Self {
        Self {
            left: None,
            right: None,
            balance_factor: 0,
            element,
        }
    }

    /// The child on the given side; `went_left` matches the bit-stack
    /// encoding of descent directions.
    #[inline]
    pub(crate) const fn child(&self, went_left: bool) -> Option<Handle> {
        if went_left {
            self.left
        } else {
            self.right
        }
    }

    #[inline]
    pub(crate) fn child_mut(&mut self, went_left: bool) -> &mut Option<Handle> {
        if went_left {
            &mut self.left
        } else {
            &mut self.right
        }
    }
}
