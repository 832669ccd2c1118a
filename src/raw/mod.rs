mod arena;
mod bit_stack;
mod handle;
mod node;
mod raw_avl_tree;
mod rotate;

pub(crate) use raw_avl_tree::RawAvlTree;
