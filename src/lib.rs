//! AVL-balanced ordered collections for Rust.
//!
//! This crate provides [`AvlMap`] and [`AvlSet`], ordered collections backed
//! by an [AVL tree]: a binary search tree that keeps the heights of every
//! node's two subtrees within one of each other, guaranteeing logarithmic
//! worst-case lookup, insertion, and removal.
//!
//! # Example
//!
//! ```
//! use bonsai_tree::AvlMap;
//!
//! let mut headcount = AvlMap::new();
//! headcount.insert("shibuya", 12);
//! headcount.insert("asakusa", 7);
//! headcount.insert("ueno", 31);
//!
//! assert_eq!(headcount.get("asakusa"), Some(&7));
//! assert_eq!(headcount.len(), 3);
//!
//! // Entries are kept in key order.
//! let mut districts = Vec::new();
//! headcount.for_each(|district, _| districts.push(*district));
//! assert_eq!(districts, ["asakusa", "shibuya", "ueno"]);
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`, no standard library
//!   dependency
//! - **Worst-case O(log n) operations** - The AVL height invariant bounds
//!   every root-to-leaf path, unlike amortized or probabilistic structures
//! - **No recursion** - Search, insertion, removal, and teardown are all
//!   iterative; tree depth never translates into call-stack depth
//! - **No unsafe code** - Nodes live in a slab arena addressed by
//!   niche-optimized handles, so the whole crate compiles under
//!   `forbid(unsafe_code)`
//!
//! # Implementation
//!
//! Every node stores its two child handles and a balance factor (right
//! subtree height minus left subtree height, always in `{-1, 0, +1}`
//! between operations). Nodes carry no parent handle; mutation paths are
//! reconstructed on the fly with small inline scratch stacks that only
//! touch the heap for trees deeper than any reachable AVL shape. Removal
//! retraces the ancestor chain iteratively, cascading rotations as needed,
//! and teardown dismantles the tree by rotating left children up rather
//! than recursing.
//!
//! [AVL tree]: https://en.wikipedia.org/wiki/AVL_tree

#![no_std]
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

#[cfg(test)]
extern crate std;

mod raw;

pub mod avl_map;
pub mod avl_set;

pub use avl_map::AvlMap;
pub use avl_set::AvlSet;
