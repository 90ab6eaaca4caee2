//! This crate exposes an AVL tree: a Binary Search Tree (BST) that keeps itself balanced under any
//! sequence of insertions and deletions.
//!
//! ## Binary Search Tree
//!
//! A Binary Search Tree is a data structure supporting operations to
//! insert, find, and delete stored records. BSTs are typically defined
//! recursively using the notion of a `Node`. A `Node` will typically store
//! some sort of key (the key that was inserted, for example) and will
//! sometimes have child `Node`s. The most important invariants of a BST are:
//!
//! 1. For every `Node` in a BST, all the `Node`s in its left subtree have a
//!    key less than its own key.
//! 2. For every `Node` in a BST, all the `Node`s in its right subtree have a
//!    key greater than its own key.
//!
//! > Note that some `Node`s have no children. These `Node`s are called "leaf nodes".
//!
//! Searching for keys in the tree takes `O(height)` (where `height` is defined as the longest
//! path from the root `Node` to a leaf `Node`). BSTs also naturally support sorted iteration by
//! visiting the left subtree, then the subtree root, then the right subtree.
//!
//! ## AVL trees
//!
//! An AVL tree adds one more invariant: for every `Node`, the heights of its two subtrees differ
//! by at most one. Each `Node` caches its own height, and whenever an insert or delete changes the
//! shape of a subtree, every `Node` on the path back to the root recomputes its height and, if
//! its subtrees now differ by two, performs one or two _rotations_ to even them out. That keeps
//! the height within `1.44 * lg(N + 2)` where `N` is the number of nodes in the tree.
//!
//! See [`Tree`] for the API and [`Tree::check_invariants`] for a way to verify all of the above.

#![deny(missing_docs, clippy::clone_on_ref_ptr)]

mod invariants;
mod iter;
mod node;
pub mod tree;

pub use invariants::InvariantViolation;
pub use iter::{Iter, Keys, Values};
pub use tree::Tree;
