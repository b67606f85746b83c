//! A link-based Binary Search Tree (BST) that can be rebalanced on demand.
//!
//! ## Binary Search Tree
//!
//! A Binary Search Tree is a data structure supporting operations to
//! insert, find, and delete stored items. BSTs are typically defined
//! recursively using the notion of a `Node`. A `Node` stores an item and
//! has up to two child `Node`s. The invariants this crate keeps are:
//!
//! 1. For every `Node`, all the `Node`s in its left subtree hold an item
//!    less than or equal to its own item.
//! 2. For every `Node`, all the `Node`s in its right subtree hold an item
//!    strictly greater than its own item.
//!
//! So equal items are all kept and always end up to the left of each other.
//!
//! Searching takes `O(height)`, where `height` is the longest path from the
//! root `Node` to a leaf `Node`. A [`Tree`] does not balance itself: inserting
//! items in sorted order gives it height `N - 1`. [`Tree::rebalance`] rebuilds
//! it into the minimum height of `⌈lg (N + 1)⌉ - 1`, and [`Tree::find`] reports
//! how many nodes a lookup had to visit so the difference can be measured.
//!
//! ```
//! use linked_bst::Tree;
//!
//! let mut tree: Tree<_> = (1..=15).collect();
//! assert_eq!(tree.find(&15), Some((&15, 15)));
//!
//! tree.rebalance();
//! assert_eq!(tree.find(&15), Some((&15, 4)));
//! ```

#![deny(missing_docs, clippy::clone_on_ref_ptr)]

mod error;
mod iter;
mod linked;


pub use error::{Result, TreeError};
pub use iter::{Inorder, IntoIter, Preorder};
pub use linked::Tree;
