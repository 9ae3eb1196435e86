//! Arena-based AVL tree.
//!
//! Nodes live in a caller- or map-owned `Vec<N>` arena. Every "pointer" is an
//! `Option<u32>` slot index: children are owned through `l` / `r`, and `p` is
//! a non-owning back-link used for upward walks and rotation bookkeeping.
//!
//! Balance factors are kept as `height(left) - height(right)` and updated
//! incrementally by the insert and remove walks.
//!
//! # Module layout
//!
//! | Module | Contents |
//! |--------|----------|
//! [`types`] | [`Node`] and [`KvNode`] traits |
//! [`util`] | Unbalanced BST navigation: `first`, `next`, `prev`, `find`, `equal_paths` … |
//! [`avl::rotate`] | The four rotation primitives |
//! [`avl::util`] | Insert / remove rebalancing walks, validation, debug printer |
//! [`avl::AvlMap`] | Ordered key-value map on top of the above |
//! [`error`] | [`AvlError`] |

pub mod avl;
pub mod error;
pub mod types;
pub mod util;

pub use avl::{AvlMap, AvlNode, AvlNodeLike};
pub use error::AvlError;
pub use types::{KvNode, Node};
