//! AVL tree: node type, rotation primitives, rebalancing walks and the
//! [`AvlMap`] facade.

#[path = "AvlMap.rs"]
pub mod avl_map;
pub mod rotate;
pub mod types;
pub mod util;

pub use avl_map::{AvlMap, Iter};
pub use rotate::{rotate_left, rotate_left_right, rotate_right, rotate_right_left};
pub use types::{AvlNode, AvlNodeLike};
pub use util::{assert_avl_tree, insert_left, insert_right, print, remove};
