use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AvlError {
    /// Indexed access on a key that is not in the tree.
    #[error("key not found")]
    KeyNotFound,
    /// Structural check failed; carries which link or node is wrong.
    #[error("AVL invariant violated: {0}")]
    InvariantViolated(String),
}
