use thiserror::Error;

/// Errors returned by fallible [`Tree`][crate::Tree] operations.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeError {
    /// The item asked to be removed is not stored in the tree.
    #[error("item not in tree")]
    NotFound,
}

/// Result type alias for tree operations.
pub type Result<T> = std::result::Result<T, TreeError>;
