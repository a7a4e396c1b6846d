//! Error types

/// The input could not be read as a document at all.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Malformed JSON: {0}")]
    Syntax(#[from] serde_json::Error),

    #[error("Document must be a JSON object")]
    NotAnObject,

    #[error("Document has no `root` key")]
    MissingRoot,

    #[error("Invalid root: {0}")]
    InvalidRoot(&'static str),
}

/// A path-based tree edit could not be applied.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    #[error("No node at path {0:?}")]
    InvalidPath(Vec<usize>),

    #[error("Node of kind `{0}` cannot have children")]
    NotAContainer(String),
}

/// A decorator kind could not be registered.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("Kind `{0}` is built in")]
    ReservedKind(String),

    #[error("Kind `{0}` is already registered")]
    DuplicateKind(String),
}
