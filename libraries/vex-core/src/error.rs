/// Core error types for the V3XV0ID player
use thiserror::Error;

/// Result type alias using `VexError`
pub type Result<T> = std::result::Result<T, VexError>;

/// Core error type
#[derive(Error, Debug)]
pub enum VexError {
    /// Entity not found
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Two catalog entries share an id
    #[error("Duplicate track id: {0}")]
    DuplicateTrack(String),

    /// A catalog must contain at least one track
    #[error("Catalog is empty")]
    EmptyCatalog,

    /// Mood string outside the recognized set
    #[error("Unknown mood: {0}")]
    UnknownMood(String),

    /// Unknown art pattern name
    #[error("Unknown art pattern: {0}")]
    UnknownPattern(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

impl VexError {
    /// Create a not found error
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}
