// Error types for persistence and uploads

use thiserror::Error;

/// Result type alias for store and repository operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors raised by pet stores and repositories
#[derive(Debug, Error)]
pub enum StoreError {
    /// Target row does not exist
    #[error("Entity not found: {0}")]
    NotFound(i32),

    /// Storage backend failure (includes failed audit writes)
    #[error("Database error: {0}")]
    Database(String),

    /// Entity snapshot or column value could not be converted
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl StoreError {
    /// Create a not found error
    pub fn not_found(id: i32) -> Self {
        StoreError::NotFound(id)
    }

    /// Create a database error
    pub fn database(msg: impl Into<String>) -> Self {
        StoreError::Database(msg.into())
    }

    /// Create a serialization error
    pub fn serialization(msg: impl Into<String>) -> Self {
        StoreError::Serialization(msg.into())
    }
}

/// Errors raised while uploading a file to object storage
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The upload could not be decoded, resized or re-encoded as an image
    #[error("Image error: {0}")]
    Image(String),

    #[error("Object store error: {0}")]
    ObjectStore(String),

    #[error("Invalid file name: {0}")]
    InvalidFileName(String),

    #[error("No file provided")]
    MissingFile,

    #[error("File storage is not configured")]
    NotConfigured,
}

impl UploadError {
    pub fn image(msg: impl Into<String>) -> Self {
        UploadError::Image(msg.into())
    }

    pub fn object_store(msg: impl Into<String>) -> Self {
        UploadError::ObjectStore(msg.into())
    }
}
