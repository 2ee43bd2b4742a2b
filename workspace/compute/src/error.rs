use thiserror::Error;

/// Error types for the compute module
#[derive(Error, Debug)]
pub enum ComputeError {
    /// Error from the database operations
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Error from the lead auto-assignment pass
    #[error("Assignment error: {0}")]
    Assignment(String),

    /// Error from invoice total derivation or numbering
    #[error("Invoice error: {0}")]
    Invoice(String),

    /// Error from database seeding
    #[error("Seed error: {0}")]
    Seed(String),
}

/// Type alias for Result with ComputeError
pub type Result<T> = std::result::Result<T, ComputeError>;
