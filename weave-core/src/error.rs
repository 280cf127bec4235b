use thiserror::Error;

#[derive(Error, Debug)]
pub enum WeaveError {
    /// Referenced user id is absent from the snapshot. Caller mistake,
    /// surfaced unchanged.
    #[error("User {0} not found")]
    NotFound(i64),

    /// Out-of-range request parameter (depth, limit). Caller mistake,
    /// surfaced unchanged.
    #[error("Invalid parameter: {0}")]
    Validation(String),

    /// A collaborator read failed while building a snapshot. The whole
    /// analytics operation aborts; no partial snapshot is ever used.
    #[error("Storage unavailable: {0}")]
    DataUnavailable(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
