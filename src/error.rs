use thiserror::Error;

#[derive(Error, Debug)]
pub enum MigrationError {
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid {kind} record: {message}")]
    InvalidRecord { kind: &'static str, message: String },

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("Unsupported defined variable type: {0}")]
    UnsupportedVariant(String),

    #[error("Missing dependency: {0}")]
    MissingDependency(String),

    #[error("Invalid environment '{0}', expected one of DEV, REF, ABN, PROD")]
    InvalidEnvironment(String),

    #[error("{operation} rejected with status {status}: {body}")]
    Rejected {
        operation: &'static str,
        status: u16,
        body: String,
    },
}

pub type Result<T> = std::result::Result<T, MigrationError>;
