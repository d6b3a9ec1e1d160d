use thiserror::Error;

#[derive(Error, Debug)]
pub enum AthError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Malformed URL: {url}, expected format: {expected}")]
    MalformedUrl { url: String, expected: String },

    #[error("Missing required parameter: {name}")]
    MissingParameter { name: String },

    #[error("Corrupted archive {path}: {reason}")]
    CorruptArchive { path: String, reason: String },

    #[error("Host operation failed: {message}")]
    HostError { message: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },
}

pub type Result<T> = std::result::Result<T, AthError>;
