pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid document: {message}")]
    InvalidDocument { message: String },

    #[error("Invalid config: {message}")]
    InvalidConfig { message: String },
}
