pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unknown node key: {key}")]
    UnknownNode { key: usize },
    #[error("invalid option `{key}`: {message}")]
    InvalidOption { key: String, message: String },
    #[error(transparent)]
    Document(#[from] arbor_core::Error),
}
