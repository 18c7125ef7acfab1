use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    /// The item cell was empty or carried no identifier characters.
    #[error("invalid identifier: '{raw}'")]
    InvalidIdentifier { raw: String },
    #[error("unknown suffix tag: {0}")]
    UnknownSuffixTag(String),
    #[error("unknown document type: {0}")]
    UnknownDocumentType(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
