use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown field {0:?}")]
    UnknownField(String),

    #[error("unknown facet {0:?}")]
    UnknownFacet(String),

    #[error("type mismatch for {name:?}: expected {expected}, found {found}")]
    TypeMismatch {
        name: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("failed to open index: {0}")]
    IndexOpen(String),

    #[error("failed to query index: {0}")]
    IndexQuery(String),

    #[error("failed to write to index: {0}")]
    IndexWrite(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("invalid document id: {0}")]
    InvalidId(String),

    #[error("invalid field or facet name: {0}")]
    InvalidName(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, Error>;
