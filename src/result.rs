use crate::value::ValueKind;

#[derive(thiserror::Error, Debug)]
pub enum StubError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("no stub generator for `{name}` from package `{package}` of type {kind}")]
    MissingStubGenerator {
        name: String,
        package: String,
        kind: ValueKind,
    },
    #[error("error serializing stub: {0:?}")]
    SerializeError(#[from] serde_json::Error),
    #[error("error formatting stub: {0:?}")]
    FormatError(#[from] std::fmt::Error),
}

pub type StubResult<T> = Result<T, StubError>;

impl StubError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Errors which abort the current stub attempt instead of degrading to a fallback
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::InvalidArgument(_) | Self::MissingStubGenerator { .. }
        )
    }
}
