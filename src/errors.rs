use thiserror::Error;

#[derive(Debug, Error)]
pub enum RpqError {
    #[error("io error: {0}")]
    Io(String),
    #[error("invalid graph header: {0}")]
    InvalidHeader(String),
    #[error("invalid query: {0}")]
    InvalidQuery(String),
    #[error("invalid label token: {0}")]
    InvalidLabel(String),
    #[error("unsupported path operator: {0}")]
    UnsupportedOperator(String),
    #[error("graph not loaded")]
    GraphNotLoaded,
    #[error("no queries loaded")]
    NoQueries,
    #[error("estimator not prepared")]
    NotPrepared,
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl RpqError {
    pub fn io<T: Into<String>>(msg: T) -> Self {
        RpqError::Io(msg.into())
    }

    pub fn invalid_header<T: Into<String>>(msg: T) -> Self {
        RpqError::InvalidHeader(msg.into())
    }

    pub fn invalid_query<T: Into<String>>(msg: T) -> Self {
        RpqError::InvalidQuery(msg.into())
    }

    pub fn invalid_label<T: Into<String>>(msg: T) -> Self {
        RpqError::InvalidLabel(msg.into())
    }

    pub fn unsupported_operator<T: Into<String>>(msg: T) -> Self {
        RpqError::UnsupportedOperator(msg.into())
    }

    pub fn invalid_input<T: Into<String>>(msg: T) -> Self {
        RpqError::InvalidInput(msg.into())
    }
}

impl From<std::io::Error> for RpqError {
    fn from(err: std::io::Error) -> Self {
        RpqError::io(err.to_string())
    }
}
