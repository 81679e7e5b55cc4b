//! Gateway error types

use inventory_core::Error as CoreError;

/// Gateway result type
pub type Result<T> = std::result::Result<T, Error>;

/// Which endpoint group a failure came from; registration rejections are
/// reported differently from ordinary validation failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Login,
    Register,
    Products,
}

/// Gateway errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Request rejected ({status}): {detail}")]
    Status { status: u16, detail: String },

    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid base URL: {0}")]
    InvalidUrl(String),
}

impl Error {
    /// Map onto the client error taxonomy
    pub fn into_core(self, endpoint: Endpoint) -> CoreError {
        match self {
            Error::Http(e) => CoreError::Network(e.to_string()),
            Error::Decode(e) => CoreError::Serialization(e),
            Error::InvalidUrl(url) => CoreError::Config(format!("Invalid base URL: {}", url)),
            Error::Status { status, detail } => match (status, endpoint) {
                (401, _) => CoreError::Authentication(detail),
                (403, _) => CoreError::Authorization(detail),
                (404, _) => CoreError::NotFound(detail),
                (400 | 409 | 422, Endpoint::Register) => CoreError::Registration(detail),
                (400 | 409 | 422, _) => CoreError::Validation(detail),
                (status, _) => CoreError::Server {
                    status,
                    message: detail,
                },
            },
        }
    }
}

impl From<Error> for CoreError {
    fn from(err: Error) -> Self {
        err.into_core(Endpoint::Products)
    }
}
