//! Error types for gqorm

use thiserror::Error;

use crate::response::GraphqlError;

/// Result type alias for gqorm operations
pub type GqResult<T> = Result<T, GqError>;

/// Error types for query building, transport and decoding
#[derive(Debug, Error)]
pub enum GqError {
    /// Query could not be built (malformed payload, missing required clause)
    #[error("Build error: {0}")]
    Build(String),

    /// HTTP request error from the underlying client
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a redirect status
    #[error("HTTP request redirected: {status}")]
    Redirect {
        /// The 3xx status code returned by the server
        status: u16,
    },

    /// Server answered with a failure status
    #[error("HTTP request failed: {status}")]
    Status {
        /// The 4xx/5xx status code returned by the server
        status: u16,
    },

    /// Response body did not match the expected envelope
    #[error("Decode error: {0}")]
    Decode(String),

    /// HTTP 200 response carrying GraphQL-level errors
    #[error("GraphQL errors: {}", format_graphql_errors(.0))]
    Graphql(Vec<GraphqlError>),
}

impl GqError {
    /// Create a build error
    pub fn build(message: impl Into<String>) -> Self {
        Self::Build(message.into())
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }

    /// Check if this is a build error
    pub fn is_build(&self) -> bool {
        matches!(self, Self::Build(_))
    }

    /// Check if the server redirected the request
    pub fn is_redirect(&self) -> bool {
        matches!(self, Self::Redirect { .. })
    }

    /// Check if the server answered with a failure status
    pub fn is_failed_status(&self) -> bool {
        matches!(self, Self::Status { .. })
    }

    /// Check if the response carried GraphQL-level errors
    pub fn is_graphql(&self) -> bool {
        matches!(self, Self::Graphql(_))
    }

    /// The HTTP status code carried by a transport error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Redirect { status } | Self::Status { status } => Some(*status),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for GqError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

fn format_graphql_errors(errors: &[GraphqlError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
