//! Error types for the Insperity REST client

use thiserror::Error;

/// Main error type for the Insperity REST client
#[derive(Error, Debug)]
pub enum InsperityError {
    /// Token acquisition or refresh returned a non-200 status
    #[error("Authentication failed (status {status}): {body}")]
    Authentication {
        /// HTTP status code returned by the token endpoint
        status: u16,
        /// Raw response body
        body: String,
    },

    /// A data endpoint returned a non-success status
    #[error("HTTP error calling {url} (status {status}): {body}")]
    Http {
        /// HTTP status code
        status: u16,
        /// Requested URL
        url: String,
        /// Raw response body
        body: String,
    },

    /// A required field was absent from a raw record
    #[error("Missing required field: {0}")]
    MissingField(String),

    /// A field was present but its value could not be used
    #[error("Invalid value for field {field}: {message}")]
    InvalidField {
        /// Key path of the offending field
        field: String,
        /// What was wrong with it
        message: String,
    },

    /// Lookup of a client or legal entity found nothing
    #[error("Not found: {0}")]
    NotFound(String),

    /// Pagination followed more pages than allowed
    #[error("Pagination exceeded {limit} pages (next page: {url})")]
    PageLimitExceeded {
        /// Configured page cap
        limit: usize,
        /// The next-page URL that would have been requested
        url: String,
    },

    /// Transport failure (connection, TLS, timeout)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Response body did not decode as the expected JSON
    #[error("JSON decode error: {0}")]
    JsonDecode(#[from] serde_json::Error),

    /// Invalid or incomplete configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type alias for Insperity client operations
pub type Result<T> = std::result::Result<T, InsperityError>;

impl InsperityError {
    /// Create an authentication error
    pub fn authentication(status: u16, body: impl Into<String>) -> Self {
        Self::Authentication {
            status,
            body: body.into(),
        }
    }

    /// Create an HTTP error
    pub fn http(status: u16, url: impl Into<String>, body: impl Into<String>) -> Self {
        Self::Http {
            status,
            url: url.into(),
            body: body.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField(field.into())
    }

    /// Create an invalid field error
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a page limit error
    pub fn page_limit_exceeded(limit: usize, url: impl Into<String>) -> Self {
        Self::PageLimitExceeded {
            limit,
            url: url.into(),
        }
    }

    /// Create an invalid configuration error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// HTTP status carried by the error, if any
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Authentication { status, .. } | Self::Http { status, .. } => Some(*status),
            Self::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// True when the server rejected the bearer token
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}
