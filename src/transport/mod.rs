//! Transport layer for talking to the REST API
//!
//! This module provides the transport abstraction and the reqwest-backed
//! implementation. The client never inspects `reqwest` types directly: every
//! exchange comes back as a [`RawResponse`] so the retry and pagination logic
//! can be driven by any transport, including scripted ones in tests.

pub mod http;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::error::{InsperityError, Result};

/// Status, URL and body of one HTTP exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code
    pub status: u16,
    /// URL that was requested
    pub url: String,
    /// Response body text
    pub body: String,
}

impl RawResponse {
    /// Create a response
    pub fn new(status: u16, url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            status,
            url: url.into(),
            body: body.into(),
        }
    }

    /// True for 2xx statuses
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// True when the server rejected the bearer token
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }

    /// Turn a non-success response into `InsperityError::Http`
    ///
    /// # Errors
    /// Returns `Http` carrying status, URL and body when the status is not 2xx.
    pub fn error_for_status(self) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(InsperityError::http(self.status, self.url, self.body))
        }
    }

    /// Decode the body as JSON
    ///
    /// # Errors
    /// Returns `JsonDecode` if the body is not the expected shape.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

/// Transport trait for issuing HTTP requests
///
/// Implementations only move bytes: they never interpret status codes, so a
/// 401 or 500 is returned as a normal [`RawResponse`].
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue a GET request
    ///
    /// # Arguments
    /// * `url` - Absolute URL; may already carry a query string
    /// * `headers` - Header name/value pairs
    /// * `query` - Extra query parameters appended to the URL
    ///
    /// # Errors
    /// Returns error if the request cannot be sent or times out
    async fn get(
        &self,
        url: &str,
        headers: &[(&str, String)],
        query: &[(String, String)],
    ) -> Result<RawResponse>;

    /// Issue a form-encoded POST request
    ///
    /// # Errors
    /// Returns error if the request cannot be sent or times out
    async fn post_form(
        &self,
        url: &str,
        headers: &[(&str, String)],
        form: &[(&str, &str)],
    ) -> Result<RawResponse>;
}

pub use http::HttpTransport;
