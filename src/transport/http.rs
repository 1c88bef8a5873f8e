//! reqwest-backed transport

use async_trait::async_trait;
use std::time::Duration;

use super::{RawResponse, Transport};
use crate::error::Result;

/// Transport using a shared `reqwest::Client` with a fixed request timeout
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport whose requests time out after `timeout`
    ///
    /// # Errors
    /// Returns `Network` if the TLS backend cannot be initialised.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    /// Wrap an already configured `reqwest::Client`
    #[must_use]
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn finish(request: reqwest::RequestBuilder) -> Result<RawResponse> {
        let response = request.send().await?;
        let status = response.status().as_u16();
        let url = response.url().to_string();
        let body = response.text().await?;
        Ok(RawResponse { status, url, body })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(
        &self,
        url: &str,
        headers: &[(&str, String)],
        query: &[(String, String)],
    ) -> Result<RawResponse> {
        tracing::debug!(url, params = query.len(), "GET");
        let mut request = self.client.get(url);
        for (name, value) in headers {
            request = request.header(*name, value);
        }
        if !query.is_empty() {
            request = request.query(query);
        }
        Self::finish(request).await
    }

    async fn post_form(
        &self,
        url: &str,
        headers: &[(&str, String)],
        form: &[(&str, &str)],
    ) -> Result<RawResponse> {
        tracing::debug!(url, "POST form");
        let mut request = self.client.post(url).form(form);
        for (name, value) in headers {
            request = request.header(*name, value);
        }
        Self::finish(request).await
    }
}
