//! OAuth 2.0 client-credentials and refresh-token exchanges

use async_trait::async_trait;
use std::sync::Arc;

use super::token::{ApiSecrets, Credential, TokenPair};
use crate::error::{InsperityError, Result};
use crate::transport::{RawResponse, Transport};

const GRANT_CLIENT_CREDENTIALS: &str = "client_credentials";
const GRANT_REFRESH_TOKEN: &str = "refresh_token";

/// Source of fresh token pairs for an expired credential.
///
/// The retry wrapper only needs this one operation, which keeps it testable
/// without a token endpoint.
#[async_trait]
pub trait TokenRefresher: Send + Sync {
    /// Exchange the credential's refresh token for a new pair
    ///
    /// # Errors
    /// Returns `Authentication` if the token endpoint rejects the request.
    async fn refresh(&self, credential: &Credential) -> Result<TokenPair>;
}

/// Client for the token endpoint
#[derive(Clone)]
pub struct TokenClient {
    transport: Arc<dyn Transport>,
    secrets: ApiSecrets,
    token_url: String,
}

impl std::fmt::Debug for TokenClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenClient")
            .field("secrets", &self.secrets)
            .field("token_url", &self.token_url)
            .finish_non_exhaustive()
    }
}

impl TokenClient {
    /// Create a token client posting to `token_url`
    pub fn new(
        transport: Arc<dyn Transport>,
        secrets: ApiSecrets,
        token_url: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            secrets,
            token_url: token_url.into(),
        }
    }

    /// Token endpoint URL
    #[must_use]
    pub fn token_url(&self) -> &str {
        &self.token_url
    }

    /// Obtain a credential with the client-credentials grant
    ///
    /// # Errors
    ///
    /// Returns `Authentication` with the status and body on a non-200 response,
    /// `Network` on transport failure, `JsonDecode` on a malformed body.
    pub async fn acquire(&self, client_code: &str) -> Result<Credential> {
        tracing::debug!(client_code, "Requesting client-credentials token");
        let form = [
            ("grant_type", GRANT_CLIENT_CREDENTIALS),
            ("clientCode", client_code),
        ];
        let pair = self.exchange(&form).await?;
        let refresh_token = pair.refresh_token.ok_or_else(|| {
            InsperityError::authentication(200, "token response did not include a refresh_token")
        })?;
        Ok(Credential::new(pair.access_token, refresh_token, client_code))
    }

    /// Exchange the credential's refresh token for a new pair.
    ///
    /// The credential itself is not modified; see [`Credential::apply`].
    ///
    /// # Errors
    ///
    /// Same failure semantics as [`TokenClient::acquire`].
    pub async fn refresh_pair(&self, credential: &Credential) -> Result<TokenPair> {
        tracing::debug!(client_code = %credential.client_code, "Requesting refresh token");
        let form = [
            ("grant_type", GRANT_REFRESH_TOKEN),
            ("refresh_token", credential.refresh_token.as_str()),
            ("clientCode", credential.client_code.as_str()),
        ];
        self.exchange(&form).await
    }

    async fn exchange(&self, form: &[(&str, &str)]) -> Result<TokenPair> {
        let headers = [("Authorization", self.secrets.basic_header())];
        let response = self
            .transport
            .post_form(&self.token_url, &headers, form)
            .await?;
        Self::parse_token_response(response)
    }

    fn parse_token_response(response: RawResponse) -> Result<TokenPair> {
        if response.status != 200 {
            tracing::warn!(status = response.status, "Token endpoint rejected request");
            return Err(InsperityError::authentication(response.status, response.body));
        }
        response.json()
    }
}

#[async_trait]
impl TokenRefresher for TokenClient {
    async fn refresh(&self, credential: &Credential) -> Result<TokenPair> {
        self.refresh_pair(credential).await
    }
}
