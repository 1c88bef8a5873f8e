//! Credentials, API secrets and authorization headers

use base64::{Engine, engine::general_purpose::STANDARD};
use serde::Deserialize;

use crate::error::{InsperityError, Result};

/// Environment variable holding the API client id
pub const ENV_CLIENT_ID: &str = "INSPERITY_CLIENT_ID";
/// Environment variable holding the API shared secret
pub const ENV_SECRET: &str = "INSPERITY_SECRET";
/// Environment variable holding the default client code
pub const ENV_CLIENT_CODE: &str = "INSPERITY_CLIENT_CODE";

/// Access/refresh token pair returned by the token endpoint
#[derive(Clone, Deserialize)]
pub struct TokenPair {
    /// Bearer token for data requests
    pub access_token: String,
    /// Token used to obtain the next pair; some responses omit it
    #[serde(default)]
    pub refresh_token: Option<String>,
}

impl std::fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenPair")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Session credential.
///
/// Created by token acquisition and updated in place when the access token
/// expires, so every later call of the session sees the refreshed token.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    /// Bearer token for data requests
    pub access_token: String,
    /// Token for the refresh grant
    pub refresh_token: String,
    /// Client code the tokens were issued for
    pub client_code: String,
}

impl Credential {
    /// Create a credential from its parts
    pub fn new(
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
        client_code: impl Into<String>,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
            client_code: client_code.into(),
        }
    }

    /// Overwrite both tokens with a freshly issued pair.
    ///
    /// If the server did not send a new refresh token the current one is kept.
    pub fn apply(&mut self, pair: TokenPair) {
        self.access_token = pair.access_token;
        if let Some(refresh_token) = pair.refresh_token {
            self.refresh_token = refresh_token;
        }
    }

    /// `Authorization` header value for data requests
    #[must_use]
    pub fn authorization_header(&self) -> String {
        bearer_header(&self.access_token)
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .field("client_code", &self.client_code)
            .finish()
    }
}

/// Client id and shared secret used for Basic auth against the token endpoint
#[derive(Clone)]
pub struct ApiSecrets {
    client_id: String,
    secret: String,
}

impl ApiSecrets {
    /// Create secrets from explicit values
    pub fn new(client_id: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            secret: secret.into(),
        }
    }

    /// Read `INSPERITY_CLIENT_ID` and `INSPERITY_SECRET` from the process
    /// environment, loading a `.env` file first when one exists.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` naming the first missing variable.
    pub fn from_env() -> Result<Self> {
        load_dotenv()?;
        Ok(Self {
            client_id: env_var(ENV_CLIENT_ID)?,
            secret: env_var(ENV_SECRET)?,
        })
    }

    /// The API client id
    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Base64 of `client_id:secret`
    #[must_use]
    pub fn combined_key(&self) -> String {
        combined_key(&self.client_id, &self.secret)
    }

    /// `Authorization` header value for the token endpoint
    #[must_use]
    pub fn basic_header(&self) -> String {
        format!("Basic {}", self.combined_key())
    }
}

impl std::fmt::Debug for ApiSecrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiSecrets")
            .field("client_id", &self.client_id)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Default client code from `INSPERITY_CLIENT_CODE`, loading `.env` first.
///
/// # Errors
///
/// Returns `InvalidConfig` if the variable is not set.
pub fn client_code_from_env() -> Result<String> {
    load_dotenv()?;
    env_var(ENV_CLIENT_CODE)
}

/// Load `.env` from the working directory or its parents, if there is one
fn load_dotenv() -> Result<()> {
    if let Some(path) = dotenv_outcome(dotenvy::dotenv())? {
        tracing::debug!(path = %path.display(), "Loaded .env file");
    }
    Ok(())
}

/// A missing file is fine; an unreadable or malformed one is not.
fn dotenv_outcome<T>(result: std::result::Result<T, dotenvy::Error>) -> Result<Option<T>> {
    match result {
        Ok(loaded) => Ok(Some(loaded)),
        Err(err) if err.not_found() => Ok(None),
        Err(err) => {
            tracing::warn!(error = %err, "Failed to load .env file");
            Err(InsperityError::invalid_config(format!(
                "failed to load .env file: {err}"
            )))
        }
    }
}

fn env_var(name: &str) -> Result<String> {
    match std::env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(InsperityError::invalid_config(format!(
            "environment variable {name} is not set"
        ))),
    }
}

/// Standard (RFC 2045) Base64 of `client_id:secret`
///
/// # Example
/// ```
/// use insperity_client::auth::combined_key;
///
/// assert_eq!(combined_key("Aladdin", "open sesame"), "QWxhZGRpbjpvcGVuIHNlc2FtZQ==");
/// ```
#[must_use]
pub fn combined_key(client_id: &str, secret: &str) -> String {
    STANDARD.encode(format!("{client_id}:{secret}"))
}

/// `Bearer <token>` header value
#[must_use]
pub fn bearer_header(access_token: &str) -> String {
    format!("Bearer {access_token}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_dotenv_file_is_ignored() {
        let missing = std::env::temp_dir().join("insperity-client-no-such-dir/.env");
        assert_eq!(dotenv_outcome(dotenvy::from_path(&missing)).unwrap(), None);
    }

    #[test]
    fn test_malformed_dotenv_file_is_invalid_config() {
        let path = std::env::temp_dir().join(format!(
            "insperity-client-malformed-{}.env",
            std::process::id()
        ));
        std::fs::write(&path, "INSPERITY_TEST_KEY=\"unterminated\n").unwrap();

        let outcome = dotenv_outcome(dotenvy::from_path(&path));
        std::fs::remove_file(&path).unwrap();

        assert!(matches!(outcome, Err(InsperityError::InvalidConfig(ref msg)) if msg.contains(".env")));
    }

    #[test]
    fn test_combined_key() {
        let secrets = ApiSecrets::new("client", "s3cret");
        assert_eq!(secrets.combined_key(), "Y2xpZW50OnMzY3JldA==");
        assert_eq!(secrets.basic_header(), "Basic Y2xpZW50OnMzY3JldA==");
    }

    #[test]
    fn test_credential_apply_replaces_both_tokens() {
        let mut credential = Credential::new("old-access", "old-refresh", "VES");
        credential.apply(TokenPair {
            access_token: "new-access".to_string(),
            refresh_token: Some("new-refresh".to_string()),
        });

        assert_eq!(credential.access_token, "new-access");
        assert_eq!(credential.refresh_token, "new-refresh");
        assert_eq!(credential.client_code, "VES");
    }

    #[test]
    fn test_credential_apply_keeps_refresh_token_when_omitted() {
        let mut credential = Credential::new("old-access", "old-refresh", "VES");
        credential.apply(TokenPair {
            access_token: "new-access".to_string(),
            refresh_token: None,
        });

        assert_eq!(credential.refresh_token, "old-refresh");
    }

    #[test]
    fn test_authorization_header() {
        let credential = Credential::new("access123", "r", "c");
        assert_eq!(credential.authorization_header(), "Bearer access123");
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let credential = Credential::new("access123", "refresh456", "VES");
        let debug = format!("{credential:?}");
        assert!(!debug.contains("access123"));
        assert!(!debug.contains("refresh456"));
        assert!(debug.contains("VES"));

        let secrets = ApiSecrets::new("client", "s3cret");
        assert!(!format!("{secrets:?}").contains("s3cret"));
    }

    #[test]
    fn test_token_pair_deserialize() {
        let pair: TokenPair =
            serde_json::from_str(r#"{"access_token":"a","refresh_token":"r","expires_in":3600}"#)
                .unwrap();
        assert_eq!(pair.access_token, "a");
        assert_eq!(pair.refresh_token.as_deref(), Some("r"));
    }
}
