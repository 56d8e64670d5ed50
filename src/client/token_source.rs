use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::token::TokenResponse;

#[derive(Debug, Error)]
pub enum TokenSourceError {
    #[error("Token request failed: {0}")]
    Request(String),

    #[error("Token endpoint returned status {0}")]
    Status(u16),

    #[error("Malformed token response: {0}")]
    Decode(String),
}

/// Where the page obtains its identity and access token
#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn fetch(&self) -> Result<TokenResponse, TokenSourceError>;
}

/// Fetches tokens from the `GET /token` endpoint of the quickstart server
pub struct HttpTokenSource {
    client: reqwest::Client,
    url: String,
}

impl HttpTokenSource {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            url: format!("{}/token", base_url.trim_end_matches('/')),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl TokenSource for HttpTokenSource {
    #[instrument(skip(self), fields(url = %self.url))]
    async fn fetch(&self) -> Result<TokenResponse, TokenSourceError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| TokenSourceError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "Token endpoint rejected request");
            return Err(TokenSourceError::Status(status.as_u16()));
        }

        let grant: TokenResponse = response
            .json()
            .await
            .map_err(|e| TokenSourceError::Decode(e.to_string()))?;

        debug!(identity = %grant.identity, "Token fetched");
        Ok(grant)
    }
}
