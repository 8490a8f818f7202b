use crate::console::Console;
use crate::storage::config::Config;
use crate::storage::credentials::{CredentialError, InstalledSecret, StoredToken, TokenStorage};
use chrono::Utc;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Credential storage error: {0}")]
    StorageError(#[from] CredentialError),
    #[error("Failed to read authorization code: {0}")]
    TerminalError(#[source] std::io::Error),
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("OAuth error: {0}")]
    OAuthError(String),
}

/// OAuth client descriptor plus the token issued for it.
#[derive(Debug, Clone, PartialEq)]
pub struct Credential {
    pub client: InstalledSecret,
    pub token: StoredToken,
}

impl Credential {
    pub fn access_token(&self) -> &str {
        &self.token.access_token
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: Option<i64>,
    refresh_token: Option<String>,
    scope: Option<String>,
}

pub struct GoogleAuthenticator {
    config: Config,
    secret: InstalledSecret,
    storage: TokenStorage,
    client: reqwest::Client,
}

impl GoogleAuthenticator {
    pub fn new(config: Config, secret: InstalledSecret) -> Self {
        let storage = TokenStorage::new(config.token_path.clone());
        let client = reqwest::Client::new();

        Self {
            config,
            secret,
            storage,
            client,
        }
    }

    /// Uses the stored token as-is when one exists; otherwise runs the
    /// interactive consent flow. A token file that exists but does not
    /// parse is an error, not a reason to re-consent.
    pub async fn authorize<C: Console>(&self, console: &mut C) -> Result<Credential, AuthError> {
        let token = match self.storage.load_token() {
            Ok(token) => {
                tracing::info!("Using stored token from {}", self.storage.path().display());
                token
            }
            Err(CredentialError::IoError(e)) => {
                tracing::info!("No stored token at {} ({}), starting consent flow", self.storage.path().display(), e);
                self.get_new_token(console).await?
            }
            Err(e) => {
                tracing::error!("Stored token at {} is malformed: {}", self.storage.path().display(), e);
                return Err(e.into());
            }
        };

        Ok(Credential {
            client: self.secret.clone(),
            token,
        })
    }

    pub fn get_auth_url(&self) -> String {
        let scope = self.config.scopes.join(" ");

        format!(
            "{}?access_type=offline&scope={}&response_type=code&client_id={}&redirect_uri={}",
            self.config.endpoints.auth_url,
            urlencoding::encode(&scope),
            urlencoding::encode(&self.secret.client_id),
            urlencoding::encode(self.secret.redirect_url())
        )
    }

    async fn get_new_token<C: Console>(&self, console: &mut C) -> Result<StoredToken, AuthError> {
        console.say(&format!("Authorize this app by visiting this url: {}", self.get_auth_url()));

        let code = console
            .prompt("Enter the code from that page here: ")
            .map_err(AuthError::TerminalError)?;

        let token = self.exchange_code_for_token(code.trim()).await?;
        console.say(&format!("Token stored to {}", self.storage.path().display()));
        Ok(token)
    }

    pub async fn exchange_code_for_token(&self, code: &str) -> Result<StoredToken, AuthError> {
        let params = [
            ("client_id", self.secret.client_id.as_str()),
            ("client_secret", self.secret.client_secret.as_str()),
            ("code", code),
            ("redirect_uri", self.secret.redirect_url()),
            ("grant_type", "authorization_code"),
        ];

        let token_response = self.request_token(&params).await?;

        let token = StoredToken::new(token_response.access_token, token_response.expires_in, Utc::now())
            .with_refresh_token(token_response.refresh_token)
            .with_scope(token_response.scope);

        self.storage.save_token(&token)?;
        tracing::info!("Token stored to {}", self.storage.path().display());

        Ok(token)
    }

    /// Refreshes an expired access token when a refresh token is on hand.
    /// Tokens without a refresh token are handed back untouched.
    pub async fn refresh_if_expired(&self, credential: Credential) -> Result<Credential, AuthError> {
        if !credential.token.is_expired(Utc::now()) {
            return Ok(credential);
        }

        let Some(refresh_token) = credential.token.refresh_token.clone() else {
            tracing::warn!("Stored access token has expired and no refresh token is available");
            return Ok(credential);
        };

        let token = self.refresh_token(&credential, &refresh_token).await?;
        Ok(Credential { token, ..credential })
    }

    async fn refresh_token(&self, credential: &Credential, refresh_token: &str) -> Result<StoredToken, AuthError> {
        let params = [
            ("client_id", credential.client.client_id.as_str()),
            ("client_secret", credential.client.client_secret.as_str()),
            ("refresh_token", refresh_token),
            ("grant_type", "refresh_token"),
        ];

        tracing::info!("Refreshing expired access token");
        let token_response = self.request_token(&params).await?;

        let token = StoredToken::new(token_response.access_token, token_response.expires_in, Utc::now())
            .with_refresh_token(token_response.refresh_token.or_else(|| Some(refresh_token.to_string())))
            .with_scope(token_response.scope.or_else(|| credential.token.scope.clone()));

        self.storage.save_token(&token)?;

        Ok(token)
    }

    async fn request_token(&self, params: &[(&str, &str)]) -> Result<TokenResponse, AuthError> {
        let response = self
            .client
            .post(&self.config.endpoints.token_url)
            .form(params)
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await?;
            tracing::error!("Token endpoint rejected request: {}", error_text);
            return Err(AuthError::OAuthError(error_text));
        }

        Ok(response.json().await?)
    }
}
