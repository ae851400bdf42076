//! Google OAuth credentials for presentation export.
//!
//! The exporter asks a [`CredentialProvider`] for an access token before every export. The file
//! provider mirrors the installed-application flow: a client-secrets file names the OAuth client,
//! and a token cache holds the authorised user token, refreshed when it expires.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::constants::GOOGLE_SCOPES;
use crate::{OpordError, OpordResult};

use super::UnavailableReason;

/// Seconds before expiry at which a cached token is treated as expired.
const EXPIRY_SKEW_SECS: i64 = 60;

const DEFAULT_AUTH_URI: &str = "https://accounts.google.com/o/oauth2/auth";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Bearer token for the Google APIs.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AccessToken(..)")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    Ready(AccessToken),
    Unavailable(UnavailableReason),
}

#[async_trait]
pub trait CredentialProvider: Send + Sync {
    async fn credential(&self) -> OpordResult<Credential>;
}

/// Always answers with the same credential.
#[derive(Debug, Clone)]
pub struct StaticCredentialProvider {
    credential: Credential,
}

impl StaticCredentialProvider {
    pub fn ready(token: impl Into<String>) -> Self {
        Self {
            credential: Credential::Ready(AccessToken::new(token)),
        }
    }

    pub fn unavailable(reason: UnavailableReason) -> Self {
        Self {
            credential: Credential::Unavailable(reason),
        }
    }
}

#[async_trait]
impl CredentialProvider for StaticCredentialProvider {
    async fn credential(&self) -> OpordResult<Credential> {
        Ok(self.credential.clone())
    }
}

/// OAuth client identity from a downloaded client-secrets file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientSecrets {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_auth_uri")]
    pub auth_uri: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_auth_uri() -> String {
    DEFAULT_AUTH_URI.to_string()
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

#[derive(Deserialize)]
struct ClientSecretsFile {
    installed: Option<ClientSecrets>,
    web: Option<ClientSecrets>,
}

impl ClientSecrets {
    /// Load an `installed` (or `web`) client from a client-secrets JSON file.
    pub fn load(path: &Path) -> OpordResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(OpordError::CredentialRead)?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> OpordResult<Self> {
        let file: ClientSecretsFile =
            serde_json::from_str(contents).map_err(OpordError::CredentialParse)?;
        file.installed.or(file.web).ok_or_else(|| {
            OpordError::InvalidInput(
                "client secrets file has neither an \"installed\" nor a \"web\" client".into(),
            )
        })
    }

    /// Consent page URL for the installed-app flow.
    pub fn consent_url(&self, redirect_uri: &str) -> OpordResult<String> {
        let scope = GOOGLE_SCOPES.join(" ");
        let url = reqwest::Url::parse_with_params(
            &self.auth_uri,
            &[
                ("client_id", self.client_id.as_str()),
                ("redirect_uri", redirect_uri),
                ("response_type", "code"),
                ("scope", scope.as_str()),
                ("access_type", "offline"),
                ("prompt", "consent"),
            ],
        )
        .map_err(|e| OpordError::InvalidInput(format!("invalid auth_uri: {e}")))?;
        Ok(url.into())
    }
}

/// Pull the authorisation code out of the request target of a consent redirect,
/// e.g. `/?code=4/0Ab...&scope=...`.
///
/// An `error` parameter from the consent page is returned as an error.
pub fn code_from_redirect(target: &str) -> OpordResult<String> {
    let url = reqwest::Url::parse("http://127.0.0.1")
        .and_then(|base| base.join(target))
        .map_err(|e| OpordError::InvalidInput(format!("invalid redirect target: {e}")))?;

    let mut code = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "code" if !value.is_empty() => code = Some(value.into_owned()),
            "error" => {
                return Err(OpordError::InvalidInput(format!(
                    "authorisation was refused: {value}"
                )))
            }
            _ => {}
        }
    }
    code.ok_or_else(|| OpordError::InvalidInput("redirect carried no authorisation code".into()))
}

/// Authorised user token as cached on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredToken {
    pub token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub token_uri: String,
    pub client_id: String,
    pub client_secret: String,
    #[serde(default)]
    pub scopes: Vec<String>,
    #[serde(default)]
    pub expiry: Option<DateTime<Utc>>,
}

impl StoredToken {
    /// True when the token has no expiry or expires more than the skew from `now`.
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        match self.expiry {
            Some(expiry) => expiry - chrono::Duration::seconds(EXPIRY_SKEW_SECS) > now,
            None => true,
        }
    }

    fn apply(&mut self, response: TokenResponse, now: DateTime<Utc>) {
        self.token = response.access_token;
        if let Some(refresh) = response.refresh_token {
            self.refresh_token = Some(refresh);
        }
        self.expiry = response
            .expires_in
            .map(|secs| now + chrono::Duration::seconds(secs));
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    refresh_token: Option<String>,
}

/// Token cache backed by files, scoped to one client-secrets path and one cache path.
pub struct FileCredentialProvider {
    client_secrets: PathBuf,
    token_cache: PathBuf,
    http: reqwest::Client,
    refresh_lock: Mutex<()>,
}

impl std::fmt::Debug for FileCredentialProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileCredentialProvider")
            .field("client_secrets", &self.client_secrets)
            .field("token_cache", &self.token_cache)
            .finish()
    }
}

impl FileCredentialProvider {
    pub fn new(
        client_secrets: PathBuf,
        token_cache: PathBuf,
        timeout_secs: u64,
    ) -> OpordResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(OpordError::HttpClient)?;
        Ok(Self {
            client_secrets,
            token_cache,
            http,
            refresh_lock: Mutex::new(()),
        })
    }

    pub fn client_secrets(&self) -> &Path {
        &self.client_secrets
    }

    pub fn token_cache(&self) -> &Path {
        &self.token_cache
    }

    async fn read_cache(&self) -> OpordResult<Option<StoredToken>> {
        let contents = match tokio::fs::read_to_string(&self.token_cache).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(OpordError::CredentialRead(e)),
        };
        serde_json::from_str(&contents)
            .map(Some)
            .map_err(OpordError::CredentialParse)
    }

    /// Persist `token` by writing a sibling temp file and renaming it over the cache.
    pub async fn write_cache(&self, token: &StoredToken) -> OpordResult<()> {
        let json = serde_json::to_string_pretty(token).map_err(OpordError::Serialization)?;
        let mut tmp_name = self
            .token_cache
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "token.json".into());
        tmp_name.push(".tmp");
        let tmp = self.token_cache.with_file_name(tmp_name);

        tokio::fs::write(&tmp, json)
            .await
            .map_err(OpordError::CredentialWrite)?;
        tokio::fs::rename(&tmp, &self.token_cache)
            .await
            .map_err(OpordError::CredentialWrite)
    }

    async fn post_token(&self, token_uri: &str, form: &[(&str, &str)]) -> OpordResult<TokenResponse> {
        let response = self
            .http
            .post(token_uri)
            .form(form)
            .send()
            .await
            .map_err(|e| OpordError::TokenExchange(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| OpordError::TokenExchange(e.to_string()))?;
        if !status.is_success() {
            return Err(OpordError::TokenExchange(format!("HTTP {status}: {body}")));
        }
        serde_json::from_str(&body).map_err(|e| OpordError::TokenExchange(e.to_string()))
    }

    async fn refresh(&self, mut token: StoredToken, refresh_token: &str) -> OpordResult<StoredToken> {
        let response = self
            .post_token(
                &token.token_uri,
                &[
                    ("grant_type", "refresh_token"),
                    ("refresh_token", refresh_token),
                    ("client_id", token.client_id.as_str()),
                    ("client_secret", token.client_secret.as_str()),
                ],
            )
            .await?;
        token.apply(response, Utc::now());
        self.write_cache(&token).await?;
        tracing::info!(cache = %self.token_cache.display(), "refreshed Google access token");
        Ok(token)
    }

    /// Exchange an authorisation code from the consent redirect and cache the resulting token.
    pub async fn exchange_code(&self, code: &str, redirect_uri: &str) -> OpordResult<StoredToken> {
        let contents = tokio::fs::read_to_string(&self.client_secrets)
            .await
            .map_err(OpordError::CredentialRead)?;
        let secrets = ClientSecrets::parse(&contents)?;
        let response = self
            .post_token(
                &secrets.token_uri,
                &[
                    ("grant_type", "authorization_code"),
                    ("code", code),
                    ("redirect_uri", redirect_uri),
                    ("client_id", secrets.client_id.as_str()),
                    ("client_secret", secrets.client_secret.as_str()),
                ],
            )
            .await?;

        let mut token = StoredToken {
            token: String::new(),
            refresh_token: None,
            token_uri: secrets.token_uri.clone(),
            client_id: secrets.client_id.clone(),
            client_secret: secrets.client_secret.clone(),
            scopes: GOOGLE_SCOPES.iter().map(|s| s.to_string()).collect(),
            expiry: None,
        };
        token.apply(response, Utc::now());
        self.write_cache(&token).await?;
        Ok(token)
    }
}

#[async_trait]
impl CredentialProvider for FileCredentialProvider {
    async fn credential(&self) -> OpordResult<Credential> {
        let _guard = self.refresh_lock.lock().await;

        if let Some(token) = self.read_cache().await? {
            if token.is_fresh(Utc::now()) {
                return Ok(Credential::Ready(AccessToken::new(token.token)));
            }
            if let Some(refresh_token) = token.refresh_token.clone() {
                let token = self.refresh(token, &refresh_token).await?;
                return Ok(Credential::Ready(AccessToken::new(token.token)));
            }
        }

        let secrets_exist = tokio::fs::metadata(&self.client_secrets)
            .await
            .is_ok_and(|meta| meta.is_file());
        if !secrets_exist {
            return Ok(Credential::Unavailable(
                UnavailableReason::CredentialsFileMissing,
            ));
        }
        Ok(Credential::Unavailable(
            UnavailableReason::AuthorisationRequired,
        ))
    }
}
