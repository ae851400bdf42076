//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into the enrichment and
//! export adapters. Nothing in this crate reads process-wide environment variables during request
//! handling; binaries hand a lookup function to [`OpordConfig::from_env_values`] instead.

use crate::constants::{
    DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_LLM_ENDPOINT, DEFAULT_LLM_MODEL, DEFAULT_TOKEN_FILE,
};
use crate::{OpordError, OpordResult};
use std::path::{Path, PathBuf};

pub const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_OPENAI_MODEL: &str = "OPENAI_MODEL";
pub const ENV_OPENAI_BASE_URL: &str = "OPENAI_BASE_URL";
pub const ENV_HTTP_TIMEOUT_SECS: &str = "OPORD_HTTP_TIMEOUT_SECS";
pub const ENV_GOOGLE_CREDENTIALS_FILE: &str = "GOOGLE_CREDENTIALS_FILE";
pub const ENV_GOOGLE_TOKEN_FILE: &str = "GOOGLE_TOKEN_FILE";
pub const ENV_GOOGLE_SLIDES_TEMPLATE_ID: &str = "GOOGLE_SLIDES_TEMPLATE_ID";

/// Language-model settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AiConfig {
    api_key: Option<String>,
    model: String,
    endpoint: String,
    timeout_secs: u64,
}

impl AiConfig {
    pub fn new(
        api_key: Option<String>,
        model: String,
        endpoint: String,
        timeout_secs: u64,
    ) -> OpordResult<Self> {
        if model.trim().is_empty() {
            return Err(OpordError::InvalidInput("model cannot be empty".into()));
        }
        Ok(Self {
            api_key,
            model,
            endpoint,
            timeout_secs,
        })
    }

    /// No credential; enrichment becomes the identity.
    pub fn disabled() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_LLM_MODEL.to_string(),
            endpoint: DEFAULT_LLM_ENDPOINT.to_string(),
            timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }
}

/// Presentation export settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlidesConfig {
    credentials_file: Option<PathBuf>,
    token_file: PathBuf,
    template_id: Option<String>,
    timeout_secs: u64,
}

impl SlidesConfig {
    pub fn new(
        credentials_file: Option<PathBuf>,
        token_file: PathBuf,
        template_id: Option<String>,
        timeout_secs: u64,
    ) -> Self {
        Self {
            credentials_file,
            token_file,
            template_id,
            timeout_secs,
        }
    }

    /// Export not configured at all.
    pub fn disabled() -> Self {
        Self::new(
            None,
            PathBuf::from(DEFAULT_TOKEN_FILE),
            None,
            DEFAULT_HTTP_TIMEOUT_SECS,
        )
    }

    /// True when a client-secrets file has been named. The file may still be missing.
    pub fn is_configured(&self) -> bool {
        self.credentials_file.is_some()
    }

    pub fn credentials_file(&self) -> Option<&Path> {
        self.credentials_file.as_deref()
    }

    pub fn token_file(&self) -> &Path {
        &self.token_file
    }

    pub fn template_id(&self) -> Option<&str> {
        self.template_id.as_deref()
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }
}

/// Everything the core needs, resolved at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OpordConfig {
    pub ai: AiConfig,
    pub slides: SlidesConfig,
}

impl OpordConfig {
    /// Resolve configuration from a variable lookup.
    ///
    /// Binaries pass `|key| std::env::var(key).ok()`; tests pass a map.
    pub fn from_env_values<F>(lookup: F) -> OpordResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let timeout_secs = timeout_secs_from_env_value(lookup(ENV_HTTP_TIMEOUT_SECS))?;

        let ai = AiConfig::new(
            api_key_from_env_value(lookup(ENV_OPENAI_API_KEY)),
            model_from_env_value(lookup(ENV_OPENAI_MODEL)),
            endpoint_from_env_value(lookup(ENV_OPENAI_BASE_URL)),
            timeout_secs,
        )?;

        let slides = SlidesConfig::new(
            non_blank(lookup(ENV_GOOGLE_CREDENTIALS_FILE)).map(PathBuf::from),
            non_blank(lookup(ENV_GOOGLE_TOKEN_FILE))
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_TOKEN_FILE)),
            non_blank(lookup(ENV_GOOGLE_SLIDES_TEMPLATE_ID)),
            timeout_secs,
        );

        Ok(Self { ai, slides })
    }
}

impl Default for OpordConfig {
    fn default() -> Self {
        Self {
            ai: AiConfig::disabled(),
            slides: SlidesConfig::disabled(),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse the API key. Blank keys and unedited `your_...` placeholders count as absent.
pub fn api_key_from_env_value(value: Option<String>) -> Option<String> {
    non_blank(value).filter(|key| !key.starts_with("your_"))
}

/// Parse the model name, falling back to the default model.
pub fn model_from_env_value(value: Option<String>) -> String {
    non_blank(value).unwrap_or_else(|| DEFAULT_LLM_MODEL.to_string())
}

/// Build the chat-completions endpoint from an optional API base URL.
///
/// `https://host/v1` becomes `https://host/v1/chat/completions`.
pub fn endpoint_from_env_value(value: Option<String>) -> String {
    match non_blank(value) {
        Some(base) => format!("{}/chat/completions", base.trim_end_matches('/')),
        None => DEFAULT_LLM_ENDPOINT.to_string(),
    }
}

/// Parse the HTTP timeout in seconds. Zero and non-numeric values are rejected.
pub fn timeout_secs_from_env_value(value: Option<String>) -> OpordResult<u64> {
    let Some(value) = non_blank(value) else {
        return Ok(DEFAULT_HTTP_TIMEOUT_SECS);
    };
    match value.parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err(OpordError::InvalidInput(format!(
            "{ENV_HTTP_TIMEOUT_SECS} must be a positive integer, got {value:?}"
        ))),
    }
}
