//! Oracle-specific data types

use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use serde::{Deserialize, Serialize};
use url::Url;

use shared::Perspective;
use crate::error::{OracleError, OracleResult};

/// Which capability an oracle call served
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OracleRole {
    Selector,
    Validator,
}

impl fmt::Display for OracleRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OracleRole::Selector => write!(f, "selector"),
            OracleRole::Validator => write!(f, "validator"),
        }
    }
}

/// Backing service for the selector and validator oracles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OracleMode {
    /// Local Ollama server (`/api/chat`)
    Ollama,
    /// OpenAI-compatible chat completions endpoint
    OpenAi,
    /// Offline random scores, no network
    Random,
}

impl fmt::Display for OracleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OracleMode::Ollama => write!(f, "ollama"),
            OracleMode::OpenAi => write!(f, "openai"),
            OracleMode::Random => write!(f, "random"),
        }
    }
}

impl FromStr for OracleMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ollama" => Ok(OracleMode::Ollama),
            "openai" => Ok(OracleMode::OpenAi),
            "random" => Ok(OracleMode::Random),
            _ => Err(format!("Unknown oracle mode: {s}")),
        }
    }
}

/// Connection and generation settings for the LLM-backed oracles
#[derive(Debug, Clone)]
pub struct OracleSettings {
    pub mode: OracleMode,
    pub model: String,
    pub base_url: Url,
    pub api_key: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub request_timeout: Duration,
    pub seed: Option<u64>,
}

impl OracleSettings {
    pub const DEFAULT_OLLAMA_URL: &'static str = "http://localhost:11434/";
    pub const DEFAULT_OPENAI_URL: &'static str = "https://api.openai.com/v1/";

    /// Defaults for a mode: llama3 on a local Ollama, gpt-4o-mini on OpenAI
    pub fn for_mode(mode: OracleMode) -> Self {
        let (model, base_url) = match mode {
            OracleMode::Ollama | OracleMode::Random => ("llama3", Self::DEFAULT_OLLAMA_URL),
            OracleMode::OpenAi => ("gpt-4o-mini", Self::DEFAULT_OPENAI_URL),
        };

        Self {
            mode,
            model: model.to_string(),
            base_url: Url::parse(base_url).expect("default base URL is valid"),
            api_key: None,
            temperature: 0.2,
            max_tokens: 800,
            request_timeout: Duration::from_secs(120),
            seed: None,
        }
    }

    /// Load settings from the environment (and a `.env` file when present).
    ///
    /// Recognised variables: `ASSESS_ORACLE`, `ASSESS_MODEL`, `OLLAMA_BASE_URL`,
    /// `OPENAI_BASE_URL`, `OPENAI_API_KEY`, `ASSESS_ORACLE_TIMEOUT_SECS`.
    pub fn from_env() -> OracleResult<Self> {
        dotenvy::dotenv().ok();

        let mode = match env::var("ASSESS_ORACLE") {
            Ok(raw) => raw.parse::<OracleMode>().map_err(OracleError::config)?,
            Err(_) => OracleMode::Ollama,
        };

        let mut settings = Self::for_mode(mode);

        if let Ok(model) = env::var("ASSESS_MODEL") {
            settings.model = model;
        }

        let url_var = match mode {
            OracleMode::OpenAi => "OPENAI_BASE_URL",
            OracleMode::Ollama | OracleMode::Random => "OLLAMA_BASE_URL",
        };
        if let Ok(raw) = env::var(url_var) {
            settings.base_url = parse_base_url(&raw)?;
        }

        settings.api_key = env::var("OPENAI_API_KEY").ok().filter(|key| !key.trim().is_empty());

        if let Ok(raw) = env::var("ASSESS_ORACLE_TIMEOUT_SECS") {
            let secs = raw
                .trim()
                .parse::<u64>()
                .map_err(|_| OracleError::config(format!("ASSESS_ORACLE_TIMEOUT_SECS must be an integer, got '{raw}'")))?;
            settings.request_timeout = Duration::from_secs(secs);
        }

        Ok(settings)
    }

    /// Ensure the settings can be used to build a client
    pub fn validate(&self) -> OracleResult<()> {
        if self.model.trim().is_empty() {
            return Err(OracleError::config("model name must not be empty"));
        }
        if self.mode == OracleMode::OpenAi && self.api_key.is_none() {
            return Err(OracleError::config("OPENAI_API_KEY is required for the openai oracle"));
        }
        Ok(())
    }
}

/// Parse a base URL, making sure relative joins keep its path
pub fn parse_base_url(raw: &str) -> OracleResult<Url> {
    let trimmed = raw.trim();
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };
    Url::parse(&with_slash).map_err(|e| OracleError::config(format!("invalid base URL '{raw}': {e}")))
}

/// Everything a validator needs to judge one selector response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CritiqueRequest {
    pub perspective: Perspective,
    pub host_country: String,
    pub profile: String,
    pub score: u8,
    pub reasoning: String,
    pub available_features: Vec<String>,
}

/// Raw completion returned by the backing service
#[derive(Debug, Clone)]
pub struct ProviderResponse {
    pub content: String,
    pub tokens_used: u32,
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub model_used: String,
    pub response_time: Duration,
}

/// Per-role oracle statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OracleStats {
    pub total_requests: u64,
    pub successful_requests: u64,
    pub failed_requests: u64,
    pub total_response_time_ms: u64,
    pub total_tokens: u64,
    pub last_used: Option<u64>, // timestamp
}

impl OracleStats {
    pub fn average_response_time_ms(&self) -> Option<u64> {
        if self.successful_requests == 0 {
            None
        } else {
            Some(self.total_response_time_ms / self.successful_requests)
        }
    }
}
