//! Environment settings and knowledge-base loading for unimatch.

mod kb;

pub use kb::{CalibratorParams, KnowledgeBase, ScoreDistribution};

// ─────────────────────────────────────────────────────────────────────────────
// Error
// ─────────────────────────────────────────────────────────────────────────────

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid port: {0}")]
    InvalidPort(String),
}

// ─────────────────────────────────────────────────────────────────────────────
// Settings
// ─────────────────────────────────────────────────────────────────────────────

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_KB_DIR: &str = "kb";
const DEFAULT_LLM_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_LLM_MODEL: &str = "gpt-4o-mini";

/// Connection settings for the OpenAI-compatible scorer.
#[derive(Debug, Clone, PartialEq)]
pub struct LlmSettings {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

/// Runtime settings resolved from the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub kb_dir: String,
    /// Whether the LLM scorer is requested. It is still only built when an API key exists.
    pub use_llm: bool,
    pub llm: LlmSettings,
}

impl Settings {
    /// Reads settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let port = match lookup("UNIMATCH_PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(raw.clone()))?,
            None => DEFAULT_PORT,
        };

        let use_llm = !matches!(get("USE_LLM", "1").as_str(), "0" | "false" | "False");

        Ok(Self {
            host: get("UNIMATCH_HOST", DEFAULT_HOST),
            port,
            kb_dir: get("UNIMATCH_KB_DIR", DEFAULT_KB_DIR),
            use_llm,
            llm: LlmSettings {
                api_key: get("OPENAI_API_KEY", ""),
                base_url: get("OPENAI_BASE_URL", DEFAULT_LLM_BASE_URL),
                model: get("LLM_MODEL", DEFAULT_LLM_MODEL),
            },
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
