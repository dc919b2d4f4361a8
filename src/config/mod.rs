use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::OnceLock;

use crate::error::{ConfigError, ConfigResult};

/// Default name of the file holding the LLM provider key.
pub const DEFAULT_KEY_FILE: &str = "llmkey";

static GLOBAL: OnceLock<Config> = OnceLock::new();

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub langbase: LangbaseConfig,
    pub logging: LoggingConfig,
    pub request: RequestConfig,
    pub pipes: PipeConfig,
    pub model: ModelConfig,
    pub driver: DriverConfig,
}

/// Langbase API configuration
#[derive(Clone)]
pub struct LangbaseConfig {
    pub api_key: String,
    pub base_url: String,
}

impl fmt::Debug for LangbaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LangbaseConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

/// Log output format
#[derive(Debug, Clone, PartialEq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// HTTP request configuration
#[derive(Debug, Clone)]
pub struct RequestConfig {
    pub timeout_ms: u64,
}

/// Langbase pipe names for the two generators
#[derive(Debug, Clone)]
pub struct PipeConfig {
    pub step: String,
    pub answer: String,
}

/// Model settings applied when the pipes are created
#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
}

/// Chain driver limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverConfig {
    /// The step loop runs while `depth <= max_depth`, so up to
    /// `max_depth + 1` step calls are made.
    pub max_depth: usize,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// The API key is read from the file named by `LLM_KEY_FILE`
    /// (default `llmkey`); a missing or empty file is fatal.
    pub fn from_env() -> ConfigResult<Self> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let key_file = env::var("LLM_KEY_FILE").unwrap_or_else(|_| DEFAULT_KEY_FILE.to_string());

        let langbase = LangbaseConfig {
            api_key: read_credential(Path::new(&key_file))?,
            base_url: env::var("LANGBASE_BASE_URL")
                .unwrap_or_else(|_| "https://api.langbase.com".to_string()),
        };

        let logging = LoggingConfig {
            level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            format: match env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string())
                .to_lowercase()
                .as_str()
            {
                "json" => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
        };

        let defaults = RequestConfig::default();
        let request = RequestConfig {
            timeout_ms: parse_env("REQUEST_TIMEOUT_MS", defaults.timeout_ms)?,
        };

        let pipes = PipeConfig {
            step: env::var("PIPE_STEP").unwrap_or_else(|_| "cot-step-v1".to_string()),
            answer: env::var("PIPE_ANSWER").unwrap_or_else(|_| "cot-answer-v1".to_string()),
        };

        let defaults = ModelConfig::default();
        let model = ModelConfig {
            model: env::var("LLM_MODEL").unwrap_or(defaults.model),
            temperature: parse_env("LLM_TEMPERATURE", defaults.temperature)?,
            max_tokens: parse_env("LLM_MAX_TOKENS", defaults.max_tokens)?,
        };

        let driver = DriverConfig {
            max_depth: parse_env("MAX_DEPTH", DriverConfig::default().max_depth)?,
        };

        Ok(Config {
            langbase,
            logging,
            request,
            pipes,
            model,
            driver,
        })
    }
}

/// Install `config` as the process-wide configuration.
///
/// Succeeds once; later calls fail with [`ConfigError::AlreadyInitialized`].
pub fn init_global(config: Config) -> ConfigResult<&'static Config> {
    GLOBAL
        .set(config)
        .map_err(|_| ConfigError::AlreadyInitialized)?;
    GLOBAL.get().ok_or(ConfigError::AlreadyInitialized)
}

/// The process-wide configuration, if [`init_global`] has run.
pub fn global() -> Option<&'static Config> {
    GLOBAL.get()
}

/// Read a secret from `path`, trimming surrounding whitespace.
pub fn read_credential(path: &Path) -> ConfigResult<String> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::CredentialFile {
        path: path.to_path_buf(),
        source,
    })?;

    let key = raw.trim();
    if key.is_empty() {
        return Err(ConfigError::EmptyCredential {
            path: PathBuf::from(path),
        });
    }
    Ok(key.to_string())
}

fn parse_env<T>(key: &str, default: T) -> ConfigResult<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match env::var(key) {
        Ok(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key: key.to_string(),
            message: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self { timeout_ms: 30000 }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model: "openai:gpt-4.1-mini".to_string(),
            temperature: 0.0,
            max_tokens: 2000,
        }
    }
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self { max_depth: 5 }
    }
}
