//! Configuration for AnthropicEngine.

use brain_core::BrainError;
use std::env;
use std::path::Path;
use std::time::Duration;

/// Default system prompt file name.
pub const DEFAULT_PROMPT_FILE: &str = "SYSTEM_PROMPT.md";

/// Default Messages API version header.
const DEFAULT_API_VERSION: &str = "2023-06-01";

/// Configuration for AnthropicEngine.
#[derive(Debug, Clone)]
pub struct AnthropicConfig {
    /// API base URL.
    pub api_url: String,

    /// API key for authentication.
    pub api_key: String,

    /// Value of the `anthropic-version` header.
    pub api_version: String,

    /// Optional system prompt.
    pub system_prompt: Option<String>,

    /// Maximum tokens for response.
    pub max_tokens: u32,

    /// Temperature for generation (0.0 - 1.0).
    pub temperature: Option<f32>,

    /// HTTP client timeout. Bounds a hung engine call.
    pub request_timeout: Duration,
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.anthropic.com".to_string(),
            api_key: String::new(),
            api_version: DEFAULT_API_VERSION.to_string(),
            system_prompt: None,
            max_tokens: 2048,
            temperature: None,
            request_timeout: Duration::from_secs(120),
        }
    }
}

impl AnthropicConfig {
    /// Create configuration from environment variables.
    ///
    /// Required environment variables:
    /// - `ANTHROPIC_API_KEY` - API key for authentication
    ///
    /// Optional environment variables:
    /// - `ANTHROPIC_API_URL` - API URL (default: https://api.anthropic.com)
    /// - `ANTHROPIC_SYSTEM_PROMPT` - System prompt (overrides prompt file)
    /// - `ANTHROPIC_PROMPT_FILE` - Path to system prompt file (default: SYSTEM_PROMPT.md)
    /// - `ANTHROPIC_MAX_TOKENS` - Max tokens (default: 2048)
    /// - `ANTHROPIC_TEMPERATURE` - Temperature (default: unset)
    /// - `ANTHROPIC_TIMEOUT_SECS` - HTTP timeout (default: 120)
    ///
    /// System prompt priority:
    /// 1. `ANTHROPIC_SYSTEM_PROMPT` env var (if set)
    /// 2. Contents of prompt file (if exists)
    /// 3. None
    pub fn from_env() -> Result<Self, BrainError> {
        let api_key = env::var("ANTHROPIC_API_KEY")
            .map_err(|_| BrainError::Configuration("ANTHROPIC_API_KEY not set".to_string()))?;

        let defaults = Self::default();

        let api_url = env::var("ANTHROPIC_API_URL").unwrap_or(defaults.api_url);

        // System prompt: env var takes precedence, then try loading from file
        let system_prompt = if let Ok(prompt) = env::var("ANTHROPIC_SYSTEM_PROMPT") {
            Some(prompt)
        } else {
            let prompt_file = env::var("ANTHROPIC_PROMPT_FILE")
                .unwrap_or_else(|_| DEFAULT_PROMPT_FILE.to_string());
            load_prompt_file(&prompt_file)
        };

        let max_tokens = env::var("ANTHROPIC_MAX_TOKENS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.max_tokens);

        let temperature = env::var("ANTHROPIC_TEMPERATURE")
            .ok()
            .and_then(|v| v.parse().ok());

        let request_timeout = env::var("ANTHROPIC_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.request_timeout);

        Ok(Self {
            api_url,
            api_key,
            api_version: defaults.api_version,
            system_prompt,
            max_tokens,
            temperature,
            request_timeout,
        })
    }

    /// Create a new config builder.
    pub fn builder() -> AnthropicConfigBuilder {
        AnthropicConfigBuilder::default()
    }
}

/// Builder for AnthropicConfig.
#[derive(Debug, Default)]
pub struct AnthropicConfigBuilder {
    config: AnthropicConfig,
}

impl AnthropicConfigBuilder {
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = key.into();
        self
    }

    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_url = url.into();
        self
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = Some(prompt.into());
        self
    }

    pub fn max_tokens(mut self, tokens: u32) -> Self {
        self.config.max_tokens = tokens;
        self
    }

    pub fn temperature(mut self, temp: f32) -> Self {
        self.config.temperature = Some(temp);
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    /// Load system prompt from a file.
    ///
    /// If the file exists and is non-empty, sets the system prompt.
    pub fn load_prompt_file(mut self, path: impl AsRef<Path>) -> Self {
        if let Some(prompt) = load_prompt_file(path) {
            self.config.system_prompt = Some(prompt);
        }
        self
    }

    pub fn build(self) -> AnthropicConfig {
        self.config
    }
}

/// Load a prompt file, returning None if not found or empty.
fn load_prompt_file(path: impl AsRef<Path>) -> Option<String> {
    match std::fs::read_to_string(path.as_ref()) {
        Ok(content) => {
            let trimmed = content.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Err(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AnthropicConfig::default();

        assert_eq!(config.api_url, "https://api.anthropic.com");
        assert!(config.api_key.is_empty());
        assert_eq!(config.api_version, "2023-06-01");
        assert!(config.system_prompt.is_none());
        assert_eq!(config.max_tokens, 2048);
        assert!(config.temperature.is_none());
    }

    #[test]
    fn test_builder_all_options() {
        let config = AnthropicConfig::builder()
            .api_key("my-key")
            .api_url("http://localhost:8080")
            .system_prompt("You are an operations assistant")
            .max_tokens(512)
            .temperature(0.2)
            .request_timeout(Duration::from_secs(5))
            .build();

        assert_eq!(config.api_key, "my-key");
        assert_eq!(config.api_url, "http://localhost:8080");
        assert_eq!(
            config.system_prompt.as_deref(),
            Some("You are an operations assistant")
        );
        assert_eq!(config.max_tokens, 512);
        assert_eq!(config.temperature, Some(0.2));
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_builder_missing_prompt_file_keeps_none() {
        let config = AnthropicConfig::builder()
            .load_prompt_file("/nonexistent/prompt.md")
            .build();
        assert!(config.system_prompt.is_none());
    }

    // Env vars are process-global; keep every scenario in one test.
    #[test]
    fn test_from_env_scenarios() {
        use std::sync::Mutex;
        static ENV_LOCK: Mutex<()> = Mutex::new(());
        let _guard = ENV_LOCK.lock().unwrap();

        fn clear_all_vars() {
            for key in [
                "ANTHROPIC_API_KEY",
                "ANTHROPIC_API_URL",
                "ANTHROPIC_SYSTEM_PROMPT",
                "ANTHROPIC_PROMPT_FILE",
                "ANTHROPIC_MAX_TOKENS",
                "ANTHROPIC_TEMPERATURE",
                "ANTHROPIC_TIMEOUT_SECS",
            ] {
                std::env::remove_var(key);
            }
        }

        // Missing API key is a configuration error
        clear_all_vars();
        match AnthropicConfig::from_env() {
            Err(BrainError::Configuration(msg)) => assert!(msg.contains("ANTHROPIC_API_KEY")),
            other => panic!("Expected Configuration error, got {:?}", other),
        }

        // Only API key set, defaults used
        clear_all_vars();
        std::env::set_var("ANTHROPIC_API_KEY", "test-env-key");
        std::env::set_var("ANTHROPIC_PROMPT_FILE", "/nonexistent/prompt.md");
        let config = AnthropicConfig::from_env().unwrap();
        assert_eq!(config.api_key, "test-env-key");
        assert_eq!(config.api_url, "https://api.anthropic.com");
        assert!(config.system_prompt.is_none());
        assert_eq!(config.max_tokens, 2048);

        // All vars set
        clear_all_vars();
        std::env::set_var("ANTHROPIC_API_KEY", "full-key");
        std::env::set_var("ANTHROPIC_API_URL", "http://localhost:9000");
        std::env::set_var("ANTHROPIC_SYSTEM_PROMPT", "Be brief");
        std::env::set_var("ANTHROPIC_MAX_TOKENS", "1024");
        std::env::set_var("ANTHROPIC_TEMPERATURE", "0.3");
        std::env::set_var("ANTHROPIC_TIMEOUT_SECS", "10");
        let config = AnthropicConfig::from_env().unwrap();
        assert_eq!(config.api_url, "http://localhost:9000");
        assert_eq!(config.system_prompt.as_deref(), Some("Be brief"));
        assert_eq!(config.max_tokens, 1024);
        assert_eq!(config.temperature, Some(0.3));
        assert_eq!(config.request_timeout, Duration::from_secs(10));

        clear_all_vars();
    }
}
