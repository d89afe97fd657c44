//! Configuration management for Databank.
//!
//! Configuration is merged from several sources, later ones winning:
//! - Built-in defaults
//! - Config file (`.databank/config.yaml` in the workspace, or `DATABANK_CONFIG`)
//! - Environment variables
//! - Command-line flags (`AppConfig::with_overrides`)

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{AppError, AppResult};
use crate::logging::LogFormat;

/// Providers the service knows how to talk to.
pub const KNOWN_PROVIDERS: [&str; 2] = ["gemini", "ollama"];

/// Environment variable holding the Gemini key when no `apiKeyEnv` is configured.
pub const DEFAULT_GEMINI_KEY_ENV: &str = "GOOGLE_GEMINI_API_KEY";

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the workspace root (contains .databank/ and, by default, data/)
    pub workspace: PathBuf,

    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Active LLM provider ("gemini" or "ollama")
    pub provider: String,

    /// Model identifier
    pub model: String,

    /// Explicit API key, takes precedence over provider-specific env vars
    pub api_key: Option<String>,

    /// Endpoint override for the active provider
    pub endpoint: Option<String>,

    /// Directory holding the topic documents; relative paths resolve against the workspace
    pub materials_dir: PathBuf,

    /// File extensions recognized as topic documents
    pub extensions: Vec<String>,

    /// Maximum successful answers per UTC day
    pub daily_limit: u32,

    /// HTTP bind address
    pub bind: String,

    /// Upper bound on a single backend call, in seconds
    pub request_timeout_secs: u64,

    /// Log level override
    pub log_level: Option<String>,

    /// Log output format
    pub log_format: LogFormat,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,

    /// LLM provider configurations
    pub llm: Option<LlmConfig>,
}

/// LLM configuration from config.yaml.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(rename = "activeProvider")]
    pub active_provider: String,

    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
}

/// Provider-specific configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProviderConfig {
    Gemini {
        #[serde(rename = "apiKeyEnv")]
        api_key_env: String,
        model: String,
        endpoint: Option<String>,
    },
    Ollama {
        endpoint: String,
        model: String,
        timeout: Option<u64>,
    },
}

impl ProviderConfig {
    /// Model configured for this provider.
    pub fn model(&self) -> &str {
        match self {
            ProviderConfig::Gemini { model, .. } | ProviderConfig::Ollama { model, .. } => model,
        }
    }
}

/// Full configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigFile {
    llm: Option<LlmConfig>,
    corpus: Option<CorpusSection>,
    quota: Option<QuotaSection>,
    server: Option<ServerSection>,
    logging: Option<LoggingSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CorpusSection {
    path: Option<String>,
    extensions: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct QuotaSection {
    #[serde(rename = "dailyLimit")]
    daily_limit: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ServerSection {
    bind: Option<String>,
    #[serde(rename = "requestTimeoutSecs")]
    request_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingSection {
    level: Option<String>,
    format: Option<String>,
    color: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workspace: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            config_file: None,
            provider: "gemini".to_string(),
            model: "gemini-2.5-flash".to_string(),
            api_key: None,
            endpoint: None,
            materials_dir: PathBuf::from("data"),
            extensions: vec!["md".to_string(), "markdown".to_string(), "txt".to_string()],
            daily_limit: 100,
            bind: "127.0.0.1:3000".to_string(),
            request_timeout_secs: 60,
            log_level: None,
            log_format: LogFormat::Pretty,
            verbose: false,
            no_color: false,
            llm: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from the process environment and defaults.
    ///
    /// Environment variables:
    /// - `DATABANK_WORKSPACE`: Override workspace path
    /// - `DATABANK_CONFIG`: Path to config file
    /// - `DATABANK_PROVIDER`: LLM provider
    /// - `DATABANK_MODEL`: Model identifier
    /// - `DATABANK_API_KEY`: API key
    /// - `DATABANK_MATERIALS`: Topic document directory
    /// - `DATABANK_DAILY_LIMIT`: Daily request limit
    /// - `DATABANK_BIND`: HTTP bind address
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    pub fn load() -> AppResult<Self> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// Load configuration using `lookup` in place of the process environment.
    pub fn load_with<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(workspace) = lookup("DATABANK_WORKSPACE") {
            config.workspace = PathBuf::from(workspace);
        }

        if let Some(config_file) = lookup("DATABANK_CONFIG") {
            config.config_file = Some(PathBuf::from(config_file));
        }

        if !config.workspace.exists() {
            return Err(AppError::Config(format!(
                "Workspace directory does not exist: {:?}",
                config.workspace
            )));
        }

        let config_path = match config.config_file {
            Some(ref cf) => cf.clone(),
            None => config.databank_dir().join("config.yaml"),
        };

        if config_path.exists() {
            config = config.merge_yaml(&config_path)?;
        }

        // Environment variables override YAML config
        if let Some(provider) = lookup("DATABANK_PROVIDER") {
            config.provider = provider;
        }

        if let Some(model) = lookup("DATABANK_MODEL") {
            config.model = model;
        }

        if let Some(materials) = lookup("DATABANK_MATERIALS") {
            config.materials_dir = PathBuf::from(materials);
        }

        if let Some(limit) = lookup("DATABANK_DAILY_LIMIT") {
            config.daily_limit = limit.trim().parse().map_err(|e| {
                AppError::Config(format!("Invalid DATABANK_DAILY_LIMIT {:?}: {}", limit, e))
            })?;
        }

        if let Some(bind) = lookup("DATABANK_BIND") {
            config.bind = bind;
        }

        if let Some(key) = lookup("DATABANK_API_KEY") {
            config.api_key = Some(key);
        }

        if let Some(level) = lookup("RUST_LOG") {
            config.log_level = Some(level);
        }

        if lookup("NO_COLOR").is_some() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge YAML configuration file into this config.
    fn merge_yaml(&self, path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        let mut result = self.clone();

        if let Some(corpus) = config_file.corpus {
            if let Some(path) = corpus.path {
                result.materials_dir = PathBuf::from(path);
            }
            if let Some(extensions) = corpus.extensions {
                result.extensions = extensions;
            }
        }

        if let Some(quota) = config_file.quota {
            if let Some(limit) = quota.daily_limit {
                result.daily_limit = limit;
            }
        }

        if let Some(server) = config_file.server {
            if let Some(bind) = server.bind {
                result.bind = bind;
            }
            if let Some(timeout) = server.request_timeout_secs {
                result.request_timeout_secs = timeout;
            }
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(format) = logging.format {
                result.log_format = LogFormat::parse(&format).ok_or_else(|| {
                    AppError::Config(format!("Unknown log format in {:?}: {}", path, format))
                })?;
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
        }

        if let Some(llm) = config_file.llm {
            result.provider = llm.active_provider.clone();

            if let Some(provider_config) = llm.providers.get(&llm.active_provider) {
                result.model = provider_config.model().to_string();
            }

            result.llm = Some(llm);
        }

        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// Command-line flags take precedence over environment variables and the
    /// config file.
    #[allow(clippy::too_many_arguments)]
    pub fn with_overrides(
        mut self,
        provider: Option<String>,
        model: Option<String>,
        materials_dir: Option<PathBuf>,
        log_level: Option<String>,
        log_format: Option<LogFormat>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(provider) = provider {
            self.provider = provider;
        }

        if let Some(model) = model {
            self.model = model;
        }

        if let Some(materials_dir) = materials_dir {
            self.materials_dir = materials_dir;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if let Some(log_format) = log_format {
            self.log_format = log_format;
        }

        if verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Get the path to the .databank directory.
    pub fn databank_dir(&self) -> PathBuf {
        self.workspace.join(".databank")
    }

    /// Directory holding the topic documents.
    pub fn materials_path(&self) -> PathBuf {
        if self.materials_dir.is_absolute() {
            self.materials_dir.clone()
        } else {
            self.workspace.join(&self.materials_dir)
        }
    }

    /// Get the configuration block for a provider, if one was loaded.
    pub fn get_provider_config(&self, provider: &str) -> Option<&ProviderConfig> {
        self.llm
            .as_ref()
            .and_then(|llm| llm.providers.get(provider))
    }

    /// Endpoint for the provider: explicit override first, then the provider block.
    pub fn provider_endpoint(&self, provider: &str) -> Option<String> {
        if let Some(ref endpoint) = self.endpoint {
            return Some(endpoint.clone());
        }

        match self.get_provider_config(provider)? {
            ProviderConfig::Gemini { endpoint, .. } => endpoint.clone(),
            ProviderConfig::Ollama { endpoint, .. } => Some(endpoint.clone()),
        }
    }

    /// Name of the environment variable holding the provider's API key.
    pub fn api_key_env(&self, provider: &str) -> Option<String> {
        match self.get_provider_config(provider) {
            Some(ProviderConfig::Gemini { api_key_env, .. }) => Some(api_key_env.clone()),
            Some(ProviderConfig::Ollama { .. }) => None,
            None if provider == "gemini" => Some(DEFAULT_GEMINI_KEY_ENV.to_string()),
            None => None,
        }
    }

    /// Resolve API key: explicit key first, then the provider's env var.
    pub fn resolve_api_key(&self, provider: &str) -> Option<String> {
        if let Some(ref key) = self.api_key {
            return Some(key.clone());
        }

        self.api_key_env(provider)
            .and_then(|env_var| std::env::var(env_var).ok())
            .filter(|key| !key.trim().is_empty())
    }

    /// Timeout applied to each backend call.
    ///
    /// An Ollama block's own `timeout` wins over the server-wide setting.
    pub fn request_timeout(&self) -> Duration {
        let secs = match self.get_provider_config(&self.provider) {
            Some(ProviderConfig::Ollama {
                timeout: Some(timeout),
                ..
            }) => *timeout,
            _ => self.request_timeout_secs,
        };
        Duration::from_secs(secs)
    }

    /// Validate configuration.
    ///
    /// A missing API key is deliberately not checked here: the server still
    /// starts and reports the misconfiguration on each answer request.
    pub fn validate(&self) -> AppResult<()> {
        if !KNOWN_PROVIDERS.contains(&self.provider.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown provider: {}. Supported: {}",
                self.provider,
                KNOWN_PROVIDERS.join(", ")
            )));
        }

        if self.daily_limit == 0 {
            return Err(AppError::Config(
                "Daily limit must be a positive integer".to_string(),
            ));
        }

        if self.extensions.is_empty() {
            return Err(AppError::Config(
                "At least one document extension must be configured".to_string(),
            ));
        }

        if self.request_timeout_secs == 0 {
            return Err(AppError::Config(
                "Request timeout must be at least one second".to_string(),
            ));
        }

        self.bind
            .parse::<std::net::SocketAddr>()
            .map_err(|e| AppError::Config(format!("Invalid bind address {}: {}", self.bind, e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.provider, "gemini");
        assert_eq!(config.model, "gemini-2.5-flash");
        assert_eq!(config.daily_limit, 100);
        assert!(!config.verbose);
        assert!(!config.no_color);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_materials_path_relative_to_workspace() {
        let mut config = AppConfig::default();
        config.workspace = PathBuf::from("/srv/databank");
        assert_eq!(config.materials_path(), PathBuf::from("/srv/databank/data"));

        config.materials_dir = PathBuf::from("/var/topics");
        assert_eq!(config.materials_path(), PathBuf::from("/var/topics"));
    }

    #[test]
    fn test_load_with_env_overrides() {
        let temp = TempDir::new().unwrap();
        let workspace = temp.path().to_string_lossy().to_string();
        let config = AppConfig::load_with(lookup_from(&[
            ("DATABANK_WORKSPACE", workspace.as_str()),
            ("DATABANK_PROVIDER", "ollama"),
            ("DATABANK_DAILY_LIMIT", "5"),
            ("DATABANK_API_KEY", "secret"),
            ("NO_COLOR", "1"),
        ]))
        .unwrap();

        assert_eq!(config.provider, "ollama");
        assert_eq!(config.daily_limit, 5);
        assert_eq!(config.resolve_api_key("gemini"), Some("secret".to_string()));
        assert!(config.no_color);
    }

    #[test]
    fn test_load_rejects_bad_limit() {
        let temp = TempDir::new().unwrap();
        let workspace = temp.path().to_string_lossy().to_string();
        let result = AppConfig::load_with(lookup_from(&[
            ("DATABANK_WORKSPACE", workspace.as_str()),
            ("DATABANK_DAILY_LIMIT", "lots"),
        ]));
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_load_missing_workspace() {
        let result = AppConfig::load_with(lookup_from(&[(
            "DATABANK_WORKSPACE",
            "/definitely/not/a/real/workspace",
        )]));
        assert!(result.is_err());
    }

    #[test]
    fn test_merge_yaml_file() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join(".databank");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join("config.yaml"),
            r#"
llm:
  activeProvider: ollama
  providers:
    ollama:
      endpoint: http://gpu-box:11434
      model: qwen2.5
      timeout: 15
    gemini:
      apiKeyEnv: DATABANK_TEST_UNSET_KEY_VAR
      model: gemini-2.5-pro
corpus:
  path: topics
  extensions: [md]
quota:
  dailyLimit: 7
server:
  bind: 0.0.0.0:8080
logging:
  level: warn
  format: json
  color: false
"#,
        )
        .unwrap();

        let workspace = temp.path().to_string_lossy().to_string();
        let config =
            AppConfig::load_with(lookup_from(&[("DATABANK_WORKSPACE", workspace.as_str())]))
                .unwrap();

        assert_eq!(config.provider, "ollama");
        assert_eq!(config.model, "qwen2.5");
        assert_eq!(config.daily_limit, 7);
        assert_eq!(config.bind, "0.0.0.0:8080");
        assert_eq!(config.extensions, vec!["md".to_string()]);
        assert_eq!(config.materials_path(), temp.path().join("topics"));
        assert_eq!(config.log_level, Some("warn".to_string()));
        assert_eq!(config.log_format, LogFormat::Json);
        assert!(config.no_color);
        assert_eq!(config.request_timeout(), Duration::from_secs(15));
        assert_eq!(
            config.provider_endpoint("ollama"),
            Some("http://gpu-box:11434".to_string())
        );
        assert_eq!(
            config.api_key_env("gemini"),
            Some("DATABANK_TEST_UNSET_KEY_VAR".to_string())
        );
        assert_eq!(config.resolve_api_key("gemini"), None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_with_overrides() {
        let config = AppConfig::default();
        let overridden = config.with_overrides(
            Some("ollama".to_string()),
            Some("llama3.2".to_string()),
            Some(PathBuf::from("materials")),
            None,
            Some(LogFormat::Json),
            true,
            false,
        );

        assert_eq!(overridden.provider, "ollama");
        assert_eq!(overridden.model, "llama3.2");
        assert_eq!(overridden.materials_dir, PathBuf::from("materials"));
        assert_eq!(overridden.log_format, LogFormat::Json);
        assert!(overridden.verbose);
        assert_eq!(overridden.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_default_gemini_key_env() {
        let config = AppConfig::default();
        assert_eq!(
            config.api_key_env("gemini"),
            Some(DEFAULT_GEMINI_KEY_ENV.to_string())
        );
        assert_eq!(config.api_key_env("ollama"), None);
    }

    #[test]
    fn test_validate_unknown_provider() {
        let mut config = AppConfig::default();
        config.provider = "unknown".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_zero_limit() {
        let mut config = AppConfig::default();
        config.daily_limit = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_bad_bind() {
        let mut config = AppConfig::default();
        config.bind = "not-an-address".to_string();
        assert!(config.validate().is_err());
    }
}
