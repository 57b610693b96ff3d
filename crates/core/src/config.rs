//! Configuration management for quizrag.
//!
//! This module handles loading and merging configuration from multiple sources:
//! - Defaults
//! - Config file (.quizrag/config.yaml)
//! - Environment variables
//! - Command-line flags
//!
//! The resulting [`AppConfig`] is passed explicitly to whatever needs it; the
//! model gateway receives its credential from here rather than reading the
//! environment itself.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};
use crate::question::Language;

/// Default generation endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";

/// Default generation model.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Environment variable holding the provider credential unless configured otherwise.
pub const DEFAULT_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the workspace root (contains .quizrag/)
    pub workspace: PathBuf,

    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Default language for prompts and storage
    pub language: Language,

    /// Generation endpoint settings
    pub gateway: GatewaySettings,

    /// Resolved provider credential
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Simulated agent settings (prompt labels only)
    pub agent: AgentConfig,

    /// Per-language storage paths for saved tests
    pub storage: BTreeMap<Language, PathBuf>,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,
}

/// Settings of the external generation endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GatewaySettings {
    /// Model that actually serves the calls
    pub model: String,

    /// Base URL of the generation API
    pub endpoint: String,

    /// Environment variable to read the credential from
    pub api_key_env: String,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
        }
    }
}

/// Which provider the simulated agent pretends to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimulatedProvider {
    /// Local Ollama runtime
    #[default]
    Ollama,
    /// External hosted API
    External,
}

/// Agent settings shown to the model as configuration labels.
///
/// None of these change the actual gateway call; they only alter the
/// answer prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AgentConfig {
    pub provider: SimulatedProvider,
    pub ollama_url: String,
    pub selected_model: String,
    pub external_model: Option<String>,
    pub temperature: f32,
    pub top_k: u32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            provider: SimulatedProvider::Ollama,
            ollama_url: "http://localhost:11434".to_string(),
            selected_model: "llama3".to_string(),
            external_model: Some("gpt-4o".to_string()),
            temperature: 0.7,
            top_k: 40,
        }
    }
}

/// Full configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigFile {
    language: Option<Language>,
    gateway: Option<GatewaySettings>,
    agent: Option<AgentConfig>,
    storage: Option<BTreeMap<Language, PathBuf>>,
    logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingConfig {
    level: Option<String>,
    color: Option<bool>,
}

fn default_storage() -> BTreeMap<Language, PathBuf> {
    Language::ALL
        .iter()
        .map(|lang| (*lang, PathBuf::from(format!("./data/{}/tests.json", lang.code()))))
        .collect()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workspace: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            config_file: None,
            language: Language::Es,
            gateway: GatewaySettings::default(),
            api_key: None,
            agent: AgentConfig::default(),
            storage: default_storage(),
            log_level: None,
            verbose: false,
            no_color: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, config file and environment.
    ///
    /// Environment variables:
    /// - `QUIZRAG_WORKSPACE`: Override workspace path
    /// - `QUIZRAG_CONFIG`: Path to config file
    /// - `QUIZRAG_MODEL`: Generation model
    /// - `QUIZRAG_LANGUAGE`: Default language code
    /// - `QUIZRAG_API_KEY`: Provider credential (wins over `gateway.apiKeyEnv`)
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    ///
    /// # Example
    /// ```no_run
    /// use quizrag_core::config::AppConfig;
    ///
    /// let config = AppConfig::load().expect("Failed to load config");
    /// println!("Workspace: {:?}", config.workspace);
    /// ```
    pub fn load() -> AppResult<Self> {
        Self::load_with(None, None)
    }

    /// Load configuration, preferring the given workspace and config file
    /// over their environment variables.
    pub fn load_with(workspace: Option<PathBuf>, config_file: Option<PathBuf>) -> AppResult<Self> {
        let mut config = Self::default();

        if let Some(workspace) = workspace.or_else(|| env_path("QUIZRAG_WORKSPACE")) {
            config.workspace = workspace;
        }

        config.config_file = config_file.or_else(|| env_path("QUIZRAG_CONFIG"));

        if !config.workspace.exists() {
            return Err(AppError::Config(format!(
                "Workspace directory does not exist: {:?}",
                config.workspace
            )));
        }

        let config_path = match config.config_file {
            Some(ref cf) => cf.clone(),
            None => config.quizrag_dir().join("config.yaml"),
        };

        if config_path.exists() {
            config = config.merge_yaml(&config_path)?;
        } else if config.config_file.is_some() {
            return Err(AppError::Config(format!(
                "Config file does not exist: {:?}",
                config_path
            )));
        }

        // Environment variables override YAML config
        if let Ok(model) = std::env::var("QUIZRAG_MODEL") {
            config.gateway.model = model;
        }

        if let Ok(language) = std::env::var("QUIZRAG_LANGUAGE") {
            config.language = Language::from_code(&language);
        }

        config.api_key = config.resolve_api_key();

        if let Ok(level) = std::env::var("RUST_LOG") {
            config.log_level = Some(level);
        }

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge a YAML configuration file into this config.
    fn merge_yaml(&self, path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        self.merge_yaml_str(&contents)
            .map_err(|e| AppError::Config(format!("Failed to parse config file {:?}: {}", path, e)))
    }

    fn merge_yaml_str(&self, contents: &str) -> AppResult<Self> {
        let config_file: ConfigFile = serde_yaml::from_str(contents)?;
        let mut result = self.clone();

        if let Some(language) = config_file.language {
            result.language = language;
        }

        if let Some(gateway) = config_file.gateway {
            result.gateway = gateway;
        }

        if let Some(agent) = config_file.agent {
            result.agent = agent;
        }

        // Storage paths merge per language
        if let Some(storage) = config_file.storage {
            result.storage.extend(storage);
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
        }

        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// CLI flags take precedence over environment variables and the file.
    pub fn with_overrides(
        mut self,
        language: Option<Language>,
        model: Option<String>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(language) = language {
            self.language = language;
        }

        if let Some(model) = model {
            self.gateway.model = model;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
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

    /// Get the path to the .quizrag directory.
    pub fn quizrag_dir(&self) -> PathBuf {
        self.workspace.join(".quizrag")
    }

    /// Storage file for saved tests in the given language.
    ///
    /// Relative paths resolve against the workspace.
    pub fn storage_path(&self, language: Language) -> PathBuf {
        let path = self
            .storage
            .get(&language)
            .cloned()
            .unwrap_or_else(|| PathBuf::from(format!("./data/{}/tests.json", language.code())));

        if path.is_absolute() {
            path
        } else {
            self.workspace.join(path)
        }
    }

    /// Resolve the provider credential.
    ///
    /// `QUIZRAG_API_KEY` wins; otherwise the variable named by
    /// `gateway.api_key_env` is read. Blank values count as missing.
    pub fn resolve_api_key(&self) -> Option<String> {
        std::env::var("QUIZRAG_API_KEY")
            .ok()
            .or_else(|| std::env::var(&self.gateway.api_key_env).ok())
            .filter(|key| !key.trim().is_empty())
    }

    /// Validate the configuration.
    ///
    /// A missing credential is not a configuration error: the gateway reports
    /// it per call so offline commands keep working.
    pub fn validate(&self) -> AppResult<()> {
        if self.gateway.model.trim().is_empty() {
            return Err(AppError::Config("Gateway model cannot be empty".to_string()));
        }

        let endpoint = &self.gateway.endpoint;
        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            return Err(AppError::Config(format!(
                "Invalid gateway endpoint: {}. Expected an http(s) URL",
                endpoint
            )));
        }

        if !(0.0..=2.0).contains(&self.agent.temperature) {
            return Err(AppError::Config(format!(
                "Temperature {} is outside 0.0-2.0",
                self.agent.temperature
            )));
        }

        if self.agent.top_k == 0 {
            return Err(AppError::Config("topK must be greater than 0".to_string()));
        }

        Ok(())
    }
}

fn env_path(name: &str) -> Option<PathBuf> {
    std::env::var(name).ok().map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.gateway.model, DEFAULT_MODEL);
        assert_eq!(config.agent.selected_model, "llama3");
        assert_eq!(config.agent.provider, SimulatedProvider::Ollama);
        assert_eq!(config.language, Language::Es);
        assert_eq!(config.storage.len(), 3);
        assert!(!config.verbose);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_storage_path_is_language_scoped() {
        let mut config = AppConfig::default();
        config.workspace = PathBuf::from("/tmp/ws");
        assert_eq!(
            config.storage_path(Language::Eu),
            PathBuf::from("/tmp/ws/./data/eu/tests.json")
        );

        config
            .storage
            .insert(Language::En, PathBuf::from("/var/quizrag/en.json"));
        assert_eq!(
            config.storage_path(Language::En),
            PathBuf::from("/var/quizrag/en.json")
        );
    }

    #[test]
    fn test_merge_yaml() {
        let yaml = r#"
language: en
gateway:
  model: gemini-2.0-flash
agent:
  provider: external
  externalModel: claude-sonnet
  temperature: 0.2
storage:
  eu: /data/eu.json
logging:
  level: debug
  color: false
"#;
        let merged = AppConfig::default().merge_yaml_str(yaml).unwrap();
        assert_eq!(merged.language, Language::En);
        assert_eq!(merged.gateway.model, "gemini-2.0-flash");
        // Unset gateway fields keep their defaults
        assert_eq!(merged.gateway.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(merged.agent.provider, SimulatedProvider::External);
        assert_eq!(merged.agent.external_model.as_deref(), Some("claude-sonnet"));
        assert_eq!(merged.agent.top_k, 40);
        assert_eq!(merged.storage[&Language::Eu], PathBuf::from("/data/eu.json"));
        assert_eq!(merged.storage.len(), 3);
        assert_eq!(merged.log_level.as_deref(), Some("debug"));
        assert!(merged.no_color);
    }

    #[test]
    fn test_merge_yaml_file_from_disk() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "agent:\n  selectedModel: mistral\n").unwrap();

        let merged = AppConfig::default().merge_yaml(&path).unwrap();
        assert_eq!(merged.agent.selected_model, "mistral");

        std::fs::write(&path, "agent: [not, a, map]\n").unwrap();
        assert!(matches!(
            AppConfig::default().merge_yaml(&path),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn test_with_overrides() {
        let config = AppConfig::default().with_overrides(
            Some(Language::Eu),
            Some("gemini-pro".to_string()),
            None,
            true,
            false,
        );

        assert_eq!(config.language, Language::Eu);
        assert_eq!(config.gateway.model, "gemini-pro");
        assert!(config.verbose);
        assert_eq!(config.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = AppConfig::default();
        config.agent.temperature = 3.5;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.gateway.endpoint = "ftp://example.com".to_string();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.agent.top_k = 0;
        assert!(config.validate().is_err());
    }
}
