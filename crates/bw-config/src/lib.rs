//! Configuration management for bw.
//!
//! Credentials and renderer settings are resolved once, up front, into an
//! immutable [`Config`]. Nothing downstream reads the environment.
//!
//! ## Sources (highest precedence first)
//!
//! 1. CLI settings ([`CliSettings`])
//! 2. Environment: process variables over a `.env` file ([`EnvVars`])
//! 3. `bw.toml` (explicit path or auto-discovered in parent directories)
//! 4. Built-in defaults (domain `backlog.jp`, renderer `mmdc`)
//!
//! ## Environment Variable Expansion
//!
//! String values in `bw.toml` support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `backlog.space_id`
//! - `backlog.api_key`
//! - `backlog.domain`
//! - `mermaid.command`

mod env;
mod expand;

pub use env::EnvVars;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "bw.toml";

/// Default Backlog domain.
const DEFAULT_DOMAIN: &str = "backlog.jp";

/// Environment variable holding the Backlog space ID.
pub const SPACE_ID_VAR: &str = "BACKLOG_SPACE_ID";
/// Environment variable holding the Backlog API key.
pub const API_KEY_VAR: &str = "BACKLOG_API_KEY";
/// Environment variable holding the Backlog domain.
pub const DOMAIN_VAR: &str = "BACKLOG_DOMAIN";

/// CLI settings that override environment and configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override Backlog space ID.
    pub space_id: Option<String>,
    /// Override Backlog API key.
    pub api_key: Option<String>,
    /// Override Backlog domain.
    pub domain: Option<String>,
    /// Explicit dotenv file.
    pub env_file: Option<PathBuf>,
}

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backlog credentials as written in `bw.toml`.
    backlog: BacklogConfigRaw,
    /// Diagram renderer configuration.
    pub mermaid: MermaidConfig,

    /// Resolved Backlog settings (set after loading).
    #[serde(skip)]
    pub backlog_resolved: BacklogSettings,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Raw Backlog configuration as parsed from TOML.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct BacklogConfigRaw {
    space_id: Option<String>,
    api_key: Option<String>,
    domain: Option<String>,
}

/// Backlog settings after layering, possibly incomplete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BacklogSettings {
    /// Space ID (subdomain), e.g. `acme` for `acme.backlog.jp`.
    pub space_id: Option<String>,
    /// API key.
    pub api_key: Option<String>,
    /// Backlog domain.
    pub domain: String,
}

impl Default for BacklogSettings {
    fn default() -> Self {
        Self {
            space_id: None,
            api_key: None,
            domain: DEFAULT_DOMAIN.to_owned(),
        }
    }
}

/// Validated Backlog connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BacklogConfig {
    /// Space ID (subdomain).
    pub space_id: String,
    /// API key.
    pub api_key: String,
    /// Backlog domain, e.g. `backlog.jp` or `backlog.com`.
    pub domain: String,
}

impl BacklogConfig {
    /// Space base URL, e.g. `https://acme.backlog.jp`.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("https://{}.{}", self.space_id, self.domain)
    }

    /// Validate that all required fields are properly set.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any field is empty or has invalid format.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.space_id, "backlog.space_id")?;
        require_non_empty(&self.api_key, "backlog.api_key")?;
        require_non_empty(&self.domain, "backlog.domain")?;
        if self.domain.contains("://") || self.domain.contains('/') {
            return Err(ConfigError::Validation(
                "backlog.domain must be a bare host name such as backlog.jp".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Diagram renderer configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MermaidConfig {
    /// Converter executable looked up on `PATH`.
    pub command: String,
    /// Mermaid theme (`default`, `dark`, `forest`, `neutral`).
    pub theme: String,
    /// Background color (`white`, `transparent`, ...).
    pub background: String,
    /// Output format (`png` or `svg`).
    pub format: String,
}

impl Default for MermaidConfig {
    fn default() -> Self {
        Self {
            command: "mmdc".to_owned(),
            theme: "default".to_owned(),
            background: "white".to_owned(),
            format: "png".to_owned(),
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Dotenv file could not be read or parsed.
    #[error("Environment file error in {}: {source}", path.display())]
    EnvFile {
        /// Path to the dotenv file.
        path: PathBuf,
        /// Underlying dotenv error.
        source: dotenvy::Error,
    },
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`backlog.api_key`").
        field: String,
        /// Error message (e.g., "${`BACKLOG_API_KEY`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Build the error for a credential found in no source.
fn missing_credential(field: &str, flag: &str, var: &str) -> ConfigError {
    ConfigError::Validation(format!(
        "{var} is not set (use {flag}, the {var} environment variable, a .env file, \
         or `{field}` in {CONFIG_FILENAME})"
    ))
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// If `config_path` is provided, loads from that file. Otherwise, searches
    /// for `bw.toml` in the current directory and parents. The environment
    /// layer honors `CliSettings::env_file`.
    ///
    /// # Errors
    ///
    /// Returns error if an explicit file doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let env_file = cli_settings.and_then(|s| s.env_file.as_deref());
        let env = EnvVars::load(env_file)?;
        Self::load_with_env(config_path, cli_settings, &env)
    }

    /// Load configuration against an explicit environment snapshot.
    ///
    /// # Errors
    ///
    /// Returns error if an explicit file doesn't exist or parsing fails.
    pub fn load_with_env(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
        env: &EnvVars,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path, env)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered, env)?
        } else {
            Self::default()
        };

        config.resolve_backlog(env, cli_settings);
        Ok(config)
    }

    /// Get validated Backlog configuration.
    ///
    /// Use this instead of reading `backlog_resolved` directly when the
    /// command talks to Backlog.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` naming the first missing credential.
    pub fn require_backlog(&self) -> Result<BacklogConfig, ConfigError> {
        let resolved = &self.backlog_resolved;
        let space_id = resolved
            .space_id
            .clone()
            .ok_or_else(|| missing_credential("backlog.space_id", "--space-id", SPACE_ID_VAR))?;
        let api_key = resolved
            .api_key
            .clone()
            .ok_or_else(|| missing_credential("backlog.api_key", "--api-key", API_KEY_VAR))?;

        let config = BacklogConfig {
            space_id,
            api_key,
            domain: resolved.domain.clone(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Layer CLI settings, environment and file values into `backlog_resolved`.
    fn resolve_backlog(&mut self, env: &EnvVars, cli: Option<&CliSettings>) {
        let pick = |cli_value: Option<&String>, var: &str, file_value: &Option<String>| {
            cli_value
                .filter(|v| !v.is_empty())
                .cloned()
                .or_else(|| env.get(var).map(str::to_owned))
                .or_else(|| file_value.clone().filter(|v| !v.is_empty()))
        };

        let space_id = pick(
            cli.and_then(|c| c.space_id.as_ref()),
            SPACE_ID_VAR,
            &self.backlog.space_id,
        );
        let api_key = pick(
            cli.and_then(|c| c.api_key.as_ref()),
            API_KEY_VAR,
            &self.backlog.api_key,
        );
        let domain = pick(
            cli.and_then(|c| c.domain.as_ref()),
            DOMAIN_VAR,
            &self.backlog.domain,
        )
        .unwrap_or_else(|| DEFAULT_DOMAIN.to_owned());

        self.backlog_resolved = BacklogSettings {
            space_id,
            api_key,
            domain,
        };
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path, env: &EnvVars) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&content, env)?;
        config.config_path = Some(path.to_path_buf());
        tracing::debug!(path = %path.display(), "Loaded configuration file");
        Ok(config)
    }

    /// Parse, expand and validate TOML content.
    fn parse(content: &str, env: &EnvVars) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(content)?;
        config.expand_env_vars(env)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Credentials are not checked here since they may come from other
    /// sources; see [`Config::require_backlog`].
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_mermaid()
    }

    fn validate_mermaid(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.mermaid.command, "mermaid.command")?;
        require_non_empty(&self.mermaid.theme, "mermaid.theme")?;
        require_non_empty(&self.mermaid.background, "mermaid.background")?;
        if !matches!(self.mermaid.format.as_str(), "png" | "svg") {
            return Err(ConfigError::Validation(format!(
                "mermaid.format must be \"png\" or \"svg\", got \"{}\"",
                self.mermaid.format
            )));
        }
        Ok(())
    }

    /// Expand `${VAR}` references in string fields.
    fn expand_env_vars(&mut self, env: &EnvVars) -> Result<(), ConfigError> {
        let backlog = &mut self.backlog;
        if let Some(space_id) = &backlog.space_id {
            backlog.space_id = Some(expand::expand_env(space_id, "backlog.space_id", env)?);
        }
        if let Some(api_key) = &backlog.api_key {
            backlog.api_key = Some(expand::expand_env(api_key, "backlog.api_key", env)?);
        }
        if let Some(domain) = &backlog.domain {
            backlog.domain = Some(expand::expand_env(domain, "backlog.domain", env)?);
        }
        self.mermaid.command = expand::expand_env(&self.mermaid.command, "mermaid.command", env)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> EnvVars {
        EnvVars::from_pairs(pairs.iter().copied())
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.mermaid.command, "mmdc");
        assert_eq!(config.mermaid.theme, "default");
        assert_eq!(config.mermaid.background, "white");
        assert_eq!(config.mermaid.format, "png");
        assert_eq!(config.backlog_resolved.domain, "backlog.jp");
        assert!(config.config_path.is_none());
    }

    #[test]
    fn test_parse_minimal_config() {
        let config = Config::parse("", &env(&[])).unwrap();
        assert_eq!(config.mermaid.command, "mmdc");
        assert!(config.backlog.space_id.is_none());
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[backlog]
space_id = "acme"
api_key = "key123"
domain = "backlog.com"

[mermaid]
command = "/opt/bin/mmdc"
theme = "forest"
background = "transparent"
format = "svg"
"#;
        let config = Config::parse(toml, &env(&[])).unwrap();
        assert_eq!(config.backlog.space_id.as_deref(), Some("acme"));
        assert_eq!(config.backlog.api_key.as_deref(), Some("key123"));
        assert_eq!(config.backlog.domain.as_deref(), Some("backlog.com"));
        assert_eq!(config.mermaid.command, "/opt/bin/mmdc");
        assert_eq!(config.mermaid.theme, "forest");
        assert_eq!(config.mermaid.background, "transparent");
        assert_eq!(config.mermaid.format, "svg");
    }

    #[test]
    fn test_parse_rejects_unknown_format() {
        let toml = r#"
[mermaid]
format = "gif"
"#;
        let err = Config::parse(toml, &env(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("mermaid.format"));
    }

    #[test]
    fn test_expand_env_vars_backlog() {
        let toml = r#"
[backlog]
space_id = "${TEST_SPACE}"
api_key = "${TEST_KEY}"
domain = "${TEST_DOMAIN:-backlog.jp}"
"#;
        let vars = env(&[("TEST_SPACE", "acme"), ("TEST_KEY", "secret")]);
        let config = Config::parse(toml, &vars).unwrap();
        assert_eq!(config.backlog.space_id.as_deref(), Some("acme"));
        assert_eq!(config.backlog.api_key.as_deref(), Some("secret"));
        assert_eq!(config.backlog.domain.as_deref(), Some("backlog.jp"));
    }

    #[test]
    fn test_expand_env_vars_missing_required_var() {
        let toml = r#"
[backlog]
api_key = "${MISSING_VAR_CONFIG_TEST}"
"#;
        let err = Config::parse(toml, &env(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("MISSING_VAR_CONFIG_TEST"));
        assert!(err.to_string().contains("backlog.api_key"));
    }

    #[test]
    fn test_resolve_precedence_cli_over_env_over_file() {
        let toml = r#"
[backlog]
space_id = "file-space"
api_key = "file-key"
domain = "file.example"
"#;
        let mut config = Config::parse(toml, &env(&[])).unwrap();
        let vars = env(&[(SPACE_ID_VAR, "env-space"), (API_KEY_VAR, "env-key")]);
        let cli = CliSettings {
            space_id: Some("cli-space".to_owned()),
            ..Default::default()
        };

        config.resolve_backlog(&vars, Some(&cli));

        assert_eq!(
            config.backlog_resolved,
            BacklogSettings {
                space_id: Some("cli-space".to_owned()),
                api_key: Some("env-key".to_owned()),
                domain: "file.example".to_owned(),
            }
        );
    }

    #[test]
    fn test_resolve_defaults_domain() {
        let mut config = Config::default();
        config.resolve_backlog(&env(&[]), None);
        assert_eq!(config.backlog_resolved.domain, "backlog.jp");
        assert!(config.backlog_resolved.space_id.is_none());
    }

    #[test]
    fn test_resolve_ignores_empty_cli_value() {
        let mut config = Config::default();
        let cli = CliSettings {
            api_key: Some(String::new()),
            ..Default::default()
        };
        config.resolve_backlog(&env(&[(API_KEY_VAR, "env-key")]), Some(&cli));
        assert_eq!(config.backlog_resolved.api_key.as_deref(), Some("env-key"));
    }

    #[test]
    fn test_require_backlog_success() {
        let mut config = Config::default();
        config.resolve_backlog(&env(&[(SPACE_ID_VAR, "acme"), (API_KEY_VAR, "key")]), None);

        let backlog = config.require_backlog().unwrap();

        assert_eq!(backlog.space_id, "acme");
        assert_eq!(backlog.api_key, "key");
        assert_eq!(backlog.base_url(), "https://acme.backlog.jp");
    }

    #[test]
    fn test_require_backlog_missing_space_id() {
        let mut config = Config::default();
        config.resolve_backlog(&env(&[(API_KEY_VAR, "key")]), None);

        let err = config.require_backlog().unwrap_err();

        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("BACKLOG_SPACE_ID"));
        assert!(err.to_string().contains("--space-id"));
    }

    #[test]
    fn test_require_backlog_missing_api_key() {
        let mut config = Config::default();
        config.resolve_backlog(&env(&[(SPACE_ID_VAR, "acme")]), None);

        let err = config.require_backlog().unwrap_err();

        assert!(err.to_string().contains("BACKLOG_API_KEY"));
    }

    #[test]
    fn test_validate_domain_with_scheme() {
        let config = BacklogConfig {
            space_id: "acme".to_owned(),
            api_key: "key".to_owned(),
            domain: "https://backlog.jp".to_owned(),
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("backlog.domain"));
    }

    #[test]
    fn test_load_with_env_explicit_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bw.toml");
        std::fs::write(&path, "[backlog]\nspace_id = \"acme\"\n").unwrap();

        let config =
            Config::load_with_env(Some(&path), None, &env(&[(API_KEY_VAR, "key")])).unwrap();

        assert_eq!(config.config_path.as_deref(), Some(path.as_path()));
        let backlog = config.require_backlog().unwrap();
        assert_eq!(backlog.space_id, "acme");
        assert_eq!(backlog.api_key, "key");
    }

    #[test]
    fn test_load_with_env_missing_explicit_file() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.toml");

        let err = Config::load_with_env(Some(&missing), None, &env(&[])).unwrap_err();

        assert!(matches!(err, ConfigError::NotFound(_)));
    }
}
