//! Layered environment variables used for credential discovery.
//!
//! A dotenv file is read into memory (explicit path, else `./.env`, else
//! `~/.config/bw/.env`; first found wins) and the real process environment
//! is laid over it. The process environment itself is never modified.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::ConfigError;

/// Project-local dotenv file.
const LOCAL_ENV_FILE: &str = ".env";

/// Global dotenv file, shared by all projects of the current user.
const GLOBAL_ENV_FILE: &str = "~/.config/bw/.env";

/// Snapshot of environment variables from a dotenv file and the process.
#[derive(Debug, Default, Clone)]
pub struct EnvVars {
    vars: HashMap<String, String>,
    source: Option<PathBuf>,
}

impl EnvVars {
    /// Load the dotenv layer and overlay the process environment.
    ///
    /// An explicit `env_file` must exist. Without one, `./.env` and then
    /// `~/.config/bw/.env` are tried; finding neither is not an error.
    pub fn load(env_file: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match env_file {
            Some(path) if !path.exists() => {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Some(path) => Some(path.to_path_buf()),
            None => Self::discover_env_file(),
        };

        let mut env = match &file {
            Some(path) => Self::from_file(path)?,
            None => {
                tracing::debug!("No .env file found, using process environment only");
                Self::default()
            }
        };
        env.vars.extend(std::env::vars());
        Ok(env)
    }

    /// Read variables from a single dotenv file, without the process environment.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let env_error = |source| ConfigError::EnvFile {
            path: path.to_path_buf(),
            source,
        };

        let mut vars = HashMap::new();
        for item in dotenvy::from_path_iter(path).map_err(env_error)? {
            let (key, value) = item.map_err(env_error)?;
            vars.insert(key, value);
        }

        tracing::debug!(path = %path.display(), count = vars.len(), "Loaded environment file");
        Ok(Self {
            vars,
            source: Some(path.to_path_buf()),
        })
    }

    /// Build from explicit key/value pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            source: None,
        }
    }

    /// Look up a variable. Empty values count as unset.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Dotenv file the variables were read from, if any.
    #[must_use]
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    fn discover_env_file() -> Option<PathBuf> {
        let local = PathBuf::from(LOCAL_ENV_FILE);
        if local.is_file() {
            return Some(local);
        }
        let global = PathBuf::from(shellexpand::tilde(GLOBAL_ENV_FILE).into_owned());
        global.is_file().then_some(global)
    }
}
