use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("admin_token is not set in config file")]
    MissingAdminToken,
}

/// The shared admin credential. Compared in full, never printed.
#[derive(Clone)]
pub struct AdminToken(Arc<str>);

impl AdminToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(Arc::from(token.into()))
    }

    /// Exact, case-sensitive comparison against a presented token.
    pub fn matches(&self, candidate: &str) -> bool {
        *self.0 == *candidate
    }
}

impl fmt::Debug for AdminToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AdminToken(***)")
    }
}

#[derive(Deserialize)]
struct ConfigFile {
    #[serde(default)]
    admin_token: Option<String>,
}

/// Parse the JSON config document and extract the admin token.
pub fn parse_admin_token(contents: &str) -> Result<AdminToken, ConfigError> {
    let file: ConfigFile = serde_json::from_str(contents)?;
    match file.admin_token {
        Some(token) if !token.is_empty() => Ok(AdminToken::new(token)),
        _ => Err(ConfigError::MissingAdminToken),
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_path: String,
    pub admin_token: AdminToken,
}

impl Config {
    /// Load the admin token from `config_path` and the rest from the environment.
    pub fn load(config_path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let path = config_path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let admin_token = parse_admin_token(&contents)?;

        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port: u16 = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);

        Ok(Self {
            host,
            port,
            database_path: env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "serials.db".to_string()),
            admin_token,
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_admin_token() {
        let token = parse_admin_token(r#"{"admin_token": "s3cret"}"#).unwrap();
        assert!(token.matches("s3cret"));
        assert!(!token.matches("S3CRET"));
        assert!(!token.matches("s3cre"));
        assert!(!token.matches("s3cret "));
    }

    #[test]
    fn test_missing_or_empty_admin_token_is_rejected() {
        assert!(matches!(
            parse_admin_token("{}"),
            Err(ConfigError::MissingAdminToken)
        ));
        assert!(matches!(
            parse_admin_token(r#"{"admin_token": ""}"#),
            Err(ConfigError::MissingAdminToken)
        ));
    }

    #[test]
    fn test_malformed_config_is_parse_error() {
        assert!(matches!(
            parse_admin_token("admin_token=abc"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_debug_does_not_reveal_token() {
        let token = AdminToken::new("s3cret");
        assert_eq!(format!("{:?}", token), "AdminToken(***)");
    }

    #[test]
    fn test_load_reports_unreadable_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        assert!(matches!(
            Config::load(&missing),
            Err(ConfigError::Read { .. })
        ));
    }

    #[test]
    fn test_load_reads_token_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"admin_token": "from-file"}"#).unwrap();

        let config = Config::load(&path).unwrap();
        assert!(config.admin_token.matches("from-file"));
    }
}
