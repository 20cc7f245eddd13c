//! Optional RON config file.
//!
//! ```ron
//! (
//!     page_size: 24,
//!     imperial: true,
//!     prefixes: { "origin": "origin", "therian": "therian" },
//! )
//! ```

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::api::{self, ApiConfig};
use crate::naming::{NameResolver, PrefixTable};

pub const DEFAULT_PAGE_SIZE: usize = 20;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(String),
    #[error("page_size must be at least 1")]
    ZeroPageSize,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Config {
    pub api_base: String,
    pub page_size: usize,
    pub imperial: bool,
    /// Keep HTTP responses on disk between runs.
    pub cache: bool,
    /// Extra spoken prefixes, merged over the built-in table.
    pub prefixes: BTreeMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: api::API_BASE.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            imperial: false,
            cache: true,
            prefixes: BTreeMap::new(),
        }
    }
}

impl Config {
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let config: Config =
            ron::de::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        if config.page_size == 0 {
            return Err(ConfigError::ZeroPageSize);
        }
        Ok(config)
    }

    /// Reads `path`, or the default location when `path` is `None`.
    ///
    /// A missing file at the default location means defaults; a missing file
    /// that was asked for explicitly is an error.
    pub async fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, explicit) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => match default_path() {
                Some(path) => (path, false),
                None => return Ok(Self::default()),
            },
        };
        let text = match tokio::fs::read_to_string(&path).await {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound && !explicit => {
                return Ok(Self::default());
            }
            Err(source) => return Err(ConfigError::Read { path, source }),
        };
        Self::parse(&text)
    }

    pub fn resolver(&self) -> NameResolver {
        let mut table = PrefixTable::default();
        table.extend(&self.prefixes);
        NameResolver::new(table)
    }

    pub fn api_config(&self) -> ApiConfig {
        ApiConfig {
            base: self.api_base.trim_end_matches('/').to_string(),
            cache_dir: self.cache.then(api::default_cache_root),
        }
    }
}

pub fn default_path() -> Option<PathBuf> {
    dirs_next::config_dir().map(|dir| dir.join("pokesearch").join("config.ron"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(Config::parse("()").unwrap(), Config::default());
    }

    #[test]
    fn test_partial_config() {
        let config = Config::parse(
            r#"(
                page_size: 24,
                imperial: true,
                cache: false,
                prefixes: { "Origin": "origin" },
            )"#,
        )
        .unwrap();
        assert_eq!(config.page_size, 24);
        assert!(config.imperial);
        assert_eq!(config.api_base, api::API_BASE);
        assert_eq!(config.api_config().cache_dir, None);
    }

    #[test]
    fn test_prefixes_extend_builtin_table() {
        let config = Config::parse(r#"(prefixes: { "Origin": "Origin" })"#).unwrap();
        let resolver = config.resolver();
        assert_eq!(resolver.resolve("Origin Giratina"), "giratina-origin");
        assert_eq!(resolver.resolve("Alolan Raichu"), "raichu-alola");
    }

    #[test]
    fn test_invalid_config() {
        assert!(matches!(
            Config::parse("(page_size: \"many\")"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            Config::parse("(page_size: 0)"),
            Err(ConfigError::ZeroPageSize)
        ));
    }

    #[test]
    fn test_api_base_trailing_slash() {
        let config = Config::parse(r#"(api_base: "http://localhost:8000/api/v2/")"#).unwrap();
        assert_eq!(config.api_config().base, "http://localhost:8000/api/v2");
    }

    #[tokio::test]
    async fn test_missing_explicit_file_is_an_error() {
        let path = std::env::temp_dir().join("pokesearch-does-not-exist.ron");
        let error = Config::load(Some(&path)).await.unwrap_err();
        assert!(matches!(error, ConfigError::Read { .. }));
        assert!(error.to_string().starts_with("failed to read"));
    }
}
