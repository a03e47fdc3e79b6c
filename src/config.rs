use std::{env, path::PathBuf};

use derive_builder::Builder;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),

    #[error("Config error: {0}")]
    Builder(#[from] StoreConfigBuilderError),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Where the ridership store lives and how connections to it are opened.
/// Passed explicitly to the store; nothing reads it from globals afterwards.
#[derive(Builder, Debug, Clone)]
#[builder(setter(into))]
pub struct StoreConfig {
    pub path: PathBuf,

    /// Create the database file when it doesn't exist yet
    #[builder(default = "false")]
    pub create_if_missing: bool,

    #[builder(default = "true")]
    pub foreign_keys: bool,

    /// sqlite `cache_size` pragma, negative values are KiB
    #[builder(default = "-64000")]
    pub cache_size: i64,
}

impl StoreConfig {
    pub fn builder() -> StoreConfigBuilder {
        StoreConfigBuilder::default()
    }

    /// Reads `CTA_DATABASE_PATH` and `CTA_CREATE_DATABASE`
    pub fn from_env() -> ConfigResult<StoreConfig> {
        let path = env::var("CTA_DATABASE_PATH")
            .map_err(|_| ConfigError::Missing("CTA_DATABASE_PATH"))?;

        let mut builder = StoreConfig::builder();
        builder.path(path);

        if let Ok(create) = env::var("CTA_CREATE_DATABASE") {
            builder.create_if_missing(parse_flag("CTA_CREATE_DATABASE", &create)?);
        }

        Ok(builder.build()?)
    }
}

fn parse_flag(name: &'static str, value: &str) -> ConfigResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(ConfigError::Invalid(name, other.to_string())),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = StoreConfig::builder().path("cta.db").build().unwrap();

        assert_eq!(config.path, PathBuf::from("cta.db"));
        assert!(!config.create_if_missing);
        assert!(config.foreign_keys);
        assert_eq!(config.cache_size, -64000);
    }

    #[test]
    fn test_builder_requires_path() {
        let err = StoreConfig::builder().build().unwrap_err();
        assert!(ConfigError::from(err).to_string().contains("path"));
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("X", "TRUE").unwrap());
        assert!(parse_flag("X", " yes ").unwrap());
        assert!(!parse_flag("X", "0").unwrap());
        assert!(matches!(
            parse_flag("X", "maybe"),
            Err(ConfigError::Invalid("X", v)) if v == "maybe"
        ));
    }
}
