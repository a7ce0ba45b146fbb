//! Layered configuration loading: defaults, then a TOML file, then environment.

use std::path::Path;

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, FileFormat};
use tracing::debug;

use super::{
    default_additional_height, default_allowed_origins, default_hash_prefix, RouterConfig,
};
use crate::error::ConfigError;

/// Prefix of environment overrides, e.g. `METAROUTER__HASH_PREFIX=#!/`.
const ENV_PREFIX: &str = "METAROUTER";

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load from a file; environment overrides still apply.
    pub fn load_from_file(path: &Path) -> Result<RouterConfig, ConfigError> {
        debug!(config_path = %path.display(), "Loading router configuration");
        let builder = Self::builder_with_defaults()?
            .add_source(File::from(path).format(FileFormat::Toml).required(true));
        Self::finish(builder)
    }

    /// Load from a TOML string; used for embedded configuration and tests.
    pub fn load_from_str(toml: &str) -> Result<RouterConfig, ConfigError> {
        let builder =
            Self::builder_with_defaults()?.add_source(File::from_str(toml, FileFormat::Toml));
        Self::finish(builder)
    }

    fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Ok(Config::builder()
            .set_default("hash_prefix", default_hash_prefix())?
            .set_default("additional_height", default_additional_height())?
            .set_default("allowed_origins", default_allowed_origins())?)
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> Result<RouterConfig, ConfigError> {
        let config: RouterConfig = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }
}
