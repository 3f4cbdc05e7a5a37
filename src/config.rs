//! Configuration
//!
//! Layered from built-in defaults, an optional TOML file and `OOKIT_`
//! environment variables (later layers win). Nested keys use `__` in
//! environment variable names, e.g. `OOKIT_OPTIONS__EXPOSE_CLASS_MEMBERS=true`.

use std::path::Path;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::objects::Options;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "OOKIT_";

/// Default tracing filter
pub const DEFAULT_LOG_FILTER: &str = "ookit=info";

/// Runtime configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Tracing filter used when `RUST_LOG` is not set
    pub log_filter: String,
    /// Default options for classes defined through a registry
    pub options: Options,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            options: Options::default(),
        }
    }
}

impl Config {
    /// Build the provider stack
    pub fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = path {
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Load configuration from defaults, `path` (if given) and the environment
    pub fn load(path: Option<&Path>) -> Result<Self, figment::Error> {
        Self::figment(path).extract()
    }
}
