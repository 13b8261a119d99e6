//! Configuration management for the conversation transformer.
//!
//! Settings come from an optional file (any format the `config` crate
//! understands) overlaid by `CONVERSATION_*` environment variables, with `__`
//! separating nested keys:
//!
//! ```text
//! CONVERSATION_LOGGING__LEVEL=debug
//! CONVERSATION_LOGGING__NO_COLOR=true
//! CONVERSATION_OUTPUT__PRETTY=false
//! ```

use crate::core::error::Result;
use serde::{Deserialize, Serialize};

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "CONVERSATION_CONFIG";

/// Config file used when [`CONFIG_PATH_ENV`] is unset.
pub const DEFAULT_CONFIG_PATH: &str = "conversation.toml";

const ENV_PREFIX: &str = "CONVERSATION";

/// Main application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset
    #[serde(default = "default_level")]
    pub level: String,

    /// Disable ANSI colors
    #[serde(default)]
    pub no_color: bool,

    /// Emit JSON lines instead of human-readable text
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            no_color: false,
            json: false,
        }
    }
}

/// Output configuration for the command-line front end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Pretty-print the display turns
    #[serde(default = "default_pretty")]
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            pretty: default_pretty(),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

fn default_pretty() -> bool {
    true
}

impl AppConfig {
    /// Load configuration from `path` (if it exists) and the environment.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use conversation_transformer::core::config::AppConfig;
    ///
    /// let config = AppConfig::load("conversation.toml").expect("Failed to load config");
    /// ```
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut config: AppConfig = settings.try_deserialize()?;

        // NO_COLOR is honored regardless of its value
        if std::env::var_os("NO_COLOR").is_some() {
            config.logging.no_color = true;
        }

        Ok(config)
    }

    /// Load from the file named by `CONVERSATION_CONFIG`, falling back to
    /// [`DEFAULT_CONFIG_PATH`].
    pub fn from_env() -> Result<Self> {
        let path =
            std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load(&path)
    }
}
