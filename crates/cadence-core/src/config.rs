use std::path::Path;

use config::builder::DefaultState;
use config::{Config, ConfigBuilder};
use serde::Deserialize;

use crate::error::{CoreError, CoreResult};

/// Default cap on the exception/weekend retry loop of the occurrence calculator.
pub const DEFAULT_MAX_SKIP_ITERATIONS: u32 = 10_000;
/// Default number of interval-aligned periods a single search may scan.
pub const DEFAULT_MAX_SCAN_PERIODS: u32 = 400;
/// Default number of occurrences returned when a caller gives no limit.
pub const DEFAULT_MAX_COUNT: u32 = 100;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub logging: LoggingConfig,
    pub engine: EngineConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    pub max_skip_iterations: u32,
    pub max_scan_periods: u32,
    pub default_max_count: u32,
}

impl EngineConfig {
    /// ## Summary
    /// Checks that every engine limit is usable.
    ///
    /// ## Errors
    /// Returns `CoreError::InvalidConfiguration` naming the first zero limit.
    pub fn validate(&self) -> CoreResult<()> {
        let limits = [
            ("engine.max_skip_iterations", self.max_skip_iterations),
            ("engine.max_scan_periods", self.max_scan_periods),
            ("engine.default_max_count", self.default_max_count),
        ];
        for (field, value) in limits {
            if value == 0 {
                return Err(CoreError::InvalidConfiguration {
                    field,
                    reason: "must be at least 1".to_string(),
                });
            }
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_skip_iterations: DEFAULT_MAX_SKIP_ITERATIONS,
            max_scan_periods: DEFAULT_MAX_SCAN_PERIODS,
            default_max_count: DEFAULT_MAX_COUNT,
        }
    }
}

impl Settings {
    fn defaults() -> CoreResult<ConfigBuilder<DefaultState>> {
        Ok(Config::builder()
            .set_default("logging.level", "info")?
            .set_default("engine.max_skip_iterations", i64::from(DEFAULT_MAX_SKIP_ITERATIONS))?
            .set_default("engine.max_scan_periods", i64::from(DEFAULT_MAX_SCAN_PERIODS))?
            .set_default("engine.default_max_count", i64::from(DEFAULT_MAX_COUNT))?)
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> CoreResult<Self> {
        let settings = builder.build()?.try_deserialize::<Settings>()?;
        settings.engine.validate()?;
        Ok(settings)
    }

    /// ## Summary
    /// Loads configuration from environment variables and an optional TOML file.
    ///
    /// Environment variables use the `CADENCE_` prefix and `__` between
    /// sections, e.g. `CADENCE_ENGINE__MAX_SCAN_PERIODS=800`. They take
    /// precedence over the file. When `file` is `None`, `config.toml` in the
    /// working directory is read if present.
    ///
    /// ## Errors
    /// Returns an error if building the configuration, deserializing it, or
    /// validating the engine limits fails.
    pub fn load(file: Option<&Path>) -> CoreResult<Self> {
        let file_source = match file {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name("config.toml").required(false),
        };

        Self::finish(
            Self::defaults()?
                // TOML file
                .add_source(file_source)
                // Env
                .add_source(
                    config::Environment::with_prefix("CADENCE")
                        .prefix_separator("_")
                        .separator("__")
                        .ignore_empty(true)
                        .try_parsing(true),
                ),
        )
    }

    /// ## Summary
    /// Builds settings from defaults overlaid with a TOML document.
    ///
    /// ## Errors
    /// Returns an error if the document is malformed or a limit is invalid.
    pub fn from_toml_str(toml: &str) -> CoreResult<Self> {
        Self::finish(
            Self::defaults()?.add_source(config::File::from_str(toml, config::FileFormat::Toml)),
        )
    }
}

/// ## Summary
/// Loads configuration from environment variables and `.env` file.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config(file: Option<&Path>) -> CoreResult<Settings> {
    if let Err(err) = dotenvy::dotenv() {
        tracing::trace!(error = %err, "No .env file loaded");
    }

    Settings::load(file)
}
