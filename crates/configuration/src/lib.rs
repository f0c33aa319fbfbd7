use crate::error::ConfigError;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{AnalyticsConfig, ApiConfig, Config, RefreshConfig};

/// Loads the application configuration from an optional `config.toml` file.
///
/// This function is the primary entry point for this crate. It reads the
/// configuration file when one is present, layers it over the compiled-in
/// defaults, validates the result, and returns it.
pub fn load_config() -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        // The file is optional: the defaults describe a fully working setup
        // against the public providers.
        .add_source(config::File::with_name("config.toml").required(false))
        .build()?;

    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    Ok(config)
}
