mod settings;

#[cfg(test)]
mod tests;

use crate::config::settings::PartialSettings;
use config::{Config, ConfigError, Environment, File};

pub use settings::{LoggingSettings, ParamsSettings, Settings, WorldSettings};

/// Prefix for environment overrides, e.g. `PCTOPICS_WORLD__RECONCILE_HZ=25`.
pub const ENV_PREFIX: &str = "PCTOPICS";

/// Loads the configuration from the default file and environment variables
/// Merges the configuration with default values
/// Returns a `Settings` struct containing the world, params and logging configurations
pub fn load_config() -> Result<Settings, ConfigError> {
    let builder = Config::builder()
        .add_source(File::with_name("config/default").required(false))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

    let config = builder.build()?;
    let partial: PartialSettings = config.try_deserialize()?;
    let default = Settings::default();

    let world = partial.world.as_ref();
    let params = partial.params.as_ref();
    let logging = partial.logging.as_ref();

    Ok(Settings {
        world: WorldSettings {
            name: world
                .and_then(|w| w.name.clone())
                .unwrap_or(default.world.name),
            namespace: world
                .and_then(|w| w.namespace.clone())
                .unwrap_or(default.world.namespace),
            freq_min: world
                .and_then(|w| w.freq_min)
                .unwrap_or(default.world.freq_min),
            freq_max: world
                .and_then(|w| w.freq_max)
                .unwrap_or(default.world.freq_max),
            reconcile_hz: world
                .and_then(|w| w.reconcile_hz)
                .unwrap_or(default.world.reconcile_hz),
        },
        params: ParamsSettings {
            file: params
                .and_then(|p| p.file.clone())
                .unwrap_or(default.params.file),
        },
        logging: LoggingSettings {
            level: logging
                .and_then(|l| l.level.clone())
                .unwrap_or(default.logging.level),
        },
    })
}
