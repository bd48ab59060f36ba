use serde::Deserialize;

/// Top-level configuration settings for the application.
///
/// Includes settings for the simulated world, the parameter store and logging.
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub world: WorldSettings,
    pub params: ParamsSettings,
    pub logging: LoggingSettings,
}

/// Identity of the world and the rate window of its reconciliation driver.
#[derive(Debug, Deserialize, Clone)]
pub struct WorldSettings {
    pub name: String,
    pub namespace: String,
    pub freq_min: f64,
    pub freq_max: f64,
    pub reconcile_hz: f64,
}

/// Location of the JSON file that stands in for the parameter server.
#[derive(Debug, Deserialize, Clone)]
pub struct ParamsSettings {
    pub file: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingSettings {
    pub level: String,
}

/// Partial configuration settings loaded from files or environment.
///
/// Allows partial specification of settings. Missing values can be filled using defaults.
#[derive(Debug, Deserialize)]
pub struct PartialSettings {
    pub world: Option<PartialWorldSettings>,
    pub params: Option<PartialParamsSettings>,
    pub logging: Option<PartialLoggingSettings>,
}

#[derive(Debug, Deserialize)]
pub struct PartialWorldSettings {
    pub name: Option<String>,
    pub namespace: Option<String>,
    pub freq_min: Option<f64>,
    pub freq_max: Option<f64>,
    pub reconcile_hz: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct PartialParamsSettings {
    pub file: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PartialLoggingSettings {
    pub level: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            world: WorldSettings {
                name: "World".to_string(),
                namespace: "/ambf/env".to_string(),
                freq_min: 1.0,
                freq_max: 50.0,
                reconcile_hz: 10.0,
            },
            params: ParamsSettings {
                file: "config/params.json".to_string(),
            },
            logging: LoggingSettings {
                level: "info".to_string(),
            },
        }
    }
}
