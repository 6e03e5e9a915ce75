use std::path::Path;
use std::time::Duration;

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::File;
use config::FileFormat;
use serde::Deserialize;

use crate::catalog::CatalogParams;

const DEFAULT_SETTINGS: &str = include_str!("../settings-default.toml");

#[derive(Debug, Deserialize)]
pub struct GeneralSettings {
    pub log_file: String,
    pub debug: bool,
}

#[derive(Debug, Deserialize)]
pub struct ServiceSettings {
    pub timeout_secs: u64,
}

impl ServiceSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// This struct stores the program settings.
#[derive(Debug, Deserialize)]
pub struct Settings {
    pub general: GeneralSettings,
    pub service: ServiceSettings,
    #[serde(default)]
    pub catalog: CatalogParams,
}

impl Settings {
    pub fn new(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut s = ConfigBuilder::<DefaultState>::default();
        s = s.add_source(File::from_str(DEFAULT_SETTINGS, FileFormat::Toml));
        s = s.add_source(File::new("settings.toml", FileFormat::Toml).required(false));
        if let Some(path) = path {
            s = s.add_source(File::from(path));
        }

        let config = s.build()?;

        config.try_deserialize()
    }
}
