use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;
use tally_core::config::EngineConfig;

#[derive(Deserialize, Debug)]
#[serde(default)]
pub struct Config {
    pub database_path: String,
    pub engine: EngineConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: "tally.db".to_string(),
            engine: EngineConfig::default(),
        }
    }
}

impl Config {
    /// `tally.toml` in the working directory, overridden by `TALLY_*`
    /// variables (`TALLY_ENGINE__RENEWAL__INTERVAL_SECS` for nested keys).
    pub fn new() -> Result<Self, figment::Error> {
        Figment::new()
            .merge(Toml::file("tally.toml"))
            .merge(Env::prefixed("TALLY_").split("__"))
            .extract()
    }
}
