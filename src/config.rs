use anyhow::{Context, Result};
use serde_derive::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub static CONFIG_FILENAME: &str = "config.json";

pub static DEFAULT_MQTT_PORT: u16 = 1883;
pub static DEFAULT_MQTT_QOS: u8 = 1;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MqttConfig {
    pub broker: String,
    pub port: u16,
    pub topic: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub qos: u8,
    pub retain: bool,
}

/// The full record written to `config.json`. Built once per run and never
/// read back by this tool; the consuming bridge owns the read path.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    pub name: String,
    pub url: String,
    pub appid: String,
    pub secret: String,
    pub username: String,
    pub passhash: String,
    pub station_id: u64,
    pub inverter_id: String,
    pub logger_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meter_id: Option<u64>,
    pub debug: bool,
    pub mqtt: MqttConfig,
}

impl Config {
    /// Writes the record as indented JSON into `dir`, overwriting any
    /// existing file, and returns the absolute path of the result.
    pub fn write(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(CONFIG_FILENAME);
        let contents = serde_json::to_string_pretty(self).context("serialize config")?;
        fs::write(&path, contents)
            .with_context(|| format!("write {}", path.display()))?;
        path.canonicalize()
            .with_context(|| format!("resolve {}", path.display()))
    }
}
