use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tokio::fs;
use tracing::{info, warn};

use crate::alerts::DEFAULT_ALERT_CAPACITY;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Invalid value: {0}")]
    Invalid(String),
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct KernelConfig {
    pub simulation: SimulationConf,
    pub http: HttpConf,
    pub activity: ActivityConf,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SimulationConf {
    pub tick_interval_ms: u64,
    pub alert_capacity: usize,
    pub seed: Option<u64>, // ex: 42 pour rejouer une session à l'identique
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct HttpConf {
    pub bind: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ActivityConf {
    pub capacity: usize,
    pub page_size: usize,
}

impl Default for SimulationConf {
    fn default() -> Self {
        Self {
            tick_interval_ms: 2000,
            alert_capacity: DEFAULT_ALERT_CAPACITY,
            seed: None,
        }
    }
}

impl Default for HttpConf {
    fn default() -> Self {
        Self { bind: "0.0.0.0:8080".into() }
    }
}

impl Default for ActivityConf {
    fn default() -> Self {
        Self { capacity: 200, page_size: 10 }
    }
}

impl SimulationConf {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

/// Parse + validation ; un document vide donne la config par défaut
pub fn parse_config(txt: &str) -> Result<KernelConfig, ConfigError> {
    if txt.trim().is_empty() {
        return Ok(KernelConfig::default());
    }
    let cfg: KernelConfig = serde_yaml::from_str(txt)?;
    if cfg.simulation.tick_interval_ms == 0 {
        return Err(ConfigError::Invalid("simulation.tick_interval_ms must be > 0".into()));
    }
    if cfg.simulation.alert_capacity == 0 {
        return Err(ConfigError::Invalid("simulation.alert_capacity must be > 0".into()));
    }
    if cfg.activity.page_size == 0 {
        return Err(ConfigError::Invalid("activity.page_size must be > 0".into()));
    }
    Ok(cfg)
}

pub async fn load_config() -> KernelConfig {
    let path = std::env::var("FACTORY_KERNEL_CONFIG").unwrap_or_else(|_| "kernel.yaml".into());
    if !Path::new(&path).exists() {
        info!("[config] no {path}, using defaults");
        return KernelConfig::default();
    }

    let loaded = match fs::read_to_string(&path).await {
        Ok(txt) => parse_config(&txt),
        Err(e) => Err(ConfigError::from(e)),
    };
    match loaded {
        Ok(cfg) => {
            info!("[config] loaded {path}");
            cfg
        }
        Err(e) => {
            warn!("[config] invalid config {path}: {e}");
            KernelConfig::default()
        }
    }
}
