//! Process configuration from environment variables.

use std::env;
use std::path::PathBuf;

/// Runtime settings, each with the original deployment's default.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path of the persisted collection document (`PSN_DATA_FILE`).
    pub data_file: PathBuf,
    /// Path of the append-only audit log (`PSN_AUDIT_LOG`).
    pub audit_log: PathBuf,
    /// Listen address (`PSN_BIND_ADDR`).
    pub bind_addr: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            data_file: env::var("PSN_DATA_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data/PSN.json")),
            audit_log: env::var("PSN_AUDIT_LOG")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("access_log.txt")),
            bind_addr: env::var("PSN_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
        }
    }
}
