// Configuration loader for the audio API
//
// This module seeds environment variables from an optional TOML
// configuration file. Explicit environment variables always win over file
// values, and application defaults cover anything left unset.

use std::env;
use std::fs;
use std::path::Path;

use log::{debug, warn};
use toml::{Table, Value};

const CONFIG_FILE_PATH: &str = "audio_api.conf";

/// Loads configuration values from the TOML file into the environment
///
/// Returns true if a configuration file was found and applied.
pub fn load_config() -> bool {
    load_config_from(Path::new(CONFIG_FILE_PATH))
}

fn load_config_from(config_path: &Path) -> bool {
    if !config_path.exists() {
        debug!("Configuration file not found at: {}", config_path.display());
        return false;
    }

    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            warn!("Failed to read configuration file: {}", e);
            return false;
        }
    };

    let table: Table = match content.parse() {
        Ok(table) => table,
        Err(e) => {
            warn!("Failed to parse configuration file: {}", e);
            return false;
        }
    };

    for (key, value) in table {
        // The file is expected to be flat; nested tables and arrays are skipped
        let value = match value {
            Value::String(s) => s,
            Value::Integer(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
            Value::Boolean(b) => b.to_string(),
            _ => {
                warn!("Skipping unsupported TOML value type for key: {}", key);
                continue;
            }
        };

        // Only seed keys the environment doesn't already define
        if env::var(&key).is_err() {
            env::set_var(&key, value);
        }
    }

    true
}
