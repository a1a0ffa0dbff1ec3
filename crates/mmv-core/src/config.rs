//! Configuration handling for mmv

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::MmvError;
use crate::overrides::{check_timestamp_format, BACKUP_TIMESTAMP_FORMAT};

/// Name of the optional config file inside a data directory.
pub const CONFIG_FILE_NAME: &str = "mmv.toml";

/// File names and save settings for one mapping data directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MmvConfig {
    /// TSRG mapping file
    #[serde(default = "default_tsrg_file")]
    pub tsrg_file: String,

    /// Static method list (optional on disk)
    #[serde(default = "default_static_methods_file")]
    pub static_methods_file: String,

    /// Field override CSV
    #[serde(default = "default_fields_csv")]
    pub fields_csv: String,

    /// Method override CSV
    #[serde(default = "default_methods_csv")]
    pub methods_csv: String,

    /// Parameter override CSV
    #[serde(default = "default_params_csv")]
    pub params_csv: String,

    /// strftime format for backup file names
    #[serde(default = "default_backup_timestamp_format")]
    pub backup_timestamp_format: String,
}

fn default_tsrg_file() -> String {
    "joined.tsrg".to_string()
}

fn default_static_methods_file() -> String {
    "static_methods.txt".to_string()
}

fn default_fields_csv() -> String {
    "fields.csv".to_string()
}

fn default_methods_csv() -> String {
    "methods.csv".to_string()
}

fn default_params_csv() -> String {
    "params.csv".to_string()
}

fn default_backup_timestamp_format() -> String {
    BACKUP_TIMESTAMP_FORMAT.to_string()
}

impl Default for MmvConfig {
    fn default() -> Self {
        Self {
            tsrg_file: default_tsrg_file(),
            static_methods_file: default_static_methods_file(),
            fields_csv: default_fields_csv(),
            methods_csv: default_methods_csv(),
            params_csv: default_params_csv(),
            backup_timestamp_format: default_backup_timestamp_format(),
        }
    }
}

impl MmvConfig {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, MmvError> {
        let content = fs::read_to_string(path)
            .map_err(|e| MmvError::Config(format!("failed to read config file: {}", e)))?;
        let config: MmvConfig = toml::from_str(&content)
            .map_err(|e| MmvError::Config(format!("failed to parse config file: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load `mmv.toml` from a data directory, or defaults when absent
    pub fn load_from_dir(dir: &Path) -> Result<Self, MmvError> {
        let config_path = dir.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            Self::load(&config_path)
        } else {
            Ok(MmvConfig::default())
        }
    }

    /// Join a configured file name onto the data directory
    pub fn resolve(&self, dir: &Path, name: &str) -> PathBuf {
        dir.join(name)
    }

    fn validate(&self) -> Result<(), MmvError> {
        let names = [
            ("tsrg_file", &self.tsrg_file),
            ("static_methods_file", &self.static_methods_file),
            ("fields_csv", &self.fields_csv),
            ("methods_csv", &self.methods_csv),
            ("params_csv", &self.params_csv),
        ];
        for (key, value) in names {
            if value.trim().is_empty() {
                return Err(MmvError::Config(format!("{} must not be empty", key)));
            }
        }
        check_timestamp_format(&self.backup_timestamp_format)
    }
}
