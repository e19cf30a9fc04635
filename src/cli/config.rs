// FILE: src/cli/config.rs

use crate::error::{RenameError, Result};
use crate::options::RenameConfig;
use serde::{Deserialize, Serialize};
use std::fs;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(flatten)]
    pub rename: RenameConfig,
    pub output_directory: Option<String>,
    pub map_file: Option<String>,
}

pub fn load(config_path: &str) -> Result<ConfigFile> {
    let config_content = fs::read_to_string(config_path).map_err(|e| {
        RenameError::FileNotFound {
            path: format!("Config file {}: {}", config_path, e),
        }
    })?;

    let config: ConfigFile = if config_path.ends_with(".json") {
        serde_json::from_str(&config_content).map_err(|e| RenameError::InvalidFormat {
            message: format!("Invalid JSON config: {}", e),
        })?
    } else if config_path.ends_with(".toml") {
        toml::from_str(&config_content).map_err(|e| RenameError::InvalidFormat {
            message: format!("Invalid TOML config: {}", e),
        })?
    } else {
        return Err(RenameError::InvalidFormat {
            message: "Config file must be .json or .toml format".to_string(),
        });
    };

    log::info!("Loaded configuration from {}", config_path);
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::ExclusionEntry;

    #[test]
    fn test_load_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cssvr.toml");
        fs::write(
            &path,
            r#"
strategy = "debug"
prefix = "ds"
except = ["brand", { pattern = "^ext-" }]
map_file = "map.json"
"#,
        )
        .unwrap();

        let config = load(path.to_str().unwrap()).unwrap();
        assert_eq!(config.rename.strategy.as_deref(), Some("debug"));
        assert_eq!(config.rename.prefix.as_deref(), Some("ds"));
        assert_eq!(config.rename.except[0], ExclusionEntry::Name("brand".to_string()));
        assert_eq!(config.map_file.as_deref(), Some("map.json"));
    }

    #[test]
    fn test_load_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cssvr.json");
        fs::write(&path, r#"{"strategy":"none","except":[{"pattern":"x+"}]}"#).unwrap();

        let config = load(path.to_str().unwrap()).unwrap();
        assert_eq!(config.rename.except.len(), 1);
        assert!(config.output_directory.is_none());
    }

    #[test]
    fn test_load_invalid_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cssvr.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            load(path.to_str().unwrap()),
            Err(RenameError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_load_rejects_other_extensions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cssvr.yaml");
        fs::write(&path, "strategy: debug").unwrap();

        assert!(matches!(
            load(path.to_str().unwrap()),
            Err(RenameError::InvalidFormat { .. })
        ));
        assert!(matches!(
            load("/nonexistent/cssvr.toml"),
            Err(RenameError::FileNotFound { .. })
        ));
    }
}
