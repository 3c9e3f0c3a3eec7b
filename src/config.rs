use bevy::prelude::*;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

#[derive(Resource, Serialize, Deserialize, Clone, Debug, Default)]
pub struct BakerConfig {
    pub bake: BakeConfig,
    pub conversion: ConversionConfig,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct BakeConfig {
    /// Launch bakes without waiting for completion when a command does not
    /// say otherwise.
    pub detached: bool,
}

impl Default for BakeConfig {
    fn default() -> Self {
        Self { detached: false }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ConversionConfig {
    /// Convert meshes whose visibility is currently `Hidden` as well.
    pub include_hidden: bool,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            include_hidden: true,
        }
    }
}

impl BakerConfig {
    /// Load configuration from a file, falling back to defaults if the file doesn't exist
    pub fn load_or_default(path: &str) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    warn!("Failed to parse config file {}: {}. Using defaults.", path, e);
                    Self::default()
                }
            },
            Err(_) => {
                info!("Config file {} not found. Using defaults.", path);
                Self::default()
            }
        }
    }

    /// Load configuration from the user's platform config directory
    pub fn load_from_user_config() -> Self {
        match ProjectDirs::from("", "", "bevy_probe_baker") {
            Some(dirs) => {
                let path = dirs.config_dir().join("config.toml");
                Self::load_or_default(&path.to_string_lossy())
            }
            None => {
                info!("No user config directory available. Using defaults.");
                Self::default()
            }
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &str) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BakerConfig::default();
        assert!(!config.bake.detached);
        assert!(config.conversion.include_hidden);
    }

    #[test]
    fn test_parse_full_config() {
        let toml_str = r#"
            [bake]
            detached = true

            [conversion]
            include_hidden = false
        "#;
        let config: BakerConfig = toml::from_str(toml_str).unwrap();
        assert!(config.bake.detached);
        assert!(!config.conversion.include_hidden);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let config = BakerConfig::load_or_default("/nonexistent/probe_baker.toml");
        assert!(!config.bake.detached);
    }

    #[test]
    fn test_save_and_reload() {
        let path = std::env::temp_dir().join("bevy_probe_baker_config_test.toml");
        let path_str = path.to_string_lossy().to_string();

        let mut config = BakerConfig::default();
        config.bake.detached = true;
        config.save(&path_str).unwrap();

        let reloaded = BakerConfig::load_or_default(&path_str);
        assert!(reloaded.bake.detached);

        let _ = std::fs::remove_file(&path);
    }
}
