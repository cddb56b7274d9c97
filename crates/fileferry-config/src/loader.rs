//! Configuration loader utilities

use crate::{Config, ConfigBuilder, ConfigError, ConfigResult};
use std::path::{Path, PathBuf};

/// Environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "FILEFERRY";

/// Configuration loader with common loading patterns
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from default locations
    pub fn load_default() -> ConfigResult<Config> {
        let mut builder = ConfigBuilder::new().add_defaults();

        // Use the first config file found in the default locations
        for path in Self::get_default_config_paths() {
            if path.exists() {
                builder = builder.add_source_file(&path);
                break;
            }
        }

        builder.add_env_prefix(ENV_PREFIX).build()
    }

    /// Load configuration from a specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Config> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "Configuration file not found",
                ),
            });
        }

        ConfigBuilder::new()
            .add_defaults()
            .add_source_file(path)
            .add_env_prefix(ENV_PREFIX)
            .build()
    }

    /// Save configuration to a file
    pub fn save_to_file<P: AsRef<Path>>(config: &Config, path: P) -> ConfigResult<()> {
        let path = path.as_ref();

        let content = match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => toml::to_string_pretty(config).map_err(|e| {
                ConfigError::Serialization {
                    message: format!("Failed to serialize to TOML: {}", e),
                }
            })?,
            Some("json") => {
                serde_json::to_string_pretty(config).map_err(|e| ConfigError::Serialization {
                    message: format!("Failed to serialize to JSON: {}", e),
                })?
            }
            _ => serde_yaml::to_string(config).map_err(|e| ConfigError::Serialization {
                message: format!("Failed to serialize to YAML: {}", e),
            })?,
        };

        std::fs::write(path, content).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(())
    }

    /// Generate a default configuration file
    pub fn generate_default_config<P: AsRef<Path>>(path: P) -> ConfigResult<()> {
        let config = Config::default();
        Self::save_to_file(&config, path)
    }

    /// Get default configuration file paths in order of preference
    fn get_default_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from("fileferry.yaml"),
            PathBuf::from("fileferry.yml"),
            PathBuf::from("fileferry.toml"),
            PathBuf::from(".fileferry.yaml"),
            PathBuf::from(".fileferry.toml"),
        ];

        if let Some(config_dir) = dirs::config_dir() {
            let ferry_dir = config_dir.join("fileferry");
            paths.push(ferry_dir.join("config.yaml"));
            paths.push(ferry_dir.join("config.toml"));
        }

        #[cfg(unix)]
        {
            paths.push(PathBuf::from("/etc/fileferry/config.yaml"));
            paths.push(PathBuf::from("/etc/fileferry/config.toml"));
        }

        paths
    }

    /// Check if a configuration file exists in default locations
    pub fn config_exists() -> Option<PathBuf> {
        Self::get_default_config_paths()
            .into_iter()
            .find(|path| path.exists())
    }

    /// Validate a configuration file without using it
    pub fn validate_file<P: AsRef<Path>>(path: P) -> ConfigResult<()> {
        let _config = Self::load_from_file(path)?;
        Ok(())
    }
}

// Cross-platform config directory detection
mod dirs {
    use std::path::PathBuf;

    pub fn config_dir() -> Option<PathBuf> {
        #[cfg(target_os = "windows")]
        {
            std::env::var("APPDATA").ok().map(PathBuf::from)
        }
        #[cfg(target_os = "macos")]
        {
            std::env::var("HOME").ok().map(|home| {
                PathBuf::from(home)
                    .join("Library")
                    .join("Application Support")
            })
        }
        #[cfg(target_os = "linux")]
        {
            std::env::var("XDG_CONFIG_HOME")
                .ok()
                .map(PathBuf::from)
                .or_else(|| {
                    std::env::var("HOME")
                        .ok()
                        .map(|home| PathBuf::from(home).join(".config"))
                })
        }
        #[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
        {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_file_fails() {
        let result = ConfigLoader::load_from_file("/nonexistent/fileferry.yaml");
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_save_and_load_yaml() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.yaml");

        let original = Config::default();
        ConfigLoader::save_to_file(&original, &config_path).unwrap();

        let loaded = ConfigLoader::load_from_file(&config_path).unwrap();
        assert_eq!(
            original.execution.max_concurrency,
            loaded.execution.max_concurrency
        );
        assert_eq!(original.logging.retention_days, loaded.logging.retention_days);
    }

    #[test]
    fn test_save_and_load_toml() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        let original = Config::default();
        ConfigLoader::save_to_file(&original, &config_path).unwrap();

        let loaded = ConfigLoader::load_from_file(&config_path).unwrap();
        assert_eq!(
            original.execution.retry.attempts.get(),
            loaded.execution.retry.attempts.get()
        );
    }

    #[test]
    fn test_generate_default_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("default.yaml");

        ConfigLoader::generate_default_config(&config_path).unwrap();
        assert!(config_path.exists());

        let config = ConfigLoader::load_from_file(&config_path).unwrap();
        assert!(config.event_log.enabled);
    }
}
