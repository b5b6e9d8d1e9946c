//! File-based ConfigStore implementation

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

use navguard_core::{ConfigStore, Error, NavguardConfig, Result};

/// Configuration store reading a single YAML or TOML file
#[derive(Debug, Clone)]
pub struct FileConfigStore {
    /// Path to the configuration file
    config_path: PathBuf,
}

impl FileConfigStore {
    /// Create a new file-based configuration store
    ///
    /// # Arguments
    /// * `config_path` - Path to the YAML or TOML configuration file
    ///
    /// # Errors
    /// - `Error::Config` if `~` cannot be expanded
    /// - `Error::ConfigNotFound` if the file doesn't exist
    pub async fn new(config_path: impl Into<PathBuf>) -> Result<Self> {
        let config_path = expand_tilde(config_path.into())?;

        if !tokio::fs::try_exists(&config_path).await.unwrap_or(false) {
            return Err(Error::ConfigNotFound);
        }

        info!("Initialized FileConfigStore for {:?}", config_path);

        Ok(Self { config_path })
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }

    fn is_toml(&self) -> bool {
        self.config_path.extension().and_then(|s| s.to_str()) == Some("toml")
    }

    /// Read and parse the config file
    async fn read_config_file(&self) -> Result<NavguardConfig> {
        let contents = tokio::fs::read_to_string(&self.config_path)
            .await
            .map_err(|e| {
                error!("Failed to read config file: {}", e);
                Error::Io(e)
            })?;

        let config = if self.is_toml() {
            toml::from_str(&contents).map_err(|e| {
                error!("Failed to parse TOML config: {}", e);
                Error::Config(format!("Invalid TOML: {}", e))
            })?
        } else {
            serde_yaml::from_str(&contents).map_err(|e| {
                error!("Failed to parse YAML config: {}", e);
                Error::Config(format!("Invalid YAML: {}", e))
            })?
        };

        debug!("Successfully read config file");
        Ok(config)
    }
}

fn expand_tilde(path: PathBuf) -> Result<PathBuf> {
    match path.strip_prefix("~") {
        Ok(rest) => Ok(dirs::home_dir()
            .ok_or_else(|| Error::Config("Could not determine home directory".to_string()))?
            .join(rest)),
        Err(_) => Ok(path),
    }
}

#[async_trait]
impl ConfigStore for FileConfigStore {
    async fn get_config(&self) -> Result<NavguardConfig> {
        let mut config = self.read_config_file().await?;
        config.merge_env();
        self.validate_config(&config).await?;

        debug!(
            "Loaded config: tenancy={}, {} active modules, {} routes",
            config.app.tenancy_mode,
            config.app.active_modules.len(),
            config.routes.len()
        );
        Ok(config)
    }
}
