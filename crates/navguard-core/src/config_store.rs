//! Configuration store trait
//!
//! The `ConfigStore` trait abstracts where the startup configuration comes
//! from. The file-backed implementation lives in `navguard-config-file`.

use async_trait::async_trait;

use crate::{NavguardConfig, Result};

/// Configuration store trait
///
/// # Example
/// ```no_run
/// # use navguard_core::config_store::ConfigStore;
/// # async fn example(store: &dyn ConfigStore) -> navguard_core::Result<()> {
/// let config = store.get_config().await?;
/// println!("tenancy mode: {}", config.app.tenancy_mode);
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Load the configuration
    ///
    /// # Errors
    /// - `Error::ConfigNotFound` if config doesn't exist
    /// - `Error::Config` if it cannot be parsed
    /// - `Error::ConfigValidation` if it fails validation
    async fn get_config(&self) -> Result<NavguardConfig>;

    /// Validate configuration before it is handed out
    async fn validate_config(&self, config: &NavguardConfig) -> Result<()> {
        config.validate()
    }
}
