//! File-based configuration store for navguard
//!
//! This crate implements the `ConfigStore` trait on top of a YAML or TOML
//! file. The format is chosen by file extension; anything other than
//! `.toml` is read as YAML.
//!
//! # Features
//! - `~` expansion of the configured path
//! - Environment variable overrides (`NAVGUARD_*`)
//! - Configuration validation before it is handed out
//!
//! # Example
//! ```no_run
//! # use navguard_config_file::FileConfigStore;
//! # use navguard_core::ConfigStore;
//! # async fn example() -> navguard_core::Result<()> {
//! let store = FileConfigStore::new("~/.navguard/app.yaml").await?;
//! let config = store.get_config().await?;
//! # Ok(())
//! # }
//! ```

mod file_store;

pub use file_store::FileConfigStore;
