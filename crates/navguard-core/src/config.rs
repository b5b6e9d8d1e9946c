//! Application configuration
//!
//! Loaded once at startup (see `navguard-config-file`) and read-only
//! afterwards. Environment variables override file values.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::route::RouteDefinition;
use crate::tenant::TenancyMode;
use crate::{Error, Result};

/// Top-level configuration file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NavguardConfig {
    #[serde(default)]
    pub app: AppConfig,

    /// Routes known at startup
    #[serde(default)]
    pub routes: Vec<RouteDefinition>,

    /// Extension routes appended after startup in multi-tenant mode
    #[serde(default)]
    pub extensions: Vec<RouteDefinition>,

    #[serde(default)]
    pub notifications: NotificationConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Process-wide settings the guard chain reads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub tenancy_mode: TenancyMode,

    /// Product modules enabled in this deployment
    #[serde(default)]
    pub active_modules: Vec<String>,

    #[serde(default)]
    pub main_product_registered: bool,

    /// Set when the licence is already registered by another installation
    #[serde(default)]
    pub multiple_registration: bool,

    /// Base name of the main product (gets a `Saas` suffix in multi-tenant mode)
    #[serde(default = "default_product_name")]
    pub product_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<LicenseConfig>,
}

/// Licence key and the SHA-256 digest it must hash to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LicenseConfig {
    pub key: String,
    /// Lowercase hex SHA-256 of `key`
    pub sha256: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Toggles the dismissable toasts; the integrity modal is always raised
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_module_not_verified_message")]
    pub module_not_verified_message: String,

    #[serde(default = "default_integrity_message")]
    pub integrity_message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub json: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tenancy_mode: TenancyMode::default(),
            active_modules: Vec::new(),
            main_product_registered: false,
            multiple_registration: false,
            product_name: default_product_name(),
            license: None,
        }
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            module_not_verified_message: default_module_not_verified_message(),
            integrity_message: default_integrity_message(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl AppConfig {
    pub fn is_module_active(&self, module: &str) -> bool {
        self.active_modules.iter().any(|m| m == module)
    }

    /// Display name of the main product for the tenancy mode
    pub fn main_product_name(&self) -> String {
        match self.tenancy_mode {
            TenancyMode::Single => self.product_name.clone(),
            TenancyMode::Multi => format!("{}Saas", self.product_name),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.product_name.trim().is_empty() {
            return Err(Error::ConfigValidation(
                "product_name must not be empty".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for module in &self.active_modules {
            if module.trim().is_empty() {
                return Err(Error::ConfigValidation(
                    "active_modules must not contain empty names".to_string(),
                ));
            }
            if !seen.insert(module.as_str()) {
                return Err(Error::ConfigValidation(format!(
                    "duplicate active module '{}'",
                    module
                )));
            }
        }

        if let Some(license) = &self.license {
            let digest = license.sha256.trim();
            if digest.len() != 64 || !digest.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(Error::ConfigValidation(
                    "license.sha256 must be a 64 character hex digest".to_string(),
                ));
            }
        }

        Ok(())
    }
}

impl NavguardConfig {
    /// Merge environment variables into config (env vars take precedence)
    pub fn merge_env(&mut self) {
        if let Ok(val) = std::env::var("NAVGUARD_TENANCY_MODE") {
            match val.parse::<TenancyMode>() {
                Ok(mode) => self.app.tenancy_mode = mode,
                Err(e) => tracing::warn!("Ignoring NAVGUARD_TENANCY_MODE: {}", e),
            }
        }

        if let Ok(val) = std::env::var("NAVGUARD_ACTIVE_MODULES") {
            self.app.active_modules = val
                .split(',')
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .map(str::to_string)
                .collect();
        }

        if let Ok(val) = std::env::var("NAVGUARD_MAIN_PRODUCT_REGISTERED")
            && let Ok(registered) = val.parse::<bool>()
        {
            self.app.main_product_registered = registered;
        }

        if let Ok(val) = std::env::var("NAVGUARD_MULTIPLE_REGISTRATION")
            && let Ok(multiple) = val.parse::<bool>()
        {
            self.app.multiple_registration = multiple;
        }

        if let Ok(val) = std::env::var("NAVGUARD_LOG_LEVEL") {
            self.logging.level = val;
        }

        if let Ok(val) = std::env::var("NAVGUARD_LOG_JSON")
            && let Ok(json) = val.parse::<bool>()
        {
            self.logging.json = json;
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.app.validate()?;

        let mut seen = HashSet::new();
        for route in &self.routes {
            route.validate().map_err(|e| {
                Error::ConfigValidation(format!("routes: {}", e))
            })?;
            if !seen.insert(route.name.as_str()) {
                return Err(Error::ConfigValidation(format!(
                    "duplicate route '{}'",
                    route.name
                )));
            }
        }

        for route in &self.extensions {
            route.validate().map_err(|e| {
                Error::ConfigValidation(format!("extensions: {}", e))
            })?;
        }

        Ok(())
    }
}

fn default_product_name() -> String {
    "Hrmifly".to_string()
}

fn default_module_not_verified_message() -> String {
    "Modules Not Verified".to_string()
}

fn default_integrity_message() -> String {
    "Licence integrity check failed. Restore a valid licence and reload the application."
        .to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}
