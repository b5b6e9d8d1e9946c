//! Pluggable predicates the guard chain consults
//!
//! - [`IntegrityCheck`]: licence tamper check, evaluated on every attempt
//! - [`CompanySetupCheck`]: whether an area's company setup is complete

use navguard_core::{AppSetting, LicenseConfig};
use sha2::{Digest, Sha256};
use std::fmt::Debug;

/// Tamper/licence check independent of the session
pub trait IntegrityCheck: Debug + Send + Sync {
    fn is_intact(&self) -> bool;
}

/// Integrity check that always passes
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysIntact;

impl IntegrityCheck for AlwaysIntact {
    fn is_intact(&self) -> bool {
        true
    }
}

/// Compares the SHA-256 of the configured licence key with its expected digest
#[derive(Debug, Clone)]
pub struct LicenseDigestCheck {
    key: String,
    expected: String,
}

impl LicenseDigestCheck {
    pub fn new(license: &LicenseConfig) -> Self {
        Self {
            key: license.key.clone(),
            expected: license.sha256.trim().to_lowercase(),
        }
    }
}

impl IntegrityCheck for LicenseDigestCheck {
    fn is_intact(&self) -> bool {
        let digest = format!("{:x}", Sha256::digest(self.key.as_bytes()));
        digest == self.expected
    }
}

/// Whether an area's company setup is complete for the current session
pub trait CompanySetupCheck: Debug + Send + Sync {
    fn is_complete(&self, setting: &AppSetting) -> bool;
}

/// Setup is complete once a currency is chosen and white-labelling is done
#[derive(Debug, Clone, Copy, Default)]
pub struct CurrencyAndWhiteLabel;

impl CompanySetupCheck for CurrencyAndWhiteLabel {
    fn is_complete(&self, setting: &AppSetting) -> bool {
        setting.x_currency_id.is_some() && setting.white_label_completed
    }
}

/// Setup check that always passes
#[derive(Debug, Clone, Copy, Default)]
pub struct SetupAlwaysComplete;

impl CompanySetupCheck for SetupAlwaysComplete {
    fn is_complete(&self, _setting: &AppSetting) -> bool {
        true
    }
}
