//! Evaluation context
//!
//! Everything the guard chain reads besides the request and the session.
//! The application bootstrap builds it once and passes it by reference
//! into every evaluation.

use navguard_core::{AppConfig, NotificationConfig};
use std::sync::Arc;

use crate::predicates::{
    AlwaysIntact, CompanySetupCheck, CurrencyAndWhiteLabel, IntegrityCheck, LicenseDigestCheck,
    SetupAlwaysComplete,
};
use crate::redirect::RedirectResolver;
use crate::verification::VerificationState;

#[derive(Debug, Clone)]
pub struct EvaluationContext {
    config: Arc<AppConfig>,
    notifications: NotificationConfig,
    verification: VerificationState,
    resolver: RedirectResolver,
    integrity: Arc<dyn IntegrityCheck>,
    superadmin_setup: Arc<dyn CompanySetupCheck>,
    admin_setup: Arc<dyn CompanySetupCheck>,
}

impl EvaluationContext {
    /// Build a context with the default predicates
    ///
    /// - integrity: licence digest check when `license` is configured, else always intact
    /// - super-admin setup: currency chosen and white label completed
    /// - tenant-admin setup: always complete
    pub fn new(config: AppConfig) -> Self {
        let integrity: Arc<dyn IntegrityCheck> = match &config.license {
            Some(license) => Arc::new(LicenseDigestCheck::new(license)),
            None => Arc::new(AlwaysIntact),
        };

        Self {
            verification: VerificationState::build(&config),
            resolver: RedirectResolver::new(config.tenancy_mode),
            notifications: NotificationConfig::default(),
            integrity,
            superadmin_setup: Arc::new(CurrencyAndWhiteLabel),
            admin_setup: Arc::new(SetupAlwaysComplete),
            config: Arc::new(config),
        }
    }

    pub fn with_notifications(mut self, notifications: NotificationConfig) -> Self {
        self.notifications = notifications;
        self
    }

    pub fn with_integrity_check(mut self, check: Arc<dyn IntegrityCheck>) -> Self {
        self.integrity = check;
        self
    }

    pub fn with_superadmin_setup_check(mut self, check: Arc<dyn CompanySetupCheck>) -> Self {
        self.superadmin_setup = check;
        self
    }

    pub fn with_admin_setup_check(mut self, check: Arc<dyn CompanySetupCheck>) -> Self {
        self.admin_setup = check;
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn notifications(&self) -> &NotificationConfig {
        &self.notifications
    }

    pub fn verification(&self) -> &VerificationState {
        &self.verification
    }

    /// Mutable access for hosts that update verification flags
    pub fn verification_mut(&mut self) -> &mut VerificationState {
        &mut self.verification
    }

    pub fn resolver(&self) -> &RedirectResolver {
        &self.resolver
    }

    pub fn integrity(&self) -> &dyn IntegrityCheck {
        self.integrity.as_ref()
    }

    pub fn superadmin_setup(&self) -> &dyn CompanySetupCheck {
        self.superadmin_setup.as_ref()
    }

    pub fn admin_setup(&self) -> &dyn CompanySetupCheck {
        self.admin_setup.as_ref()
    }
}
