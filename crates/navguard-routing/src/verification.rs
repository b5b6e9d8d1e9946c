//! Module verification tracking
//!
//! Holds one "verified" flag for the main product and one per active module.
//! The state is rebuilt from `AppConfig`; every active module always has an
//! entry. Entries start verified; the host flips them after its own licence
//! checks.

use navguard_core::AppConfig;
use serde::Serialize;

/// Verification flag for one product or module
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationEntry {
    pub name: String,
    pub verified: bool,
}

/// Verification flags for the main product and every active module
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationState {
    entries: Vec<VerificationEntry>,
}

impl VerificationState {
    /// Build the initial state from config, everything verified
    pub fn build(config: &AppConfig) -> Self {
        let entries = std::iter::once(config.main_product_name())
            .chain(config.active_modules.iter().cloned())
            .map(|name| VerificationEntry {
                name,
                verified: true,
            })
            .collect();

        Self { entries }
    }

    /// First entry (main product first, then modules in config order) not verified
    pub fn first_unverified(&self) -> Option<&VerificationEntry> {
        self.entries.iter().find(|entry| !entry.verified)
    }

    pub fn has_unverified(&self) -> bool {
        self.first_unverified().is_some()
    }

    /// Check whether `name` has an entry that is not verified
    ///
    /// Names without an entry are not reported as unverified.
    pub fn is_module_unverified(&self, name: &str) -> bool {
        self.entries
            .iter()
            .any(|entry| entry.name == name && !entry.verified)
    }

    /// Update the flag for `name`
    ///
    /// Returns `false` when no entry has that name (nothing changes).
    pub fn set_verified(&mut self, name: &str, verified: bool) -> bool {
        match self.entries.iter_mut().find(|entry| entry.name == name) {
            Some(entry) => {
                entry.verified = verified;
                true
            }
            None => {
                tracing::warn!("No verification entry for '{}'", name);
                false
            }
        }
    }

    pub fn entries(&self) -> &[VerificationEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use navguard_core::TenancyMode;

    fn config(mode: TenancyMode, modules: &[&str]) -> AppConfig {
        AppConfig {
            tenancy_mode: mode,
            active_modules: modules.iter().map(|m| m.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_build_has_main_product_and_every_module() {
        let state = VerificationState::build(&config(TenancyMode::Single, &["Payroll", "Assets"]));

        assert_eq!(state.len(), 3);
        assert_eq!(state.entries()[0].name, "Hrmifly");
        assert_eq!(state.entries()[1].name, "Payroll");
        assert_eq!(state.entries()[2].name, "Assets");
        assert!(state.entries().iter().all(|e| e.verified));
        assert!(state.first_unverified().is_none());
    }

    #[test]
    fn test_main_product_name_follows_tenancy() {
        let state = VerificationState::build(&config(TenancyMode::Multi, &[]));
        assert_eq!(state.len(), 1);
        assert_eq!(state.entries()[0].name, "HrmiflySaas");
    }

    #[test]
    fn test_first_unverified_and_module_lookup() {
        let mut state =
            VerificationState::build(&config(TenancyMode::Single, &["Payroll", "Assets"]));

        assert!(state.set_verified("Assets", false));
        assert!(state.set_verified("Payroll", false));

        // Config order, not update order
        assert_eq!(state.first_unverified().unwrap().name, "Payroll");
        assert!(state.is_module_unverified("Assets"));
        assert!(!state.is_module_unverified("Hrmifly"));
        assert!(!state.is_module_unverified("Recruitment"));

        assert!(state.set_verified("Payroll", true));
        assert!(state.set_verified("Assets", true));
        assert!(!state.has_unverified());
    }

    #[test]
    fn test_set_verified_unknown_name() {
        let mut state = VerificationState::build(&config(TenancyMode::Single, &[]));
        assert!(!state.set_verified("Ghost", false));
        assert!(!state.has_unverified());
        assert_eq!(state.len(), 1);
    }
}
