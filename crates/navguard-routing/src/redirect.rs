//! Redirect target resolution
//!
//! Policies name where they want to send the user (login, module settings,
//! a dashboard) and the resolver turns that into the concrete route name for
//! the deployment's tenancy mode.

use navguard_core::TenancyMode;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Logical redirect destinations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RedirectTarget {
    /// Sign-in screen
    Login,
    /// Product registration / verification screen
    VerifyMain,
    /// Module licence settings of the administering area
    ModuleSettings,
    /// Dashboard of the super-admin area
    SuperAdminDashboard,
    /// Dashboard of the tenant-admin area
    AdminDashboard,
    /// Company setup wizard of the super-admin area
    SuperAdminSetup,
    /// Company setup wizard of the tenant-admin area
    AdminSetup,
    /// Public landing page
    FrontHomepage,
}

impl FromStr for RedirectTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "login" => Ok(RedirectTarget::Login),
            "verify_main" | "verify" => Ok(RedirectTarget::VerifyMain),
            "module_settings" | "modules" => Ok(RedirectTarget::ModuleSettings),
            "superadmin_dashboard" => Ok(RedirectTarget::SuperAdminDashboard),
            "admin_dashboard" | "dashboard" => Ok(RedirectTarget::AdminDashboard),
            "superadmin_setup" => Ok(RedirectTarget::SuperAdminSetup),
            "admin_setup" | "setup" => Ok(RedirectTarget::AdminSetup),
            "front_homepage" | "homepage" => Ok(RedirectTarget::FrontHomepage),
            other => Err(format!("unknown redirect target '{}'", other)),
        }
    }
}

/// Maps logical targets to route names for one tenancy mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RedirectResolver {
    mode: TenancyMode,
}

impl RedirectResolver {
    pub fn new(mode: TenancyMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> TenancyMode {
        self.mode
    }

    pub fn resolve(&self, target: RedirectTarget) -> &'static str {
        resolve(target, self.mode)
    }

    /// Routes reachable while verification is outstanding
    pub fn verification_routes(&self) -> [&'static str; 2] {
        [
            self.resolve(RedirectTarget::VerifyMain),
            self.resolve(RedirectTarget::ModuleSettings),
        ]
    }

    pub fn is_verification_route(&self, name: &str) -> bool {
        self.verification_routes().contains(&name)
    }
}

/// Resolve a logical target for a tenancy mode
pub fn resolve(target: RedirectTarget, mode: TenancyMode) -> &'static str {
    match (target, mode) {
        (RedirectTarget::Login, _) => "admin.login",
        (RedirectTarget::VerifyMain, _) => "verify.main",
        (RedirectTarget::ModuleSettings, TenancyMode::Single) => "admin.settings.modules.index",
        (RedirectTarget::ModuleSettings, TenancyMode::Multi) => {
            "superadmin.settings.modules.index"
        }
        (RedirectTarget::SuperAdminDashboard, _) => "superadmin.dashboard.index",
        (RedirectTarget::AdminDashboard, _) => "admin.dashboard.index",
        (RedirectTarget::SuperAdminSetup, _) => "superadmin.setup_app.index",
        (RedirectTarget::AdminSetup, _) => "admin.setup_app.index",
        (RedirectTarget::FrontHomepage, _) => "front.homepage",
    }
}
