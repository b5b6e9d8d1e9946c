//! Navigation decisions and the reasons behind them

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Outcome of one navigation attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "route", rename_all = "snake_case")]
pub enum Decision {
    /// Continue to the requested route
    Allow,
    /// Navigate to another route instead
    RedirectTo(String),
    /// Log the session out, then navigate to the route
    ForceLogoutAndRedirect(String),
    /// Abandon navigation; the host must reload to recover
    Block(Denial),
}

impl Decision {
    pub fn is_allow(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    /// Route the host should navigate to instead, if any
    pub fn redirect_target(&self) -> Option<&str> {
        match self {
            Decision::RedirectTo(route) | Decision::ForceLogoutAndRedirect(route) => Some(route),
            Decision::Allow | Decision::Block(_) => None,
        }
    }

    pub fn forces_logout(&self) -> bool {
        matches!(self, Decision::ForceLogoutAndRedirect(_))
    }

    /// Short label for logs and metrics
    pub fn outcome(&self) -> &'static str {
        match self {
            Decision::Allow => "allow",
            Decision::RedirectTo(_) => "redirect",
            Decision::ForceLogoutAndRedirect(_) => "force_logout",
            Decision::Block(_) => "block",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Allow => write!(f, "allow"),
            Decision::RedirectTo(route) => write!(f, "redirect to {}", route),
            Decision::ForceLogoutAndRedirect(route) => {
                write!(f, "logout and redirect to {}", route)
            }
            Decision::Block(reason) => write!(f, "block: {}", reason),
        }
    }
}

/// Why a navigation attempt was not allowed as requested
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Denial {
    /// Tamper/licence check failed; nothing may proceed
    #[error("Integrity check failed")]
    IntegrityViolation,

    #[error("Module not verified: {module}")]
    ModuleNotVerified { module: String },

    #[error("Permission denied: {permission}")]
    PermissionDenied { permission: String },

    #[error("Authentication required")]
    Unauthorized,

    /// Session role does not fit the area
    #[error("Role mismatch for this area")]
    RoleMismatch,

    #[error("Module is not active: {module}")]
    ModuleInactive { module: String },

    #[error("Main product is not registered")]
    NotRegistered,

    #[error("Company setup is incomplete")]
    CompanySetupIncomplete,

    #[error("Already authenticated")]
    AlreadyAuthenticated,
}

impl Denial {
    /// Short label for logs and metrics
    pub fn kind(&self) -> &'static str {
        match self {
            Denial::IntegrityViolation => "integrity_violation",
            Denial::ModuleNotVerified { .. } => "module_not_verified",
            Denial::PermissionDenied { .. } => "permission_denied",
            Denial::Unauthorized => "unauthorized",
            Denial::RoleMismatch => "role_mismatch",
            Denial::ModuleInactive { .. } => "module_inactive",
            Denial::NotRegistered => "not_registered",
            Denial::CompanySetupIncomplete => "company_setup_incomplete",
            Denial::AlreadyAuthenticated => "already_authenticated",
        }
    }

    /// Only an integrity violation strands the user
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Denial::IntegrityViolation)
    }
}
