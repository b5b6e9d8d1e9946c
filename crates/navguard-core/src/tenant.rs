//! Tenancy mode of a deployment

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// Whether the deployment serves one organization or many.
///
/// The mode decides which concrete routes exist: multi-tenant deployments
/// carry a super-admin area and move module settings under it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TenancyMode {
    /// One organization (`non-saas` in legacy configs)
    #[default]
    #[serde(alias = "non-saas")]
    Single,
    /// Many organizations behind a super-admin (`saas` in legacy configs)
    #[serde(alias = "saas")]
    Multi,
}

impl TenancyMode {
    /// Check if this is single-tenant mode
    pub fn is_single_tenant(&self) -> bool {
        matches!(self, TenancyMode::Single)
    }

    /// Check if this is multi-tenant mode
    pub fn is_multi_tenant(&self) -> bool {
        matches!(self, TenancyMode::Multi)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TenancyMode::Single => "single",
            TenancyMode::Multi => "multi",
        }
    }
}

impl fmt::Display for TenancyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TenancyMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "single" | "non-saas" => Ok(TenancyMode::Single),
            "multi" | "saas" => Ok(TenancyMode::Multi),
            other => Err(Error::Config(format!(
                "Invalid tenancy mode '{}'. Use 'single' or 'multi'",
                other
            ))),
        }
    }
}
