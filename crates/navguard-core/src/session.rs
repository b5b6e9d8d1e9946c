//! Session collaborator
//!
//! The session store is owned by the hosting application. The guard only
//! reads it, and asks for two side effects: `logout()` and
//! `set_checking(bool)`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Authenticated user as seen by the guard
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub is_superadmin: bool,

    /// Permission strings granted to the user
    #[serde(default)]
    pub permissions: BTreeSet<String>,
}

impl User {
    pub fn superadmin() -> Self {
        Self {
            is_superadmin: true,
            permissions: BTreeSet::new(),
        }
    }

    pub fn with_permissions<I, S>(permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            is_superadmin: false,
            permissions: permissions.into_iter().map(Into::into).collect(),
        }
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.contains(permission)
    }
}

/// Application settings the company-setup checks read
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSetting {
    #[serde(default)]
    pub x_currency_id: Option<String>,

    #[serde(default)]
    pub white_label_completed: bool,
}

/// Session collaborator interface
pub trait Session {
    fn is_logged_in(&self) -> bool;

    fn user(&self) -> Option<&User>;

    fn app_setting(&self) -> &AppSetting;

    /// Drop authentication state
    fn logout(&mut self);

    /// Update the "app checking" flag shown while verification runs
    fn set_checking(&mut self, checking: bool);
}

/// Plain in-memory session, used by the CLI and tests
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    #[serde(default)]
    pub is_logged_in: bool,

    #[serde(default)]
    pub user: Option<User>,

    #[serde(default)]
    pub app_setting: AppSetting,

    #[serde(default)]
    pub checking: bool,
}

impl SessionState {
    /// Visitor without authentication
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Authenticated session for `user`
    pub fn logged_in(user: User) -> Self {
        Self {
            is_logged_in: true,
            user: Some(user),
            ..Default::default()
        }
    }

    pub fn with_app_setting(mut self, app_setting: AppSetting) -> Self {
        self.app_setting = app_setting;
        self
    }

    pub fn with_checking(mut self, checking: bool) -> Self {
        self.checking = checking;
        self
    }

    pub fn checking(&self) -> bool {
        self.checking
    }
}

impl Session for SessionState {
    fn is_logged_in(&self) -> bool {
        self.is_logged_in
    }

    fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    fn app_setting(&self) -> &AppSetting {
        &self.app_setting
    }

    fn logout(&mut self) {
        self.is_logged_in = false;
        self.user = None;
    }

    fn set_checking(&mut self, checking: bool) {
        self.checking = checking;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logout_clears_user() {
        let mut session = SessionState::logged_in(User::with_permissions(["users_view"]));
        assert!(session.is_logged_in());
        assert!(session.user().unwrap().has_permission("users_view"));

        session.logout();
        assert!(!session.is_logged_in());
        assert!(session.user().is_none());

        // Idempotent
        session.logout();
        assert_eq!(session, SessionState::anonymous());
    }

    #[test]
    fn test_set_checking() {
        let mut session = SessionState::anonymous().with_checking(true);
        session.set_checking(false);
        assert!(!session.checking());
    }

    #[test]
    fn test_deserialize_session_defaults() {
        let session: SessionState = serde_json::from_str(r#"{"is_logged_in": true}"#).unwrap();
        assert!(session.is_logged_in);
        assert!(session.user.is_none());
        assert_eq!(session.app_setting, AppSetting::default());

        let json = r#"{
            "is_logged_in": true,
            "user": {"is_superadmin": false, "permissions": ["reports.view"]},
            "app_setting": {"x_currency_id": "usd", "white_label_completed": true}
        }"#;
        let session: SessionState = serde_json::from_str(json).unwrap();
        let user = session.user().unwrap();
        assert!(user.has_permission("reports.view"));
        assert!(!user.has_permission("reports.edit"));
        assert_eq!(session.app_setting().x_currency_id.as_deref(), Some("usd"));
    }
}
