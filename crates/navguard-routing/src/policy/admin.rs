//! Rules for `admin.*` routes (tenant administrators)

use navguard_core::{Denial, Permission, RouteRequest, Session};

use super::is_setup_route;
use crate::context::EvaluationContext;
use crate::evaluation::{Effect, Evaluation};
use crate::redirect::RedirectTarget;

/// Second segment of stock routes, whose derived permissions use `-`
const STOCK_SEGMENT: &str = "stock";

/// Resolve the permission string a request must hold
///
/// Derived permissions on stock routes are normalised to underscores.
pub fn resolve_permission(request: &RouteRequest, permission: &Permission) -> String {
    let resolved = permission.resolve(request);

    if permission.is_derived() && request.second_segment() == Some(STOCK_SEGMENT) {
        resolved.replace('-', "_")
    } else {
        resolved
    }
}

pub(super) fn evaluate(
    request: &RouteRequest,
    session: &dyn Session,
    context: &EvaluationContext,
) -> Evaluation {
    let meta = &request.meta;
    let resolver = context.resolver();
    let logged_in = session.is_logged_in();

    if session.user().is_some_and(|u| u.is_superadmin) {
        return Evaluation::redirect(
            resolver.resolve(RedirectTarget::SuperAdminDashboard),
            Denial::RoleMismatch,
        );
    }

    if meta.require_auth && !logged_in {
        return Evaluation::force_logout(
            resolver.resolve(RedirectTarget::Login),
            Denial::Unauthorized,
        );
    }

    if meta.require_auth
        && !is_setup_route(request)
        && !context.admin_setup().is_complete(session.app_setting())
    {
        return Evaluation::redirect(
            resolver.resolve(RedirectTarget::AdminSetup),
            Denial::CompanySetupIncomplete,
        );
    }

    if meta.require_unauth && logged_in {
        return Evaluation::redirect(
            resolver.resolve(RedirectTarget::AdminDashboard),
            Denial::AlreadyAuthenticated,
        );
    }

    // Module settings must stay reachable so licences can be fixed
    if request.name() == resolver.resolve(RedirectTarget::ModuleSettings) {
        return Evaluation::allow().with_effect(Effect::SetChecking { value: false });
    }

    if let Some(permission) = &meta.permission {
        let required = resolve_permission(request, permission);

        if !session.user().is_some_and(|u| u.has_permission(&required)) {
            tracing::debug!(
                route = request.name(),
                permission = %required,
                "Permission not held"
            );
            return Evaluation::redirect(
                resolver.resolve(RedirectTarget::AdminDashboard),
                Denial::PermissionDenied {
                    permission: required,
                },
            );
        }
    }

    Evaluation::allow()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predicates::CompanySetupCheck;
    use navguard_core::{AppConfig, AppSetting, Decision, SessionState, TenancyMode, User};
    use std::sync::Arc;

    fn context(mode: TenancyMode) -> EvaluationContext {
        EvaluationContext::new(AppConfig {
            tenancy_mode: mode,
            main_product_registered: true,
            ..Default::default()
        })
    }

    fn request(name: &str) -> RouteRequest {
        RouteRequest::new(name).unwrap()
    }

    #[derive(Debug)]
    struct NeverComplete;

    impl CompanySetupCheck for NeverComplete {
        fn is_complete(&self, _setting: &AppSetting) -> bool {
            false
        }
    }

    #[test]
    fn test_superadmin_is_sent_to_own_dashboard() {
        let evaluation = evaluate(
            &request("admin.users.index"),
            &SessionState::logged_in(User::superadmin()),
            &context(TenancyMode::Multi),
        );
        assert_eq!(
            evaluation.decision,
            Decision::RedirectTo("superadmin.dashboard.index".to_string())
        );
        assert_eq!(evaluation.denial, Some(Denial::RoleMismatch));
    }

    #[test]
    fn test_logged_out_is_forced_to_login() {
        let evaluation = evaluate(
            &request("admin.dashboard.index").require_auth(),
            &SessionState::anonymous(),
            &context(TenancyMode::Single),
        );
        assert_eq!(
            evaluation.decision,
            Decision::ForceLogoutAndRedirect("admin.login".to_string())
        );
    }

    #[test]
    fn test_setup_check_is_pluggable() {
        let context =
            context(TenancyMode::Single).with_admin_setup_check(Arc::new(NeverComplete));
        let session = SessionState::logged_in(User::default());

        let evaluation = evaluate(&request("admin.dashboard.index").require_auth(), &session, &context);
        assert_eq!(
            evaluation.decision,
            Decision::RedirectTo("admin.setup_app.index".to_string())
        );

        let evaluation = evaluate(&request("admin.setup_app.index").require_auth(), &session, &context);
        assert!(evaluation.decision.is_allow());
    }

    #[test]
    fn test_require_unauth_when_logged_in() {
        let evaluation = evaluate(
            &request("admin.login").require_unauth(),
            &SessionState::logged_in(User::default()),
            &context(TenancyMode::Single),
        );
        assert_eq!(
            evaluation.decision,
            Decision::RedirectTo("admin.dashboard.index".to_string())
        );
        assert_eq!(evaluation.denial, Some(Denial::AlreadyAuthenticated));
    }

    #[test]
    fn test_module_settings_escape_hatch() {
        let evaluation = evaluate(
            &request("admin.settings.modules.index").with_permission("modules_manage"),
            &SessionState::anonymous(),
            &context(TenancyMode::Single),
        );
        assert_eq!(evaluation.decision, Decision::Allow);
        assert_eq!(evaluation.sets_checking(), Some(false));
    }

    #[test]
    fn test_module_settings_name_follows_tenancy() {
        // In multi-tenant mode module settings live under superadmin
        let evaluation = evaluate(
            &request("admin.settings.modules.index").with_permission("modules_manage"),
            &SessionState::logged_in(User::default()),
            &context(TenancyMode::Multi),
        );
        assert_eq!(
            evaluation.decision,
            Decision::RedirectTo("admin.dashboard.index".to_string())
        );
        assert_eq!(evaluation.sets_checking(), None);
    }

    #[test]
    fn test_permission_held_and_missing() {
        let session = SessionState::logged_in(User::with_permissions(["reports.view"]));

        let evaluation = evaluate(
            &request("admin.reports.index").require_auth().with_permission("reports.view"),
            &session,
            &context(TenancyMode::Single),
        );
        assert!(evaluation.decision.is_allow());

        let evaluation = evaluate(
            &request("admin.reports.edit").require_auth().with_permission("reports.edit"),
            &session,
            &context(TenancyMode::Single),
        );
        assert_eq!(
            evaluation.decision,
            Decision::RedirectTo("admin.dashboard.index".to_string())
        );
        assert_eq!(
            evaluation.denial,
            Some(Denial::PermissionDenied {
                permission: "reports.edit".to_string()
            })
        );
    }

    #[test]
    fn test_stock_derived_permission_uses_underscores() {
        let request = request("admin.stock.items.index")
            .with_permission(Permission::derived(|_| "stock-items-view".to_string()));
        let permission = request.meta.permission.clone().unwrap();
        assert_eq!(resolve_permission(&request, &permission), "stock_items_view");

        let session = SessionState::logged_in(User::with_permissions(["stock_items_view"]));
        let evaluation = evaluate(&request, &session, &context(TenancyMode::Single));
        assert!(evaluation.decision.is_allow());
    }

    #[test]
    fn test_static_stock_permission_is_untouched() {
        let request = request("admin.stock.items.index").with_permission("stock-items-view");
        let permission = request.meta.permission.clone().unwrap();
        assert_eq!(resolve_permission(&request, &permission), "stock-items-view");
    }

    #[test]
    fn test_derived_permission_outside_stock_is_untouched() {
        let request = request("admin.purchases.index")
            .with_param("kind", "purchase-orders")
            .with_permission(Permission::derived(|r| {
                format!("{}-view", r.param("kind").unwrap_or_default())
            }));
        let permission = request.meta.permission.clone().unwrap();
        assert_eq!(
            resolve_permission(&request, &permission),
            "purchase-orders-view"
        );
    }
}
