//! Integration tests for the navigation guard
//!
//! These run full navigations through `NavigationGuard`: registry lookup,
//! the guard chain, area policies and effect application.

use async_trait::async_trait;
use mockall::mock;
use navguard_core::{
    AppConfig, AppSetting, Decision, Denial, Error, LicenseConfig, Permission, Result,
    RouteDefinition, RouteMeta, RouteRequest, RouteSource, SessionState, TenancyMode, User,
};
use navguard_routing::{
    EvaluationContext, NavigationGuard, Notification, NotificationKind, Notifier, RouteRegistry,
    StaticRouteSource, evaluate, load_extensions, spawn_extension_loader,
};
use std::collections::BTreeMap;
use std::sync::Arc;

mock! {
    pub TestNotifier {}

    impl Notifier for TestNotifier {
        fn notify(&self, notification: &Notification);
    }
}

// Route source that always fails
struct BrokenSource;

#[async_trait]
impl RouteSource for BrokenSource {
    fn name(&self) -> &str {
        "broken"
    }

    async fn load_routes(&self) -> Result<Vec<RouteDefinition>> {
        Err(Error::Registry("extension bundle missing".to_string()))
    }
}

fn auth_route(name: &str) -> RouteDefinition {
    RouteDefinition::new(name).with_meta(RouteMeta {
        require_auth: true,
        ..Default::default()
    })
}

fn app_config(mode: TenancyMode) -> AppConfig {
    AppConfig {
        tenancy_mode: mode,
        active_modules: vec!["Stock".to_string()],
        main_product_registered: true,
        ..Default::default()
    }
}

fn route_table() -> Vec<RouteDefinition> {
    vec![
        auth_route("admin.dashboard.index"),
        auth_route("admin.reports.index"),
        auth_route("superadmin.dashboard.index"),
        auth_route("front.account.index"),
        RouteDefinition::new("admin.login").with_meta(RouteMeta {
            require_unauth: true,
            ..Default::default()
        }),
        RouteDefinition::new("admin.settings.modules.index"),
        RouteDefinition::new("front.homepage"),
    ]
}

fn guard(mode: TenancyMode) -> NavigationGuard {
    let registry = RouteRegistry::from_definitions(route_table()).unwrap();
    NavigationGuard::new(Arc::new(registry), EvaluationContext::new(app_config(mode)))
}

fn configured_superadmin() -> SessionState {
    SessionState::logged_in(User::superadmin()).with_app_setting(AppSetting {
        x_currency_id: Some("eur".to_string()),
        white_label_completed: true,
    })
}

#[test]
fn test_require_auth_when_logged_out_per_area() {
    let guard = guard(TenancyMode::Multi);

    let mut session = SessionState::anonymous();
    assert_eq!(
        guard.navigate("admin.dashboard.index", BTreeMap::new(), &mut session),
        Decision::ForceLogoutAndRedirect("admin.login".to_string())
    );

    let mut session = SessionState::anonymous();
    assert_eq!(
        guard.navigate("front.account.index", BTreeMap::new(), &mut session),
        Decision::ForceLogoutAndRedirect("front.homepage".to_string())
    );

    let mut session = SessionState::anonymous();
    assert_eq!(
        guard.navigate("superadmin.dashboard.index", BTreeMap::new(), &mut session),
        Decision::RedirectTo("admin.login".to_string())
    );
}

#[test]
fn test_superadmin_dashboard_logged_out_does_not_logout() {
    let guard = guard(TenancyMode::Multi);
    let mut session = SessionState::anonymous().with_checking(true);
    let before = session.clone();

    let decision = guard.navigate("superadmin.dashboard.index", BTreeMap::new(), &mut session);

    assert_eq!(decision, Decision::RedirectTo("admin.login".to_string()));
    assert_eq!(session, before);
}

#[test]
fn test_tenant_user_in_superadmin_area() {
    let guard = guard(TenancyMode::Multi);
    let mut session = SessionState::logged_in(User::with_permissions(["reports.view"]));

    let decision = guard.navigate("superadmin.dashboard.index", BTreeMap::new(), &mut session);

    assert_eq!(
        decision,
        Decision::ForceLogoutAndRedirect("admin.login".to_string())
    );
    assert!(!session.is_logged_in);
}

#[test]
fn test_superadmin_in_admin_area() {
    let guard = guard(TenancyMode::Multi);
    let mut session = configured_superadmin();

    let decision = guard.navigate("admin.reports.index", BTreeMap::new(), &mut session);

    assert_eq!(
        decision,
        Decision::RedirectTo("superadmin.dashboard.index".to_string())
    );
    assert!(session.is_logged_in);
}

#[test]
fn test_module_settings_allows_and_clears_checking() {
    let guard = guard(TenancyMode::Single);
    let mut session = SessionState::logged_in(User::default()).with_checking(true);

    let decision = guard.navigate("admin.settings.modules.index", BTreeMap::new(), &mut session);

    assert_eq!(decision, Decision::Allow);
    assert!(!session.checking());
}

#[test]
fn test_unregistered_product_goes_to_verification() {
    let mut config = app_config(TenancyMode::Single);
    config.main_product_registered = false;
    let registry = RouteRegistry::from_definitions(route_table()).unwrap();
    let guard = NavigationGuard::new(Arc::new(registry), EvaluationContext::new(config));

    let mut session = SessionState::logged_in(User::default());
    assert_eq!(
        guard.navigate("admin.dashboard.index", BTreeMap::new(), &mut session),
        Decision::RedirectTo("verify.main".to_string())
    );
    assert_eq!(
        guard.navigate("verify.main", BTreeMap::new(), &mut session),
        Decision::Allow
    );
}

#[test]
fn test_stock_permission_is_normalised() {
    let context = EvaluationContext::new(app_config(TenancyMode::Single));
    let request = RouteRequest::new("admin.stock.items.index")
        .unwrap()
        .require_auth()
        .with_param("type", "items")
        .with_permission(Permission::derived(|r| {
            format!("stock-{}-view", r.param("type").unwrap_or_default())
        }));

    let holder = SessionState::logged_in(User::with_permissions(["stock_items_view"]));
    assert_eq!(evaluate(&request, &holder, &context).decision, Decision::Allow);

    let hyphenated = SessionState::logged_in(User::with_permissions(["stock-items-view"]));
    let evaluation = evaluate(&request, &hyphenated, &context);
    assert_eq!(
        evaluation.decision,
        Decision::RedirectTo("admin.dashboard.index".to_string())
    );
    assert_eq!(
        evaluation.denial,
        Some(Denial::PermissionDenied {
            permission: "stock_items_view".to_string()
        })
    );
}

#[test]
fn test_static_and_derived_permissions_agree() {
    let context = EvaluationContext::new(app_config(TenancyMode::Single));
    let static_request = RouteRequest::new("admin.reports.index")
        .unwrap()
        .require_auth()
        .with_permission("reports.view");
    let derived_request = RouteRequest::new("admin.reports.index")
        .unwrap()
        .require_auth()
        .with_permission(Permission::derived(|_| "reports.view".to_string()));

    let sessions = [
        SessionState::logged_in(User::with_permissions(["reports.view"])),
        SessionState::logged_in(User::with_permissions(["reports.edit"])),
        SessionState::anonymous(),
        configured_superadmin(),
    ];

    for session in &sessions {
        assert_eq!(
            evaluate(&static_request, session, &context),
            evaluate(&derived_request, session, &context)
        );
    }
}

#[test]
fn test_repeated_navigation_is_idempotent() {
    let guard = guard(TenancyMode::Single);
    let routes = [
        "admin.dashboard.index",
        "admin.login",
        "admin.settings.modules.index",
        "front.account.index",
        "superadmin.dashboard.index",
        "unknown.page",
    ];

    for name in routes {
        let initial = SessionState::logged_in(User::with_permissions(["reports.view"]));

        let mut first_session = initial.clone();
        let first = guard.navigate(name, BTreeMap::new(), &mut first_session);
        let mut second_session = initial.clone();
        let second = guard.navigate(name, BTreeMap::new(), &mut second_session);

        assert_eq!(first, second, "decision changed for {}", name);
        assert_eq!(first_session, second_session, "effects differ for {}", name);

        // Applying the effects again leaves the session as it was
        if !first.forces_logout() {
            let after = first_session.clone();
            assert_eq!(guard.navigate(name, BTreeMap::new(), &mut first_session), first);
            assert_eq!(first_session, after, "session changed for {}", name);
        }
    }
}

#[test]
fn test_integrity_failure_notifies_once() {
    let mut notifier = MockTestNotifier::new();
    notifier
        .expect_notify()
        .withf(|n| n.kind == NotificationKind::IntegrityViolation && !n.dismissable)
        .times(1)
        .return_const(());

    let mut config = app_config(TenancyMode::Single);
    config.license = Some(LicenseConfig {
        key: "licence-key".to_string(),
        sha256: "f".repeat(64),
    });
    let registry = RouteRegistry::from_definitions(route_table()).unwrap();
    let guard = NavigationGuard::new(Arc::new(registry), EvaluationContext::new(config))
        .with_notifier(Arc::new(notifier));

    let mut session = SessionState::logged_in(User::default());
    let decision = guard.navigate("admin.dashboard.index", BTreeMap::new(), &mut session);

    assert_eq!(decision, Decision::Block(Denial::IntegrityViolation));
    assert!(session.is_logged_in);
}

#[test]
fn test_allowed_navigation_never_notifies() {
    let mut notifier = MockTestNotifier::new();
    notifier.expect_notify().times(0);

    let registry = RouteRegistry::from_definitions(route_table()).unwrap();
    let guard = NavigationGuard::new(
        Arc::new(registry),
        EvaluationContext::new(app_config(TenancyMode::Single)),
    )
    .with_notifier(Arc::new(notifier));

    let mut session = SessionState::logged_in(User::default());
    assert_eq!(
        guard.navigate("admin.dashboard.index", BTreeMap::new(), &mut session),
        Decision::Allow
    );
}

#[tokio::test]
async fn test_extension_routes_apply_after_loading() {
    let registry = Arc::new(RouteRegistry::from_definitions(route_table()).unwrap());
    let guard = NavigationGuard::new(
        registry.clone(),
        EvaluationContext::new(app_config(TenancyMode::Multi)),
    );
    let mut session = SessionState::anonymous();

    // Not registered yet: unrecognized area, passes through
    assert_eq!(
        guard.navigate("admin.payroll.index", BTreeMap::new(), &mut session),
        Decision::Allow
    );

    let sources: Vec<Arc<dyn RouteSource>> = vec![
        Arc::new(BrokenSource),
        Arc::new(StaticRouteSource::new(
            "payroll",
            vec![auth_route("admin.payroll.index")],
        )),
    ];
    let handle = spawn_extension_loader(registry.clone(), sources, TenancyMode::Multi).unwrap();
    assert_eq!(handle.await.unwrap(), 1);
    assert_eq!(registry.version(), 2);

    assert_eq!(
        guard.navigate("admin.payroll.index", BTreeMap::new(), &mut session),
        Decision::ForceLogoutAndRedirect("admin.login".to_string())
    );
}

#[tokio::test]
async fn test_extensions_never_override_static_routes() {
    let registry = RouteRegistry::from_definitions(route_table()).unwrap();
    let sources: Vec<Arc<dyn RouteSource>> = vec![Arc::new(StaticRouteSource::new(
        "override",
        vec![RouteDefinition::new("admin.dashboard.index")],
    ))];

    assert_eq!(load_extensions(&registry, &sources).await, 0);
    let snapshot = registry.snapshot();
    assert!(snapshot.get("admin.dashboard.index").unwrap().meta.require_auth);
}
