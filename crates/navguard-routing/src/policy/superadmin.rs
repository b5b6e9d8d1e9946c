//! Rules for `superadmin.*` routes

use navguard_core::{Denial, RouteRequest, Session};

use super::is_setup_route;
use crate::context::EvaluationContext;
use crate::evaluation::Evaluation;
use crate::redirect::RedirectTarget;

pub(super) fn evaluate(
    request: &RouteRequest,
    session: &dyn Session,
    context: &EvaluationContext,
) -> Evaluation {
    let meta = &request.meta;
    let resolver = context.resolver();
    let logged_in = session.is_logged_in();

    if meta.require_auth && logged_in && session.user().is_some_and(|u| !u.is_superadmin) {
        return Evaluation::force_logout(
            resolver.resolve(RedirectTarget::Login),
            Denial::Unauthorized,
        );
    }

    if meta.require_auth
        && logged_in
        && !is_setup_route(request)
        && !context
            .superadmin_setup()
            .is_complete(session.app_setting())
    {
        return Evaluation::redirect(
            resolver.resolve(RedirectTarget::SuperAdminSetup),
            Denial::CompanySetupIncomplete,
        );
    }

    // No forced logout here: there is no super-admin session to drop
    if meta.require_auth && !logged_in {
        return Evaluation::redirect(
            resolver.resolve(RedirectTarget::Login),
            Denial::Unauthorized,
        );
    }

    if meta.require_unauth && logged_in {
        return Evaluation::redirect(
            resolver.resolve(RedirectTarget::SuperAdminDashboard),
            Denial::AlreadyAuthenticated,
        );
    }

    Evaluation::allow()
}
