//! Rules for `front.*` routes (anonymous visitors)

use navguard_core::{Denial, RouteRequest, Session};

use crate::context::EvaluationContext;
use crate::evaluation::Evaluation;
use crate::redirect::RedirectTarget;

pub(super) fn evaluate(
    request: &RouteRequest,
    session: &dyn Session,
    context: &EvaluationContext,
) -> Evaluation {
    if request.meta.require_auth && !session.is_logged_in() {
        return Evaluation::force_logout(
            context.resolver().resolve(RedirectTarget::FrontHomepage),
            Denial::Unauthorized,
        );
    }

    Evaluation::allow()
}
