//! Area policy evaluators
//!
//! Each area of the route space has its own rule set. Dispatch happens on
//! the parsed [`Area`]; routes outside the known areas pass through.

mod admin;
mod front;
mod superadmin;

use navguard_core::{Area, RouteRequest, Session};

use crate::context::EvaluationContext;
use crate::evaluation::Evaluation;

pub use admin::resolve_permission;

/// Second segment of the company setup wizard routes
const SETUP_SEGMENT: &str = "setup_app";

/// Run the rule set of the request's area
pub fn evaluate(
    request: &RouteRequest,
    session: &dyn Session,
    context: &EvaluationContext,
) -> Evaluation {
    let evaluation = match request.area() {
        Area::SuperAdmin => superadmin::evaluate(request, session, context),
        Area::Admin => admin::evaluate(request, session, context),
        Area::Front => front::evaluate(request, session, context),
        Area::Unrecognized => Evaluation::allow(),
    };

    tracing::trace!(
        route = request.name(),
        area = %request.area(),
        decision = %evaluation.decision,
        "Area policy evaluated"
    );

    evaluation
}

fn is_setup_route(request: &RouteRequest) -> bool {
    request.second_segment() == Some(SETUP_SEGMENT)
}
