//! Navigation guard chain
//!
//! Global gates run in a fixed order before the area policy. The first gate
//! that produces an outcome wins; later gates are not consulted.

use navguard_core::{Denial, RouteRequest, Session};

use crate::context::EvaluationContext;
use crate::evaluation::{Effect, Evaluation};
use crate::notification::Notification;
use crate::policy;
use crate::redirect::RedirectTarget;

/// Evaluate one navigation attempt
pub fn evaluate(
    request: &RouteRequest,
    session: &dyn Session,
    context: &EvaluationContext,
) -> Evaluation {
    let config = context.config();
    let resolver = context.resolver();

    // Module activation
    if let Some(module) = &request.meta.app_module
        && !config.is_module_active(module)
    {
        tracing::debug!(route = request.name(), module = %module, "Module is not active");
        return Evaluation::redirect(
            resolver.resolve(RedirectTarget::Login),
            Denial::ModuleInactive {
                module: module.clone(),
            },
        );
    }

    // Integrity, checked on every attempt
    if !context.integrity().is_intact() {
        tracing::warn!(route = request.name(), "Integrity check failed, blocking navigation");
        // The modal is shown even with notifications disabled
        return Evaluation::block(Denial::IntegrityViolation).with_effect(Effect::Notify(
            Notification::integrity_violation(context.notifications()),
        ));
    }

    let verification = context.verification();
    let is_verification_route = resolver.is_verification_route(request.name());

    // Outstanding verification
    if let Some(entry) = verification.first_unverified() {
        tracing::debug!(
            route = request.name(),
            unverified = %entry.name,
            "Verification outstanding"
        );
        let reset = vec![Effect::SetChecking { value: false }];

        if is_verification_route {
            return Evaluation::allow().preceded_by(reset);
        }
        return policy::evaluate(request, session, context).preceded_by(reset);
    }

    if is_verification_route {
        return Evaluation::allow().with_effect(Effect::SetChecking { value: false });
    }

    // Registration
    if !config.main_product_registered || config.multiple_registration {
        tracing::debug!(
            route = request.name(),
            registered = config.main_product_registered,
            multiple_registration = config.multiple_registration,
            "Main product registration required"
        );
        return Evaluation::redirect(
            resolver.resolve(RedirectTarget::VerifyMain),
            Denial::NotRegistered,
        );
    }

    // Per-module licence. Safety net for verification states the
    // outstanding-verification gate above does not cover.
    if let Some(module) = &request.meta.app_module
        && verification.is_module_unverified(module)
    {
        tracing::debug!(route = request.name(), module = %module, "Module is not verified");
        let evaluation = Evaluation::redirect(
            resolver.resolve(RedirectTarget::ModuleSettings),
            Denial::ModuleNotVerified {
                module: module.clone(),
            },
        );
        return if context.notifications().enabled {
            evaluation.with_effect(Effect::Notify(Notification::module_not_verified(
                context.notifications(),
            )))
        } else {
            evaluation
        };
    }

    policy::evaluate(request, session, context)
}
