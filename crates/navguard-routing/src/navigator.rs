//! Router adapter
//!
//! `NavigationGuard` sits between the host router and the guard chain. It
//! looks the route up in the registry, evaluates it, applies the requested
//! effects to the session, forwards notifications and records metrics.

use navguard_core::{Decision, RouteRequest, Session};
use navguard_observability::Metrics;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use crate::context::EvaluationContext;
use crate::evaluation::{Effect, Evaluation};
use crate::guard;
use crate::notification::{Notifier, TracingNotifier};
use crate::registry::RouteRegistry;

pub struct NavigationGuard {
    registry: Arc<RouteRegistry>,
    context: EvaluationContext,
    notifier: Arc<dyn Notifier>,
    metrics: Option<Arc<Metrics>>,
}

impl NavigationGuard {
    pub fn new(registry: Arc<RouteRegistry>, context: EvaluationContext) -> Self {
        Self {
            registry,
            context,
            notifier: Arc::new(TracingNotifier),
            metrics: None,
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn registry(&self) -> &Arc<RouteRegistry> {
        &self.registry
    }

    pub fn context(&self) -> &EvaluationContext {
        &self.context
    }

    /// Mutable context, e.g. to record licence check results
    pub fn context_mut(&mut self) -> &mut EvaluationContext {
        &mut self.context
    }

    /// Handle a navigation to a named route
    pub fn navigate(
        &self,
        name: &str,
        params: BTreeMap<String, String>,
        session: &mut dyn Session,
    ) -> Decision {
        let request = self.registry.request_for(name, params);
        self.navigate_request(&request, session).decision
    }

    /// Evaluate a prepared request and apply its effects
    ///
    /// Effects are applied in order; a forced logout happens last.
    pub fn navigate_request(&self, request: &RouteRequest, session: &mut dyn Session) -> Evaluation {
        let started = Instant::now();
        let evaluation = guard::evaluate(request, session, &self.context);

        for effect in &evaluation.effects {
            match effect {
                Effect::SetChecking { value } => session.set_checking(*value),
                Effect::Notify(notification) => self.notifier.notify(notification),
            }
        }

        if evaluation.decision.forces_logout() {
            session.logout();
        }

        match &evaluation.denial {
            Some(denial) => tracing::debug!(
                route = request.name(),
                decision = %evaluation.decision,
                reason = denial.kind(),
                "Navigation not allowed as requested"
            ),
            None => tracing::trace!(route = request.name(), "Navigation allowed"),
        }

        if let Some(metrics) = &self.metrics {
            metrics.record_decision(
                request.area().as_str(),
                evaluation.decision.outcome(),
                evaluation.denial.as_ref().map(|d| d.kind()),
                started.elapsed().as_secs_f64(),
            );
            let snapshot = self.registry.snapshot();
            metrics.update_registry(snapshot.len(), snapshot.version());
        }

        evaluation
    }
}
