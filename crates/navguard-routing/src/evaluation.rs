//! Result of evaluating one navigation attempt
//!
//! Evaluators are pure: they describe the session side effects and
//! notifications they want instead of performing them. The
//! [`NavigationGuard`](crate::NavigationGuard) applies them before handing
//! the decision back to the host router.

use navguard_core::{Decision, Denial};
use serde::Serialize;

use crate::notification::Notification;

/// Side effect requested by an evaluator
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Effect {
    /// `session.set_checking(value)`
    SetChecking { value: bool },
    /// Present a notification
    Notify(Notification),
}

/// Decision plus the effects and reason that go with it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Evaluation {
    pub decision: Decision,
    /// Effects in the order they must be applied
    pub effects: Vec<Effect>,
    /// Why the attempt was not allowed as requested
    pub denial: Option<Denial>,
}

impl Evaluation {
    pub fn allow() -> Self {
        Self {
            decision: Decision::Allow,
            effects: Vec::new(),
            denial: None,
        }
    }

    pub fn redirect(route: impl Into<String>, denial: Denial) -> Self {
        Self {
            decision: Decision::RedirectTo(route.into()),
            effects: Vec::new(),
            denial: Some(denial),
        }
    }

    pub fn force_logout(route: impl Into<String>, denial: Denial) -> Self {
        Self {
            decision: Decision::ForceLogoutAndRedirect(route.into()),
            effects: Vec::new(),
            denial: Some(denial),
        }
    }

    pub fn block(denial: Denial) -> Self {
        Self {
            decision: Decision::Block(denial.clone()),
            effects: Vec::new(),
            denial: Some(denial),
        }
    }

    /// Append an effect
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    /// Put effects ahead of the ones already recorded
    pub fn preceded_by(mut self, mut effects: Vec<Effect>) -> Self {
        effects.append(&mut self.effects);
        self.effects = effects;
        self
    }

    pub fn sets_checking(&self) -> Option<bool> {
        self.effects.iter().rev().find_map(|effect| match effect {
            Effect::SetChecking { value } => Some(*value),
            Effect::Notify(_) => None,
        })
    }

    pub fn notifications(&self) -> impl Iterator<Item = &Notification> {
        self.effects.iter().filter_map(|effect| match effect {
            Effect::Notify(notification) => Some(notification),
            Effect::SetChecking { .. } => None,
        })
    }
}
