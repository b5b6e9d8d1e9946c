//! navguard Routing Engine
//!
//! This crate decides what happens to every navigation attempt:
//! - Module verification tracking
//! - Redirect target resolution per tenancy mode
//! - Area policies (super-admin, tenant-admin, front)
//! - The global guard chain
//! - Versioned route registry with background extension loading
//! - Router adapter that applies session effects

pub mod context;
pub mod evaluation;
pub mod guard;
pub mod navigator;
pub mod notification;
pub mod policy;
pub mod predicates;
pub mod redirect;
pub mod registry;
pub mod verification;

// Re-export commonly used types
pub use context::EvaluationContext;
pub use evaluation::{Effect, Evaluation};
pub use guard::evaluate;
pub use navigator::NavigationGuard;
pub use notification::{Notification, NotificationKind, Notifier, Placement, TracingNotifier};
pub use predicates::{
    AlwaysIntact, CompanySetupCheck, CurrencyAndWhiteLabel, IntegrityCheck, LicenseDigestCheck,
    SetupAlwaysComplete,
};
pub use redirect::{RedirectResolver, RedirectTarget};
pub use registry::{
    RegistrySnapshot, RouteRegistry, StaticRouteSource, load_extensions, spawn_extension_loader,
};
pub use verification::{VerificationEntry, VerificationState};
