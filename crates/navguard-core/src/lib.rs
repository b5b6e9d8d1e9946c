//! navguard Core Types and Traits
//!
//! This crate provides the fundamental types and traits used throughout navguard:
//! - Typed route requests and route metadata
//! - Session and configuration collaborators
//! - Navigation decisions and the denial taxonomy
//! - Core error types

pub mod config;
pub mod config_store;
pub mod decision;
pub mod error;
pub mod route;
pub mod route_source;
pub mod session;
pub mod tenant;

pub use config::{AppConfig, LicenseConfig, LoggingConfig, NavguardConfig, NotificationConfig};
pub use config_store::ConfigStore;
pub use decision::{Decision, Denial};
pub use error::{Error, Result};
pub use route::{Area, Permission, RouteDefinition, RouteDescriptor, RouteMeta, RouteRequest};
pub use route_source::RouteSource;
pub use session::{AppSetting, Session, SessionState, User};
pub use tenant::TenancyMode;
