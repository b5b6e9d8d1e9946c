//! Typed route requests
//!
//! Route names are dot-delimited (`admin.stock.items.index`). The first
//! segment names the area. A name is parsed once into a [`RouteDescriptor`]
//! when a [`RouteRequest`] is built, so policy code dispatches on [`Area`]
//! instead of comparing strings.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::{Error, Result};

static ROUTE_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9_-]+(\.[A-Za-z0-9_-]+)*$").expect("route name pattern is valid")
});

/// Top-level partition of the route space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Area {
    /// `superadmin.*` routes (multi-tenant operator)
    SuperAdmin,
    /// `admin.*` routes (tenant administrators)
    Admin,
    /// `front.*` routes (anonymous visitors)
    Front,
    /// Anything else, including routes the registry does not know yet
    Unrecognized,
}

impl Area {
    pub fn from_segment(segment: &str) -> Self {
        match segment {
            "superadmin" => Area::SuperAdmin,
            "admin" => Area::Admin,
            "front" => Area::Front,
            _ => Area::Unrecognized,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Area::SuperAdmin => "superadmin",
            Area::Admin => "admin",
            Area::Front => "front",
            Area::Unrecognized => "unrecognized",
        }
    }
}

impl fmt::Display for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parsed form of a route name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDescriptor {
    pub area: Area,
    /// Segments after the area segment
    pub rest: Vec<String>,
}

impl RouteDescriptor {
    /// Parse a dot-delimited route name
    ///
    /// # Errors
    /// `Error::InvalidRoute` for empty names or names with empty segments.
    pub fn parse(name: &str) -> Result<Self> {
        if !ROUTE_NAME.is_match(name) {
            return Err(Error::InvalidRoute(name.to_string()));
        }

        let mut segments = name.split('.');
        // The regex guarantees at least one segment
        let head = segments.next().unwrap_or_default();

        Ok(Self {
            area: Area::from_segment(head),
            rest: segments.map(str::to_string).collect(),
        })
    }

    /// The segment right after the area (`stock` in `admin.stock.items.index`)
    pub fn second_segment(&self) -> Option<&str> {
        self.rest.first().map(String::as_str)
    }
}

/// Computes a permission string from the request being evaluated
pub type PermissionFn = Arc<dyn Fn(&RouteRequest) -> String + Send + Sync>;

/// Permission required to enter a route
#[derive(Clone)]
pub enum Permission {
    /// A fixed permission string
    Static(String),
    /// A permission computed from the request (params, segments)
    Derived(PermissionFn),
}

impl Permission {
    pub fn derived<F>(f: F) -> Self
    where
        F: Fn(&RouteRequest) -> String + Send + Sync + 'static,
    {
        Permission::Derived(Arc::new(f))
    }

    pub fn is_derived(&self) -> bool {
        matches!(self, Permission::Derived(_))
    }

    /// Resolve to the permission string for this request
    pub fn resolve(&self, request: &RouteRequest) -> String {
        match self {
            Permission::Static(permission) => permission.clone(),
            Permission::Derived(f) => f(request),
        }
    }
}

impl fmt::Debug for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Permission::Static(permission) => f.debug_tuple("Static").field(permission).finish(),
            Permission::Derived(_) => f.write_str("Derived(<fn>)"),
        }
    }
}

impl From<&str> for Permission {
    fn from(permission: &str) -> Self {
        Permission::Static(permission.to_string())
    }
}

impl From<String> for Permission {
    fn from(permission: String) -> Self {
        Permission::Static(permission)
    }
}

// Only static permissions can live in configuration files
impl Serialize for Permission {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Permission::Static(permission) => serializer.serialize_str(permission),
            Permission::Derived(_) => Err(serde::ser::Error::custom(
                "derived permissions cannot be serialized",
            )),
        }
    }
}

impl<'de> Deserialize<'de> for Permission {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        String::deserialize(deserializer).map(Permission::Static)
    }
}

/// Metadata the guard reads from a route definition
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RouteMeta {
    #[serde(default)]
    pub require_auth: bool,

    #[serde(default)]
    pub require_unauth: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permission: Option<Permission>,

    /// Optional product module the route belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_module: Option<String>,
}

/// A named route as registered in the route registry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteDefinition {
    pub name: String,

    #[serde(default)]
    pub meta: RouteMeta,
}

impl RouteDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            meta: RouteMeta::default(),
        }
    }

    pub fn with_meta(mut self, meta: RouteMeta) -> Self {
        self.meta = meta;
        self
    }

    /// Check the route name parses
    pub fn validate(&self) -> Result<()> {
        RouteDescriptor::parse(&self.name).map(|_| ())
    }
}

/// One navigation attempt: the target route, its metadata and params
#[derive(Debug, Clone)]
pub struct RouteRequest {
    name: String,
    descriptor: RouteDescriptor,
    pub meta: RouteMeta,
    pub params: BTreeMap<String, String>,
}

impl RouteRequest {
    /// Create a request for a route name with empty metadata
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let descriptor = RouteDescriptor::parse(&name)?;

        Ok(Self {
            name,
            descriptor,
            meta: RouteMeta::default(),
            params: BTreeMap::new(),
        })
    }

    /// Create a request from a registered route definition
    pub fn from_definition(definition: &RouteDefinition) -> Result<Self> {
        Ok(Self::new(definition.name.clone())?.with_meta(definition.meta.clone()))
    }

    /// Create a request for a route the registry does not know
    ///
    /// The area is forced to [`Area::Unrecognized`] whatever the name says.
    pub fn unregistered(name: impl Into<String>) -> Self {
        let name = name.into();
        let rest = name
            .split('.')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        Self {
            name,
            descriptor: RouteDescriptor {
                area: Area::Unrecognized,
                rest,
            },
            meta: RouteMeta::default(),
            params: BTreeMap::new(),
        }
    }

    pub fn with_meta(mut self, meta: RouteMeta) -> Self {
        self.meta = meta;
        self
    }

    pub fn require_auth(mut self) -> Self {
        self.meta.require_auth = true;
        self
    }

    pub fn require_unauth(mut self) -> Self {
        self.meta.require_unauth = true;
        self
    }

    pub fn with_permission(mut self, permission: impl Into<Permission>) -> Self {
        self.meta.permission = Some(permission.into());
        self
    }

    pub fn with_app_module(mut self, module: impl Into<String>) -> Self {
        self.meta.app_module = Some(module.into());
        self
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn with_params(mut self, params: BTreeMap<String, String>) -> Self {
        self.params.extend(params);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn descriptor(&self) -> &RouteDescriptor {
        &self.descriptor
    }

    pub fn area(&self) -> Area {
        self.descriptor.area
    }

    pub fn second_segment(&self) -> Option<&str> {
        self.descriptor.second_segment()
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }
}
