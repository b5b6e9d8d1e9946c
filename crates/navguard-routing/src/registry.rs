//! Versioned, append-only route registry
//!
//! Evaluations read the latest committed snapshot. Extension routes are
//! appended in the background (multi-tenant deployments only) and become
//! visible to later lookups once committed. Names the registry does not
//! know resolve to an unrecognized request that passes the area policies.

use chrono::{DateTime, Utc};
use futures::future::join_all;
use navguard_core::{Error, Result, RouteDefinition, RouteRequest, RouteSource, TenancyMode};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};
use tokio::task::JoinHandle;

/// Immutable view of the registry at one version
#[derive(Debug, Clone)]
pub struct RegistrySnapshot {
    version: u64,
    routes: HashMap<String, RouteDefinition>,
    committed_at: DateTime<Utc>,
}

impl RegistrySnapshot {
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn committed_at(&self) -> DateTime<Utc> {
        self.committed_at
    }

    pub fn get(&self, name: &str) -> Option<&RouteDefinition> {
        self.routes.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.routes.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[derive(Debug)]
pub struct RouteRegistry {
    current: RwLock<Arc<RegistrySnapshot>>,
}

impl RouteRegistry {
    /// Create an empty registry at version 0
    pub fn new() -> Self {
        Self {
            current: RwLock::new(Arc::new(RegistrySnapshot {
                version: 0,
                routes: HashMap::new(),
                committed_at: Utc::now(),
            })),
        }
    }

    /// Create a registry holding the static route table
    ///
    /// Unlike [`extend`](Self::extend), duplicates here are an error.
    pub fn from_definitions(definitions: impl IntoIterator<Item = RouteDefinition>) -> Result<Self> {
        let mut routes = HashMap::new();
        for definition in definitions {
            definition.validate()?;
            if routes.contains_key(&definition.name) {
                return Err(Error::Registry(format!(
                    "duplicate route '{}'",
                    definition.name
                )));
            }
            routes.insert(definition.name.clone(), definition);
        }

        Ok(Self {
            current: RwLock::new(Arc::new(RegistrySnapshot {
                version: 1,
                routes,
                committed_at: Utc::now(),
            })),
        })
    }

    /// Latest committed snapshot
    pub fn snapshot(&self) -> Arc<RegistrySnapshot> {
        let current = self
            .current
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(&current)
    }

    pub fn version(&self) -> u64 {
        self.snapshot().version
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }

    /// Append route definitions and commit a new version
    ///
    /// Existing routes are never replaced; duplicates are skipped. Returns
    /// the number of routes added. Nothing is committed when that is zero.
    pub fn extend(&self, definitions: Vec<RouteDefinition>) -> Result<usize> {
        for definition in &definitions {
            definition.validate()?;
        }

        let mut current = self
            .current
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let mut routes = current.routes.clone();
        let mut added = 0;
        for definition in definitions {
            if routes.contains_key(&definition.name) {
                tracing::warn!("Route '{}' already registered, skipping", definition.name);
                continue;
            }
            routes.insert(definition.name.clone(), definition);
            added += 1;
        }

        if added > 0 {
            *current = Arc::new(RegistrySnapshot {
                version: current.version + 1,
                routes,
                committed_at: Utc::now(),
            });
            tracing::debug!(
                committed_at = %current.committed_at.to_rfc3339(),
                "Committed route registry version {} ({} routes)",
                current.version,
                current.routes.len()
            );
        }

        Ok(added)
    }

    /// Build the request for a navigation to `name`
    pub fn request_for(&self, name: &str, params: BTreeMap<String, String>) -> RouteRequest {
        let snapshot = self.snapshot();

        let request = match snapshot.get(name) {
            Some(definition) => RouteRequest::from_definition(definition).unwrap_or_else(|e| {
                tracing::warn!("Registered route '{}' is unusable: {}", name, e);
                RouteRequest::unregistered(name)
            }),
            None => {
                tracing::debug!("Route '{}' is not registered", name);
                RouteRequest::unregistered(name)
            }
        };

        request.with_params(params)
    }
}

impl Default for RouteRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Route source backed by a fixed list, used for config-declared extensions
#[derive(Debug, Clone)]
pub struct StaticRouteSource {
    name: String,
    routes: Vec<RouteDefinition>,
}

impl StaticRouteSource {
    pub fn new(name: impl Into<String>, routes: Vec<RouteDefinition>) -> Self {
        Self {
            name: name.into(),
            routes,
        }
    }
}

#[async_trait::async_trait]
impl RouteSource for StaticRouteSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn load_routes(&self) -> Result<Vec<RouteDefinition>> {
        Ok(self.routes.clone())
    }
}

/// Load every source and append what they return
///
/// A failing source is logged and skipped; the others still commit.
pub async fn load_extensions(
    registry: &RouteRegistry,
    sources: &[Arc<dyn RouteSource>],
) -> usize {
    let results = join_all(sources.iter().map(|source| async move {
        (source.name().to_string(), source.load_routes().await)
    }))
    .await;

    let mut added = 0;
    for (source_name, result) in results {
        let loaded = result.and_then(|routes| registry.extend(routes));
        match loaded {
            Ok(count) => {
                tracing::info!("Loaded {} extension routes from '{}'", count, source_name);
                added += count;
            }
            Err(e) => {
                let error = Error::RouteSource {
                    source_name,
                    message: e.to_string(),
                };
                tracing::error!("{}", error);
            }
        }
    }

    added
}

/// Spawn the background extension loader
///
/// Only multi-tenant deployments augment the registry; single-tenant
/// deployments get `None` and keep the static table.
pub fn spawn_extension_loader(
    registry: Arc<RouteRegistry>,
    sources: Vec<Arc<dyn RouteSource>>,
    mode: TenancyMode,
) -> Option<JoinHandle<usize>> {
    if !mode.is_multi_tenant() || sources.is_empty() {
        return None;
    }

    tracing::info!("Loading extension routes from {} sources", sources.len());
    Some(tokio::spawn(async move {
        load_extensions(&registry, &sources).await
    }))
}
