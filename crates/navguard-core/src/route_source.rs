//! Route registry extension channel
//!
//! Extension modules contribute routes after startup. A `RouteSource`
//! produces those definitions; the registry appends them.

use async_trait::async_trait;

use crate::{Result, RouteDefinition};

#[async_trait]
pub trait RouteSource: Send + Sync {
    /// Name used in logs and errors
    fn name(&self) -> &str;

    /// Fetch the route definitions this source contributes
    async fn load_routes(&self) -> Result<Vec<RouteDefinition>>;
}
