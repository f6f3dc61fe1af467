//! OpenStack API access
//!
//! [`ResourceClient`] is the lookup surface the tree builders depend on.
//! [`OpenStackClient`] implements it over the Octavia, Nova and Glance REST
//! APIs; tests substitute in-memory fakes.
//!
//! # Example
//!
//! ```rust,ignore
//! use openstack_lb_info::openstack::{CloudConfig, LoadBalancerQuery, OpenStackClient};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let cloud = CloudConfig::load("envvars")?;
//!     let client = OpenStackClient::connect(&cloud, Duration::from_secs(30)).await?;
//!
//!     for lb in client.list_load_balancers(&LoadBalancerQuery::default()).await? {
//!         println!("{} {}", lb.id, lb.name);
//!     }
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod error;
pub mod query;
pub mod types;

use std::future::Future;

// Re-export commonly used items
pub use auth::{CloudConfig, ENVVARS_CLOUD};
pub use client::OpenStackClient;
pub use error::{ApiError, Result};
pub use query::LoadBalancerQuery;
pub use types::{
    Amphora, Flavor, HealthMonitor, IdRef, Image, Listener, LoadBalancer, Member, Pool, Server,
};

/// Read-only lookups against the load-balancing control plane
///
/// Single-resource lookups resolve to `Ok(None)` when the resource does not
/// exist. List operations return whatever exists, possibly nothing.
pub trait ResourceClient: Send + Sync {
    fn find_listener(&self, listener_id: &str)
    -> impl Future<Output = Result<Option<Listener>>> + Send;

    fn find_pool(&self, pool_id: &str) -> impl Future<Output = Result<Option<Pool>>> + Send;

    fn find_health_monitor(
        &self,
        health_monitor_id: &str,
    ) -> impl Future<Output = Result<Option<HealthMonitor>>> + Send;

    fn find_member(
        &self,
        member_id: &str,
        pool_id: &str,
    ) -> impl Future<Output = Result<Option<Member>>> + Send;

    fn list_amphorae(
        &self,
        loadbalancer_id: &str,
    ) -> impl Future<Output = Result<Vec<Amphora>>> + Send;

    fn find_server(&self, server_id: &str) -> impl Future<Output = Result<Option<Server>>> + Send;

    /// Batched lookup; only images that exist are returned
    fn list_images(&self, image_ids: &[String]) -> impl Future<Output = Result<Vec<Image>>> + Send;
}
