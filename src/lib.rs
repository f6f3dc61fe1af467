//! # openstack-lb-info
//!
//! Read-only inspection of OpenStack Octavia load balancers. Each selected
//! load balancer is printed as a tree of the resources it depends on,
//! either LB → listeners → pool → health monitor / members, or
//! LB → amphorae with their Nova servers and Glance images.
//!
//! ## Features
//!
//! - **Two views**: listener tree or amphora tree per load balancer
//! - **Three formats**: coloured terminal tree, plain text, JSON
//! - **Concurrent member lookups**: bounded per pool, with progress
//! - **Image name cache**: one batched Glance lookup per unseen image
//!
//! ## Example
//!
//! ```rust,no_run
//! use openstack_lb_info::display::PlainSink;
//! use openstack_lb_info::openstack::{CloudConfig, LoadBalancerQuery, OpenStackClient};
//! use openstack_lb_info::tree::{BuildOptions, TreeBuilder};
//! use std::time::Duration;
//!
//! # async fn example() -> openstack_lb_info::Result<()> {
//! let cloud = CloudConfig::load("envvars")?;
//! let client = OpenStackClient::connect(&cloud, Duration::from_secs(30)).await?;
//! let mut sink = PlainSink::stdout();
//!
//! for lb in client.list_load_balancers(&LoadBalancerQuery::default()).await? {
//!     TreeBuilder::new(&client, &mut sink, BuildOptions::default())
//!         .display(&lb)
//!         .await?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod handlers;
pub mod openstack;
pub mod tree;

// Re-export commonly used types and functions
pub use error::{ConfigError, LbInfoError, Result};
pub use handlers::{ShowReport, ShowSettings, TreeView};

/// The current version of the CLI tool
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Load configuration, merge it with the flags and render every tree
pub async fn run(cli: cli::Cli) -> Result<ShowReport> {
    let config = config::load_config(cli.config.as_deref())?;
    let settings = cli.show_settings(&config);
    handlers::handle_show(settings).await
}
