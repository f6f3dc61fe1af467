//! Load balancer tree assembly
//!
//! [`TreeBuilder`] walks LB → listeners → pool → health monitor / members,
//! and [`AmphoraTreeBuilder`] walks LB → amphorae → server / image. Both
//! share the root construction in [`root`], report through a [`TreeSink`],
//! and look resources up through a [`ResourceClient`](crate::openstack::ResourceClient).
//!
//! Descent is sequential and depth-first. Member lookups for a pool are the
//! only concurrent region; see [`MemberOrder`] for how their results are
//! ordered under the pool node.

pub mod amphora;
pub mod builder;
pub mod image_cache;
pub mod label;
mod members;
pub mod root;
pub mod sink;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

pub use amphora::AmphoraTreeBuilder;
pub use builder::TreeBuilder;
pub use image_cache::ImageNameCache;
pub use label::{Label, LabelField, NOT_AVAILABLE, Tone, flatten_details};
pub use sink::{NodeContent, NodeId, NodeKind, Placeholder, Title, TreeSink};

/// Hard ceiling for concurrent member lookups
pub const MAX_WORKERS_LIMIT: usize = 32;

/// Default number of concurrent member lookups
pub const DEFAULT_MAX_WORKERS: usize = 4;

/// Order in which fetched members are attached under their pool
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberOrder {
    /// Attach each member as soon as its lookup finishes
    #[default]
    Completion,
    /// Attach after all lookups finish, in the pool's member order
    Input,
}

/// Settings for one tree construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOptions {
    /// Attach every attribute of each resource under its node
    pub details: bool,
    /// Upper bound on concurrent member lookups per pool
    pub max_workers: usize,
    /// Do not look up or render pool members at all
    pub skip_members: bool,
    pub member_order: MemberOrder,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            details: false,
            max_workers: DEFAULT_MAX_WORKERS,
            skip_members: false,
            member_order: MemberOrder::default(),
        }
    }
}

/// Number of concurrent lookups for `member_count` members
///
/// Never more than there are members, never more than the configured
/// ceiling, never zero.
pub fn worker_count(max_workers: usize, member_count: usize) -> usize {
    max_workers
        .clamp(1, MAX_WORKERS_LIMIT)
        .min(member_count)
        .max(1)
}
