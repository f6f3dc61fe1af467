//! The rendering surface tree builders report into.

use super::label::Label;
use crate::display::Activity;
use crate::openstack::LoadBalancer;
use serde_json::Value;
use std::io;

/// Handle to a node created by a [`TreeSink`]
///
/// Only meaningful to the sink that returned it, and only until that sink's
/// next [`TreeSink::new_root`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

/// Resource type of a tree node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    LoadBalancer,
    Listener,
    Pool,
    HealthMonitor,
    Member,
    Amphora,
}

impl NodeKind {
    /// Machine name, used as the `type` of structured nodes
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::LoadBalancer => "loadbalancer",
            NodeKind::Listener => "listener",
            NodeKind::Pool => "pool",
            NodeKind::HealthMonitor => "health_monitor",
            NodeKind::Member => "member",
            NodeKind::Amphora => "amphora",
        }
    }

    /// Heading shown at the start of a node label
    pub fn display_name(&self) -> &'static str {
        match self {
            NodeKind::LoadBalancer => "LB",
            NodeKind::Listener => "Listener",
            NodeKind::Pool => "Pool",
            NodeKind::HealthMonitor => "Health Monitor",
            NodeKind::Member => "Member",
            NodeKind::Amphora => "amphora",
        }
    }
}

/// Everything a sink needs to render one resource node
#[derive(Debug, Clone, PartialEq)]
pub struct NodeContent {
    pub kind: NodeKind,
    pub label: Label,
    /// The resource's attributes, for sinks that embed raw objects
    pub record: Value,
}

/// Marker for a referenced resource that was not found or failed to load
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    pub kind: NodeKind,
    /// Extra identification, e.g. the member id and the lookup error
    pub detail: Option<String>,
}

impl Placeholder {
    pub fn missing(kind: NodeKind) -> Self {
        Self { kind, detail: None }
    }

    pub fn missing_member(member_id: &str) -> Self {
        Self {
            kind: NodeKind::Member,
            detail: Some(member_id.to_string()),
        }
    }

    pub fn failed_member(member_id: &str, error: &str) -> Self {
        Self {
            kind: NodeKind::Member,
            detail: Some(format!("{} - Error: {}", member_id, error)),
        }
    }

    /// `"Member"`, `"Member (m-1)"`, `"Member (m-1 - Error: timeout)"`
    pub fn name(&self) -> String {
        match &self.detail {
            Some(detail) => format!("{} ({})", self.kind.display_name(), detail),
            None => self.kind.display_name().to_string(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.detail.as_deref().is_some_and(|d| d.contains(" - Error: "))
    }
}

/// Heading printed above a finished tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Title {
    pub id: String,
    pub name: String,
}

impl Title {
    pub fn for_load_balancer(lb: &LoadBalancer) -> Self {
        Self {
            id: lb.id.clone(),
            name: lb.name.clone(),
        }
    }

    pub fn text(&self) -> String {
        format!("Loadbalancer ID: {} ({})", self.id, self.name)
    }
}

/// Output surface for one load balancer tree at a time
///
/// Builders create the root, attach children under handles they were given,
/// and finish with exactly one [`finalize_and_print`](TreeSink::finalize_and_print).
/// Parents are always created before their children. Calls come from a
/// single task, so implementations need no internal synchronisation.
pub trait TreeSink {
    /// Render a raw status string (`ACTIVE`, `ERROR`, ...) for embedding in a label
    fn format_status(&self, status: &str) -> String;

    /// Start a new tree, discarding any tree that was never finalized
    fn new_root(&mut self, content: NodeContent) -> NodeId;

    fn attach_child(&mut self, parent: NodeId, content: NodeContent) -> NodeId;

    fn attach_placeholder(&mut self, parent: NodeId, placeholder: &Placeholder);

    /// Attach pre-sorted `key: value` lines; sinks that embed raw records ignore this
    fn attach_details(&mut self, node: NodeId, details: &[String]);

    /// Indicator shown while a single lookup runs; finishes when dropped
    fn status(&self, message: &str) -> Activity;

    /// Indicator advanced once per completed lookup out of `total`
    fn progress(&self, message: &str, total: u64) -> Activity;

    /// Render the finished tree under its title
    fn finalize_and_print(&mut self, root: NodeId, title: &Title) -> io::Result<()>;
}
