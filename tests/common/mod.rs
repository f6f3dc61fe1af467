//! In-memory cloud and recording sink shared by the integration tests.
#![allow(dead_code)]

use indicatif::ProgressBar;
use openstack_lb_info::display::Activity;
use openstack_lb_info::openstack::{
    self, Amphora, ApiError, Flavor, HealthMonitor, IdRef, Image, Listener, LoadBalancer, Member,
    Pool, ResourceClient, Server,
};
use openstack_lb_info::tree::{NodeContent, NodeId, NodeKind, Placeholder, Title, TreeSink};
use std::collections::{HashMap, HashSet};
use std::io;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Resource store with lookup counters and a concurrency high-water mark
#[derive(Default)]
pub struct FakeCloud {
    pub listeners: HashMap<String, Listener>,
    pub pools: HashMap<String, Pool>,
    pub health_monitors: HashMap<String, HealthMonitor>,
    pub members: HashMap<String, Member>,
    /// Member ids whose lookup fails with the given message
    pub member_errors: HashMap<String, String>,
    pub member_delays: HashMap<String, Duration>,
    pub default_member_delay: Duration,
    /// Pool ids whose lookup fails
    pub failing_pools: HashSet<String>,
    pub amphorae: HashMap<String, Vec<Amphora>>,
    pub servers: HashMap<String, Server>,
    pub images: HashMap<String, Image>,
    pub image_delay: Duration,

    pub in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
    pub member_lookups: AtomicUsize,
    pub server_lookups: AtomicUsize,
    pub image_batches: Mutex<Vec<Vec<String>>>,
}

impl FakeCloud {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_listener(&mut self, id: &str, default_pool_id: Option<&str>) {
        self.listeners.insert(
            id.to_string(),
            Listener {
                id: id.to_string(),
                name: format!("{}-name", id),
                protocol: "HTTP".to_string(),
                protocol_port: 80,
                provisioning_status: "ACTIVE".to_string(),
                operating_status: "ONLINE".to_string(),
                default_pool_id: default_pool_id.map(str::to_string),
                ..Default::default()
            },
        );
    }

    pub fn add_pool(&mut self, id: &str, health_monitor_id: Option<&str>, member_ids: &[&str]) {
        self.pools.insert(
            id.to_string(),
            Pool {
                id: id.to_string(),
                protocol: "HTTP".to_string(),
                lb_algorithm: "ROUND_ROBIN".to_string(),
                provisioning_status: "ACTIVE".to_string(),
                operating_status: "ONLINE".to_string(),
                health_monitor_id: health_monitor_id.map(str::to_string),
                members: member_ids.iter().map(|m| IdRef::new(*m)).collect(),
                ..Default::default()
            },
        );
    }

    pub fn add_health_monitor(&mut self, id: &str) {
        self.health_monitors.insert(
            id.to_string(),
            HealthMonitor {
                id: id.to_string(),
                monitor_type: "HTTP".to_string(),
                http_method: Some("GET".to_string()),
                expected_codes: Some("200".to_string()),
                url_path: Some("/healthz".to_string()),
                provisioning_status: "ACTIVE".to_string(),
                operating_status: "ONLINE".to_string(),
                ..Default::default()
            },
        );
    }

    pub fn add_member(&mut self, id: &str) {
        self.members.insert(
            id.to_string(),
            Member {
                id: id.to_string(),
                address: "192.168.0.10".to_string(),
                protocol_port: 8080,
                weight: 1,
                provisioning_status: "ACTIVE".to_string(),
                operating_status: "ONLINE".to_string(),
                ..Default::default()
            },
        );
    }

    pub fn add_amphora(&mut self, lb_id: &str, id: &str, image_id: Option<&str>, compute_id: Option<&str>) {
        self.amphorae.entry(lb_id.to_string()).or_default().push(Amphora {
            id: id.to_string(),
            loadbalancer_id: Some(lb_id.to_string()),
            role: Some("MASTER".to_string()),
            status: "ALLOCATED".to_string(),
            lb_network_ip: Some("172.16.0.4".to_string()),
            image_id: image_id.map(str::to_string),
            compute_id: compute_id.map(str::to_string),
            ..Default::default()
        });
    }

    pub fn add_server(&mut self, id: &str, flavor: &str, host: &str) {
        self.servers.insert(
            id.to_string(),
            Server {
                id: id.to_string(),
                name: format!("amphora-{}", id),
                flavor: Some(Flavor {
                    name: Some(flavor.to_string()),
                    ..Default::default()
                }),
                compute_host: Some(host.to_string()),
                ..Default::default()
            },
        );
    }

    pub fn add_image(&mut self, id: &str, name: &str) {
        self.images.insert(
            id.to_string(),
            Image {
                id: id.to_string(),
                name: Some(name.to_string()),
            },
        );
    }

    pub fn image_batches(&self) -> Vec<Vec<String>> {
        self.image_batches.lock().unwrap().clone()
    }
}

pub fn load_balancer(id: &str, listener_ids: &[&str]) -> LoadBalancer {
    LoadBalancer {
        id: id.to_string(),
        name: format!("{}-name", id),
        vip_address: Some("10.0.0.5".to_string()),
        provisioning_status: "ACTIVE".to_string(),
        operating_status: "ONLINE".to_string(),
        tags: vec!["test".to_string()],
        listeners: listener_ids.iter().map(|l| IdRef::new(*l)).collect(),
        ..Default::default()
    }
}

impl ResourceClient for FakeCloud {
    async fn find_listener(&self, listener_id: &str) -> openstack::Result<Option<Listener>> {
        Ok(self.listeners.get(listener_id).cloned())
    }

    async fn find_pool(&self, pool_id: &str) -> openstack::Result<Option<Pool>> {
        if self.failing_pools.contains(pool_id) {
            return Err(ApiError::ServerError {
                status: 500,
                message: format!("pool {} unavailable", pool_id),
            });
        }
        Ok(self.pools.get(pool_id).cloned())
    }

    async fn find_health_monitor(&self, health_monitor_id: &str) -> openstack::Result<Option<HealthMonitor>> {
        Ok(self.health_monitors.get(health_monitor_id).cloned())
    }

    async fn find_member(&self, member_id: &str, _pool_id: &str) -> openstack::Result<Option<Member>> {
        self.member_lookups.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let delay = self
            .member_delays
            .get(member_id)
            .copied()
            .unwrap_or(self.default_member_delay);
        tokio::time::sleep(delay).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if let Some(message) = self.member_errors.get(member_id) {
            return Err(ApiError::ServerError {
                status: 503,
                message: message.clone(),
            });
        }
        Ok(self.members.get(member_id).cloned())
    }

    async fn list_amphorae(&self, loadbalancer_id: &str) -> openstack::Result<Vec<Amphora>> {
        Ok(self.amphorae.get(loadbalancer_id).cloned().unwrap_or_default())
    }

    async fn find_server(&self, server_id: &str) -> openstack::Result<Option<Server>> {
        self.server_lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self.servers.get(server_id).cloned())
    }

    async fn list_images(&self, image_ids: &[String]) -> openstack::Result<Vec<Image>> {
        self.image_batches.lock().unwrap().push(image_ids.to_vec());
        tokio::time::sleep(self.image_delay).await;
        Ok(image_ids
            .iter()
            .filter_map(|id| self.images.get(id).cloned())
            .collect())
    }
}

/// A finished tree as seen by the sink
#[derive(Debug, Clone, PartialEq)]
pub struct Rendered {
    /// `None` for placeholders
    pub kind: Option<NodeKind>,
    pub text: String,
    pub record: serde_json::Value,
    pub details: Vec<String>,
    pub children: Vec<Rendered>,
}

impl Rendered {
    pub fn is_placeholder(&self) -> bool {
        self.kind.is_none()
    }

    pub fn child_texts(&self) -> Vec<&str> {
        self.children.iter().map(|c| c.text.as_str()).collect()
    }

    pub fn id(&self) -> Option<&str> {
        self.record.get("id").and_then(|v| v.as_str())
    }

    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(Rendered::depth).max().unwrap_or(0)
    }
}

#[derive(Default)]
struct Slot {
    kind: Option<NodeKind>,
    text: String,
    record: serde_json::Value,
    details: Vec<String>,
    children: Vec<usize>,
}

/// Sink that keeps every finished tree in memory
#[derive(Default)]
pub struct RecordingSink {
    slots: Vec<Slot>,
    pub trees: Vec<(Title, Rendered)>,
    pub statuses: Mutex<Vec<String>>,
    pub bars: Mutex<Vec<ProgressBar>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, slot: Slot) -> NodeId {
        self.slots.push(slot);
        NodeId(self.slots.len() - 1)
    }

    fn snapshot(&self, index: usize) -> Rendered {
        let slot = &self.slots[index];
        Rendered {
            kind: slot.kind,
            text: slot.text.clone(),
            record: slot.record.clone(),
            details: slot.details.clone(),
            children: slot.children.iter().map(|&c| self.snapshot(c)).collect(),
        }
    }

    pub fn only_tree(&self) -> &Rendered {
        assert_eq!(self.trees.len(), 1, "expected exactly one finished tree");
        &self.trees[0].1
    }

    /// Final positions of every progress indicator handed out
    pub fn progress_positions(&self) -> Vec<u64> {
        self.bars.lock().unwrap().iter().map(|b| b.position()).collect()
    }
}

impl TreeSink for RecordingSink {
    fn format_status(&self, status: &str) -> String {
        format!("<{}>", status)
    }

    fn new_root(&mut self, content: NodeContent) -> NodeId {
        self.slots.clear();
        self.push(Slot {
            kind: Some(content.kind),
            text: content.label.plain_text(),
            record: content.record,
            ..Default::default()
        })
    }

    fn attach_child(&mut self, parent: NodeId, content: NodeContent) -> NodeId {
        let child = self.push(Slot {
            kind: Some(content.kind),
            text: content.label.plain_text(),
            record: content.record,
            ..Default::default()
        });
        self.slots[parent.0].children.push(child.0);
        child
    }

    fn attach_placeholder(&mut self, parent: NodeId, placeholder: &Placeholder) {
        let child = self.push(Slot {
            text: format!("{}: None", placeholder.name()),
            ..Default::default()
        });
        self.slots[parent.0].children.push(child.0);
    }

    fn attach_details(&mut self, node: NodeId, details: &[String]) {
        self.slots[node.0].details.extend_from_slice(details);
    }

    fn status(&self, message: &str) -> Activity {
        self.statuses.lock().unwrap().push(message.to_string());
        Activity::none()
    }

    fn progress(&self, _message: &str, _total: u64) -> Activity {
        let bar = ProgressBar::hidden();
        self.bars.lock().unwrap().push(bar.clone());
        Activity::from_bar(bar)
    }

    fn finalize_and_print(&mut self, root: NodeId, title: &Title) -> io::Result<()> {
        let tree = self.snapshot(root.0);
        self.trees.push((title.clone(), tree));
        self.slots.clear();
        Ok(())
    }
}
