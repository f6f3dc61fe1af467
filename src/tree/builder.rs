//! Listener-centric tree: LB → listeners → pool → health monitor / members.

use super::BuildOptions;
use super::label::Label;
use super::root::{self, attach_resource, record_of};
use super::sink::{NodeContent, NodeId, NodeKind, Placeholder, Title, TreeSink};
use crate::error::Result;
use crate::openstack::{IdRef, LoadBalancer, ResourceClient};
use log::debug;

/// Builds and renders one load balancer's listener tree
///
/// A missing listener, pool or health monitor becomes a placeholder node.
/// Lookup errors other than per-member failures abort the tree.
pub struct TreeBuilder<'a, C: ResourceClient, S: TreeSink> {
    pub(super) client: &'a C,
    pub(super) sink: &'a mut S,
    pub(super) options: BuildOptions,
}

impl<'a, C: ResourceClient, S: TreeSink> TreeBuilder<'a, C, S> {
    pub fn new(client: &'a C, sink: &'a mut S, options: BuildOptions) -> Self {
        Self {
            client,
            sink,
            options,
        }
    }

    /// Build the full tree for `lb` and print it through the sink
    pub async fn display(&mut self, lb: &LoadBalancer) -> Result<()> {
        let root = self.build_root(lb);
        self.descend(root, lb).await?;
        self.sink
            .finalize_and_print(root, &Title::for_load_balancer(lb))?;
        Ok(())
    }

    pub fn build_root(&mut self, lb: &LoadBalancer) -> NodeId {
        root::build_root(self.sink, lb, self.options.details)
    }

    /// Attach every listener of `lb`, in order, under `root`
    pub async fn descend(&mut self, root: NodeId, lb: &LoadBalancer) -> Result<()> {
        if lb.listeners.is_empty() {
            self.sink
                .attach_placeholder(root, &Placeholder::missing(NodeKind::Listener));
            return Ok(());
        }

        for IdRef { id } in &lb.listeners {
            self.add_listener(root, id).await?;
        }
        Ok(())
    }

    pub async fn add_listener(&mut self, parent: NodeId, listener_id: &str) -> Result<()> {
        let listener = {
            let _status = self
                .sink
                .status(&format!("Getting Listener details id {}", listener_id));
            self.client.find_listener(listener_id).await?
        };

        let Some(listener) = listener else {
            debug!("Listener {} not found", listener_id);
            self.sink
                .attach_placeholder(parent, &Placeholder::missing(NodeKind::Listener));
            return Ok(());
        };

        let content = NodeContent {
            kind: NodeKind::Listener,
            label: Label::listener(&listener, &*self.sink),
            record: record_of(&listener),
        };
        let node = attach_resource(self.sink, parent, content, self.options.details);

        match &listener.default_pool_id {
            Some(pool_id) => self.add_pool(node, pool_id).await,
            None => {
                self.sink
                    .attach_placeholder(node, &Placeholder::missing(NodeKind::Pool));
                Ok(())
            }
        }
    }

    pub async fn add_pool(&mut self, parent: NodeId, pool_id: &str) -> Result<()> {
        let pool = {
            let _status = self
                .sink
                .status(&format!("Getting Pool details id {}", pool_id));
            self.client.find_pool(pool_id).await?
        };

        let Some(pool) = pool else {
            debug!("Pool {} not found", pool_id);
            self.sink
                .attach_placeholder(parent, &Placeholder::missing(NodeKind::Pool));
            return Ok(());
        };

        let content = NodeContent {
            kind: NodeKind::Pool,
            label: Label::pool(&pool, &*self.sink),
            record: record_of(&pool),
        };
        let node = attach_resource(self.sink, parent, content, self.options.details);

        match &pool.health_monitor_id {
            Some(hm_id) => self.add_health_monitor(node, hm_id).await?,
            None => self
                .sink
                .attach_placeholder(node, &Placeholder::missing(NodeKind::HealthMonitor)),
        }

        if self.options.skip_members {
            return Ok(());
        }

        if pool.members.is_empty() {
            self.sink
                .attach_placeholder(node, &Placeholder::missing(NodeKind::Member));
        } else {
            self.add_members(node, &pool.id, &pool.members).await;
        }
        Ok(())
    }

    pub async fn add_health_monitor(&mut self, parent: NodeId, health_monitor_id: &str) -> Result<()> {
        let hm = {
            let _status = self
                .sink
                .status(&format!("Getting Health Monitor details id {}", health_monitor_id));
            self.client.find_health_monitor(health_monitor_id).await?
        };

        match hm {
            Some(hm) => {
                let content = NodeContent {
                    kind: NodeKind::HealthMonitor,
                    label: Label::health_monitor(&hm, &*self.sink),
                    record: record_of(&hm),
                };
                attach_resource(self.sink, parent, content, self.options.details);
            }
            None => {
                debug!("Health monitor {} not found", health_monitor_id);
                self.sink
                    .attach_placeholder(parent, &Placeholder::missing(NodeKind::HealthMonitor));
            }
        }
        Ok(())
    }
}
