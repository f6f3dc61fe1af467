//! Amphora-centric tree: LB → amphorae, each with its server and image.

use super::image_cache::ImageNameCache;
use super::label::{Label, NOT_AVAILABLE, flatten_details};
use super::root::{build_root, record_of};
use super::sink::{NodeContent, NodeId, NodeKind, Title, TreeSink};
use crate::error::Result;
use crate::openstack::{Amphora, LoadBalancer, ResourceClient, Server};
use log::debug;
use serde_json::{Value, json};
use std::collections::HashMap;

/// Builds and renders the amphorae of one load balancer
pub struct AmphoraTreeBuilder<'a, C: ResourceClient, S: TreeSink> {
    client: &'a C,
    sink: &'a mut S,
    images: &'a ImageNameCache,
    details: bool,
}

impl<'a, C: ResourceClient, S: TreeSink> AmphoraTreeBuilder<'a, C, S> {
    pub fn new(client: &'a C, sink: &'a mut S, images: &'a ImageNameCache, details: bool) -> Self {
        Self {
            client,
            sink,
            images,
            details,
        }
    }

    pub async fn display(&mut self, lb: &LoadBalancer) -> Result<()> {
        let root = build_root(self.sink, lb, self.details);

        let amphorae = {
            let _status = self
                .sink
                .status(&format!("Getting amphora details for load balancer {}", lb.id));
            self.client.list_amphorae(&lb.id).await?
        };
        debug!("Load balancer {} has {} amphorae", lb.id, amphorae.len());

        // One batched lookup for every image not yet cached
        let image_ids: Vec<String> = amphorae.iter().filter_map(|a| a.image_id.clone()).collect();
        let image_names = if image_ids.is_empty() {
            HashMap::new()
        } else {
            let _status = self.sink.status("Getting image details");
            self.images.resolve(self.client, &image_ids).await?
        };

        for amphora in &amphorae {
            self.add_amphora(root, amphora, &image_names).await?;
        }

        self.sink
            .finalize_and_print(root, &Title::for_load_balancer(lb))?;
        Ok(())
    }

    /// Attach one amphora, naming its image from the names resolved for its load balancer
    pub async fn add_amphora(
        &mut self,
        parent: NodeId,
        amphora: &Amphora,
        image_names: &HashMap<String, String>,
    ) -> Result<NodeId> {
        let image_name = amphora
            .image_id
            .as_ref()
            .and_then(|id| image_names.get(id))
            .map_or(NOT_AVAILABLE, String::as_str);

        let server = match &amphora.compute_id {
            Some(compute_id) => {
                let _status = self
                    .sink
                    .status(&format!("Getting server details {}", compute_id));
                self.client.find_server(compute_id).await?
            }
            None => None,
        };
        if server.is_none() {
            debug!("No server found for amphora {}", amphora.id);
        }

        let amphora_record = record_of(amphora);
        let detail_lines = self.details.then(|| flatten_details(&amphora_record));

        let content = NodeContent {
            kind: NodeKind::Amphora,
            label: Label::amphora(amphora, image_name, server.as_ref(), &*self.sink),
            record: with_server(amphora_record, image_name, server.as_ref()),
        };
        let node = self.sink.attach_child(parent, content);
        if let Some(lines) = detail_lines {
            self.sink.attach_details(node, &lines);
        }
        Ok(node)
    }
}

/// Amphora record extended with its image name and backing server summary
fn with_server(mut record: Value, image_name: &str, server: Option<&Server>) -> Value {
    if let Some(object) = record.as_object_mut() {
        object.insert("image_name".to_string(), json!(image_name));
        let server_details = server.map_or(Value::Null, |s| {
            json!({
                "id": s.id,
                "flavor": s.flavor_name().unwrap_or(NOT_AVAILABLE),
                "compute_host": s.compute_host,
            })
        });
        object.insert("server_details".to_string(), server_details);
    }
    record
}
