//! Node construction shared by both tree builders.

use super::label::{Label, flatten_details};
use super::sink::{NodeContent, NodeId, NodeKind, TreeSink};
use crate::openstack::LoadBalancer;
use serde::Serialize;
use serde_json::Value;

/// Create the root node for `lb`, with its attributes in detail mode
pub fn build_root<S: TreeSink + ?Sized>(sink: &mut S, lb: &LoadBalancer, details: bool) -> NodeId {
    let content = NodeContent {
        kind: NodeKind::LoadBalancer,
        label: Label::load_balancer(lb, sink),
        record: record_of(lb),
    };
    let detail_lines = details.then(|| flatten_details(&content.record));

    let root = sink.new_root(content);
    if let Some(lines) = detail_lines {
        sink.attach_details(root, &lines);
    }
    root
}

/// Attach a resource node under `parent`, with its attributes in detail mode
pub fn attach_resource<S: TreeSink + ?Sized>(
    sink: &mut S,
    parent: NodeId,
    content: NodeContent,
    details: bool,
) -> NodeId {
    let detail_lines = details.then(|| flatten_details(&content.record));

    let node = sink.attach_child(parent, content);
    if let Some(lines) = detail_lines {
        sink.attach_details(node, &lines);
    }
    node
}

/// Serialize a resource snapshot into its attribute object
pub fn record_of<T: Serialize>(resource: &T) -> Value {
    // Derived impls over string-keyed structs always serialize
    serde_json::to_value(resource).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::openstack::Listener;
    use serde_json::json;

    #[test]
    fn test_details_include_undeclared_attributes() {
        let listener: Listener = serde_json::from_value(json!({
            "id": "l-1",
            "name": "http",
            "protocol": "HTTP",
            "protocol_port": 80,
            "timeout_client_data": 50000,
            "insert_headers": {"X-Forwarded-For": "true"},
            "allowed_cidrs": null,
            "l7policies": [{"id": "l7-1"}]
        }))
        .unwrap();

        let record = record_of(&listener);
        assert_eq!(record["timeout_client_data"], 50000);
        assert!(record.get("extra").is_none());

        let details = flatten_details(&record);
        assert!(details.contains(&"timeout_client_data: 50000".to_string()));
        assert!(details.contains(&"insert_headers: {\"X-Forwarded-For\":\"true\"}".to_string()));
        assert!(details.contains(&"allowed_cidrs: None".to_string()));
        assert!(details.contains(&"l7policies: [{\"id\":\"l7-1\"}]".to_string()));
        assert!(details.contains(&"protocol_port: 80".to_string()));
    }
}
