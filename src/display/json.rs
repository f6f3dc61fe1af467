//! Structured output: each node is the resource's own attributes plus
//! `type` and `children`.

use super::activity::Activity;
use crate::tree::{NodeContent, NodeId, Placeholder, Title, TreeSink};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};
use std::io::{self, Stdout, Write};

#[derive(Debug)]
enum JsonChild {
    Node(usize),
    Leaf(Value),
}

#[derive(Debug)]
struct JsonNode {
    object: Map<String, Value>,
    children: Vec<JsonChild>,
}

/// One pretty-printed JSON document per tree
///
/// Placeholders become `{"<name>": null}`. Detail lines are ignored since
/// the raw attributes are already embedded.
pub struct JsonSink<W: Write> {
    out: W,
    nodes: Vec<JsonNode>,
}

impl JsonSink<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> JsonSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            nodes: Vec::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn push(&mut self, content: NodeContent) -> NodeId {
        let mut object = match content.record {
            Value::Object(object) => object,
            _ => Map::new(),
        };
        // The node type wins; a resource's own `type` attribute is kept aside
        if let Some(resource_type) = object.remove("type") {
            object.insert("resource_type".to_string(), resource_type);
        }
        object.insert("type".to_string(), Value::from(content.kind.as_str()));

        self.nodes.push(JsonNode {
            object,
            children: Vec::new(),
        });
        NodeId(self.nodes.len() - 1)
    }

    fn assemble(&self, index: usize) -> Value {
        let Some(node) = self.nodes.get(index) else {
            return Value::Null;
        };

        let children = node
            .children
            .iter()
            .map(|child| match child {
                JsonChild::Node(i) => self.assemble(*i),
                JsonChild::Leaf(value) => value.clone(),
            })
            .collect();

        let mut object = node.object.clone();
        object.insert("children".to_string(), Value::Array(children));
        Value::Object(object)
    }
}

/// `"Health Monitor"` → `"health_monitor"`
fn snake_name(name: &str) -> String {
    name.to_lowercase().replace(' ', "_")
}

impl<W: Write> TreeSink for JsonSink<W> {
    fn format_status(&self, status: &str) -> String {
        status.to_string()
    }

    fn new_root(&mut self, content: NodeContent) -> NodeId {
        self.nodes.clear();
        self.push(content)
    }

    fn attach_child(&mut self, parent: NodeId, content: NodeContent) -> NodeId {
        let child = self.push(content);
        if let Some(node) = self.nodes.get_mut(parent.0) {
            node.children.push(JsonChild::Node(child.0));
        }
        child
    }

    fn attach_placeholder(&mut self, parent: NodeId, placeholder: &Placeholder) {
        let mut leaf = Map::new();
        leaf.insert(snake_name(&placeholder.name()), Value::Null);
        if let Some(node) = self.nodes.get_mut(parent.0) {
            node.children.push(JsonChild::Leaf(Value::Object(leaf)));
        }
    }

    fn attach_details(&mut self, _node: NodeId, _details: &[String]) {}

    fn status(&self, _message: &str) -> Activity {
        Activity::none()
    }

    fn progress(&self, _message: &str, _total: u64) -> Activity {
        Activity::none()
    }

    fn finalize_and_print(&mut self, root: NodeId, _title: &Title) -> io::Result<()> {
        let document = self.assemble(root.0);

        let mut serializer =
            serde_json::Serializer::with_formatter(&mut self.out, PrettyFormatter::with_indent(b"    "));
        document.serialize(&mut serializer).map_err(io::Error::other)?;
        writeln!(self.out)?;
        self.out.flush()?;
        self.nodes.clear();
        Ok(())
    }
}
