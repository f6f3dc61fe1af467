//! Node labels and detail lines.
//!
//! Labels are built from a resource's own fields only. Statuses are passed
//! through [`TreeSink::format_status`] before they are embedded; every other
//! field carries a semantic [`Tone`] that sinks are free to style or ignore.

use super::sink::{NodeKind, TreeSink};
use crate::openstack::{Amphora, HealthMonitor, Listener, LoadBalancer, Member, Pool, Server};
use serde_json::Value;
use std::fmt::Display;

/// Stand-in for values that could not be resolved
pub const NOT_AVAILABLE: &str = "N/A";

/// Rendered in place of an absent optional value
const NONE: &str = "None";

/// What a label field represents, for styling purposes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Plain,
    /// The resource's own id
    Id,
    /// Human-given name
    Name,
    /// Addresses and ports
    Address,
    /// Any other attribute value
    Value,
    /// Already passed through [`TreeSink::format_status`]
    Status,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelField {
    /// Rendered as `key:value`; keyless fields render as the bare value
    pub key: Option<&'static str>,
    pub value: String,
    pub tone: Tone,
}

impl LabelField {
    fn bare(value: impl Display, tone: Tone) -> Self {
        Self {
            key: None,
            value: value.to_string(),
            tone,
        }
    }

    fn keyed(key: &'static str, value: impl Display, tone: Tone) -> Self {
        Self {
            key: Some(key),
            value: value.to_string(),
            tone,
        }
    }
}

/// One-line summary of a resource: a heading followed by fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub heading: &'static str,
    pub fields: Vec<LabelField>,
}

impl Label {
    /// Unstyled rendering, e.g. `Pool: p-1 protocol:HTTP algorithm:ROUND_ROBIN ...`
    pub fn plain_text(&self) -> String {
        let fields: Vec<String> = self
            .fields
            .iter()
            .map(|field| match field.key {
                Some(key) => format!("{}:{}", key, field.value),
                None => field.value.clone(),
            })
            .collect();

        if fields.is_empty() {
            format!("{}:", self.heading)
        } else {
            format!("{}: {}", self.heading, fields.join(" "))
        }
    }

    pub fn load_balancer<S: TreeSink + ?Sized>(lb: &LoadBalancer, sink: &S) -> Self {
        Self {
            heading: NodeKind::LoadBalancer.display_name(),
            fields: vec![
                LabelField::bare(&lb.id, Tone::Id),
                LabelField::keyed("vip", or_none(&lb.vip_address), Tone::Address),
                LabelField::keyed("prov_status", sink.format_status(&lb.provisioning_status), Tone::Status),
                LabelField::keyed("oper_status", sink.format_status(&lb.operating_status), Tone::Status),
                LabelField::keyed("tags", tag_list(&lb.tags), Tone::Value),
            ],
        }
    }

    pub fn listener<S: TreeSink + ?Sized>(listener: &Listener, sink: &S) -> Self {
        Self {
            heading: NodeKind::Listener.display_name(),
            fields: vec![
                LabelField::bare(&listener.id, Tone::Id),
                LabelField::bare(format!("({})", listener.name), Tone::Name),
                LabelField::keyed(
                    "port",
                    format!("{}/{}", listener.protocol, listener.protocol_port),
                    Tone::Address,
                ),
                LabelField::keyed("prov_status", sink.format_status(&listener.provisioning_status), Tone::Status),
                LabelField::keyed("oper_status", sink.format_status(&listener.operating_status), Tone::Status),
            ],
        }
    }

    pub fn pool<S: TreeSink + ?Sized>(pool: &Pool, sink: &S) -> Self {
        Self {
            heading: NodeKind::Pool.display_name(),
            fields: vec![
                LabelField::bare(&pool.id, Tone::Id),
                LabelField::keyed("protocol", &pool.protocol, Tone::Value),
                LabelField::keyed("algorithm", &pool.lb_algorithm, Tone::Value),
                LabelField::keyed("prov_status", sink.format_status(&pool.provisioning_status), Tone::Status),
                LabelField::keyed("oper_status", sink.format_status(&pool.operating_status), Tone::Status),
                LabelField::keyed("number_members", pool.members.len(), Tone::Address),
            ],
        }
    }

    pub fn health_monitor<S: TreeSink + ?Sized>(hm: &HealthMonitor, sink: &S) -> Self {
        Self {
            heading: NodeKind::HealthMonitor.display_name(),
            fields: vec![
                LabelField::bare(&hm.id, Tone::Id),
                LabelField::keyed("type", &hm.monitor_type, Tone::Value),
                LabelField::keyed("http_method", or_none(&hm.http_method), Tone::Value),
                LabelField::keyed("http_codes", or_none(&hm.expected_codes), Tone::Value),
                LabelField::keyed("url_path", or_none(&hm.url_path), Tone::Value),
                LabelField::keyed("prov_status", sink.format_status(&hm.provisioning_status), Tone::Status),
                LabelField::keyed("oper_status", sink.format_status(&hm.operating_status), Tone::Status),
            ],
        }
    }

    pub fn member<S: TreeSink + ?Sized>(member: &Member, sink: &S) -> Self {
        Self {
            heading: NodeKind::Member.display_name(),
            fields: vec![
                LabelField::bare(&member.id, Tone::Id),
                LabelField::keyed("IP", &member.address, Tone::Value),
                LabelField::keyed("port", member.protocol_port, Tone::Value),
                LabelField::keyed("weight", member.weight, Tone::Value),
                LabelField::keyed("backup", member.backup, Tone::Value),
                LabelField::keyed("prov_status", sink.format_status(&member.provisioning_status), Tone::Status),
                LabelField::keyed("oper_status", sink.format_status(&member.operating_status), Tone::Status),
            ],
        }
    }

    /// Amphora label; a missing server shows `N/A` for its id, flavor and host
    pub fn amphora<S: TreeSink + ?Sized>(
        amphora: &Amphora,
        image_name: &str,
        server: Option<&Server>,
        sink: &S,
    ) -> Self {
        let server_id = server.map_or(NOT_AVAILABLE, |s| s.id.as_str());
        let flavor = server.and_then(Server::flavor_name).unwrap_or(NOT_AVAILABLE);
        let host = server
            .and_then(|s| s.compute_host.as_deref())
            .unwrap_or(NOT_AVAILABLE);

        Self {
            heading: NodeKind::Amphora.display_name(),
            fields: vec![
                LabelField::bare(&amphora.id, Tone::Id),
                LabelField::bare(or_none(&amphora.role), Tone::Plain),
                LabelField::bare(sink.format_status(&amphora.status), Tone::Status),
                LabelField::keyed("lb_network_ip", or_none(&amphora.lb_network_ip), Tone::Address),
                LabelField::keyed("img", image_name, Tone::Value),
                LabelField::keyed("server", server_id, Tone::Value),
                LabelField::keyed("vm_flavor", flavor, Tone::Value),
                LabelField::keyed("compute host", format!("({})", host), Tone::Value),
            ],
        }
    }
}

fn or_none(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or(NONE)
}

/// `['prod', 'web']`
fn tag_list(tags: &[String]) -> String {
    let quoted: Vec<String> = tags.iter().map(|t| format!("'{}'", t)).collect();
    format!("[{}]", quoted.join(", "))
}

/// Flatten a resource record into `key: value` lines sorted by key
///
/// Every top-level attribute yields exactly one line. Strings are rendered
/// raw, nulls as `None`, everything else as compact JSON. Non-object
/// records have no attributes.
pub fn flatten_details(record: &Value) -> Vec<String> {
    let Some(object) = record.as_object() else {
        return Vec::new();
    };

    let mut entries: Vec<(&String, &Value)> = object.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));

    entries
        .into_iter()
        .map(|(key, value)| match value {
            Value::Null => format!("{}: {}", key, NONE),
            Value::String(s) => format!("{}: {}", key, s),
            other => format!("{}: {}", key, other),
        })
        .collect()
}
