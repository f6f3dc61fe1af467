//! Load balancer selection filters.

use super::types::LoadBalancer;

/// Filters applied when listing load balancers
///
/// Everything except `name` is sent to Octavia as a query parameter. The
/// name is matched locally as a substring, which Octavia cannot do.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadBalancerQuery {
    pub id: Option<String>,
    pub name: Option<String>,
    pub tags: Option<String>,
    pub flavor_id: Option<String>,
    pub vip_address: Option<String>,
    pub availability_zone: Option<String>,
    pub vip_network_id: Option<String>,
    pub vip_subnet_id: Option<String>,
}

impl LoadBalancerQuery {
    /// Server-side query parameters, skipping unset filters
    pub fn params(&self) -> Vec<(&'static str, String)> {
        [
            ("tags", &self.tags),
            ("availability_zone", &self.availability_zone),
            ("vip_network_id", &self.vip_network_id),
            ("vip_subnet_id", &self.vip_subnet_id),
            ("flavor_id", &self.flavor_id),
            ("vip_address", &self.vip_address),
            ("id", &self.id),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.as_ref().map(|v| (key, v.clone())))
        .collect()
    }

    /// Client-side name filter: partial match on the load balancer name
    pub fn matches_name(&self, lb: &LoadBalancer) -> bool {
        match &self.name {
            Some(name) => lb.name.contains(name.as_str()),
            None => true,
        }
    }
}
