use crate::display::OutputFormat;
use crate::tree::MemberOrder;
use serde::{Deserialize, Serialize};

/// Contents of `~/.openstack-lb-info.toml`
///
/// Every field is optional; command-line flags take precedence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub defaults: DefaultsConfig,
    pub api: ApiConfig,
}

/// Defaults for command-line flags
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    pub output_format: Option<OutputFormat>,
    pub max_workers: Option<usize>,
    pub details: Option<bool>,
    pub no_members: Option<bool>,
    pub member_order: Option<MemberOrder>,
    pub os_cloud: Option<String>,
}

/// API client settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Per-request timeout
    pub request_timeout_secs: u64,
    /// Catalog interface (`public`, `internal`, `admin`); overrides the cloud's own
    pub interface: Option<String>,
    /// Catalog region; overrides the cloud's own
    pub region: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 30,
            interface: None,
            region: None,
        }
    }
}
