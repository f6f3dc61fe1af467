use crate::config::types::Config;
use crate::display::OutputFormat;
use crate::handlers::{ShowSettings, TreeView};
use crate::openstack::{ENVVARS_CLOUD, LoadBalancerQuery};
use crate::tree::{BuildOptions, DEFAULT_MAX_WORKERS, MAX_WORKERS_LIMIT, MemberOrder};
use clap::Parser;
use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "openstack-lb-info")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Show OpenStack load balancers as a tree of their resources")]
#[command(long_about = "Queries Octavia for load balancers and prints each one as a tree: \
listeners, pools, health monitors and members, or the amphorae that serve it.")]
pub struct Cli {
    /// Type of tree to display
    #[arg(short = 't', long = "type", value_enum)]
    pub view: TreeView,

    /// Output format [default: rich]
    #[arg(short, long, value_enum)]
    pub output_format: Option<OutputFormat>,

    /// Cloud name from clouds.yaml, or "envvars" to use OS_* variables
    #[arg(long, value_name = "NAME", env = "OS_CLOUD")]
    pub os_cloud: Option<String>,

    /// Filter by load balancer name (partial match)
    #[arg(long, value_parser = parse_non_empty)]
    pub name: Option<String>,

    /// Filter by load balancer ID
    #[arg(long, value_parser = parse_uuid)]
    pub id: Option<String>,

    /// Filter by tags
    #[arg(long, value_parser = parse_non_empty)]
    pub tags: Option<String>,

    /// Filter by flavor ID
    #[arg(long, value_parser = parse_uuid)]
    pub flavor_id: Option<String>,

    /// Filter by VIP address
    #[arg(long, value_parser = parse_ip_address)]
    pub vip_address: Option<String>,

    /// Filter by availability zone
    #[arg(long, value_parser = parse_non_empty)]
    pub availability_zone: Option<String>,

    /// Filter by VIP network ID
    #[arg(long, value_parser = parse_uuid)]
    pub vip_network_id: Option<String>,

    /// Filter by VIP subnet ID
    #[arg(long, value_parser = parse_uuid)]
    pub vip_subnet_id: Option<String>,

    /// Show every attribute of each resource
    #[arg(long)]
    pub details: bool,

    /// Do not retrieve pool members
    #[arg(long)]
    pub no_members: bool,

    /// Concurrent member lookups per pool (1-32) [default: 4]
    #[arg(long, value_name = "N", value_parser = parse_max_workers)]
    pub max_workers: Option<usize>,

    /// Order of members under their pool [default: completion]
    #[arg(long, value_enum)]
    pub member_order: Option<MemberOrder>,

    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    pub debug: bool,

    /// Enable verbose logging (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn init_logging(&self) {
        let level = match self.verbose {
            0 if self.debug => log::LevelFilter::Debug,
            0 => log::LevelFilter::Warn,
            1 if self.debug => log::LevelFilter::Debug,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        };

        env_logger::Builder::from_default_env()
            .filter_level(level)
            .init();
    }

    /// Merge flags over the config file defaults
    pub fn show_settings(&self, config: &Config) -> ShowSettings {
        let defaults = &config.defaults;

        ShowSettings {
            view: self.view,
            output_format: self
                .output_format
                .or(defaults.output_format)
                .unwrap_or_default(),
            os_cloud: self
                .os_cloud
                .clone()
                .or_else(|| defaults.os_cloud.clone())
                .unwrap_or_else(|| ENVVARS_CLOUD.to_string()),
            query: LoadBalancerQuery {
                id: self.id.clone(),
                name: self.name.clone(),
                tags: self.tags.clone(),
                flavor_id: self.flavor_id.clone(),
                vip_address: self.vip_address.clone(),
                availability_zone: self.availability_zone.clone(),
                vip_network_id: self.vip_network_id.clone(),
                vip_subnet_id: self.vip_subnet_id.clone(),
            },
            build: BuildOptions {
                details: self.details || defaults.details.unwrap_or(false),
                max_workers: self
                    .max_workers
                    .or(defaults.max_workers)
                    .unwrap_or(DEFAULT_MAX_WORKERS),
                skip_members: self.no_members || defaults.no_members.unwrap_or(false),
                member_order: self
                    .member_order
                    .or(defaults.member_order)
                    .unwrap_or_default(),
            },
            request_timeout: Duration::from_secs(config.api.request_timeout_secs),
            interface: config.api.interface.clone(),
            region: config.api.region.clone(),
        }
    }
}

fn parse_non_empty(value: &str) -> Result<String, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("value cannot be empty".to_string());
    }
    Ok(trimmed.to_string())
}

fn parse_uuid(value: &str) -> Result<String, String> {
    uuid::Uuid::parse_str(value)
        .map(|_| value.to_string())
        .map_err(|e| format!("'{}' is not a valid UUID: {}", value, e))
}

fn parse_ip_address(value: &str) -> Result<String, String> {
    value
        .parse::<IpAddr>()
        .map(|ip| ip.to_string())
        .map_err(|_| format!("'{}' is not a valid IPv4 or IPv6 address", value))
}

fn parse_max_workers(value: &str) -> Result<usize, String> {
    let range_message = || format!("must be an integer between 1 and {}", MAX_WORKERS_LIMIT);
    let workers: usize = value.parse().map_err(|_| range_message())?;
    if !(1..=MAX_WORKERS_LIMIT).contains(&workers) {
        return Err(range_message());
    }
    Ok(workers)
}
