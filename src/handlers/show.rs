use crate::display::{Activity, JsonSink, OutputFormat, PlainSink, RichSink};
use crate::error::{LbInfoError, Result};
use crate::openstack::{CloudConfig, LoadBalancer, LoadBalancerQuery, OpenStackClient, ResourceClient};
use crate::tree::{AmphoraTreeBuilder, BuildOptions, ImageNameCache, TreeBuilder, TreeSink};
use clap::ValueEnum;
use log::{debug, info};
use std::time::Duration;

/// Which tree to build for each load balancer
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TreeView {
    /// Listeners, pools, health monitors and members
    Lb,
    /// Amphorae with their servers and images
    Amphora,
}

/// Fully resolved settings for one invocation
#[derive(Debug, Clone)]
pub struct ShowSettings {
    pub view: TreeView,
    pub output_format: OutputFormat,
    pub os_cloud: String,
    pub query: LoadBalancerQuery,
    pub build: BuildOptions,
    pub request_timeout: Duration,
    /// Overrides the cloud's catalog interface
    pub interface: Option<String>,
    /// Overrides the cloud's region
    pub region: Option<String>,
}

/// Outcome of rendering every selected load balancer
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ShowReport {
    pub rendered: usize,
    /// Ids of load balancers whose tree could not be built
    pub failed: Vec<String>,
}

/// Connect, select load balancers and render a tree for each
pub async fn handle_show(settings: ShowSettings) -> Result<ShowReport> {
    let mut cloud = CloudConfig::load(&settings.os_cloud)?;
    if settings.interface.is_some() {
        cloud.interface = settings.interface.clone();
    }
    if settings.region.is_some() {
        cloud.region_name = settings.region.clone();
    }

    let client = {
        let _status = status_for(settings.output_format, "Connecting to OpenStack");
        OpenStackClient::connect(&cloud, settings.request_timeout).await?
    };

    debug!("Load balancer filter: {:?}", settings.query);
    let lbs = {
        let _status = status_for(settings.output_format, "Retrieving load balancers");
        client.list_load_balancers(&settings.query).await?
    };
    info!("Found {} load balancer(s)", lbs.len());

    if lbs.is_empty() {
        return Err(LbInfoError::NoLoadBalancers);
    }

    let images = ImageNameCache::new();
    let report = match settings.output_format {
        OutputFormat::Rich => {
            render_all(&client, &mut RichSink::stdout(), &lbs, settings.view, &settings.build, &images).await
        }
        OutputFormat::Plain => {
            render_all(&client, &mut PlainSink::stdout(), &lbs, settings.view, &settings.build, &images).await
        }
        OutputFormat::Json => {
            render_all(&client, &mut JsonSink::stdout(), &lbs, settings.view, &settings.build, &images).await
        }
    };
    Ok(report)
}

/// Render one tree per load balancer through `sink`
///
/// A failed tree is reported on stderr and does not stop the others.
pub async fn render_all<C: ResourceClient, S: TreeSink>(
    client: &C,
    sink: &mut S,
    lbs: &[LoadBalancer],
    view: TreeView,
    options: &BuildOptions,
    images: &ImageNameCache,
) -> ShowReport {
    let mut report = ShowReport::default();

    for lb in lbs {
        let result = match view {
            TreeView::Lb => TreeBuilder::new(client, sink, options.clone()).display(lb).await,
            TreeView::Amphora => {
                AmphoraTreeBuilder::new(client, sink, images, options.details)
                    .display(lb)
                    .await
            }
        };

        match result {
            Ok(()) => report.rendered += 1,
            Err(e) => {
                eprintln!("Error: load balancer {}: {}", lb.id, e);
                report.failed.push(lb.id.clone());
            }
        }
    }

    report
}

/// Status indicator matching the output format, used before any sink exists
fn status_for(format: OutputFormat, message: &str) -> Activity {
    match format {
        OutputFormat::Rich => Activity::spinner(message),
        OutputFormat::Plain => Activity::announced(message),
        OutputFormat::Json => Activity::none(),
    }
}
