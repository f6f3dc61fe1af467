//! REST client for the Octavia, Nova and Glance APIs
//!
//! Authenticates once against Keystone, then issues plain token-authenticated
//! GET requests. List calls follow pagination links until exhausted. There
//! are no retries; the request timeout is the only deadline.

use super::ResourceClient;
use super::auth::{self, CloudConfig};
use super::error::{ApiError, Result};
use super::query::LoadBalancerQuery;
use super::types::{
    Amphora, HealthMonitor, Image, Listener, LoadBalancer, Member, Pool, Server,
};
use log::debug;
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

/// User agent for API requests
const USER_AGENT: &str = concat!("openstack-lb-info/", env!("CARGO_PKG_VERSION"));

const AUTH_TOKEN_HEADER: &str = "X-Auth-Token";

/// Nova microversion that embeds the flavor name in server payloads
const COMPUTE_MICROVERSION: &str = "2.47";

/// Client for the OpenStack services behind a load balancer tree
pub struct OpenStackClient {
    http_client: Client,
    token: String,
    /// Octavia root, without API version
    load_balancer_url: String,
    /// Nova root, including its version path as published in the catalog
    compute_url: String,
    /// Glance root, without API version
    image_url: String,
}

impl OpenStackClient {
    /// Authenticate against Keystone and resolve service endpoints
    pub async fn connect(cloud: &CloudConfig, timeout: Duration) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(ApiError::HttpError)?;

        let session = auth::authenticate(&http_client, cloud).await?;
        let interface = cloud.interface();
        let region = cloud.region_name.as_deref();

        let load_balancer = session.catalog.endpoint("load-balancer", interface, region)?;
        let compute = session.catalog.endpoint("compute", interface, region)?;
        let image = session.catalog.endpoint("image", interface, region)?;
        debug!(
            "Endpoints: load-balancer={} compute={} image={}",
            load_balancer, compute, image
        );

        Ok(Self::with_endpoints(
            http_client,
            session.token,
            &load_balancer,
            &compute,
            &image,
        ))
    }

    /// Build a client from an existing token and explicit endpoints
    pub fn with_endpoints(
        http_client: Client,
        token: impl Into<String>,
        load_balancer_url: &str,
        compute_url: &str,
        image_url: &str,
    ) -> Self {
        Self {
            http_client,
            token: token.into(),
            load_balancer_url: strip_version(load_balancer_url),
            compute_url: compute_url.trim_end_matches('/').to_string(),
            image_url: strip_version(image_url),
        }
    }

    pub fn load_balancer_url(&self) -> &str {
        &self.load_balancer_url
    }

    pub fn compute_url(&self) -> &str {
        &self.compute_url
    }

    pub fn image_url(&self) -> &str {
        &self.image_url
    }

    /// List load balancers matching `query`
    ///
    /// Endpoint: GET /v2/lbaas/loadbalancers
    pub async fn list_load_balancers(&self, query: &LoadBalancerQuery) -> Result<Vec<LoadBalancer>> {
        let params = query.params();
        debug!("Retrieving load balancers with filters: {:?}", params);

        let url = url_with_params(&self.octavia("/lbaas/loadbalancers"), &params)?;
        let lbs: Vec<LoadBalancer> = self
            .get_list(url, "loadbalancers", &self.load_balancer_url)
            .await?;

        Ok(lbs.into_iter().filter(|lb| query.matches_name(lb)).collect())
    }

    fn octavia(&self, path: &str) -> String {
        format!("{}/v2{}", self.load_balancer_url, path)
    }

    fn request(&self, url: &str) -> RequestBuilder {
        self.http_client
            .get(url)
            .header(AUTH_TOKEN_HEADER, &self.token)
            .header("Accept", "application/json")
    }

    /// GET a single resource wrapped in `{"<key>": {...}}`; 404 yields `None`
    async fn get_optional<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        key: &str,
    ) -> Result<Option<T>> {
        let response = request.send().await?;
        if response.status().as_u16() == 404 {
            return Ok(None);
        }

        let body = self.handle_response(response).await?;
        unwrap_envelope(body, key).map(Some)
    }

    /// GET every page of a collection wrapped in `{"<key>": [...]}`
    async fn get_list<T: DeserializeOwned>(&self, url: Url, key: &str, root: &str) -> Result<Vec<T>> {
        let mut items = Vec::new();
        let mut next = Some(url.to_string());

        while let Some(url) = next.take() {
            let response = self.request(&url).send().await?;
            let body = self.handle_response(response).await?;

            next = next_link(&body, key, root).filter(|link| *link != url);
            let page: Vec<T> = unwrap_envelope(body, key)?;
            items.extend(page);
        }

        Ok(items)
    }

    /// Handle the HTTP response, converting errors appropriately
    async fn handle_response(&self, response: Response) -> Result<Value> {
        let status = response.status();

        if status.is_success() {
            return response
                .json::<Value>()
                .await
                .map_err(|e| ApiError::ParseError(e.to_string()));
        }

        let status_code = status.as_u16();
        let error_body = response.text().await.unwrap_or_default();
        let error_message = error_message(&error_body);

        match status_code {
            401 => Err(ApiError::Unauthorized(error_message)),
            403 => Err(ApiError::PermissionDenied(error_message)),
            404 => Err(ApiError::NotFound(error_message)),
            429 => Err(ApiError::RateLimited),
            500..=599 => Err(ApiError::ServerError {
                status: status_code,
                message: error_message,
            }),
            _ => Err(ApiError::ApiError {
                status: status_code,
                message: error_message,
            }),
        }
    }
}

impl ResourceClient for OpenStackClient {
    async fn find_listener(&self, listener_id: &str) -> Result<Option<Listener>> {
        debug!("Retrieving listener with ID: {}", listener_id);
        let url = self.octavia(&format!("/lbaas/listeners/{}", listener_id));
        self.get_optional(self.request(&url), "listener").await
    }

    async fn find_pool(&self, pool_id: &str) -> Result<Option<Pool>> {
        debug!("Retrieving pool with ID: {}", pool_id);
        let url = self.octavia(&format!("/lbaas/pools/{}", pool_id));
        self.get_optional(self.request(&url), "pool").await
    }

    async fn find_health_monitor(&self, health_monitor_id: &str) -> Result<Option<HealthMonitor>> {
        debug!("Retrieving health monitor with ID: {}", health_monitor_id);
        let url = self.octavia(&format!("/lbaas/healthmonitors/{}", health_monitor_id));
        self.get_optional(self.request(&url), "healthmonitor").await
    }

    async fn find_member(&self, member_id: &str, pool_id: &str) -> Result<Option<Member>> {
        debug!(
            "Retrieving member with ID: {} from pool ID: {}",
            member_id, pool_id
        );
        let url = self.octavia(&format!("/lbaas/pools/{}/members/{}", pool_id, member_id));
        self.get_optional(self.request(&url), "member").await
    }

    async fn list_amphorae(&self, loadbalancer_id: &str) -> Result<Vec<Amphora>> {
        debug!("Retrieving amphorae from LB ID: {}", loadbalancer_id);
        let url = url_with_params(
            &self.octavia("/octavia/amphorae"),
            &[("loadbalancer_id", loadbalancer_id.to_string())],
        )?;
        self.get_list(url, "amphorae", &self.load_balancer_url).await
    }

    async fn find_server(&self, server_id: &str) -> Result<Option<Server>> {
        debug!("Retrieving compute server with ID: {}", server_id);
        let url = format!("{}/servers/{}", self.compute_url, server_id);
        let request = self
            .request(&url)
            .header("OpenStack-API-Version", format!("compute {}", COMPUTE_MICROVERSION))
            .header("X-OpenStack-Nova-API-Version", COMPUTE_MICROVERSION);
        self.get_optional(request, "server").await
    }

    async fn list_images(&self, image_ids: &[String]) -> Result<Vec<Image>> {
        if image_ids.is_empty() {
            return Ok(Vec::new());
        }

        debug!("Retrieving images with IDs: {:?}", image_ids);
        let url = url_with_params(
            &format!("{}/v2/images", self.image_url),
            &[("id", format!("in:{}", image_ids.join(",")))],
        )?;
        self.get_list(url, "images", &self.image_url).await
    }
}

/// Drop a trailing `/v2` or `/v2.0` so API paths can be appended uniformly
fn strip_version(url: &str) -> String {
    let url = url.trim_end_matches('/');
    url.strip_suffix("/v2.0")
        .or_else(|| url.strip_suffix("/v2"))
        .unwrap_or(url)
        .to_string()
}

fn url_with_params(base: &str, params: &[(&str, String)]) -> Result<Url> {
    let mut url = Url::parse(base).map_err(|e| ApiError::ParseError(format!("{}: {}", base, e)))?;
    if !params.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in params {
            pairs.append_pair(key, value);
        }
    }
    Ok(url)
}

/// Take `body[key]` and deserialize it
fn unwrap_envelope<T: DeserializeOwned>(mut body: Value, key: &str) -> Result<T> {
    let inner = body
        .get_mut(key)
        .map(Value::take)
        .ok_or_else(|| ApiError::ParseError(format!("response has no '{}' field", key)))?;

    serde_json::from_value(inner).map_err(|e| ApiError::ParseError(format!("{}: {}", key, e)))
}

/// Next page URL, from Octavia-style `<key>_links` or Glance-style `next`
fn next_link(body: &Value, key: &str, root: &str) -> Option<String> {
    let href = body
        .get(format!("{}_links", key))
        .and_then(Value::as_array)
        .and_then(|links| {
            links
                .iter()
                .find(|link| link.get("rel").and_then(Value::as_str) == Some("next"))
        })
        .and_then(|link| link.get("href"))
        .or_else(|| body.get("next"))
        .and_then(Value::as_str)?;

    if href.starts_with("http://") || href.starts_with("https://") {
        Some(href.to_string())
    } else {
        Some(format!("{}{}", root, href))
    }
}

/// Best-effort message out of an OpenStack error body
fn error_message(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return body.to_string();
    };

    // Octavia: {"faultstring": ...}; Nova: {"itemNotFound": {"message": ...}}
    if let Some(fault) = value.get("faultstring").and_then(Value::as_str) {
        return fault.to_string();
    }
    value
        .as_object()
        .and_then(|obj| obj.values().find_map(|v| v.get("message")))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| body.to_string())
}
