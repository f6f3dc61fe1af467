//! Cloud credentials and Keystone v3 token issue.
//!
//! Credentials come either from the `OS_*` environment variables (cloud name
//! `envvars`) or from a named entry in `clouds.yaml`. Authentication yields a
//! token plus the service catalog used to locate Octavia, Nova and Glance.

use super::error::{ApiError, Result};
use log::debug;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Cloud name that selects the `OS_*` environment variables
pub const ENVVARS_CLOUD: &str = "envvars";

const DEFAULT_INTERFACE: &str = "public";
const DEFAULT_DOMAIN: &str = "Default";

/// Credentials and scope for one cloud
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthConfig {
    pub auth_url: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub user_id: Option<String>,
    pub project_name: Option<String>,
    pub project_id: Option<String>,
    pub user_domain_name: Option<String>,
    pub user_domain_id: Option<String>,
    pub project_domain_name: Option<String>,
    pub project_domain_id: Option<String>,
    pub application_credential_id: Option<String>,
    pub application_credential_secret: Option<String>,
}

/// One cloud entry, shaped like a `clouds.yaml` entry
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CloudConfig {
    #[serde(default)]
    pub auth: AuthConfig,
    pub region_name: Option<String>,
    pub interface: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CloudsFile {
    #[serde(default)]
    clouds: HashMap<String, CloudConfig>,
}

impl CloudConfig {
    /// Load the credentials for `os_cloud`
    ///
    /// `envvars` reads the process environment; any other name is looked up
    /// in the first `clouds.yaml` found on the standard search path.
    pub fn load(os_cloud: &str) -> Result<Self> {
        if os_cloud == ENVVARS_CLOUD {
            return Ok(Self::from_env_with(|key| env::var(key).ok()));
        }

        let path = clouds_yaml_candidates()
            .into_iter()
            .find(|p| p.is_file())
            .ok_or_else(|| {
                ApiError::CloudConfigError(format!(
                    "no clouds.yaml found while looking for cloud '{}'",
                    os_cloud
                ))
            })?;
        Self::from_clouds_yaml(&path, os_cloud)
    }

    /// Build a cloud entry from `OS_*` variables returned by `lookup`
    pub fn from_env_with<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.is_empty());

        Self {
            auth: AuthConfig {
                auth_url: var("OS_AUTH_URL"),
                username: var("OS_USERNAME"),
                password: var("OS_PASSWORD"),
                user_id: var("OS_USER_ID"),
                project_name: var("OS_PROJECT_NAME").or_else(|| var("OS_TENANT_NAME")),
                project_id: var("OS_PROJECT_ID").or_else(|| var("OS_TENANT_ID")),
                user_domain_name: var("OS_USER_DOMAIN_NAME"),
                user_domain_id: var("OS_USER_DOMAIN_ID"),
                project_domain_name: var("OS_PROJECT_DOMAIN_NAME"),
                project_domain_id: var("OS_PROJECT_DOMAIN_ID"),
                application_credential_id: var("OS_APPLICATION_CREDENTIAL_ID"),
                application_credential_secret: var("OS_APPLICATION_CREDENTIAL_SECRET"),
            },
            region_name: var("OS_REGION_NAME"),
            interface: var("OS_INTERFACE").or_else(|| var("OS_ENDPOINT_TYPE")),
        }
    }

    /// Read the entry named `os_cloud` from a `clouds.yaml` file
    pub fn from_clouds_yaml(path: &Path, os_cloud: &str) -> Result<Self> {
        debug!("Reading cloud '{}' from {}", os_cloud, path.display());
        let content = fs::read_to_string(path).map_err(|e| {
            ApiError::CloudConfigError(format!("cannot read {}: {}", path.display(), e))
        })?;
        let mut file: CloudsFile = serde_yaml::from_str(&content).map_err(|e| {
            ApiError::CloudConfigError(format!("cannot parse {}: {}", path.display(), e))
        })?;

        file.clouds.remove(os_cloud).ok_or_else(|| {
            ApiError::CloudConfigError(format!(
                "cloud '{}' not found in {}",
                os_cloud,
                path.display()
            ))
        })
    }

    /// Endpoint interface to pick from the catalog (public, internal, admin)
    pub fn interface(&self) -> &str {
        self.interface
            .as_deref()
            .map(|i| i.trim_end_matches("URL"))
            .unwrap_or(DEFAULT_INTERFACE)
    }

    /// Keystone v3 base URL, with a `/v3` suffix added when missing
    pub fn identity_url(&self) -> Result<String> {
        let url = self
            .auth
            .auth_url
            .as_deref()
            .ok_or_else(|| ApiError::MissingCredentials("auth_url (OS_AUTH_URL)".to_string()))?
            .trim_end_matches('/');

        if url.ends_with("/v3") {
            Ok(url.to_string())
        } else {
            Ok(format!("{}/v3", url))
        }
    }

    /// Body for `POST /v3/auth/tokens`
    ///
    /// Application credentials win over a password when both are present.
    pub fn token_request(&self) -> Result<Value> {
        let auth = &self.auth;

        if let (Some(id), Some(secret)) = (
            &auth.application_credential_id,
            &auth.application_credential_secret,
        ) {
            return Ok(json!({
                "auth": {
                    "identity": {
                        "methods": ["application_credential"],
                        "application_credential": {"id": id, "secret": secret}
                    }
                }
            }));
        }

        let password = auth
            .password
            .as_deref()
            .ok_or_else(|| ApiError::MissingCredentials("password (OS_PASSWORD)".to_string()))?;

        let user = match (&auth.user_id, &auth.username) {
            (Some(id), _) => json!({"id": id, "password": password}),
            (None, Some(name)) => json!({
                "name": name,
                "password": password,
                "domain": domain(&auth.user_domain_id, &auth.user_domain_name),
            }),
            (None, None) => {
                return Err(ApiError::MissingCredentials(
                    "username (OS_USERNAME)".to_string(),
                ));
            }
        };

        let mut body = json!({
            "auth": {
                "identity": {
                    "methods": ["password"],
                    "password": {"user": user}
                }
            }
        });

        let project = match (&auth.project_id, &auth.project_name) {
            (Some(id), _) => Some(json!({"id": id})),
            (None, Some(name)) => Some(json!({
                "name": name,
                "domain": domain(&auth.project_domain_id, &auth.project_domain_name),
            })),
            (None, None) => None,
        };
        if let Some(project) = project {
            body["auth"]["scope"] = json!({"project": project});
        }

        Ok(body)
    }
}

fn domain(id: &Option<String>, name: &Option<String>) -> Value {
    match (id, name) {
        (Some(id), _) => json!({"id": id}),
        (None, Some(name)) => json!({"name": name}),
        (None, None) => json!({"name": DEFAULT_DOMAIN}),
    }
}

/// Standard `clouds.yaml` search path, most specific first
pub fn clouds_yaml_candidates() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Ok(explicit) = env::var("OS_CLIENT_CONFIG_FILE") {
        paths.push(PathBuf::from(explicit));
    }
    paths.push(PathBuf::from("clouds.yaml"));
    if let Some(config) = dirs::config_dir() {
        paths.push(config.join("openstack").join("clouds.yaml"));
    }
    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".config").join("openstack").join("clouds.yaml"));
    }
    paths.push(PathBuf::from("/etc/openstack/clouds.yaml"));
    paths
}

#[derive(Debug, Clone, Deserialize)]
struct CatalogEndpoint {
    interface: String,
    #[serde(default)]
    region_id: Option<String>,
    #[serde(default)]
    region: Option<String>,
    url: String,
}

#[derive(Debug, Clone, Deserialize)]
struct CatalogEntry {
    #[serde(rename = "type")]
    service_type: String,
    #[serde(default)]
    endpoints: Vec<CatalogEndpoint>,
}

/// Service catalog returned with a Keystone token
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceCatalog {
    #[serde(default)]
    catalog: Vec<CatalogEntry>,
}

impl ServiceCatalog {
    /// URL of `service_type` for `interface`, restricted to `region` when given
    pub fn endpoint(&self, service_type: &str, interface: &str, region: Option<&str>) -> Result<String> {
        self.catalog
            .iter()
            .filter(|entry| entry.service_type == service_type)
            .flat_map(|entry| entry.endpoints.iter())
            .find(|ep| {
                ep.interface == interface
                    && region.is_none_or(|r| {
                        ep.region_id.as_deref() == Some(r) || ep.region.as_deref() == Some(r)
                    })
            })
            .map(|ep| ep.url.trim_end_matches('/').to_string())
            .ok_or_else(|| ApiError::MissingEndpoint {
                service: service_type.to_string(),
                interface: interface.to_string(),
                region: region.unwrap_or("any").to_string(),
            })
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: ServiceCatalog,
}

/// An issued token and the catalog that came with it
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub catalog: ServiceCatalog,
}

/// Issue a Keystone v3 token for `cloud`
pub async fn authenticate(http: &Client, cloud: &CloudConfig) -> Result<Session> {
    let url = format!("{}/auth/tokens", cloud.identity_url()?);
    debug!("Requesting Keystone token from {}", url);

    let response = http.post(&url).json(&cloud.token_request()?).send().await?;
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(match status.as_u16() {
            401 => ApiError::Unauthorized(body),
            403 => ApiError::PermissionDenied(body),
            code => ApiError::ApiError {
                status: code,
                message: body,
            },
        });
    }

    let token = response
        .headers()
        .get("X-Subject-Token")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .ok_or_else(|| ApiError::ParseError("Keystone response has no X-Subject-Token".to_string()))?;
    let body: TokenResponse = response
        .json()
        .await
        .map_err(|e| ApiError::ParseError(e.to_string()))?;

    Ok(Session {
        token,
        catalog: body.token,
    })
}
