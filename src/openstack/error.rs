//! Error types for the OpenStack API client
//!
//! A lookup that finds nothing is not an error: single-resource lookups
//! return `Ok(None)` on 404. Everything here is a genuine failure.

use thiserror::Error;

/// Errors that can occur when talking to the OpenStack APIs
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// API returned an error response
    #[error("API error ({status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
    },

    /// Failed to parse the API response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Keystone rejected the credentials or the token expired
    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    /// The project is not allowed to read the requested resource
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Requested collection endpoint was not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded - please try again later")]
    RateLimited,

    /// Server error
    #[error("Server error ({status}): {message}")]
    ServerError {
        /// HTTP status code (5xx)
        status: u16,
        /// Error message
        message: String,
    },

    /// The service catalog has no usable endpoint for a service type
    #[error("No '{service}' endpoint in the service catalog (interface: {interface}, region: {region})")]
    MissingEndpoint {
        service: String,
        interface: String,
        region: String,
    },

    /// Required credentials are absent from the environment or clouds.yaml
    #[error("Missing OpenStack credentials: {0}")]
    MissingCredentials(String),

    /// clouds.yaml could not be found, read or parsed
    #[error("Cloud configuration error: {0}")]
    CloudConfigError(String),
}

/// Result type alias for OpenStack API operations
pub type Result<T> = std::result::Result<T, ApiError>;
