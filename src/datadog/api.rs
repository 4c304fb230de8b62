//! Low-level Datadog synthetics API client.
//!
//! This module provides direct access to the synthetics check endpoints and
//! the wire structs they exchange.
//!
//! # Endpoints
//!
//! | Method | Path | Purpose |
//! |--------|------|---------|
//! | GET | `/v0/synthetics/checks?type=api` | list tests |
//! | GET | `/v0/synthetics/checks/{id}` | fetch one test |
//! | POST | `/v0/synthetics/checks` | create |
//! | PUT | `/v0/synthetics/checks/{id}` | full replacement |
//! | PUT | `/v0/synthetics/checks/{id}/status` | pause / resume |
//! | POST | `/v0/synthetics/checks/delete` | bulk delete |

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client as HttpClient, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{AssertionTarget, SyntheticsType, TestStatus};
use crate::HttpClientConfig;

/// The Datadog API base URL.
pub const DATADOG_API_URL: &str = "https://api.datadoghq.com/api";

/// Path of the synthetics checks collection.
const CHECKS_PATH: &str = "/v0/synthetics/checks";

/// Errors that may occur when interacting with the Datadog API.
#[derive(Debug, Error)]
pub enum DatadogError {
    /// The API answered with a non-success status.
    #[error("API error {status}: {message}")]
    Api { status: StatusCode, message: String },

    /// An HTTP request error occurred.
    #[error("HTTP request error: {0}")]
    Request(#[from] reqwest::Error),

    /// Failed to serialize/deserialize.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The client could not be configured.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl DatadogError {
    /// Returns the HTTP status of an API error.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            DatadogError::Api { status, .. } => Some(*status),
            DatadogError::Request(err) => err.status(),
            _ => None,
        }
    }

    /// Returns `true` if the remote reported the resource as missing.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }
}

// =============================================================================
// Wire Types
// =============================================================================

/// A synthetics test, either api or browser.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyntheticsTest {
    /// Public ID assigned on creation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub test_type: Option<SyntheticsType>,
    /// Always serialized, so an update can clear every tag.
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<SyntheticsConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<SyntheticsOptions>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub locations: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<SyntheticsUser>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_by: Option<SyntheticsUser>,
    /// Liveness as reported by the remote. Never sent on create or update.
    #[serde(default, skip_serializing)]
    pub status: Option<TestStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monitor_id: Option<i64>,
}

/// Request and assertions of a test.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyntheticsConfig {
    #[serde(default)]
    pub request: Option<SyntheticsRequest>,
    #[serde(default)]
    pub assertions: Vec<SyntheticsAssertion>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variables: Vec<serde_json::Value>,
}

/// The HTTP request a test performs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyntheticsRequest {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<i64>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

/// A pass/fail condition evaluated against the response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyntheticsAssertion {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub assertion_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<AssertionTarget>,
}

/// Scheduling and alerting options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyntheticsOptions {
    /// Tick interval in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tick_every: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_failure_duration: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_location_failed: Option<i64>,
    /// Emulated devices, browser tests only.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub devices: Vec<SyntheticsDevice>,
}

/// A device emulated by a browser test.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyntheticsDevice {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<i64>,
    #[serde(rename = "isMobile", default, skip_serializing_if = "Option::is_none")]
    pub is_mobile: Option<bool>,
    #[serde(rename = "isLandscape", default, skip_serializing_if = "Option::is_none")]
    pub is_landscape: Option<bool>,
}

/// Author or last editor of a test.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntheticsUser {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub handle: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChecksList {
    #[serde(default)]
    checks: Vec<SyntheticsTest>,
}

/// Body of the status endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToggleStatus {
    pub new_status: TestStatus,
}

/// Body of the bulk delete endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteChecksRequest {
    pub check_ids: Vec<String>,
}

// =============================================================================
// Configuration
// =============================================================================

/// Credentials and endpoint for the Datadog API client.
#[derive(Clone)]
pub struct ClientConfig {
    /// Organization API key.
    pub api_key: String,
    /// Application key.
    pub app_key: String,
    /// API base URL, without a trailing slash.
    pub base_url: String,
    /// Network settings.
    pub http: HttpClientConfig,
}

impl ClientConfig {
    /// Creates a configuration targeting the default Datadog site.
    pub fn new(api_key: impl Into<String>, app_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            app_key: app_key.into(),
            base_url: DATADOG_API_URL.to_string(),
            http: HttpClientConfig::default(),
        }
    }

    /// Reads `DATADOG_API_KEY`, `DATADOG_APP_KEY` and the optional
    /// `DATADOG_HOST` (such as `https://api.datadoghq.eu`).
    pub fn from_env() -> Result<Self, DatadogError> {
        let api_key = std::env::var("DATADOG_API_KEY")
            .map_err(|_| DatadogError::Config("DATADOG_API_KEY is not set".to_string()))?;
        let app_key = std::env::var("DATADOG_APP_KEY")
            .map_err(|_| DatadogError::Config("DATADOG_APP_KEY is not set".to_string()))?;

        let config = Self::new(api_key, app_key);
        Ok(match std::env::var("DATADOG_HOST") {
            Ok(host) if !host.is_empty() => {
                config.base_url(&format!("{}/api", host.trim_end_matches('/')))
            }
            _ => config,
        })
    }

    /// Overrides the API base URL. Mostly useful for mock servers.
    pub fn base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Sets the network configuration.
    pub fn http(mut self, http: HttpClientConfig) -> Self {
        self.http = http;
        self
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("app_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("http", &self.http)
            .finish()
    }
}

// =============================================================================
// API Client
// =============================================================================

/// Datadog synthetics API client.
#[derive(Debug, Clone)]
pub struct Client {
    http_client: HttpClient,
    base_url: String,
}

impl Client {
    /// Creates a new client for the default Datadog site.
    pub fn new(api_key: &str, app_key: &str) -> Result<Self, DatadogError> {
        Self::with_config(ClientConfig::new(api_key, app_key))
    }

    /// Creates a new client with a custom base URL.
    ///
    /// This is primarily useful for testing with mock servers.
    pub fn with_base_url(api_key: &str, app_key: &str, base_url: &str) -> Result<Self, DatadogError> {
        Self::with_config(ClientConfig::new(api_key, app_key).base_url(base_url))
    }

    /// Creates a new client from a full configuration.
    pub fn with_config(config: ClientConfig) -> Result<Self, DatadogError> {
        let mut headers = HeaderMap::new();
        headers.insert("DD-API-KEY", sensitive_header(&config.api_key)?);
        headers.insert("DD-APPLICATION-KEY", sensitive_header(&config.app_key)?);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let mut builder = HttpClient::builder()
            .default_headers(headers)
            .timeout(config.http.timeout.unwrap_or(Duration::from_secs(30)));

        if let Some(addr) = config.http.local_address {
            builder = builder.local_address(addr);
        }

        #[cfg(any(
            target_os = "android",
            target_os = "fuchsia",
            target_os = "linux",
            target_os = "macos",
            target_os = "ios",
            target_os = "tvos",
            target_os = "watchos",
            target_os = "illumos",
            target_os = "solaris",
        ))]
        if let Some(ref iface) = config.http.interface {
            builder = builder.interface(iface);
        }

        Ok(Self {
            http_client: builder.build()?,
            base_url: config.base_url,
        })
    }

    /// Returns the API base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sends a request and returns the raw body of a successful response.
    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<String, DatadogError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%method, %url, "datadog api request");

        let mut request = self.http_client.request(method.clone(), &url);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            tracing::debug!(%method, %url, %status, "datadog api error");
            return Err(DatadogError::Api {
                status,
                message: text,
            });
        }
        Ok(text)
    }

    async fn request_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, DatadogError> {
        let text = self.send(method, path, body).await?;
        Ok(serde_json::from_str(&text)?)
    }

    // =========================================================================
    // Synthetics APIs
    // =========================================================================

    /// Lists all tests of type api.
    pub async fn list_tests(&self) -> Result<Vec<SyntheticsTest>, DatadogError> {
        let list: ChecksList = self
            .request_json::<(), _>(Method::GET, &format!("{}?type=api", CHECKS_PATH), None)
            .await?;
        Ok(list.checks)
    }

    /// Gets a test by public ID.
    pub async fn get_test(&self, public_id: &str) -> Result<SyntheticsTest, DatadogError> {
        self.request_json::<(), _>(Method::GET, &format!("{}/{}", CHECKS_PATH, public_id), None)
            .await
    }

    /// Creates a test. The returned test carries the assigned public ID.
    pub async fn create_test(&self, test: &SyntheticsTest) -> Result<SyntheticsTest, DatadogError> {
        self.request_json(Method::POST, CHECKS_PATH, Some(test)).await
    }

    /// Replaces a test.
    pub async fn update_test(
        &self,
        public_id: &str,
        test: &SyntheticsTest,
    ) -> Result<SyntheticsTest, DatadogError> {
        self.request_json(
            Method::PUT,
            &format!("{}/{}", CHECKS_PATH, public_id),
            Some(test),
        )
        .await
    }

    /// Sets the liveness of a test.
    pub async fn set_test_status(
        &self,
        public_id: &str,
        status: TestStatus,
    ) -> Result<bool, DatadogError> {
        self.request_json(
            Method::PUT,
            &format!("{}/{}/status", CHECKS_PATH, public_id),
            Some(&ToggleStatus { new_status: status }),
        )
        .await
    }

    /// Pauses a test.
    pub async fn pause_test(&self, public_id: &str) -> Result<bool, DatadogError> {
        self.set_test_status(public_id, TestStatus::Paused).await
    }

    /// Resumes a test.
    pub async fn resume_test(&self, public_id: &str) -> Result<bool, DatadogError> {
        self.set_test_status(public_id, TestStatus::Live).await
    }

    /// Deletes tests by public ID.
    pub async fn delete_tests(&self, public_ids: &[String]) -> Result<(), DatadogError> {
        let body = DeleteChecksRequest {
            check_ids: public_ids.to_vec(),
        };
        self.send(Method::POST, &format!("{}/delete", CHECKS_PATH), Some(&body))
            .await
            .map(|_| ())
    }
}

fn sensitive_header(value: &str) -> Result<HeaderValue, DatadogError> {
    let mut header = HeaderValue::from_str(value)
        .map_err(|e| DatadogError::Config(format!("invalid credential header: {}", e)))?;
    header.set_sensitive(true);
    Ok(header)
}
