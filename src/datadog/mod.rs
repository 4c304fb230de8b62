//! Datadog synthetics test resource.
//!
//! This resource uses the Datadog API with API key and application key
//! authentication.
//!
//! # Authentication
//!
//! Requires both keys:
//! - API key: organization settings, "API Keys"
//! - Application key: organization settings, "Application Keys"
//!
//! # Example
//!
//! ```no_run
//! use synthetics_resource::datadog::DatadogProvider;
//! use synthetics_resource::{Resource, ResourceData};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//! let provider = DatadogProvider::new("api_key", "app_key")?;
//! let resource = provider.synthetics_test();
//!
//! let mut d = ResourceData::from_json(serde_json::json!({
//!     "name": "homepage",
//!     "type": "api",
//!     "request": { "method": "GET", "url": "https://example.com" },
//!     "locations": ["aws:eu-central-1"],
//!     "options": { "tick_every": "60" },
//!     "paused": true
//! }))?;
//! resource.create(&mut d).await?;
//! println!("created {}", d.id());
//! # Ok(())
//! # }
//! ```
//!
//! # Lifecycle
//!
//! - Create: POST the test, store its public ID, apply `paused`, then read
//! - Read: GET the test; a 404 clears the local ID
//! - Update: PUT the full test, apply `paused`, then read
//! - Delete: bulk delete with this test's ID only
//!
//! `paused` is applied through the status endpoint, never through the test
//! payload.

pub mod api;
pub mod translate;

use std::collections::BTreeMap;
use std::sync::Arc;

use thiserror::Error;

pub use api::{Client, ClientConfig, DatadogError, SyntheticsTest};

use crate::schema::{synthetics_test_schema, ResourceSchema, SchemaError, RESOURCE_NAME};
use crate::types::TestStatus;
use crate::{Resource, ResourceData};

/// Errors returned by the synthetics test lifecycle.
#[derive(Debug, Error)]
pub enum SyntheticsTestError {
    /// Creating the test failed. No ID was assigned.
    #[error("error creating synthetics test: {0}")]
    Create(#[source] DatadogError),

    /// The remote accepted the test but returned no public ID.
    #[error("error creating synthetics test: no public_id in response")]
    MissingId,

    /// Any other API failure.
    #[error(transparent)]
    Api(#[from] DatadogError),
}

impl SyntheticsTestError {
    /// Returns `true` if the remote reported the test as missing.
    pub fn is_not_found(&self) -> bool {
        match self {
            SyntheticsTestError::Create(err) | SyntheticsTestError::Api(err) => err.is_not_found(),
            SyntheticsTestError::MissingId => false,
        }
    }
}

/// Lifecycle of `datadog_synthetics_test`.
///
/// Holds no state besides the shared API client, so independent instances
/// can be driven concurrently.
#[derive(Debug, Clone)]
pub struct SyntheticsTestResource {
    api_client: Arc<Client>,
}

impl SyntheticsTestResource {
    /// Creates the resource for the default Datadog site.
    pub fn new(api_key: &str, app_key: &str) -> Result<Self, DatadogError> {
        Self::with_config(ClientConfig::new(api_key, app_key))
    }

    /// Creates the resource from a full client configuration.
    pub fn with_config(config: ClientConfig) -> Result<Self, DatadogError> {
        Ok(Self::from_client(Arc::new(Client::with_config(config)?)))
    }

    /// Creates the resource with a custom API base URL.
    ///
    /// This is primarily useful for testing with mock servers.
    pub fn with_base_url(api_key: &str, app_key: &str, base_url: &str) -> Result<Self, DatadogError> {
        Self::with_config(ClientConfig::new(api_key, app_key).base_url(base_url))
    }

    /// Creates the resource around an existing client.
    pub fn from_client(api_client: Arc<Client>) -> Self {
        Self { api_client }
    }

    /// Returns the underlying API client.
    pub fn client(&self) -> &Client {
        &self.api_client
    }

    /// Pauses or resumes the test according to the local `paused` attribute.
    ///
    /// Nothing is sent when the attribute is absent.
    async fn update_liveness(&self, d: &ResourceData) -> Result<(), DatadogError> {
        let Some(paused) = d.get_bool("paused") else {
            return Ok(());
        };
        let status = TestStatus::from_paused(paused);
        tracing::debug!(id = d.id(), %status, "updating synthetics test liveness");
        self.api_client.set_test_status(d.id(), status).await?;
        Ok(())
    }
}

impl Resource for SyntheticsTestResource {
    type Error = SyntheticsTestError;

    fn schema(&self) -> ResourceSchema {
        synthetics_test_schema()
    }

    async fn create(&self, d: &mut ResourceData) -> Result<(), Self::Error> {
        let test = translate::to_remote(d);
        let created = self
            .api_client
            .create_test(&test)
            .await
            .map_err(SyntheticsTestError::Create)?;

        // Without an ID no state is persisted, so the test stays absent.
        let id = created
            .public_id
            .filter(|id| !id.is_empty())
            .ok_or(SyntheticsTestError::MissingId)?;
        tracing::info!(id = %id, "created synthetics test");
        d.set_id(id);

        self.update_liveness(d).await?;
        self.read(d).await
    }

    async fn read(&self, d: &mut ResourceData) -> Result<(), Self::Error> {
        match self.api_client.get_test(d.id()).await {
            Ok(test) => {
                translate::apply_remote(&test, d);
                Ok(())
            }
            Err(err) => {
                if err.is_not_found() {
                    tracing::warn!(id = d.id(), "synthetics test no longer exists, removing from state");
                    d.set_id("");
                }
                Err(err.into())
            }
        }
    }

    async fn update(&self, d: &mut ResourceData) -> Result<(), Self::Error> {
        let test = translate::to_remote(d);
        self.api_client.update_test(d.id(), &test).await?;
        tracing::info!(id = d.id(), "updated synthetics test");

        self.update_liveness(d).await?;
        self.read(d).await
    }

    async fn delete(&self, d: &mut ResourceData) -> Result<(), Self::Error> {
        // On failure the test is assumed to still exist and state is kept.
        self.api_client
            .delete_tests(&[d.id().to_string()])
            .await?;
        tracing::info!(id = d.id(), "deleted synthetics test");
        d.set_id("");
        Ok(())
    }

    async fn exists(&self, d: &ResourceData) -> Result<bool, Self::Error> {
        // A 404 is an error here too; only read clears state on it.
        self.api_client
            .get_test(d.id())
            .await
            .map(|_| true)
            .map_err(Into::into)
    }

    async fn import(&self, id: &str) -> Result<Vec<ResourceData>, Self::Error> {
        let mut d = ResourceData::with_id(id);
        self.read(&mut d).await?;
        Ok(vec![d])
    }
}

/// Entry point exposing every resource of this crate.
#[derive(Debug, Clone)]
pub struct DatadogProvider {
    synthetics_test: SyntheticsTestResource,
}

impl DatadogProvider {
    /// Creates a provider for the default Datadog site.
    pub fn new(api_key: &str, app_key: &str) -> Result<Self, DatadogError> {
        Self::with_config(ClientConfig::new(api_key, app_key))
    }

    /// Creates a provider from a full client configuration.
    pub fn with_config(config: ClientConfig) -> Result<Self, DatadogError> {
        Ok(Self {
            synthetics_test: SyntheticsTestResource::with_config(config)?,
        })
    }

    /// Creates a provider from `DATADOG_API_KEY`, `DATADOG_APP_KEY` and `DATADOG_HOST`.
    pub fn from_env() -> Result<Self, DatadogError> {
        Self::with_config(ClientConfig::from_env()?)
    }

    /// Returns the synthetics test resource.
    pub fn synthetics_test(&self) -> &SyntheticsTestResource {
        &self.synthetics_test
    }

    /// Returns the schema of every resource, keyed by resource name.
    pub fn resource_schemas(&self) -> BTreeMap<&'static str, ResourceSchema> {
        BTreeMap::from([(RESOURCE_NAME, self.synthetics_test.schema())])
    }

    /// Validates configuration for the named resource.
    ///
    /// Returns `None` for an unknown resource name.
    pub fn validate(&self, resource: &str, d: &ResourceData) -> Option<Result<(), Vec<SchemaError>>> {
        self.resource_schemas()
            .get(resource)
            .map(|schema| schema.validate(d))
    }
}
