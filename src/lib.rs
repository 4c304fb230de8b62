//! Declarative lifecycle management for Datadog synthetics tests.
//!
//! This crate implements the `datadog_synthetics_test` resource the way a
//! provider framework expects it: a static schema, a flat local state and
//! create / read / update / delete / exists / import operations that
//! reconcile that state with the remote API.
//!
//! # Layout
//!
//! - [`schema`]: the attribute declaration and its validator
//! - [`state`]: [`ResourceData`], the flat local state
//! - [`types`]: test types, liveness and assertion targets
//! - [`datadog`]: the API client, the state translator and the resource
//!
//! # Example
//!
//! ```no_run
//! use synthetics_resource::datadog::SyntheticsTestResource;
//! use synthetics_resource::{Resource, ResourceData};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//! let resource = SyntheticsTestResource::new("api_key", "app_key")?;
//!
//! let mut d = ResourceData::with_id("abc-def-ghi");
//! if resource.exists(&d).await? {
//!     resource.read(&mut d).await?;
//!     println!("{} runs every {}s", d.get_str("name"), d.get_str("options.tick_every"));
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Logging
//!
//! Requests and lifecycle transitions are reported through `tracing`. The
//! crate never installs a subscriber.

pub mod datadog;
pub mod schema;
pub mod state;
pub mod types;

use std::future::Future;
use std::net::IpAddr;
use std::time::Duration;

pub use schema::{ResourceSchema, SchemaError};
pub use state::ResourceData;

/// Network settings for the underlying HTTP client.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use synthetics_resource::HttpClientConfig;
///
/// let config = HttpClientConfig::new()
///     .local_address("127.0.0.1".parse().unwrap())
///     .timeout(Duration::from_secs(10));
/// assert_eq!(config.timeout, Some(Duration::from_secs(10)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpClientConfig {
    /// Local address to bind outgoing connections to.
    pub local_address: Option<IpAddr>,
    /// Network interface to bind to (Linux, macOS and a few other targets).
    pub interface: Option<String>,
    /// Request timeout. Defaults to 30 seconds when unset.
    pub timeout: Option<Duration>,
}

impl HttpClientConfig {
    /// Creates an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds outgoing connections to a local address.
    pub fn local_address(mut self, addr: IpAddr) -> Self {
        self.local_address = Some(addr);
        self
    }

    /// Binds outgoing connections to a network interface.
    pub fn interface(mut self, iface: impl Into<String>) -> Self {
        self.interface = Some(iface.into());
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// A resource managed through a provider framework.
///
/// The framework owns one [`ResourceData`] per instance and calls these
/// operations on it sequentially. An empty ID after any operation means the
/// resource is absent and no state is persisted.
pub trait Resource {
    /// Error returned by every operation.
    type Error: std::error::Error;

    /// Returns the configuration schema.
    fn schema(&self) -> ResourceSchema;

    /// Creates the remote object and assigns the ID.
    fn create(&self, d: &mut ResourceData) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Refreshes local state from the remote object.
    fn read(&self, d: &mut ResourceData) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Pushes the full local state to the remote object.
    fn update(&self, d: &mut ResourceData) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Removes the remote object.
    fn delete(&self, d: &mut ResourceData) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Returns whether the remote object still exists.
    fn exists(&self, d: &ResourceData) -> impl Future<Output = Result<bool, Self::Error>> + Send;

    /// Builds state for an existing remote object.
    fn import(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<Vec<ResourceData>, Self::Error>> + Send;
}
