//! Fixed vocabulary shared by the schema, the translator and the API client.
//!
//! Everything here is process-wide static configuration: allowed test types,
//! liveness states and the assertion target union.
//!
//! | Concept | Values |
//! |---------|--------|
//! | Test type | `api`, `browser` |
//! | Liveness | `paused`, `live` |
//! | Integer assertion targets | `responseTime`, `statusCode` |
//! | Raw JSON assertion targets | operator `validates` |

use core::fmt;

use serde::{Deserialize, Serialize};

/// Allowed values of the `type` attribute.
pub const SYNTHETICS_TYPES: &[&str] = &["api", "browser"];

/// Assertion types whose target is always an integer.
pub const INT_TARGET_ASSERTION_TYPES: &[&str] = &["responseTime", "statusCode"];

/// Assertion operator whose target is a raw JSON document.
pub const VALIDATES_OPERATOR: &str = "validates";

/// Kind of synthetics test.
///
/// The type is immutable by convention: changing it means a different test.
///
/// # Example
///
/// ```
/// use synthetics_resource::types::SyntheticsType;
///
/// let typ = SyntheticsType::from_str("browser").unwrap();
/// assert!(typ.supports_devices());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyntheticsType {
    /// HTTP request check.
    #[default]
    Api,
    /// Scripted browser check.
    Browser,
}

impl SyntheticsType {
    /// Parses a type name. Matching is case sensitive, like the schema validator.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "api" => Some(Self::Api),
            "browser" => Some(Self::Browser),
            _ => None,
        }
    }

    /// Returns the wire name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Api => "api",
            Self::Browser => "browser",
        }
    }

    /// Returns `true` if tests of this type carry a device list.
    pub fn supports_devices(&self) -> bool {
        matches!(self, Self::Browser)
    }
}

impl fmt::Display for SyntheticsType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Liveness of a test, toggled through the dedicated status endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    /// The test is not scheduled.
    Paused,
    /// The test runs on every tick.
    Live,
}

impl TestStatus {
    /// Maps the local `paused` flag to a status.
    pub fn from_paused(paused: bool) -> Self {
        if paused {
            Self::Paused
        } else {
            Self::Live
        }
    }

    /// Returns the wire name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Paused => "paused",
            Self::Live => "live",
        }
    }

    /// Returns `true` for [`TestStatus::Paused`].
    pub fn is_paused(&self) -> bool {
        matches!(self, Self::Paused)
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The target an assertion compares against.
///
/// The representation depends on the assertion type and operator and is
/// chosen once, by [`AssertionTarget::resolve`]:
///
/// - `responseTime` / `statusCode` compare against an integer
/// - operator `validates` compares against a JSON document
/// - everything else compares against text
///
/// On the wire the variants serialize as a bare number, JSON value or string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AssertionTarget {
    /// Integer target, such as a status code or a duration in milliseconds.
    Int(i64),
    /// Plain text target, such as a header value.
    Text(String),
    /// Raw JSON target for `validates` assertions.
    Json(serde_json::Value),
}

impl AssertionTarget {
    /// Resolves the local string encoding of a target.
    ///
    /// Integer targets that fail to parse become `0`. Returns `None` only for a
    /// `validates` target that is not valid JSON.
    pub fn resolve(assertion_type: &str, operator: &str, raw: &str) -> Option<Self> {
        if is_int_target(assertion_type) {
            Some(Self::Int(raw.trim().parse().unwrap_or(0)))
        } else if operator == VALIDATES_OPERATOR {
            serde_json::from_str(raw).ok().map(Self::Json)
        } else {
            Some(Self::Text(raw.to_string()))
        }
    }

    /// Returns the local string encoding.
    pub fn to_local(&self) -> String {
        match self {
            Self::Int(n) => n.to_string(),
            Self::Text(s) => s.clone(),
            Self::Json(v) => v.to_string(),
        }
    }
}

/// Returns `true` if assertions of this type compare against an integer.
pub fn is_int_target(assertion_type: &str) -> bool {
    INT_TARGET_ASSERTION_TYPES.contains(&assertion_type)
}
