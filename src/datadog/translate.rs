//! Mapping between local [`ResourceData`] and the remote [`SyntheticsTest`].
//!
//! Local nested maps hold strings only, so values are coerced in both
//! directions:
//!
//! | Local | Remote |
//! |-------|--------|
//! | `"60"` | `60` (unparseable input becomes `0`) |
//! | `"true"` / `"1"` | `true` |
//! | `"1"` / `"0"` | written back for booleans |
//!
//! A `validates` document read back keeps the local text when both parse to
//! the same JSON, so formatting alone never shows up as a change.
//!
//! `paused` is never written back: the configuration is authoritative for it.

use serde_json::{Map, Value};

use super::api::{
    SyntheticsAssertion, SyntheticsConfig, SyntheticsDevice, SyntheticsOptions,
    SyntheticsRequest, SyntheticsTest,
};
use crate::state::{local_string, parse_local_bool, string_map, ResourceData};
use crate::types::{AssertionTarget, SyntheticsType};

/// Builds the remote model from local state.
pub fn to_remote(d: &ResourceData) -> SyntheticsTest {
    let request = SyntheticsRequest {
        method: d.get_ok_str("request.method"),
        url: d.get_ok_str("request.url"),
        body: d.get_ok_str("request.body"),
        timeout: d.get_ok_str("request.timeout").map(|s| parse_int(&s)),
        headers: d.get_string_map("request_headers"),
    };

    let assertions = d
        .get_list("assertions")
        .iter()
        .filter_map(Value::as_object)
        .map(assertion_from_local)
        .collect();

    let test_type = SyntheticsType::from_str(&d.get_str("type"));

    let mut options = SyntheticsOptions {
        tick_every: d.get_ok_str("options.tick_every").map(|s| parse_int(&s)),
        min_failure_duration: d
            .get_ok_str("options.min_failure_duration")
            .map(|s| parse_int(&s)),
        min_location_failed: d
            .get_ok_str("options.min_location_failed")
            .map(|s| parse_int(&s)),
        devices: Vec::new(),
    };
    if test_type.is_some_and(|t| t.supports_devices()) {
        options.devices = d
            .get_list("devices")
            .iter()
            .filter_map(Value::as_object)
            .map(device_from_local)
            .collect();
    }

    SyntheticsTest {
        name: Some(d.get_str("name")),
        test_type,
        message: Some(d.get_str("message")),
        config: Some(SyntheticsConfig {
            request: Some(request),
            assertions,
            variables: Vec::new(),
        }),
        options: Some(options),
        locations: string_list(d.get_list("locations")),
        tags: string_list(d.get_list("tags")),
        ..Default::default()
    }
}

/// Overwrites local state with the remote model.
pub fn apply_remote(test: &SyntheticsTest, d: &mut ResourceData) {
    d.set(
        "type",
        test.test_type.map(|t| t.as_str()).unwrap_or_default(),
    );

    let config = test.config.clone().unwrap_or_default();
    let request = config.request.unwrap_or_default();
    d.set(
        "request",
        LocalMap::default()
            .text("method", request.method.as_deref())
            .text("url", request.url.as_deref())
            .text("body", request.body.as_deref())
            .int("timeout", request.timeout)
            .into_value(),
    );
    d.set(
        "request_headers",
        Value::Object(
            request
                .headers
                .into_iter()
                .map(|(k, v)| (k, Value::String(v)))
                .collect(),
        ),
    );

    let previous = d.get_list("assertions").to_vec();
    let assertions: Vec<Value> = config
        .assertions
        .iter()
        .enumerate()
        .map(|(i, a)| {
            let target = a
                .target
                .as_ref()
                .map(|t| local_target(t, previous.get(i)));
            LocalMap::default()
                .text("type", a.assertion_type.as_deref())
                .text("property", a.property.as_deref())
                .text("operator", a.operator.as_deref())
                .text("target", target.as_deref())
                .into_value()
        })
        .collect();
    d.set("assertions", assertions);

    let options = test.options.clone().unwrap_or_default();
    let devices: Vec<Value> = options
        .devices
        .iter()
        .map(|device| {
            LocalMap::default()
                .text("id", device.id.as_deref())
                .text("name", device.name.as_deref())
                .int("height", device.height)
                .int("width", device.width)
                .flag("isMobile", device.is_mobile)
                .flag("isLandscape", device.is_landscape)
                .into_value()
        })
        .collect();
    d.set("devices", devices);

    d.set("locations", test.locations.clone());
    d.set(
        "options",
        LocalMap::default()
            .int("tick_every", options.tick_every)
            .int("min_failure_duration", options.min_failure_duration)
            .int("min_location_failed", options.min_location_failed)
            .into_value(),
    );

    d.set("name", test.name.clone().unwrap_or_default());
    d.set("message", test.message.clone().unwrap_or_default());
    d.set("tags", test.tags.clone());
}

/// Encodes a remote target, keeping the local text of an equivalent JSON document.
fn local_target(target: &AssertionTarget, previous: Option<&Value>) -> String {
    if let AssertionTarget::Json(doc) = target {
        let kept = previous
            .and_then(|p| p.get("target"))
            .and_then(Value::as_str)
            .filter(|raw| serde_json::from_str::<Value>(raw).ok().as_ref() == Some(doc));
        if let Some(raw) = kept {
            return raw.to_string();
        }
    }
    target.to_local()
}

fn assertion_from_local(map: &Map<String, Value>) -> SyntheticsAssertion {
    let fields = string_map(map);
    let assertion_type = fields.get("type").cloned();
    let operator = fields.get("operator").cloned();

    let target = fields.get("target").and_then(|raw| {
        AssertionTarget::resolve(
            assertion_type.as_deref().unwrap_or_default(),
            operator.as_deref().unwrap_or_default(),
            raw,
        )
    });

    SyntheticsAssertion {
        operator,
        property: fields.get("property").cloned(),
        assertion_type,
        target,
    }
}

fn device_from_local(map: &Map<String, Value>) -> SyntheticsDevice {
    let fields = string_map(map);
    let flag = |key: &str| {
        fields
            .get(key)
            .map(|v| parse_local_bool(v).unwrap_or(false))
    };

    SyntheticsDevice {
        id: fields.get("id").cloned(),
        name: fields.get("name").cloned(),
        height: fields.get("height").map(|v| parse_int(v)),
        width: fields.get("width").map(|v| parse_int(v)),
        is_mobile: flag("isMobile"),
        is_landscape: flag("isLandscape"),
    }
}

fn parse_int(s: &str) -> i64 {
    s.trim().parse().unwrap_or(0)
}

fn string_list(items: &[Value]) -> Vec<String> {
    items.iter().filter_map(local_string).collect()
}

/// Builder for a string-valued local map.
///
/// Empty strings are dropped; missing integers and flags encode as zero.
#[derive(Default)]
struct LocalMap(Map<String, Value>);

impl LocalMap {
    fn text(mut self, key: &str, value: Option<&str>) -> Self {
        if let Some(v) = value.filter(|v| !v.is_empty()) {
            self.0.insert(key.to_string(), Value::String(v.to_string()));
        }
        self
    }

    fn int(mut self, key: &str, value: Option<i64>) -> Self {
        self.0.insert(
            key.to_string(),
            Value::String(value.unwrap_or(0).to_string()),
        );
        self
    }

    fn flag(mut self, key: &str, value: Option<bool>) -> Self {
        let encoded = if value.unwrap_or(false) { "1" } else { "0" };
        self.0.insert(key.to_string(), Value::String(encoded.to_string()));
        self
    }

    fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}
