//! Unit tests for the local/remote state translator.

use serde_json::json;
use synthetics_resource::datadog::translate::{apply_remote, to_remote};
use synthetics_resource::datadog::SyntheticsTest;
use synthetics_resource::types::{AssertionTarget, SyntheticsType};
use synthetics_resource::ResourceData;

use crate::common::{api_test_config, mock_api_test, mock_browser_test};

#[test]
fn test_to_remote_reads_every_field() {
    let test = to_remote(&api_test_config(true));

    assert_eq!(test.public_id, None);
    assert_eq!(test.name.as_deref(), Some("name for synthetics test foo"));
    assert_eq!(test.test_type, Some(SyntheticsType::Api));
    assert_eq!(test.message.as_deref(), Some("Notify @datadog.user"));
    assert_eq!(test.locations, vec!["aws:eu-central-1", "aws:ap-northeast-1"]);
    assert_eq!(test.tags, vec!["foo:bar", "baz"]);

    let config = test.config.unwrap();
    let request = config.request.unwrap();
    assert_eq!(request.method.as_deref(), Some("GET"));
    assert_eq!(request.url.as_deref(), Some("https://www.datadoghq.com"));
    assert_eq!(request.body.as_deref(), Some("this is a body"));
    assert_eq!(request.timeout, Some(30));
    assert_eq!(request.headers.len(), 2);
    assert_eq!(request.headers["Accept"], "application/json");

    assert_eq!(config.assertions.len(), 4);
    assert_eq!(
        config.assertions[0].target,
        Some(AssertionTarget::Text("application/json".to_string()))
    );
    assert_eq!(config.assertions[1].target, Some(AssertionTarget::Int(200)));
    assert_eq!(config.assertions[2].target, Some(AssertionTarget::Int(2000)));

    let options = test.options.unwrap();
    assert_eq!(options.tick_every, Some(60));
    assert_eq!(options.min_failure_duration, Some(0));
    assert_eq!(options.min_location_failed, Some(0));
}

#[test]
fn test_to_remote_never_sends_paused() {
    let body = serde_json::to_value(to_remote(&api_test_config(true))).unwrap();
    assert!(body.get("paused").is_none());
    assert!(body.get("status").is_none());
    assert_eq!(body["config"]["assertions"][1]["target"], json!(200));
}

#[test]
fn test_to_remote_with_minimal_config() {
    let d = ResourceData::from_json(json!({
        "name": "minimal",
        "type": "api",
        "request": { "method": "GET", "url": "https://example.com" },
        "locations": ["aws:eu-central-1"]
    }))
    .unwrap();

    let test = to_remote(&d);
    assert_eq!(test.message.as_deref(), Some(""));
    assert!(test.tags.is_empty());

    let request = test.config.as_ref().unwrap().request.as_ref().unwrap();
    assert_eq!(request.timeout, None);
    assert!(request.headers.is_empty());

    let options = test.options.unwrap();
    assert_eq!(options.tick_every, None);
}

#[test]
fn test_unparseable_numbers_become_zero() {
    let d = ResourceData::from_json(json!({
        "type": "api",
        "request": { "timeout": "soon" },
        "options": { "tick_every": "hourly" }
    }))
    .unwrap();

    let test = to_remote(&d);
    assert_eq!(test.config.unwrap().request.unwrap().timeout, Some(0));
    assert_eq!(test.options.unwrap().tick_every, Some(0));
}

#[test]
fn test_apply_remote_api_test() {
    let remote: SyntheticsTest = serde_json::from_value(mock_api_test("abc-123-def", "paused")).unwrap();
    let mut d = ResourceData::with_id("abc-123-def");
    apply_remote(&remote, &mut d);

    assert_eq!(d.get_str("type"), "api");
    assert_eq!(d.get_str("request.method"), "GET");
    assert_eq!(d.get_str("request.url"), "https://www.datadoghq.com");
    assert_eq!(d.get_str("request.timeout"), "30");
    assert_eq!(d.get_str("request_headers.X-Datadog-Trace-ID"), "1234566789");
    assert_eq!(d.get_list("assertions").len(), 4);
    assert_eq!(d.get_str("assertions.0.property"), "content-type");
    assert_eq!(d.get_str("assertions.1.target"), "200");
    assert_eq!(d.get("assertions.1.property"), None);
    assert_eq!(d.get_str("options.tick_every"), "60");
    assert_eq!(d.get_str("locations.1"), "aws:ap-northeast-1");
    assert_eq!(d.get_str("tags.0"), "foo:bar");
    assert!(d.get_list("devices").is_empty());
}

#[test]
fn test_apply_remote_browser_devices() {
    let remote: SyntheticsTest = serde_json::from_value(mock_browser_test("ghi-456-jkl")).unwrap();
    let mut d = ResourceData::new();
    apply_remote(&remote, &mut d);

    assert_eq!(d.get_str("type"), "browser");
    assert_eq!(d.get_list("devices").len(), 2);
    assert_eq!(d.get_str("devices.0.id"), "laptop_large");
    assert_eq!(d.get_str("devices.0.height"), "1100");
    assert_eq!(d.get_str("devices.0.isMobile"), "0");
    assert_eq!(d.get_str("devices.1.width"), "320");
    assert_eq!(d.get_str("devices.1.isMobile"), "1");
    assert_eq!(d.get_str("options.tick_every"), "900");
}

#[test]
fn test_apply_remote_leaves_paused_alone() {
    let remote: SyntheticsTest = serde_json::from_value(mock_api_test("abc-123-def", "live")).unwrap();

    let mut d = api_test_config(true);
    apply_remote(&remote, &mut d);
    assert_eq!(d.get_bool("paused"), Some(true));

    let mut d = ResourceData::new();
    apply_remote(&remote, &mut d);
    assert_eq!(d.get_bool("paused"), None);
}

#[test]
fn test_devices_roundtrip_through_local_encoding() {
    let remote: SyntheticsTest = serde_json::from_value(mock_browser_test("ghi-456-jkl")).unwrap();
    let mut d = ResourceData::new();
    apply_remote(&remote, &mut d);

    let devices = to_remote(&d).options.unwrap().devices;
    assert_eq!(devices.len(), 2);
    assert_eq!(devices[1].is_mobile, Some(true));
    assert_eq!(devices[0].is_mobile, Some(false));
    assert_eq!(devices[0].width, Some(1440));
}

#[test]
fn test_apply_remote_state_as_json() {
    let remote: SyntheticsTest = serde_json::from_value(mock_api_test("abc-123-def", "live")).unwrap();
    let mut d = ResourceData::with_id("abc-123-def");
    apply_remote(&remote, &mut d);

    let keys: Vec<&str> = d.attributes().keys().map(String::as_str).collect();
    assert_eq!(
        keys,
        vec![
            "assertions",
            "devices",
            "locations",
            "message",
            "name",
            "options",
            "request",
            "request_headers",
            "tags",
            "type",
        ]
    );

    let doc = d.to_json();
    assert_eq!(doc["request"]["timeout"], json!("30"));
    assert_eq!(doc["assertions"][1]["target"], json!("200"));
    assert_eq!(doc["tags"], json!(["foo:bar", "baz"]));
    assert!(doc.get("paused").is_none());
}

fn validates_config(target: &str) -> ResourceData {
    ResourceData::from_json(json!({
        "type": "api",
        "assertions": [{ "type": "body", "operator": "validates", "target": target }]
    }))
    .unwrap()
}

#[test]
fn test_validates_target_keeps_local_formatting() {
    let mut d = validates_config(r#"{"a": 1, "b": [true]}"#);
    let remote: SyntheticsTest =
        serde_json::from_value(serde_json::to_value(to_remote(&d)).unwrap()).unwrap();

    apply_remote(&remote, &mut d);
    assert_eq!(d.get_str("assertions.0.target"), r#"{"a": 1, "b": [true]}"#);
}

#[test]
fn test_validates_target_takes_remote_document_when_changed() {
    let remote: SyntheticsTest =
        serde_json::from_value(serde_json::to_value(to_remote(&validates_config(r#"{"a": 2}"#))).unwrap())
            .unwrap();

    let mut d = validates_config(r#"{"a": 1}"#);
    apply_remote(&remote, &mut d);
    assert_eq!(d.get_str("assertions.0.target"), r#"{"a":2}"#);

    // Without prior state the compact encoding is used.
    let mut fresh = ResourceData::new();
    apply_remote(&remote, &mut fresh);
    assert_eq!(fresh.get_str("assertions.0.target"), r#"{"a":2}"#);
}
