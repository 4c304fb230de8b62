//! Unit tests for the shared vocabulary types.
//!
//! Tests SyntheticsType, TestStatus and AssertionTarget.

use serde_json::json;
use synthetics_resource::types::{
    is_int_target, AssertionTarget, SyntheticsType, TestStatus, SYNTHETICS_TYPES,
};

#[test]
fn test_synthetics_types_constant() {
    assert_eq!(SYNTHETICS_TYPES, &["api", "browser"]);
}

#[test]
fn test_synthetics_type_parsing() {
    assert_eq!(SyntheticsType::from_str("api"), Some(SyntheticsType::Api));
    assert_eq!(
        SyntheticsType::from_str("browser"),
        Some(SyntheticsType::Browser)
    );
    assert_eq!(SyntheticsType::from_str("Browser"), None);
    assert_eq!(SyntheticsType::from_str(""), None);
}

#[test]
fn test_synthetics_type_display() {
    assert_eq!(SyntheticsType::Api.to_string(), "api");
    assert_eq!(SyntheticsType::Browser.to_string(), "browser");
}

#[test]
fn test_only_browser_supports_devices() {
    assert!(SyntheticsType::Browser.supports_devices());
    assert!(!SyntheticsType::Api.supports_devices());
}

#[test]
fn test_synthetics_type_serde() {
    assert_eq!(
        serde_json::to_value(SyntheticsType::Browser).unwrap(),
        json!("browser")
    );
    let parsed: SyntheticsType = serde_json::from_value(json!("api")).unwrap();
    assert_eq!(parsed, SyntheticsType::Api);
}

#[test]
fn test_status_wire_names() {
    assert_eq!(TestStatus::Paused.as_str(), "paused");
    assert_eq!(TestStatus::Live.as_str(), "live");
    assert!(TestStatus::from_paused(true).is_paused());
    assert!(!TestStatus::from_paused(false).is_paused());
}

#[test]
fn test_int_target_types() {
    assert!(is_int_target("statusCode"));
    assert!(is_int_target("responseTime"));
    assert!(!is_int_target("header"));
    assert!(!is_int_target("body"));
}

#[test]
fn test_status_code_target_is_integer() {
    assert_eq!(
        AssertionTarget::resolve("statusCode", "is", "200"),
        Some(AssertionTarget::Int(200))
    );
}

#[test]
fn test_malformed_integer_target_becomes_zero() {
    assert_eq!(
        AssertionTarget::resolve("responseTime", "lessThan", "fast"),
        Some(AssertionTarget::Int(0))
    );
}

#[test]
fn test_int_type_wins_over_validates_operator() {
    assert_eq!(
        AssertionTarget::resolve("statusCode", "validates", "{}"),
        Some(AssertionTarget::Int(0))
    );
}

#[test]
fn test_validates_target_is_raw_json() {
    let target = AssertionTarget::resolve("body", "validates", r#"{"type":"object"}"#).unwrap();
    assert_eq!(target, AssertionTarget::Json(json!({"type": "object"})));
    assert_eq!(serde_json::to_value(&target).unwrap(), json!({"type": "object"}));
}

#[test]
fn test_invalid_validates_target_is_dropped() {
    assert_eq!(AssertionTarget::resolve("body", "validates", "{not json"), None);
}

#[test]
fn test_other_targets_are_text() {
    assert_eq!(
        AssertionTarget::resolve("header", "contains", "200"),
        Some(AssertionTarget::Text("200".to_string()))
    );
}

#[test]
fn test_target_deserializes_by_shape() {
    let int: AssertionTarget = serde_json::from_value(json!(1200)).unwrap();
    assert_eq!(int, AssertionTarget::Int(1200));
    let text: AssertionTarget = serde_json::from_value(json!("text/html")).unwrap();
    assert_eq!(text, AssertionTarget::Text("text/html".to_string()));
    let doc: AssertionTarget = serde_json::from_value(json!({"a": [1]})).unwrap();
    assert_eq!(doc.to_local(), r#"{"a":[1]}"#);
}
