#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use synthetics_resource::types::{is_int_target, AssertionTarget, VALIDATES_OPERATOR};

#[derive(Debug, Arbitrary)]
struct Input<'a> {
    assertion_type: &'a str,
    operator: &'a str,
    raw: &'a str,
}

fuzz_target!(|input: Input<'_>| {
    let resolved = AssertionTarget::resolve(input.assertion_type, input.operator, input.raw);

    match resolved {
        Some(AssertionTarget::Int(_)) => assert!(is_int_target(input.assertion_type)),
        Some(AssertionTarget::Json(ref value)) => {
            assert_eq!(input.operator, VALIDATES_OPERATOR);
            // The local encoding must parse back to the same document
            let reparsed: serde_json::Value =
                serde_json::from_str(&value.to_string()).expect("Should reparse");
            assert_eq!(&reparsed, value);
        }
        Some(AssertionTarget::Text(ref text)) => assert_eq!(text, input.raw),
        None => assert_eq!(input.operator, VALIDATES_OPERATOR),
    }
});
