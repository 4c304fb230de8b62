#![no_main]

use libfuzzer_sys::fuzz_target;
use synthetics_resource::types::{SyntheticsType, SYNTHETICS_TYPES};

fuzz_target!(|data: &str| {
    // Test SyntheticsType parsing with arbitrary strings
    match SyntheticsType::from_str(data) {
        Some(test_type) => {
            // Verify roundtrip via string
            let parsed = SyntheticsType::from_str(test_type.as_str()).expect("Should roundtrip");
            assert_eq!(test_type, parsed);
            assert!(SYNTHETICS_TYPES.contains(&data));
        }
        None => assert!(!SYNTHETICS_TYPES.contains(&data)),
    }
});
