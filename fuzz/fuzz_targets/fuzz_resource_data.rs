#![no_main]

use libfuzzer_sys::fuzz_target;
use synthetics_resource::datadog::translate::{apply_remote, to_remote};
use synthetics_resource::ResourceData;

fuzz_target!(|data: &[u8]| {
    // Arbitrary local state must never panic the translator
    let Ok(value) = serde_json::from_slice::<serde_json::Value>(data) else {
        return;
    };
    let Ok(local) = ResourceData::from_json(value) else {
        return;
    };

    let remote = to_remote(&local);
    let mut restored = ResourceData::with_id("fuzz");
    apply_remote(&remote, &mut restored);
    assert_eq!(restored.id(), "fuzz");
});
