#![no_main]

use libfuzzer_sys::fuzz_target;
use openapi_mock_core::{MockGenerator, MockOptions, NoopObserver, SpecStore};

// Accepts arbitrary bytes, attempts to parse as JSON, mounts the value as a
// component schema and resolves it. Goal: no panics, even on malformed input.
fuzz_target!(|data: &[u8]| {
    let Ok(schema) = serde_json::from_slice::<serde_json::Value>(data) else {
        return;
    };
    let specs = SpecStore::single(
        "fuzz.json",
        serde_json::json!({ "components": { "schemas": { "Fuzz": schema } } }),
    );
    let Ok(generator) = MockGenerator::new(specs, "fuzz.json", &MockOptions::default()) else {
        return;
    };
    let generator = generator.with_observer(Box::new(NoopObserver));
    if let Ok(mock) = generator.resolve_pointer("#/components/schemas/Fuzz", "", &[]) {
        let _ = mock.definition.value.render();
    }
});
