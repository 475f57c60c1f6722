//! Fuzz target for attribute schema parsing.
//!
//! Arbitrary JSON must either be rejected or produce a schema whose
//! serialized form parses again with the same attributes.

#![no_main]

use libfuzzer_sys::fuzz_target;
use listing::AttributeSchema;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(schema) = AttributeSchema::from_json(text) {
        let json = serde_json::to_string(&schema).unwrap();
        let reparsed = AttributeSchema::from_json(&json).unwrap();
        assert_eq!(schema.names(), reparsed.names());
    }
});
