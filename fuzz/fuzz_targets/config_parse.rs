#![no_main]

//! Fuzz target for bundle, definition and emissions-manifest parsing.
//!
//! Arbitrary bytes must never panic the parsers; malformed input has to surface as a
//! `ConfigLoadError` that carries a position when one is known.

use bundlecheck_loader::{parse_bundle, parse_definition, parse_emission_manifest};
use camino::Utf8Path;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };

    let path = Utf8Path::new("bundles/fuzz/bundle.yaml");
    if let Ok(bundle) = parse_bundle(path, "fuzz", s) {
        // Accessors must agree with the parsed groups.
        assert_eq!(bundle.param_names().count(), bundle.params.len());
        assert_eq!(bundle.connection_names().count(), bundle.connections.len());
        assert_eq!(bundle.artifact_names().count(), bundle.artifacts.len());
        assert!(!bundle.name.is_empty());
    }

    if let Ok(def) = parse_definition(Utf8Path::new("artifact-definitions/fuzz.yaml"), s) {
        let _ = def.required_fields();
    }

    let _ = parse_emission_manifest(
        Utf8Path::new("bundles/fuzz/emissions.yaml"),
        Utf8Path::new("bundles/fuzz"),
        s,
    );
});
