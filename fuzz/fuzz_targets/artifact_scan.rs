#![no_main]

//! Fuzz target for the implementation-file artifact scanner and provenance check.

use arbitrary::Arbitrary;
use bundlecheck_loader::{inspect_provenance, scan_artifact_blocks};
use camino::Utf8Path;
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct ScanInput {
    contents: String,
    resource_types: Vec<String>,
}

fuzz_target!(|input: ScanInput| {
    let path = Utf8Path::new("bundles/fuzz/src/main.tf");
    let sites = scan_artifact_blocks(path, &input.contents, &input.resource_types);

    let lines = input.contents.lines().count() as u64;
    for site in &sites {
        assert_eq!(site.path.as_path(), path);
        if let Some(line) = site.line {
            assert!(line >= 1 && line <= lines.max(1));
        }
    }

    let provenance = inspect_provenance(&input.contents);
    if !provenance.generated {
        assert!(provenance.intact);
    }
});
