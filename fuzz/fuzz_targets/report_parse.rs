#![no_main]

//! Fuzz target for report JSON parsing.
//!
//! Reports are read back by downstream tooling; deserialization must reject malformed input
//! without panicking, and anything accepted must serialize again.

use bundlecheck_types::report::ReportV1;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(report) = serde_json::from_str::<ReportV1>(s) {
        let _ = serde_json::to_string(&report).expect("accepted report serializes");
    }

    let _ = serde_json::from_str::<bundlecheck_types::finding::Finding>(s);
    let _ = serde_json::from_str::<bundlecheck_types::report::ReportCapabilities>(s);
});
