//! Shared DTOs (schemas-as-code) for the bundlecheck workspace.
//!
//! # Design constraints
//! - Configuration types are immutable after load; checkers only borrow them.
//! - Report types are intended to be serialized to disk.
//! - Prefer adding optional fields over changing semantics.

pub mod bundle;
pub mod definition;
pub mod emission;
pub mod finding;
pub mod report;

/// Schema identifiers.
pub mod schema {
    pub const BUNDLECHECK_REPORT_V1: &str = "bundlecheck.report.v1";
}

/// Provenance tag carried by every loaded configuration node.
///
/// A node is `generated` when its file starts with the generated-file marker.
/// `intact` is false when the recorded digest no longer matches the content,
/// i.e. somebody edited a generated file by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Provenance {
    pub generated: bool,
    pub intact: bool,
}

impl Provenance {
    pub const AUTHORED: Provenance = Provenance {
        generated: false,
        intact: true,
    };

    pub fn is_modified_generated(&self) -> bool {
        self.generated && !self.intact
    }
}

impl Default for Provenance {
    fn default() -> Self {
        Self::AUTHORED
    }
}
