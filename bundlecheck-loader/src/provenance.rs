use bundlecheck_types::Provenance;
use sha2::{Digest, Sha256};

/// First-line marker written by generators: `# @generated sha256:<hex>`.
///
/// The digest covers every byte after the marker line.
pub const GENERATED_MARKER: &str = "# @generated";

pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut h = Sha256::new();
    h.update(bytes);
    hex::encode(h.finalize())
}

/// Classifies a file as authored or generated and, for generated files, whether the
/// body still matches its recorded digest.
pub fn inspect_provenance(contents: &str) -> Provenance {
    let (first, body) = match contents.split_once('\n') {
        Some((first, body)) => (first, body),
        None => (contents, ""),
    };

    let Some(rest) = first.trim_end_matches('\r').strip_prefix(GENERATED_MARKER) else {
        return Provenance::AUTHORED;
    };

    let recorded = rest
        .trim()
        .strip_prefix("sha256:")
        .map(|d| d.trim().to_ascii_lowercase());

    let intact = match recorded {
        Some(digest) => digest == sha256_hex(body.as_bytes()),
        None => false,
    };

    Provenance {
        generated: true,
        intact,
    }
}
