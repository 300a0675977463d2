//! Line scanner for artifact resource blocks in Terraform/OpenTofu sources.
//!
//! Recognises
//!
//! ```hcl
//! resource "massdriver_artifact" "database" {
//!   field = "database"
//!   ...
//! }
//! ```
//!
//! and reports the `field` attribute at the block's top level. Nested blocks and object
//! literals are skipped by brace depth.

use bundlecheck_types::emission::EmissionSite;
use camino::Utf8Path;

struct OpenBlock {
    inner_depth: i64,
    field: Option<(String, u64)>,
    header_line: u64,
}

pub fn scan_artifact_blocks(
    path: &Utf8Path,
    contents: &str,
    resource_types: &[String],
) -> Vec<EmissionSite> {
    let mut out = Vec::new();
    let mut depth: i64 = 0;
    let mut block: Option<OpenBlock> = None;

    for (idx, raw_line) in contents.lines().enumerate() {
        let line_no = idx as u64 + 1;
        let line = strip_comment(raw_line);
        let trimmed = line.trim();

        if let Some(open) = block.as_mut() {
            if depth == open.inner_depth
                && open.field.is_none()
                && let Some(value) = string_attr(trimmed, "field")
            {
                open.field = Some((value, line_no));
            }
        } else if let Some((rtype, rest)) = resource_header(trimmed)
            && resource_types.iter().any(|t| t == rtype)
        {
            let field = rest
                .split(';')
                .find_map(|part| string_attr(part.trim(), "field"))
                .map(|f| (f, line_no));
            block = Some(OpenBlock {
                inner_depth: depth + 1,
                field,
                header_line: line_no,
            });
        }

        depth += brace_delta(line);

        if let Some(open) = &block
            && depth < open.inner_depth
        {
            if let Some((field, line)) = &open.field {
                out.push(EmissionSite {
                    field: field.clone(),
                    shape: None,
                    path: path.to_path_buf(),
                    line: Some(*line),
                });
            } else {
                tracing::debug!(
                    path = %path,
                    line = open.header_line,
                    "artifact resource without a literal field attribute"
                );
            }
            block = None;
        }
    }

    out
}

/// Parses `resource "<type>" "<name>" {` and returns the type plus the text after `{`.
fn resource_header(line: &str) -> Option<(&str, &str)> {
    let rest = line.strip_prefix("resource")?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let (rtype, rest) = quoted(rest.trim_start())?;
    let (_name, rest) = quoted(rest.trim_start())?;
    let rest = rest.trim_start().strip_prefix('{')?;
    Some((rtype, rest))
}

/// Parses `<key> = "<value>"`, tolerating a trailing `}` for single-line blocks.
fn string_attr(line: &str, key: &str) -> Option<String> {
    let rest = line.strip_prefix(key)?;
    if !rest.starts_with(|c: char| c.is_whitespace() || c == '=') {
        return None;
    }
    let rest = rest.trim_start().strip_prefix('=')?;
    let (value, _) = quoted(rest.trim_start())?;
    Some(value.to_string())
}

fn quoted(s: &str) -> Option<(&str, &str)> {
    let s = s.strip_prefix('"')?;
    let end = s.find('"')?;
    Some((&s[..end], &s[end + 1..]))
}

fn strip_comment(line: &str) -> &str {
    let mut in_string = false;
    let mut prev = '\0';
    for (i, c) in line.char_indices() {
        match c {
            '"' if prev != '\\' => in_string = !in_string,
            '#' if !in_string => return &line[..i],
            '/' if !in_string && prev == '/' => return &line[..i - 1],
            _ => {}
        }
        prev = c;
    }
    line
}

fn brace_delta(line: &str) -> i64 {
    let mut in_string = false;
    let mut prev = '\0';
    let mut delta = 0;
    for c in line.chars() {
        match c {
            '"' if prev != '\\' => in_string = !in_string,
            '{' if !in_string => delta += 1,
            '}' if !in_string => delta -= 1,
            _ => {}
        }
        prev = c;
    }
    delta
}
