//! Three-level hint merge.
//!
//! Level 1 drives the structure: its lines are emitted in order, and each item's
//! `WHY:` line is followed by the matching `HOW:` line from Level 2 and `CODE:`
//! block from Level 3. Ordinals that Level 1 never introduces are dropped.

use crate::language::CommentSyntax;
use crate::markers::strip_markers;
use crate::parser::{FieldKind, FieldMap, is_numbered_with, ordinal_label, parse_level};
use std::collections::HashSet;

const CONCEPT: &str = "CONCEPT:";
const WHY: &str = "WHY:";

/// Leading whitespace of a line.
fn indentation(line: &str) -> &str {
    &line[..line.len() - line.trim_start().len()]
}

fn field_line(indent: &str, marker: &str, value: &str) -> String {
    if value.is_empty() {
        format!("{indent}{marker}")
    } else {
        format!("{indent}{marker} {value}")
    }
}

/// Splice parsed Level-2/Level-3 fields into the Level-1 text.
///
/// Injected lines take the indentation of the `WHY:` line they follow. Code
/// continuation lines are emitted verbatim. Missing entries are skipped, so a
/// Level-1-only merge returns the marker-stripped Level-1 text unchanged.
pub fn merge_levels(
    level1: &str,
    how: &FieldMap,
    code: Option<&FieldMap>,
    syntax: &CommentSyntax,
) -> String {
    let level1 = strip_markers(level1, syntax);
    let mut out: Vec<String> = Vec::new();
    let mut current: Option<&str> = None;
    let mut introduced: HashSet<&str> = HashSet::new();

    for line in level1.split('\n') {
        let trimmed = line.trim();

        if is_numbered_with(trimmed, CONCEPT) {
            let ordinal = ordinal_label(trimmed);
            introduced.insert(ordinal);
            current = Some(ordinal);
            out.push(line.to_string());
        } else if trimmed.contains(WHY) {
            out.push(line.to_string());
            let Some(ordinal) = current else {
                continue;
            };
            let indent = indentation(line);

            if let Some(text) = how.get(ordinal) {
                out.push(field_line(indent, FieldKind::How.marker(), text));
            }
            if let Some(block) = code.and_then(|c| c.get(ordinal)) {
                let mut lines = block.split('\n');
                let first = lines.next().unwrap_or_default();
                out.push(field_line(indent, FieldKind::Code.marker(), first));
                out.extend(lines.map(String::from));
            }
        } else {
            out.push(line.to_string());
        }
    }

    let dropped: Vec<&str> = how
        .keys()
        .chain(code.into_iter().flat_map(|c| c.keys()))
        .map(String::as_str)
        .filter(|k| !introduced.contains(k))
        .collect();
    if !dropped.is_empty() {
        tracing::debug!("dropping ordinals absent from level 1: {:?}", dropped);
    }

    out.join("\n")
}

/// Strip, parse, and merge raw level texts in one step.
pub fn merge_texts(
    level1: &str,
    level2: Option<&str>,
    level3: Option<&str>,
    syntax: &CommentSyntax,
) -> String {
    let how = level2
        .map(|text| parse_level(&strip_markers(text, syntax), FieldKind::How, syntax))
        .unwrap_or_default();
    let code =
        level3.map(|text| parse_level(&strip_markers(text, syntax), FieldKind::Code, syntax));
    merge_levels(level1, &how, code.as_ref(), syntax)
}
