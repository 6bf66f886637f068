//! Per-level field extraction.
//!
//! Level 2 and Level 3 texts carry one field per ordinal (`N. HOW: ...` or
//! `N. CODE: ...`), often spilling onto continuation lines. [`parse_level`] walks
//! the lines once and accumulates each field under its ordinal label.

use crate::language::CommentSyntax;
use crate::markers::{is_stray_wrapper, is_wrapper_line};
use std::collections::HashMap;

/// Ordinal label -> accumulated field text.
pub type FieldMap = HashMap<String, String>;

/// Which field a level's text carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Level 2 prose, continuation lines joined with a single space.
    How,
    /// Level 3 code, line breaks and indentation kept.
    Code,
}

impl FieldKind {
    pub fn marker(self) -> &'static str {
        match self {
            FieldKind::How => "HOW:",
            FieldKind::Code => "CODE:",
        }
    }

    fn join(self, lines: &[String]) -> String {
        match self {
            FieldKind::How => lines
                .iter()
                .map(|l| l.trim())
                .filter(|l| !l.is_empty())
                .collect::<Vec<_>>()
                .join(" "),
            FieldKind::Code => {
                let end = lines
                    .iter()
                    .rposition(|l| !l.trim().is_empty())
                    .map_or(0, |i| i + 1)
                    .max(1);
                lines[..end.min(lines.len())].join("\n")
            }
        }
    }
}

/// Label of a numbered line: everything before the first `.`, trimmed.
///
/// Callers check that the trimmed line starts with a digit first.
pub(crate) fn ordinal_label(trimmed: &str) -> &str {
    trimmed.split('.').next().unwrap_or(trimmed).trim()
}

/// Whether the trimmed line opens a numbered item carrying `marker`.
pub(crate) fn is_numbered_with(trimmed: &str, marker: &str) -> bool {
    trimmed.starts_with(|c: char| c.is_ascii_digit()) && trimmed.contains(marker)
}

enum ParseState {
    Outside,
    Inside { ordinal: String, lines: Vec<String> },
}

impl ParseState {
    fn flush_into(self, fields: &mut FieldMap, kind: FieldKind) {
        if let ParseState::Inside { ordinal, lines } = self {
            if fields.contains_key(&ordinal) {
                tracing::debug!(
                    "duplicate {} ordinal '{}', keeping the later one",
                    kind.marker(),
                    ordinal
                );
            }
            fields.insert(ordinal, kind.join(&lines));
        }
    }
}

/// Extract ordinal-keyed field values from one level's raw text.
///
/// Lines before the first field start are ignored. Lines that are nothing but a
/// comment marker (or a markdown fence) never start a field and are never
/// appended, except indented marker lines inside code (docstrings).
pub fn parse_level(text: &str, kind: FieldKind, syntax: &CommentSyntax) -> FieldMap {
    let marker = kind.marker();
    let mut fields = FieldMap::new();
    let mut state = ParseState::Outside;

    for line in text.lines() {
        let wrapper = match kind {
            FieldKind::How => is_wrapper_line(line, syntax),
            FieldKind::Code => is_stray_wrapper(line, syntax),
        };
        if wrapper {
            continue;
        }

        let trimmed = line.trim();
        if is_numbered_with(trimmed, marker) {
            std::mem::replace(&mut state, ParseState::Outside).flush_into(&mut fields, kind);
            let first = trimmed
                .split_once(marker)
                .map_or("", |(_, rest)| rest.trim());
            state = ParseState::Inside {
                ordinal: ordinal_label(trimmed).to_string(),
                lines: vec![first.to_string()],
            };
            continue;
        }

        if let ParseState::Inside { lines, .. } = &mut state {
            lines.push(line.to_string());
        }
    }

    state.flush_into(&mut fields, kind);
    fields
}
