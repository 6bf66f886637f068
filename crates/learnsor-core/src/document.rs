//! Structured view of a merged hint document.
//!
//! The merged text is what learners read; [`collect_items`] gives the same hints
//! as records for JSON output.

use crate::language::CommentSyntax;
use crate::markers::strip_markers;
use crate::parser::{FieldMap, is_numbered_with, ordinal_label};
use serde::Serialize;

/// One numbered hint with whatever fields each level supplied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HintItem {
    pub ordinal: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concept: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub why: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub how: Option<String>,
    /// Raw code lines, first line included.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<Vec<String>>,
}

fn after_marker(trimmed: &str, marker: &str) -> String {
    trimmed
        .split_once(marker)
        .map_or("", |(_, rest)| rest.trim())
        .to_string()
}

/// Collect the items Level 1 introduces, filled in from the parsed lower levels.
///
/// Order follows Level 1. The first `WHY:` line after a concept is its reason.
pub fn collect_items(
    level1: &str,
    how: &FieldMap,
    code: Option<&FieldMap>,
    syntax: &CommentSyntax,
) -> Vec<HintItem> {
    let level1 = strip_markers(level1, syntax);
    let mut items: Vec<HintItem> = Vec::new();

    for line in level1.lines() {
        let trimmed = line.trim();
        if is_numbered_with(trimmed, "CONCEPT:") {
            let ordinal = ordinal_label(trimmed).to_string();
            items.push(HintItem {
                concept: Some(after_marker(trimmed, "CONCEPT:")),
                how: how.get(&ordinal).cloned(),
                code: code
                    .and_then(|c| c.get(&ordinal))
                    .map(|block| block.split('\n').map(String::from).collect()),
                ordinal,
                why: None,
            });
        } else if trimmed.contains("WHY:")
            && let Some(item) = items.last_mut()
            && item.why.is_none()
        {
            item.why = Some(after_marker(trimmed, "WHY:"));
        }
    }

    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::Language;

    #[test]
    fn test_collect_items_fills_levels() {
        let syntax = Language::Rust.comment_syntax();
        let level1 = "/*\n1. CONCEPT: read input\n   WHY: data first\n2. CONCEPT: loop\n   WHY: repeat\n*/";
        let mut how = FieldMap::new();
        how.insert("2".to_string(), "use a for loop".to_string());
        let mut code = FieldMap::new();
        code.insert("2".to_string(), "for x in ____ {\n    ____\n}".to_string());

        let items = collect_items(level1, &how, Some(&code), &syntax);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].ordinal, "1");
        assert_eq!(items[0].concept.as_deref(), Some("read input"));
        assert_eq!(items[0].why.as_deref(), Some("data first"));
        assert!(items[0].how.is_none());
        assert!(items[0].code.is_none());
        assert_eq!(items[1].how.as_deref(), Some("use a for loop"));
        assert_eq!(items[1].code.as_ref().map(Vec::len), Some(3));
    }

    #[test]
    fn test_collect_items_serializes_without_empty_fields() {
        let syntax = Language::Python.comment_syntax();
        let items = collect_items("1. CONCEPT: a\n", &FieldMap::new(), None, &syntax);
        let json = serde_json::to_value(&items).unwrap();
        assert_eq!(json[0]["ordinal"], "1");
        assert!(json[0].get("why").is_none());
    }
}
