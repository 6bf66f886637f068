//! Comment-block marker handling.
//!
//! Generated hints arrive wrapped in the language's block-comment markers (and
//! sometimes in a markdown fence as well). [`strip_markers`] peels one fence
//! layer and one marker pair off the ends. Markers belonging to the hinted code
//! (a trailing `/* note */`, a docstring) are left alone. [`wrap_markers`] puts
//! exactly one pair back for display.

use crate::language::CommentSyntax;

const FENCE: &str = "```";

/// Whether a line is a markdown code fence (```` ``` ```` or ```` ```python ````).
fn is_fence_line(line: &str) -> bool {
    line.trim().strip_prefix(FENCE).is_some_and(|tag| {
        tag.chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '#' | '-' | '_'))
    })
}

/// Whether a line carries no content of its own: a bare comment marker or a fence.
pub fn is_wrapper_line(line: &str, syntax: &CommentSyntax) -> bool {
    syntax.is_marker_line(line) || is_fence_line(line)
}

/// Word-like markers (shell's `COMMENT`) are only recognized on their own line,
/// otherwise "add a COMMENT" would lose its last word.
fn allows_inline(marker: &str) -> bool {
    marker.chars().any(|c| !c.is_alphanumeric())
}

/// Stray wrappers sit at column 0; an indented marker line is code (a docstring).
pub fn is_stray_wrapper(line: &str, syntax: &CommentSyntax) -> bool {
    is_wrapper_line(line, syntax) && !line.starts_with([' ', '\t'])
}

fn first_content(lines: &[String]) -> Option<usize> {
    lines.iter().position(|l| !l.trim().is_empty())
}

fn last_content(lines: &[String]) -> Option<usize> {
    lines.iter().rposition(|l| !l.trim().is_empty())
}

/// Drop line `i` and everything after it, keeping the text newline-terminated.
fn cut_tail(lines: &mut Vec<String>, i: usize) {
    lines.truncate(i);
    lines.push(String::new());
}

/// An inline opener wraps the text unless the rest of its line closes it again,
/// as in `/* note */ int x;`. A one-line text `/* 1. HOW: x */` is the exception.
fn opener_wraps(rest: &str, syntax: &CommentSyntax, only_line: bool) -> bool {
    match rest.find(syntax.end) {
        None => true,
        Some(pos) => only_line && pos + syntax.end.len() == rest.trim_end().len(),
    }
}

fn strip_fences(lines: &mut Vec<String>) {
    if let Some(i) = first_content(lines)
        && is_fence_line(&lines[i])
    {
        lines.drain(..=i);
    }
    if let Some(i) = last_content(lines)
        && is_fence_line(&lines[i])
    {
        cut_tail(lines, i);
    }
}

fn strip_opening(lines: &mut Vec<String>, syntax: &CommentSyntax) {
    let Some(i) = first_content(lines) else {
        return;
    };
    let only_line = last_content(lines) == Some(i);
    let Some(rest) = lines[i].trim_start().strip_prefix(syntax.start) else {
        return;
    };

    if rest.trim().is_empty() {
        lines.drain(..=i);
    } else if allows_inline(syntax.start) && opener_wraps(rest, syntax, only_line) {
        lines[i] = rest.trim_start_matches([' ', '\t']).to_string();
        lines.drain(..i);
    }
}

fn strip_closing(lines: &mut Vec<String>, syntax: &CommentSyntax) {
    let Some(i) = last_content(lines) else {
        return;
    };
    let Some(before) = lines[i].trim_end().strip_suffix(syntax.end) else {
        return;
    };

    if before.trim().is_empty() {
        if !before.starts_with([' ', '\t']) {
            cut_tail(lines, i);
        }
    } else if allows_inline(syntax.end) && !before.contains(syntax.start) {
        // A closer whose opener is on the same line belongs to the code.
        lines[i] = before.trim_end_matches([' ', '\t']).to_string();
    }
}

/// Remove the wrapping comment markers (and markdown fences) from a hint text.
///
/// Peels at most one fence layer and one marker pair, so a `*/` or `"""` that
/// ends the last line of code survives. Line endings are normalized to `\n`;
/// text without wrappers is otherwise returned as-is. Stripping the result again
/// changes nothing unless the input carried a doubled wrapper.
pub fn strip_markers(text: &str, syntax: &CommentSyntax) -> String {
    let normalized = text.replace("\r\n", "\n");
    let mut lines: Vec<String> = normalized.split('\n').map(String::from).collect();

    strip_fences(&mut lines);
    strip_opening(&mut lines, syntax);
    strip_closing(&mut lines, syntax);

    lines.join("\n")
}

/// Wrap a hint text in exactly one marker pair.
///
/// Existing wrappers are stripped first and stray column-0 marker lines dropped,
/// so the result never carries a duplicated pair.
pub fn wrap_markers(text: &str, syntax: &CommentSyntax) -> String {
    let stripped = strip_markers(text, syntax);
    let body: Vec<&str> = stripped
        .trim_end_matches('\n')
        .split('\n')
        .filter(|line| !is_stray_wrapper(line, syntax))
        .collect();
    format!("{}\n{}\n{}\n", syntax.start, body.join("\n"), syntax.end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::Language;

    fn c_style() -> CommentSyntax {
        Language::Cpp.comment_syntax()
    }

    #[test]
    fn test_strip_own_line_markers() {
        let text = "/*\n1. CONCEPT: loop\n   WHY: needed\n*/\n";
        assert_eq!(
            strip_markers(text, &c_style()),
            "1. CONCEPT: loop\n   WHY: needed\n"
        );
    }

    #[test]
    fn test_strip_inline_markers() {
        let text = "/* 1. CONCEPT: loop\n   WHY: needed */\n";
        assert_eq!(
            strip_markers(text, &c_style()),
            "1. CONCEPT: loop\n   WHY: needed\n"
        );
    }

    #[test]
    fn test_strip_python_quotes() {
        let syntax = Language::Python.comment_syntax();
        let text = "\"\"\"\n1. CONCEPT: board\n   WHY: state\n\"\"\"";
        assert_eq!(
            strip_markers(text, &syntax),
            "1. CONCEPT: board\n   WHY: state\n"
        );
    }

    #[test]
    fn test_strip_fence_and_markers() {
        let text = "```python\n\"\"\"\n1. HOW: use a list\n\"\"\"\n```\n";
        let syntax = Language::Python.comment_syntax();
        assert_eq!(strip_markers(text, &syntax), "1. HOW: use a list\n");
    }

    #[test]
    fn test_strip_without_markers_is_identity() {
        let text = "1. CONCEPT: loop\n\n   WHY: needed\n";
        assert_eq!(strip_markers(text, &c_style()), text);
    }

    #[test]
    fn test_strip_keeps_interior_marker_lines() {
        let text = "Here are your hints:\n/*\n1. CONCEPT: x\n*/\n";
        assert_eq!(
            strip_markers(text, &c_style()),
            "Here are your hints:\n/*\n1. CONCEPT: x\n"
        );
    }

    #[test]
    fn test_strip_is_idempotent() {
        let syntax = c_style();
        for text in [
            "/*\n1. CODE: int count = ____; /* start */\n*/\n",
            "/* 1. HOW: x */",
            "```\n/*\n1. CODE: int x = ____;\n*/\n```",
            "plain text",
            "",
            "*/",
        ] {
            let once = strip_markers(text, &syntax);
            assert_eq!(strip_markers(&once, &syntax), once, "input: {text:?}");
        }
    }

    #[test]
    fn test_shell_word_marker_only_on_own_line() {
        let syntax = Language::Shell.comment_syntax();
        assert_eq!(
            strip_markers("1. HOW: add a COMMENT", &syntax),
            "1. HOW: add a COMMENT"
        );
        assert_eq!(
            strip_markers("<< 'COMMENT'\n1. HOW: echo\nCOMMENT\n", &syntax),
            "1. HOW: echo\n"
        );
    }

    #[test]
    fn test_wrap_never_duplicates_pair() {
        let syntax = c_style();
        let wrapped = wrap_markers("/*\n1. CONCEPT: a\n*/\n", &syntax);
        assert_eq!(wrapped, "/*\n1. CONCEPT: a\n*/\n");
        assert_eq!(wrap_markers(&wrapped, &syntax), wrapped);
    }

    #[test]
    fn test_wrap_drops_stray_marker_lines() {
        let syntax = c_style();
        let wrapped = wrap_markers("intro\n/*\n1. CONCEPT: a\n", &syntax);
        assert_eq!(wrapped, "/*\nintro\n1. CONCEPT: a\n*/\n");
    }

    #[test]
    fn test_strip_keeps_closer_of_trailing_code_comment() {
        let text = "/*\n1. CODE: int count = ____; /* start */\n*/\n";
        assert_eq!(
            strip_markers(text, &c_style()),
            "1. CODE: int count = ____; /* start */\n"
        );
    }

    #[test]
    fn test_strip_keeps_docstring_quotes() {
        let syntax = Language::Python.comment_syntax();
        let text = "\"\"\"\n1. CODE: def area(r):\n    \"\"\"Return ____.\"\"\"\n\"\"\"";
        let once = strip_markers(text, &syntax);
        assert_eq!(once, "1. CODE: def area(r):\n    \"\"\"Return ____.\"\"\"\n");
        assert_eq!(strip_markers(&once, &syntax), once);
    }

    #[test]
    fn test_strip_keeps_leading_balanced_comment() {
        let text = "/* setup */ int x = ____;\nint y;\n";
        assert_eq!(strip_markers(text, &c_style()), text);
    }

    #[test]
    fn test_strip_peels_one_layer_only() {
        let text = "/*\n/*\n1. CONCEPT: a\n*/\n*/";
        assert_eq!(strip_markers(text, &c_style()), "/*\n1. CONCEPT: a\n*/\n");
    }

    #[test]
    fn test_strip_normalizes_crlf() {
        let text = "/*\r\n1. CONCEPT: a\r\n   WHY: b\r\n*/\r\n";
        assert_eq!(
            strip_markers(text, &c_style()),
            "1. CONCEPT: a\n   WHY: b\n"
        );
    }

    #[test]
    fn test_wrap_keeps_indented_docstring_lines() {
        let syntax = Language::Python.comment_syntax();
        let text = "1. CODE: def f():\n    \"\"\"\n    ____\n    \"\"\"\n";
        assert_eq!(
            wrap_markers(text, &syntax),
            "\"\"\"\n1. CODE: def f():\n    \"\"\"\n    ____\n    \"\"\"\n\"\"\"\n"
        );
    }
}
