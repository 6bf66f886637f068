//! Level-specific prompt construction.
//!
//! Templates live in `prompts/*.md` and use `{{name}}` placeholders. Filling is a
//! single left-to-right pass, so placeholder-looking text inside the learner's
//! code or a previous level's output is copied through untouched.

use learnsor_core::language::Language;

/// Conceptual round: `N. CONCEPT:` / `WHY:` pairs.
pub const LEVEL1_TEMPLATE: &str = include_str!("prompts/level1.md");
/// Implementation round: one `N. HOW:` line per Level-1 ordinal.
pub const LEVEL2_TEMPLATE: &str = include_str!("prompts/level2.md");
/// Fill-in-the-blank round: one `N. CODE:` block per ordinal.
pub const LEVEL3_TEMPLATE: &str = include_str!("prompts/level3.md");

/// Inputs shared by all three levels.
#[derive(Debug, Clone, Copy)]
pub struct PromptInputs<'a> {
    /// Assembled context block (project, active file, user code).
    pub context: &'a str,
    pub task: &'a str,
    pub language: &'a Language,
    pub instructions: Option<&'a str>,
}

impl PromptInputs<'_> {
    fn base_vars(&self) -> Vec<(&'static str, &str)> {
        let syntax = self.language.comment_syntax();
        vec![
            ("context", self.context),
            ("language", self.language.name()),
            ("task", self.task),
            (
                "instructions",
                self.instructions
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .unwrap_or("None"),
            ),
            ("start", syntax.start),
            ("end", syntax.end),
        ]
    }
}

/// Substitute `{{name}}` placeholders in one pass. Unknown names are left as-is.
pub fn fill_template(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find("{{") {
        out.push_str(&rest[..open]);
        let after = &rest[open + 2..];
        let Some(close) = after.find("}}") else {
            out.push_str(&rest[open..]);
            return out;
        };
        let name = &after[..close];
        match vars.iter().find(|(key, _)| *key == name) {
            Some((_, value)) => out.push_str(value),
            None => {
                out.push_str("{{");
                out.push_str(name);
                out.push_str("}}");
            }
        }
        rest = &after[close + 2..];
    }

    out.push_str(rest);
    out
}

pub fn level1_prompt(inputs: &PromptInputs<'_>) -> String {
    fill_template(LEVEL1_TEMPLATE, &inputs.base_vars())
}

/// Embeds the literal Level-1 output, error text included.
pub fn level2_prompt(inputs: &PromptInputs<'_>, level1: &str) -> String {
    let mut vars = inputs.base_vars();
    vars.push(("level1", level1.trim()));
    fill_template(LEVEL2_TEMPLATE, &vars)
}

pub fn level3_prompt(inputs: &PromptInputs<'_>, level1: &str, level2: &str) -> String {
    let mut vars = inputs.base_vars();
    vars.push(("level1", level1.trim()));
    vars.push(("level2", level2.trim()));
    fill_template(LEVEL3_TEMPLATE, &vars)
}
