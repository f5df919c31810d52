//! Template rendering.
//!
//! Supports `{{name}}` variable substitution and Handlebars-style
//! `{{#if name}} ... {{else}} ... {{/if}}` conditional blocks, which is
//! the full syntax the manifest templates use. Template contents are
//! otherwise opaque.

use std::collections::BTreeMap;

use regex::Regex;

use crate::error::{GenError, GenResult};

const IF_OPEN: &str = "{{#if ";
const IF_CLOSE: &str = "{{/if}}";
const ELSE_TAG: &str = "{{else}}";

/// Renderer for manifest templates.
pub struct TemplateRenderer {
    variable_pattern: Regex,
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRenderer {
    /// Create a new template renderer.
    pub fn new() -> Self {
        Self {
            // Match {{variable_name}} pattern
            variable_pattern: Regex::new(r"\{\{([a-zA-Z_][a-zA-Z0-9_]*)\}\}").unwrap(),
        }
    }

    /// Render a template: expand conditional blocks, then substitute
    /// variables. Unknown variables are left in place.
    pub fn render(&self, template: &str, vars: &BTreeMap<String, String>) -> GenResult<String> {
        let expanded = self.expand_blocks(template, vars)?;
        Ok(self.substitute(&expanded, vars))
    }

    /// Replace `{{name}}` occurrences with their values.
    fn substitute(&self, content: &str, vars: &BTreeMap<String, String>) -> String {
        self.variable_pattern
            .replace_all(content, |caps: &regex::Captures| {
                let name = &caps[1];
                vars.get(name)
                    .cloned()
                    .unwrap_or_else(|| format!("{{{{{}}}}}", name))
            })
            .to_string()
    }

    /// Expand `{{#if}}` blocks recursively, keeping the branch selected
    /// by the variable's truthiness.
    fn expand_blocks(&self, input: &str, vars: &BTreeMap<String, String>) -> GenResult<String> {
        let mut out = String::with_capacity(input.len());
        let mut rest = input;

        while let Some(start) = rest.find(IF_OPEN) {
            out.push_str(&rest[..start]);

            let after = &rest[start + IF_OPEN.len()..];
            let tag_end = after
                .find("}}")
                .ok_or_else(|| GenError::MalformedTemplate("unterminated {{#if}} tag".into()))?;
            let name = after[..tag_end].trim();
            let (body, tail) = split_block(&after[tag_end + 2..])?;
            let (then_branch, else_branch) = split_else(body);

            let chosen = if is_truthy(vars.get(name).map(String::as_str)) {
                then_branch
            } else {
                else_branch
            };
            out.push_str(&self.expand_blocks(chosen, vars)?);
            rest = tail;
        }

        out.push_str(rest);
        Ok(out)
    }
}

/// A variable is truthy when set, non-empty and not the string "false".
fn is_truthy(value: Option<&str>) -> bool {
    matches!(value, Some(v) if !v.is_empty() && v != "false")
}

/// Split off the body of a block up to its matching `{{/if}}`,
/// accounting for nested blocks. Returns (body, remainder).
fn split_block(input: &str) -> GenResult<(&str, &str)> {
    let mut depth = 0usize;
    let mut pos = 0usize;

    while pos < input.len() {
        let rest = &input[pos..];
        if rest.starts_with(IF_OPEN) {
            depth += 1;
            pos += IF_OPEN.len();
        } else if rest.starts_with(IF_CLOSE) {
            if depth == 0 {
                return Ok((&input[..pos], &input[pos + IF_CLOSE.len()..]));
            }
            depth -= 1;
            pos += IF_CLOSE.len();
        } else {
            pos += rest.chars().next().map(char::len_utf8).unwrap_or(1);
        }
    }

    Err(GenError::MalformedTemplate(
        "missing {{/if}} for conditional block".into(),
    ))
}

/// Split a balanced block body at its top-level `{{else}}`, if any.
fn split_else(body: &str) -> (&str, &str) {
    let mut depth = 0usize;
    let mut pos = 0usize;

    while pos < body.len() {
        let rest = &body[pos..];
        if rest.starts_with(IF_OPEN) {
            depth += 1;
            pos += IF_OPEN.len();
        } else if rest.starts_with(IF_CLOSE) {
            depth = depth.saturating_sub(1);
            pos += IF_CLOSE.len();
        } else if depth == 0 && rest.starts_with(ELSE_TAG) {
            return (&body[..pos], &body[pos + ELSE_TAG.len()..]);
        } else {
            pos += rest.chars().next().map(char::len_utf8).unwrap_or(1);
        }
    }

    (body, "")
}
