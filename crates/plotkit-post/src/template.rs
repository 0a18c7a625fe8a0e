//! Macro template rendering.
//!
//! A macro is an ordered list of line templates using `{name}` placeholders.
//! Rendering substitutes every placeholder from a read-only context built
//! once per run. A placeholder absent from the context is left in the output
//! verbatim and counted, so an incomplete configuration shows up in the
//! produced G-code instead of aborting the run.

use std::collections::BTreeMap;
use tracing::warn;

/// Read-only placeholder context for macro rendering.
///
/// Values are stored pre-formatted so the same run always renders the same
/// text for the same template.
#[derive(Debug, Clone, Default)]
pub struct MacroContext {
    values: BTreeMap<String, String>,
}

impl MacroContext {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a numeric value under the given placeholder name.
    pub fn set(&mut self, name: &str, value: f64) {
        self.values.insert(name.to_string(), format_number(value));
    }

    /// Look up a rendered value.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }
}

/// Format a coordinate or height for G-code output.
///
/// Uses the shortest exact decimal form (`8`, `-10`, `0.5`), matching how
/// the rest of the pipeline writes synthesized moves.
pub fn format_number(value: f64) -> String {
    format!("{}", value)
}

/// Render one template line against the context.
///
/// Returns the rendered line and the number of unresolved placeholders.
/// `{unknown_key}` is echoed verbatim rather than failing.
pub fn render_line(template: &str, context: &MacroContext) -> (String, usize) {
    let mut output = String::with_capacity(template.len());
    let mut unresolved = 0;
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        output.push_str(&rest[..open]);
        let after_open = &rest[open + 1..];
        match after_open.find('}') {
            Some(close) => {
                let name = &after_open[..close];
                match context.get(name) {
                    Some(value) => output.push_str(value),
                    None => {
                        warn!(placeholder = name, "macro template references unknown key");
                        output.push('{');
                        output.push_str(name);
                        output.push('}');
                        unresolved += 1;
                    }
                }
                rest = &after_open[close + 1..];
            }
            None => {
                // Unbalanced brace: keep the remainder literally.
                output.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    output.push_str(rest);

    (output, unresolved)
}
