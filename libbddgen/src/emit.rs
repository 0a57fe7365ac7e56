//! Phase 3: Skeleton Emitter
//!
//! Renders a scenario tree as Catch BDD blocks:
//!
//! ```text
//! SCENARIO("title") {
//!     GIVEN("precondition") {
//!         WHEN("action") {
//!             THEN("expectation") {
//!             }
//!         }
//!     }
//! }
//! ```

use crate::keyword::Level;
use crate::tree::{Document, ScenarioNode, StepNode};

const INDENT: &str = "    ";

/// Render a document. Returns `None` when there are no scenarios, in which
/// case no output file should be produced at all.
pub fn render(doc: &Document) -> Option<String> {
    if doc.is_empty() {
        return None;
    }

    let mut out = String::new();
    if let Some(header) = &doc.header {
        out.push_str("// ");
        out.push_str(header);
        out.push_str("\n\n");
    }
    if !doc.story.is_empty() {
        for line in &doc.story {
            out.push_str("// ");
            out.push_str(line);
            out.push('\n');
        }
        out.push('\n');
    }

    let blocks: Vec<String> = doc.scenarios.iter().map(render_scenario).collect();
    out.push_str(&blocks.join("\n"));
    Some(out)
}

fn render_scenario(scenario: &ScenarioNode) -> String {
    let mut out = String::new();
    open_block(&mut out, Level::Scenario, &scenario.title, 0);
    for step in &scenario.children {
        render_step(&mut out, step, 1);
    }
    close_block(&mut out, 0);
    out
}

fn render_step(out: &mut String, step: &StepNode, depth: usize) {
    open_block(out, step.level, &step.title, depth);
    for child in &step.children {
        render_step(out, child, depth + 1);
    }
    close_block(out, depth);
}

fn open_block(out: &mut String, level: Level, title: &str, depth: usize) {
    out.push_str(&INDENT.repeat(depth));
    out.push_str(level.call_name());
    out.push('(');
    out.push_str(&encode_c_string(title));
    out.push_str(") {\n");
}

fn close_block(out: &mut String, depth: usize) {
    out.push_str(&INDENT.repeat(depth));
    out.push_str("}\n");
}

/// Quote a title as a C string literal.
///
/// Other control characters become fixed-width escapes: three-digit octal
/// below 0x80 and `\uXXXX` above. A hex escape would swallow any hex digits
/// that follow it.
pub(crate) fn encode_c_string(s: &str) -> String {
    let mut result = String::from("\"");
    for c in s.chars() {
        match c {
            '"' => result.push_str("\\\""),
            '\\' => result.push_str("\\\\"),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            '\x08' => result.push_str("\\b"),
            '\x0c' => result.push_str("\\f"),
            c if c.is_control() && (c as u32) < 0x80 => {
                result.push_str(&format!("\\{:03o}", c as u32));
            }
            c if c.is_control() => {
                result.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => result.push(c),
        }
    }
    result.push('"');
    result
}
