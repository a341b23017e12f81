// crates/zettel-core/src/template.rs - placeholder substitution for the
// new-zettel template
//
// Everything else the teacher's `template.rs` does (template directory
// resolution, validation, Handlebars-style advanced templating) belongs to
// the rendering engine spec.md places out of scope; this keeps only the
// one pure function `zettel-cli`'s `note create` needs to expand the
// constant place's new-zettel template (Zid `00000000000027`).

use regex::Regex;
use std::sync::LazyLock;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{\{(\w+)\}\}").unwrap());

/// Substitute `{{title}}` in `template` with `title`. Unknown placeholders
/// (e.g. `{{date}}`) are left unchanged, matching the teacher's
/// `substitute_placeholders` comment: "this allows templates to include
/// future features."
pub fn render(template: &str, title: &str) -> String {
    template.replace("{{title}}", title)
}

/// List the distinct placeholder names present in `template`, in first
/// appearance order.
pub fn placeholders(template: &str) -> Vec<String> {
    let mut seen = Vec::new();
    for cap in PLACEHOLDER.captures_iter(template) {
        let name = cap[1].to_string();
        if !seen.contains(&name) {
            seen.push(name);
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_substitutes_title() {
        assert_eq!(render("# {{title}}\n", "Hello"), "# Hello\n");
    }

    #[test]
    fn test_render_leaves_unknown_placeholders() {
        assert_eq!(render("{{title}} {{date}}", "X"), "X {{date}}");
    }

    #[test]
    fn test_placeholders_dedup_in_order() {
        assert_eq!(
            placeholders("{{title}} {{date}} {{title}}"),
            vec!["title".to_string(), "date".to_string()]
        );
    }
}
