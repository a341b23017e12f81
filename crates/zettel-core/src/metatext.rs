// crates/zettel-core/src/metatext.rs - the on-disk metadata text form
//
// Shared by sidecar `.meta` files and `.zettel` headers (spec.md §6):
// `key: value` lines, `#`-prefixed comment lines ignored, keys lowercased.
// Hand-rolled rather than pulled from a YAML crate, the same way the
// teacher hand-parses its own filename grammars in `id.rs` instead of
// reaching for a parser-combinator dependency.

use crate::meta::Meta;
use crate::zid::Zid;

/// Parse a metadata text block into an unfrozen [`Meta`] for `zid`.
///
/// Lines are processed independently; a line with no `:` is skipped rather
/// than treated as an error, since sidecar files in the wild sometimes
/// carry stray blank-ish lines that aren't worth rejecting.
pub fn parse(zid: Zid, text: &str) -> Meta {
    let mut meta = Meta::new(zid);
    for line in text.lines() {
        let trimmed = line.trim_end();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let Some((key, value)) = trimmed.split_once(':') else {
            continue;
        };
        let key = key.trim().to_ascii_lowercase();
        let value = value.trim();
        if key.is_empty() {
            continue;
        }
        // Unknown keys are retained with String type (spec.md §6); `set`
        // only rejects keys that violate the `[a-z0-9][-a-z0-9]*` grammar.
        let _ = meta.set(&key, value);
    }
    meta
}

/// Serialise a Meta's pairs back to `key: value` lines, front pairs first
/// in their canonical order, then rest pairs in insertion order.
pub fn serialize(meta: &Meta) -> String {
    let mut out = String::new();
    for (k, v) in meta.front_pairs() {
        out.push_str(k);
        out.push_str(": ");
        out.push_str(v);
        out.push('\n');
    }
    for (k, v) in meta.rest_pairs() {
        out.push_str(k);
        out.push_str(": ");
        out.push_str(v);
        out.push('\n');
    }
    out
}

/// The separator a `.zettel` header used to mark the end of its metadata
/// block, remembered so a subsequent write preserves the author's style
/// (spec.md §4.4, "the byte offset of the separator is remembered").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderSeparator {
    /// A single blank line.
    BlankLine,
    /// A line consisting solely of `---`.
    Dashes,
}

impl HeaderSeparator {
    pub fn as_str(&self) -> &'static str {
        match self {
            HeaderSeparator::BlankLine => "\n",
            HeaderSeparator::Dashes => "---\n",
        }
    }
}

/// Split a `.zettel` file's full text into `(header_text, body, separator)`.
///
/// The header ends at the first blank line or a line that is exactly
/// `---`; everything after the separator is body content. If no separator
/// is found, the whole text is treated as headerless body.
pub fn split_header(text: &str) -> (String, String, Option<HeaderSeparator>) {
    let mut header_lines = Vec::new();
    let mut rest_start = None;
    let mut sep = None;

    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        let stripped = line.trim_end_matches('\n');
        if stripped.is_empty() {
            sep = Some(HeaderSeparator::BlankLine);
            rest_start = Some(offset + line.len());
            break;
        }
        if stripped == "---" {
            sep = Some(HeaderSeparator::Dashes);
            rest_start = Some(offset + line.len());
            break;
        }
        header_lines.push(stripped);
        offset += line.len();
    }

    match rest_start {
        Some(start) => (
            header_lines.join("\n"),
            text[start..].to_string(),
            sep,
        ),
        None => (String::new(), text.to_string(), None),
    }
}

/// Join a serialised header and body back into a `.zettel` file's full
/// text, using the given separator style (defaulting to a blank line for
/// newly created zettels that have no remembered style).
pub fn join_header(header: &str, body: &str, sep: HeaderSeparator) -> String {
    let mut out = String::new();
    out.push_str(header);
    if !header.is_empty() && !header.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(sep.as_str());
    out.push_str(body);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zid() -> Zid {
        Zid::parse("20200101000001").unwrap()
    }

    #[test]
    fn test_parse_basic() {
        let text = "title: Hello\nsyntax: zmk\n# a comment\ntags: #a #b\n";
        let meta = parse(zid(), text);
        assert_eq!(meta.get("title"), Some("Hello"));
        assert_eq!(meta.get("syntax"), Some("zmk"));
        assert_eq!(meta.get_tag_set("tags"), vec!["a", "b"]);
    }

    #[test]
    fn test_parse_skips_blank_and_malformed_lines() {
        let text = "title: Hello\n\nnot-a-pair\nrole: zettel\n";
        let meta = parse(zid(), text);
        assert_eq!(meta.get("title"), Some("Hello"));
        assert_eq!(meta.get("role"), Some("zettel"));
    }

    #[test]
    fn test_roundtrip_modulo_order() {
        let text = "title: Hello\nsyntax: zmk\n\n";
        let meta = parse(zid(), text);
        let out = serialize(&meta);
        let reparsed = parse(zid(), &out);
        assert_eq!(reparsed.get("title"), meta.get("title"));
        assert_eq!(reparsed.get("syntax"), meta.get("syntax"));
    }

    #[test]
    fn test_split_header_blank_line() {
        let full = "title: Hello\nsyntax: zmk\n\nWorld body";
        let (header, body, sep) = split_header(full);
        assert_eq!(header, "title: Hello\nsyntax: zmk");
        assert_eq!(body, "World body");
        assert_eq!(sep, Some(HeaderSeparator::BlankLine));
    }

    #[test]
    fn test_split_header_dashes() {
        let full = "title: Hello\n---\nWorld body";
        let (header, body, sep) = split_header(full);
        assert_eq!(header, "title: Hello");
        assert_eq!(body, "World body");
        assert_eq!(sep, Some(HeaderSeparator::Dashes));
    }

    #[test]
    fn test_join_header_preserves_separator_style() {
        let joined = join_header("title: Hello", "World", HeaderSeparator::BlankLine);
        assert_eq!(joined, "title: Hello\n\nWorld");
        let joined = join_header("title: Hello", "World", HeaderSeparator::Dashes);
        assert_eq!(joined, "title: Hello\n---\nWorld");
    }

    #[test]
    fn test_scenario_header_roundtrip() {
        // Concrete scenario 1 from spec.md §8.
        let mut meta = Meta::new(Zid::parse("20200101000001").unwrap());
        meta.set("title", "Hello").unwrap();
        meta.set("syntax", "zmk").unwrap();
        let header = serialize(&meta);
        let full = join_header(header.trim_end(), "World", HeaderSeparator::BlankLine);
        assert_eq!(full, "title: Hello\nsyntax: zmk\n\nWorld");
    }
}
