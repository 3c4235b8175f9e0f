//! Inline extractor: `#tag` markers and `key:: value` field lines scattered
//! through a document body.

use crate::domain::{Mapping, Value};
use crate::extract::{Extract, MetadataError};
use regex::Regex;
use std::sync::LazyLock;

/// Key under which hashtag markers accumulate during parsing.
const TAGS_KEY: &str = "tags";

/// A full line of the form `key:: value`. CRLF mode (`R`) lets `$` match
/// before a `\r\n` ending, so field lines in CRLF documents are found and
/// the `\r` stays out of the matched text.
static FIELD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?mR)^[ \t]*(?P<key>[A-Za-z][A-Za-z0-9 _-]*?)::[ \t]*(?P<value>[^\r\n]*)$")
        .expect("field regex is valid")
});

/// A hashtag token. The start-of-tag boundary (not preceded by a word
/// character) is checked separately because the regex crate has no
/// lookbehind.
static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#[A-Za-z0-9_][A-Za-z0-9_/-]*").expect("tag regex is valid"));

/// Matches a complete, serializable tag token (without the `#`).
static TAG_TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_][A-Za-z0-9_/-]*$").expect("tag token regex is valid")
});

/// Matches a complete key a field line can carry.
static FIELD_KEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9 _-]*$").expect("field key regex is valid")
});

/// Extractor for inline-style metadata.
///
/// # Format
/// ```text
/// Some body text #project/alpha and more.
/// status:: in-progress
/// ```
///
/// Markers may occur anywhere; each occurrence is one raw substring, in
/// left-to-right, top-to-bottom order. Overlapping candidates resolve
/// leftmost-first and non-overlapping: once text is consumed into one
/// marker, scanning resumes after it (so a `#tag` inside a field line
/// belongs to the field, and `#a#b` yields only `#a`).
#[derive(Debug, Clone, Copy)]
pub struct InlineExtractor;

impl Extract for InlineExtractor {
    fn extract_raw(&self, text: &str) -> Vec<String> {
        marker_spans(text)
            .into_iter()
            .map(|(start, end)| text[start..end].to_string())
            .collect()
    }

    fn parse(&self, raw: &[String]) -> Mapping {
        let mut mapping = Mapping::new();
        for unit in raw {
            // Each unit is re-scanned with the extraction grammar, so a
            // serialized multi-marker string parses the same way a sequence
            // of single-marker substrings does.
            for (start, end) in marker_spans(unit) {
                apply_marker(&unit[start..end], &mut mapping);
            }
        }
        mapping
    }

    fn serialize(&self, mapping: &Mapping) -> Result<String, MetadataError> {
        let mut lines = Vec::with_capacity(mapping.len());
        for (key, value) in mapping {
            if key == TAGS_KEY {
                if let Value::Sequence(items) = value {
                    lines.push(tags_line(items)?);
                    continue;
                }
            }
            lines.push(field_line(key, value)?);
        }
        Ok(lines.join("\n"))
    }
}

/// Byte spans of every marker in `text`, in document order, leftmost-first
/// and non-overlapping.
fn marker_spans(text: &str) -> Vec<(usize, usize)> {
    let mut spans: Vec<(usize, usize)> = FIELD_RE
        .find_iter(text)
        .map(|m| (m.start(), m.end()))
        .collect();
    spans.extend(
        TAG_RE
            .find_iter(text)
            .filter(|m| tag_boundary_ok(text, m.start()))
            .map(|m| (m.start(), m.end())),
    );
    spans.sort_unstable();

    let mut out = Vec::with_capacity(spans.len());
    let mut consumed_up_to = 0;
    for (start, end) in spans {
        if start >= consumed_up_to {
            out.push((start, end));
            consumed_up_to = end;
        }
    }
    out
}

/// A `#` opens a tag only when it is not glued to a word character or
/// another `#` (so `C#4` and `##heading` produce nothing).
fn tag_boundary_ok(text: &str, start: usize) -> bool {
    match text[..start].chars().next_back() {
        None => true,
        Some(c) => !(c.is_alphanumeric() || c == '_' || c == '#'),
    }
}

/// Folds one marker occurrence into the mapping.
///
/// Field occurrences set their key last-occurrence-wins. Hashtags append to
/// the `tags` sequence; if a field previously set `tags` to something that
/// is not a sequence, the hashtag starts a fresh sequence (again, the later
/// occurrence wins).
fn apply_marker(marker: &str, mapping: &mut Mapping) {
    if let Some(caps) = FIELD_RE.captures(marker) {
        let key = caps["key"].trim_end().to_string();
        let value = caps["value"].trim().to_string();
        mapping.insert(key, Value::String(value));
        return;
    }

    if let Some(name) = marker.strip_prefix('#') {
        match mapping.get_mut(TAGS_KEY) {
            Some(Value::Sequence(items)) => items.push(Value::String(name.to_string())),
            _ => {
                mapping.insert(
                    TAGS_KEY.to_string(),
                    Value::Sequence(vec![Value::String(name.to_string())]),
                );
            }
        }
    }
}

fn tags_line(items: &[Value]) -> Result<String, MetadataError> {
    if items.is_empty() {
        return Err(MetadataError::UnsupportedValueShape(
            "an empty tags sequence has no inline form".to_string(),
        ));
    }
    let mut tokens = Vec::with_capacity(items.len());
    for item in items {
        let Some(tag) = item.as_str() else {
            return Err(MetadataError::UnsupportedValueShape(
                "tags must be a sequence of strings".to_string(),
            ));
        };
        if !TAG_TOKEN_RE.is_match(tag) {
            return Err(MetadataError::UnsupportedValueShape(format!(
                "{tag:?} is not a valid inline tag"
            )));
        }
        tokens.push(format!("#{tag}"));
    }
    Ok(tokens.join(" "))
}

fn field_line(key: &str, value: &Value) -> Result<String, MetadataError> {
    let Some(value) = value.as_str() else {
        return Err(MetadataError::UnsupportedValueShape(format!(
            "inline field '{key}' must be a string"
        )));
    };
    if !FIELD_KEY_RE.is_match(key) || key.ends_with(' ') {
        return Err(MetadataError::UnsupportedValueShape(format!(
            "{key:?} is not a valid inline field key"
        )));
    }
    if value.contains('\n') || value.contains('\r') {
        return Err(MetadataError::UnsupportedValueShape(format!(
            "inline field '{key}' value spans multiple lines"
        )));
    }
    Ok(format!("{key}:: {value}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::string_sequence;
    use pretty_assertions::assert_eq;

    fn extractor() -> InlineExtractor {
        InlineExtractor
    }

    // ===========================================
    // Phase 1: extract_raw Hashtags
    // ===========================================

    #[test]
    fn extracts_tags_in_document_order() {
        let raw = extractor().extract_raw("note #tag1 more text #tag2");
        assert_eq!(raw, vec!["#tag1".to_string(), "#tag2".to_string()]);
    }

    #[test]
    fn extracts_tags_across_lines() {
        let raw = extractor().extract_raw("first #a\nsecond line\nthird #b #c\n");
        assert_eq!(raw, vec!["#a", "#b", "#c"]);
    }

    #[test]
    fn tag_allows_nested_paths_and_separators() {
        let raw = extractor().extract_raw("see #project/alpha-2 and #work_log");
        assert_eq!(raw, vec!["#project/alpha-2", "#work_log"]);
    }

    #[test]
    fn tag_must_not_be_glued_to_word_characters() {
        assert!(extractor().extract_raw("see C#4 for details").is_empty());
        assert_eq!(extractor().extract_raw("(#note)"), vec!["#note"]);
    }

    #[test]
    fn adjacent_tags_resolve_leftmost_non_overlapping() {
        assert_eq!(extractor().extract_raw("#a#b"), vec!["#a"]);
    }

    #[test]
    fn bare_or_malformed_hash_is_not_a_tag() {
        assert!(extractor().extract_raw("# heading").is_empty());
        assert!(extractor().extract_raw("## subheading").is_empty());
        assert!(extractor().extract_raw("100% #").is_empty());
    }

    // ===========================================
    // Phase 2: extract_raw Field Lines
    // ===========================================

    #[test]
    fn extracts_field_lines() {
        let raw = extractor().extract_raw("intro\nstatus:: in-progress\noutro\n");
        assert_eq!(raw, vec!["status:: in-progress"]);
    }

    #[test]
    fn field_line_consumes_embedded_tags() {
        let raw = extractor().extract_raw("related:: see #other note\n#standalone\n");
        assert_eq!(raw, vec!["related:: see #other note", "#standalone"]);
    }

    #[test]
    fn single_colon_is_not_a_field() {
        assert!(extractor().extract_raw("title: not inline\n").is_empty());
    }

    #[test]
    fn field_keeps_leading_indentation_verbatim() {
        let raw = extractor().extract_raw("  due:: tomorrow\n");
        assert_eq!(raw, vec!["  due:: tomorrow"]);
    }

    #[test]
    fn handles_crlf_line_endings() {
        let doc = "intro\r\nowner:: dana\r\nsee #alpha\r\n";
        let raw = extractor().extract_raw(doc);
        assert_eq!(raw, vec!["owner:: dana", "#alpha"]);

        let mapping = extractor().parse(&raw);
        assert_eq!(mapping["owner"], Value::from("dana"));
        assert_eq!(mapping["tags"], string_sequence(["alpha"]));
    }

    #[test]
    fn field_at_eof_with_trailing_carriage_return() {
        let raw = extractor().extract_raw("status:: done\r");
        assert_eq!(raw, vec!["status:: done"]);
    }

    // ===========================================
    // Phase 3: Totality
    // ===========================================

    #[test]
    fn no_markers_yields_empty_sequence() {
        assert!(extractor().extract_raw("").is_empty());
        assert!(extractor().extract_raw("plain body text").is_empty());
        assert!(extractor().extract_raw("---\nnot: inline\n---\n").is_empty());
    }

    // ===========================================
    // Phase 4: parse
    // ===========================================

    #[test]
    fn parse_accumulates_tags_in_order() {
        let raw = vec!["#tag1".to_string(), "#tag2".to_string()];
        let mapping = extractor().parse(&raw);
        assert_eq!(mapping["tags"], string_sequence(["tag1", "tag2"]));
        assert_eq!(mapping.len(), 1);
    }

    #[test]
    fn parse_fields_trim_key_and_value() {
        let raw = vec!["  status::   in-progress  ".to_string()];
        let mapping = extractor().parse(&raw);
        assert_eq!(mapping["status"], Value::from("in-progress"));
    }

    #[test]
    fn parse_duplicate_field_last_occurrence_wins() {
        let raw = vec!["status:: draft".to_string(), "status:: final".to_string()];
        let mapping = extractor().parse(&raw);
        assert_eq!(mapping["status"], Value::from("final"));
    }

    #[test]
    fn later_tags_field_overrides_hashtags() {
        let raw = vec!["#a".to_string(), "tags:: none".to_string()];
        let mapping = extractor().parse(&raw);
        assert_eq!(mapping["tags"], Value::from("none"));
    }

    #[test]
    fn hashtag_after_tags_field_starts_fresh_sequence() {
        let raw = vec!["tags:: none".to_string(), "#b".to_string()];
        let mapping = extractor().parse(&raw);
        assert_eq!(mapping["tags"], string_sequence(["b"]));
    }

    #[test]
    fn field_value_may_contain_double_colon() {
        let raw = vec!["path:: src::module".to_string()];
        let mapping = extractor().parse(&raw);
        assert_eq!(mapping["path"], Value::from("src::module"));
    }

    #[test]
    fn parse_multi_marker_unit_scans_all_markers() {
        // A serialized blob is one raw unit containing several markers.
        let raw = vec!["#a #b\nstatus:: done".to_string()];
        let mapping = extractor().parse(&raw);
        assert_eq!(mapping["tags"], string_sequence(["a", "b"]));
        assert_eq!(mapping["status"], Value::from("done"));
    }

    // ===========================================
    // Phase 5: serialize
    // ===========================================

    #[test]
    fn serialize_tags_as_hashtag_line() {
        let mut m = Mapping::new();
        m.insert("tags".to_string(), string_sequence(["a", "b"]));
        assert_eq!(extractor().serialize(&m).unwrap(), "#a #b");
    }

    #[test]
    fn serialize_fields_as_double_colon_lines() {
        let mut m = Mapping::new();
        m.insert("status".to_string(), "done".into());
        m.insert("due".to_string(), "tomorrow".into());
        assert_eq!(
            extractor().serialize(&m).unwrap(),
            "due:: tomorrow\nstatus:: done"
        );
    }

    #[test]
    fn serialize_rejects_nested_mapping() {
        let mut m = Mapping::new();
        m.insert("meta".to_string(), Value::Mapping(Mapping::new()));
        let err = extractor().serialize(&m).unwrap_err();
        assert!(matches!(err, MetadataError::UnsupportedValueShape(_)));
    }

    #[test]
    fn serialize_rejects_sequence_under_non_tags_key() {
        let mut m = Mapping::new();
        m.insert("aliases".to_string(), string_sequence(["x"]));
        assert!(extractor().serialize(&m).is_err());
    }

    #[test]
    fn serialize_rejects_invalid_tag_token() {
        let mut m = Mapping::new();
        m.insert("tags".to_string(), string_sequence(["has space"]));
        assert!(extractor().serialize(&m).is_err());
    }

    #[test]
    fn serialize_rejects_multiline_field_value() {
        let mut m = Mapping::new();
        m.insert("note".to_string(), "line1\nline2".into());
        assert!(extractor().serialize(&m).is_err());
    }

    #[test]
    fn serialize_never_emits_partial_output() {
        let mut m = Mapping::new();
        m.insert("good".to_string(), "value".into());
        m.insert("meta".to_string(), Value::Mapping(Mapping::new()));
        // The whole call fails; the valid key is not emitted on its own.
        assert!(extractor().serialize(&m).is_err());
    }

    // ===========================================
    // Phase 6: Round-Trip
    // ===========================================

    #[test]
    fn roundtrip_tags_and_fields() {
        let mut m = Mapping::new();
        m.insert("tags".to_string(), string_sequence(["a", "b"]));
        m.insert("status".to_string(), "in-progress".into());

        let out = extractor().serialize(&m).unwrap();
        assert_eq!(extractor().parse(&[out]), m);
    }

    #[test]
    fn roundtrip_through_extract_raw() {
        let mut m = Mapping::new();
        m.insert("tags".to_string(), string_sequence(["project/alpha"]));
        m.insert("due".to_string(), "2024-06-01".into());

        let doc = extractor().serialize(&m).unwrap();
        let raw = extractor().extract_raw(&doc);
        assert_eq!(extractor().parse(&raw), m);
    }

    #[test]
    fn roundtrip_tags_as_plain_field() {
        // A `tags:: ...` field parses to a string, which serializes back to
        // a field line rather than hashtags.
        let mut m = Mapping::new();
        m.insert("tags".to_string(), "none".into());

        let out = extractor().serialize(&m).unwrap();
        assert_eq!(out, "tags:: none");
        assert_eq!(extractor().parse(&[out]), m);
    }

    #[test]
    fn roundtrip_value_with_double_colon() {
        let mut m = Mapping::new();
        m.insert("path".to_string(), "src::module".into());

        let out = extractor().serialize(&m).unwrap();
        assert_eq!(extractor().parse(&[out]), m);
    }
}
