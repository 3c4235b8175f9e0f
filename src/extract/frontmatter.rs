//! Frontmatter extractor: YAML metadata delimited by `---` at the top of a
//! document.

use crate::domain::{Mapping, Value};
use crate::extract::{Extract, MetadataError};

/// Extractor for frontmatter-style metadata.
///
/// # Format
/// ```text
/// ---
/// title: Note Title
/// tags: [draft, reference]
/// ---
/// Body content here...
/// ```
///
/// A block is recognized only when the document opens with a `---` line;
/// `---` pairs later in the body are ordinary text. An opening marker with
/// no matching closing marker is treated as "no block found" rather than a
/// partial match, so body text is never mistaken for metadata.
#[derive(Debug, Clone, Copy)]
pub struct FrontmatterExtractor;

impl Extract for FrontmatterExtractor {
    fn extract_raw(&self, text: &str) -> Vec<String> {
        match extract_block(text) {
            Some(block) => vec![block.to_string()],
            None => Vec::new(),
        }
    }

    fn parse(&self, raw: &[String]) -> Mapping {
        let mut mapping = Mapping::new();
        for block in raw {
            for entry in split_entries(block) {
                // One malformed entry must not lose its siblings, so each
                // entry goes through YAML on its own.
                let Ok(yaml) = serde_yaml::from_str::<serde_yaml::Value>(&entry) else {
                    continue;
                };
                let serde_yaml::Value::Mapping(entries) = yaml else {
                    continue;
                };
                for (key, value) in &entries {
                    let Some(key) = yaml_key_to_string(key) else {
                        continue;
                    };
                    mapping.insert(key, yaml_to_value(value));
                }
            }
        }
        mapping
    }

    fn serialize(&self, mapping: &Mapping) -> Result<String, MetadataError> {
        check_keys(mapping)?;
        let yaml = mapping_to_yaml(mapping);
        let rendered = serde_yaml::to_string(&yaml)
            .map_err(|e| MetadataError::UnsupportedValueShape(e.to_string()))?;
        Ok(format!("---\n{rendered}---\n"))
    }
}

/// Returns the text between the opening and closing `---` lines, exclusive
/// of the delimiters and of the newline that precedes the closing one.
fn extract_block(text: &str) -> Option<&str> {
    // Opening delimiter must be at the very start and occupy its own line.
    let after_opening = if text.starts_with("---\r\n") {
        5
    } else if text.starts_with("---\n") {
        4
    } else {
        return None;
    };

    let rest = &text[after_opening..];
    let closing = find_closing_delimiter(rest)?;
    let block = &rest[..closing];
    let block = block
        .strip_suffix("\r\n")
        .or_else(|| block.strip_suffix('\n'))
        .unwrap_or(block);
    Some(block)
}

/// Finds the byte offset of the closing `---` delimiter.
///
/// The closing delimiter must appear at the start of a line and be exactly
/// `---` followed by a newline or EOF.
fn find_closing_delimiter(content: &str) -> Option<usize> {
    let bytes = content.as_bytes();
    let mut pos = 0;

    while pos < bytes.len() {
        if content[pos..].starts_with("---") {
            let after = pos + 3;
            if after >= bytes.len()
                || bytes[after] == b'\n'
                || (bytes[after] == b'\r' && after + 1 < bytes.len() && bytes[after + 1] == b'\n')
            {
                return Some(pos);
            }
        }

        match content[pos..].find('\n') {
            Some(newline_offset) => pos += newline_offset + 1,
            None => break,
        }
    }

    None
}

/// Splits a raw block into top-level entries: an unindented `key: ...` line
/// together with its continuation lines (indented lines, blank lines,
/// block-sequence items, comments).
///
/// A bare `---` line is a document delimiter, not content: it closes the
/// current entry and is dropped, so feeding a full serialized document
/// (delimiters included) straight into `parse` still yields every key. A
/// leading `-` marks a continuation only when the line is actually a
/// sequence item (`-` alone or `- item`); keys that happen to start with a
/// dash stay entry starts.
fn split_entries(block: &str) -> Vec<String> {
    let mut entries: Vec<String> = Vec::new();
    let mut current: Option<String> = None;

    for line in block.lines() {
        let trimmed = line.trim_start();
        let is_sequence_item = trimmed == "-" || trimmed.starts_with("- ");
        let is_continuation = line.len() != trimmed.len()
            || trimmed.is_empty()
            || is_sequence_item
            || trimmed.starts_with('#');

        if trimmed == "---" {
            if let Some(entry) = current.take() {
                entries.push(entry);
            }
        } else if is_continuation {
            if let Some(entry) = current.as_mut() {
                entry.push('\n');
                entry.push_str(line);
            }
            // Continuation with no open entry is unparsable; drop it.
        } else if line.contains(':') {
            if let Some(entry) = current.take() {
                entries.push(entry);
            }
            current = Some(line.to_string());
        } else {
            // Top-level line that is neither an entry start nor a
            // continuation; skip it.
            if let Some(entry) = current.take() {
                entries.push(entry);
            }
        }
    }

    if let Some(entry) = current.take() {
        entries.push(entry);
    }
    entries
}

fn yaml_key_to_string(key: &serde_yaml::Value) -> Option<String> {
    match key {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        // Null and composite keys have no stable string form; the pair is
        // treated as malformed and skipped.
        _ => None,
    }
}

/// Converts a YAML value to the engine's value model. Every scalar maps to
/// its textual form so that serialize then parse is the identity on `Value`.
fn yaml_to_value(yaml: &serde_yaml::Value) -> Value {
    match yaml {
        serde_yaml::Value::Null => Value::String(String::new()),
        serde_yaml::Value::Bool(b) => Value::String(b.to_string()),
        serde_yaml::Value::Number(n) => Value::String(n.to_string()),
        serde_yaml::Value::String(s) => Value::String(s.clone()),
        serde_yaml::Value::Sequence(items) => {
            Value::Sequence(items.iter().map(yaml_to_value).collect())
        }
        serde_yaml::Value::Mapping(entries) => {
            let mut out = Mapping::new();
            for (key, value) in entries {
                if let Some(key) = yaml_key_to_string(key) {
                    out.insert(key, yaml_to_value(value));
                }
            }
            Value::Mapping(out)
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_value(&tagged.value),
    }
}

fn value_to_yaml(value: &Value) -> serde_yaml::Value {
    match value {
        Value::String(s) => serde_yaml::Value::String(s.clone()),
        Value::Sequence(items) => {
            serde_yaml::Value::Sequence(items.iter().map(value_to_yaml).collect())
        }
        Value::Mapping(entries) => serde_yaml::Value::Mapping(mapping_to_yaml_mapping(entries)),
    }
}

fn mapping_to_yaml(mapping: &Mapping) -> serde_yaml::Value {
    serde_yaml::Value::Mapping(mapping_to_yaml_mapping(mapping))
}

fn mapping_to_yaml_mapping(mapping: &Mapping) -> serde_yaml::Mapping {
    mapping
        .iter()
        .map(|(key, value)| {
            (
                serde_yaml::Value::String(key.clone()),
                value_to_yaml(value),
            )
        })
        .collect()
}

/// Rejects keys the block grammar cannot re-read: a key containing a
/// newline would serialize as a complex YAML key that the entry splitter
/// does not recognize.
fn check_keys(mapping: &Mapping) -> Result<(), MetadataError> {
    for (key, value) in mapping {
        if key.contains('\n') {
            return Err(MetadataError::UnsupportedValueShape(format!(
                "frontmatter key {key:?} contains a newline"
            )));
        }
        check_value_keys(value)?;
    }
    Ok(())
}

fn check_value_keys(value: &Value) -> Result<(), MetadataError> {
    match value {
        Value::String(_) => Ok(()),
        Value::Sequence(items) => items.iter().try_for_each(check_value_keys),
        Value::Mapping(nested) => check_keys(nested),
    }
}
