//! Test fixture utilities for integration tests.

use notemeta::domain::Mapping;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Returns the path to the fixtures directory.
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

/// Returns the path to a note fixture file by name (without extension).
pub fn note_fixture(name: &str) -> PathBuf {
    fixtures_dir().join("notes").join(format!("{name}.md"))
}

/// Reads a fixture file and returns its contents as a string.
///
/// # Panics
///
/// Panics if the file cannot be read.
pub fn read_fixture(path: &Path) -> String {
    std::fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e))
}

/// The test-definition table loaded from `tests/fixtures/tests.json`.
///
/// Each case names the extractor variant it targets and carries the expected
/// output for one core operation; the fixture runner iterates the table and
/// invokes the operations directly.
#[derive(Debug, Deserialize)]
pub struct TestDefinitions {
    pub extract_raw: Vec<ExtractCase>,
    pub parse: Vec<ParseCase>,
    pub serialize: Vec<SerializeCase>,
    pub serialize_errors: Vec<SerializeErrorCase>,
}

#[derive(Debug, Deserialize)]
pub struct ExtractCase {
    pub id: String,
    pub description: String,
    #[serde(rename = "type")]
    pub metadata_type: String,
    /// Name of the note fixture supplying the document text.
    pub note: String,
    pub expected: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ParseCase {
    pub id: String,
    pub description: String,
    #[serde(rename = "type")]
    pub metadata_type: String,
    pub input: Vec<String>,
    pub expected: Mapping,
}

#[derive(Debug, Deserialize)]
pub struct SerializeCase {
    pub id: String,
    pub description: String,
    #[serde(rename = "type")]
    pub metadata_type: String,
    pub input: Mapping,
    pub expected: String,
}

/// A mapping whose shape the named variant must refuse to serialize.
#[derive(Debug, Deserialize)]
pub struct SerializeErrorCase {
    pub id: String,
    pub description: String,
    #[serde(rename = "type")]
    pub metadata_type: String,
    pub input: Mapping,
}

/// Loads the test-definition table.
///
/// # Panics
///
/// Panics if the file is missing or not valid JSON.
pub fn load_test_definitions() -> TestDefinitions {
    let path = fixtures_dir().join("tests.json");
    let json = read_fixture(&path);
    serde_json::from_str(&json)
        .unwrap_or_else(|e| panic!("Failed to parse {}: {}", path.display(), e))
}

/// Formats the standard failure context shown when a table-driven case fails.
pub fn case_context(id: &str, description: &str) -> String {
    format!("test ID: {id:?}\ntest description: {description:?}")
}
