//! Metadata extraction engine: the shared extractor capability and the
//! static registry that dispatches a [`MetadataType`] to its implementation.

mod frontmatter;
mod inline;

pub use frontmatter::FrontmatterExtractor;
pub use inline::InlineExtractor;

use crate::domain::{Mapping, MetadataType};
use thiserror::Error;

/// Errors surfaced by the extraction engine.
///
/// Malformed blocks and lines are recovered locally (an empty extraction, a
/// skipped entry) and never raised; only structurally unrecoverable
/// situations escalate to the caller.
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("unknown metadata type '{0}'")]
    UnknownMetadataType(String),

    #[error("unsupported value shape: {0}")]
    UnsupportedValueShape(String),
}

/// Capability set shared by every metadata encoding.
///
/// All three operations are pure: they read their inputs, allocate
/// caller-owned outputs, and touch no shared state. Implementations are
/// stateless unit structs, so the registry can hand out `'static` references
/// that are safe to share across threads.
pub trait Extract: Sync {
    /// Locates every metadata unit of this encoding in `text` and returns
    /// the raw substrings verbatim, in order of appearance.
    ///
    /// Total by contract: a document with no block of this type (including
    /// the empty document and documents with only malformed markers) yields
    /// an empty vector, never an error.
    fn extract_raw(&self, text: &str) -> Vec<String>;

    /// Converts raw substrings from [`Extract::extract_raw`] into a
    /// structured mapping.
    ///
    /// Deterministic: the same input sequence always yields the same
    /// mapping. Unparsable lines inside an otherwise well-formed unit are
    /// skipped, so one malformed key does not corrupt its siblings.
    /// Duplicate keys resolve last-occurrence-wins.
    fn parse(&self, raw: &[String]) -> Mapping;

    /// Renders a mapping back to this encoding's raw textual form,
    /// delimiters included where the encoding has them.
    ///
    /// Parsing the output reproduces the mapping (modulo the whitespace and
    /// key-order normalization each variant documents).
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::UnsupportedValueShape`] when the mapping
    /// contains a value the encoding's grammar cannot express; no partial
    /// output is ever produced.
    fn serialize(&self, mapping: &Mapping) -> Result<String, MetadataError>;
}

static FRONTMATTER: FrontmatterExtractor = FrontmatterExtractor;
static INLINE: InlineExtractor = InlineExtractor;

// One entry per MetadataType variant. Built once, read-only afterwards.
static REGISTRY: &[(MetadataType, &'static dyn Extract)] = &[
    (MetadataType::Frontmatter, &FRONTMATTER),
    (MetadataType::Inline, &INLINE),
];

/// Resolves the extractor registered for `ty`.
///
/// This is the sole factory entry point: callers never construct extractor
/// variants directly.
///
/// # Errors
///
/// Returns [`MetadataError::UnknownMetadataType`] if no extractor is
/// registered for `ty`; the registry never falls back to a default.
pub fn resolve(ty: MetadataType) -> Result<&'static dyn Extract, MetadataError> {
    REGISTRY
        .iter()
        .find(|(registered, _)| *registered == ty)
        .map(|(_, extractor)| *extractor)
        .ok_or_else(|| MetadataError::UnknownMetadataType(ty.to_string()))
}
