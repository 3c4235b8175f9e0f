//! Closed enumeration of the metadata encodings the engine understands.

use crate::extract::MetadataError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The metadata encoding a document (or block) uses.
///
/// This is pure data: behavior lives in the extractor variant the registry
/// resolves for each value. The set is closed — there is exactly one
/// registered extractor per variant, and lookups for names outside the set
/// fail with [`MetadataError::UnknownMetadataType`] rather than defaulting.
///
/// # Examples
///
/// ```
/// use notemeta::domain::MetadataType;
///
/// let ty: MetadataType = "frontmatter".parse().unwrap();
/// assert_eq!(ty, MetadataType::Frontmatter);
/// assert!("sidecar".parse::<MetadataType>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetadataType {
    /// A single YAML block delimited by `---` at the top of the document.
    Frontmatter,
    /// `#tag` markers and `key:: value` field lines anywhere in the body.
    Inline,
}

impl MetadataType {
    /// Returns the canonical lowercase name of this encoding.
    pub fn as_str(&self) -> &'static str {
        match self {
            MetadataType::Frontmatter => "frontmatter",
            MetadataType::Inline => "inline",
        }
    }

    /// All supported encodings, in registry order.
    pub fn all() -> &'static [MetadataType] {
        &[MetadataType::Frontmatter, MetadataType::Inline]
    }
}

impl fmt::Display for MetadataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MetadataType {
    type Err = MetadataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "frontmatter" => Ok(MetadataType::Frontmatter),
            "inline" => Ok(MetadataType::Inline),
            other => Err(MetadataError::UnknownMetadataType(other.to_string())),
        }
    }
}
