//! Core types: MetadataType, Value, Mapping

mod metadata_type;
mod value;

pub use metadata_type::MetadataType;
pub use value::{Mapping, Value, string_sequence};
