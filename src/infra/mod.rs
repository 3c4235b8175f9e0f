//! Document loading from disk

mod fs;

pub use fs::{FsError, read_document};
