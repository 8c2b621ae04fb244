//! Domain logic - pure versioning rules independent of git operations

pub mod selector;
pub mod tag;
pub mod version;

pub use selector::select;
pub use tag::Tag;
pub use version::{IncrementPart, DEV_SUFFIX};
