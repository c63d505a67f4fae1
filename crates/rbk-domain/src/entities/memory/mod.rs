//! Memory domain entities
//!
//! Reasoning memory records, their category/source/status enums, and the
//! draft/patch shapes used at the repository boundary.

mod draft;
mod record;

pub use draft::{MemoryDraft, MemoryPatch};
pub use record::{MAX_TITLE_LENGTH, MemoryCategory, MemoryRecord, MemorySource, MemoryStatus};
