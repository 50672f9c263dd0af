//! Journal archive: append-only per-category logs of completed exercises.
//!
//! - [`entry`]: tagged entry shapes and legacy decoding
//! - [`forms`]: raw exercise input to entry conversion
//! - [`render`]: human-readable cards
//! - [`store`]: the [`EntryArchive`] log itself

pub mod entry;
pub mod forms;
pub mod render;
mod store;

pub use entry::{
    Category, Decision, DecisionItem, JournalEntry, MoodEntry, ReframeEntry, SensesEntry,
    TriageEntry, WorryDecision,
};
pub use forms::{parse_energy, MoodForm, ReframeForm, TriageForm};
pub use render::{render_card, render_listing};
pub use store::{ArchiveRecord, EntryArchive};
