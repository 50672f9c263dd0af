//! # Peace of Mind Core Library
//!
//! Core logic for Peace of Mind, a small self-help journal. All operations
//! are available through the standalone CLI; any front end is a thin layer
//! over this crate.
//!
//! ## Architecture
//!
//! - **Storage**: one string-keyed JSON namespace behind the
//!   [`KeyValueStore`] trait (SQLite on disk, in-memory for tests) and a
//!   TOML [`Config`] for defaults
//! - **Archive**: append-only per-category journal logs
//! - **Worry**: inbox capture, the daily worry window gate, review commits
//! - **Breath**: a cancellable breathing pacer driven by tokio timers
//!
//! ## Key Components
//!
//! - [`KeyedStore`]: typed reads that fall back instead of failing
//! - [`EntryArchive`]: journal entries by [`Category`]
//! - [`WorryInbox`] and [`WorryWindow`]: capture, gate, commit
//! - [`BreathPacer`]: phase loop with a [`CancelToken`]

pub mod archive;
pub mod breath;
pub mod cancel;
pub mod error;
pub mod senses;
pub mod storage;
pub mod worry;

pub use archive::{
    ArchiveRecord, Category, Decision, EntryArchive, JournalEntry, MoodForm, ReframeForm,
    TriageForm,
};
pub use breath::{BreathDurations, BreathPacer, PacerEvent, PacerOutcome, Phase};
pub use cancel::CancelToken;
pub use error::{ConfigError, CoreError, StorageError, ValidationError};
pub use senses::{SenseKind, SensesDraft, SensesPad};
pub use storage::{Config, Database, KeyValueStore, KeyedStore, MemoryStore};
pub use worry::{
    GateState, GateView, ReviewBoard, Selection, Worry, WorryInbox, WorryWindow,
    WorryWindowConfig,
};
