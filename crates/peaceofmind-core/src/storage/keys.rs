//! Persisted key names in the shared namespace.

pub const WORRY_WINDOW_CFG: &str = "worry_window_cfg";
pub const WORRY_INBOX: &str = "worry_inbox";

pub const ARCHIVE_WORRY_DECISIONS: &str = "archive_worry_decisions";
pub const ARCHIVE_TRIAGE: &str = "archive_triage";
pub const ARCHIVE_MOOD: &str = "archive_mood";
pub const ARCHIVE_SENSES: &str = "archive_senses";
pub const ARCHIVE_REFRAMES_FAST: &str = "archive_reframes_fast";

pub const ARCHIVE_KEYS: [&str; 5] = [
    ARCHIVE_SENSES,
    ARCHIVE_REFRAMES_FAST,
    ARCHIVE_TRIAGE,
    ARCHIVE_MOOD,
    ARCHIVE_WORRY_DECISIONS,
];

/// Draft autosave prefix; the full key is `senses_<kind>`.
pub const SENSES_DRAFT_PREFIX: &str = "senses_";

/// Navigation memory owned by the presentation layer.
pub const LAST_DESTINATION: &str = "last_destination";
