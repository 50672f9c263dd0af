//! 5-4-3-2-1 grounding exercise drafts.
//!
//! Each sense keeps an autosaved list under `senses_<kind>`. Lists are
//! shown padded with blank slots up to the sense's target and stored with
//! blanks removed.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::archive::{EntryArchive, JournalEntry, SensesEntry};
use crate::error::{Result, ValidationError};
use crate::storage::{keys, KeyValueStore, KeyedStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SenseKind {
    See,
    Hear,
    Touch,
    Smell,
    Taste,
}

impl SenseKind {
    pub const ALL: [SenseKind; 5] = [
        SenseKind::See,
        SenseKind::Hear,
        SenseKind::Touch,
        SenseKind::Smell,
        SenseKind::Taste,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SenseKind::See => "see",
            SenseKind::Hear => "hear",
            SenseKind::Touch => "touch",
            SenseKind::Smell => "smell",
            SenseKind::Taste => "taste",
        }
    }

    /// Number of things the exercise asks for.
    pub fn target(self) -> usize {
        match self {
            SenseKind::See => 5,
            SenseKind::Hear => 4,
            SenseKind::Touch => 3,
            SenseKind::Smell => 2,
            SenseKind::Taste => 1,
        }
    }

    pub fn storage_key(self) -> String {
        format!("{}{}", keys::SENSES_DRAFT_PREFIX, self.as_str())
    }
}

impl std::fmt::Display for SenseKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SenseKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::InvalidValue {
                field: "sense".into(),
                message: format!("unknown sense '{s}' (expected one of: see, hear, touch, smell, taste)"),
            })
    }
}

/// Working lists for all five senses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensesDraft {
    pub see: Vec<String>,
    pub hear: Vec<String>,
    pub touch: Vec<String>,
    pub smell: Vec<String>,
    pub taste: Vec<String>,
}

impl SensesDraft {
    /// All-blank draft at target sizes.
    pub fn blank() -> Self {
        let mut draft = Self::default();
        for kind in SenseKind::ALL {
            *draft.items_mut(kind) = vec![String::new(); kind.target()];
        }
        draft
    }

    pub fn items(&self, kind: SenseKind) -> &[String] {
        match kind {
            SenseKind::See => &self.see,
            SenseKind::Hear => &self.hear,
            SenseKind::Touch => &self.touch,
            SenseKind::Smell => &self.smell,
            SenseKind::Taste => &self.taste,
        }
    }

    pub fn items_mut(&mut self, kind: SenseKind) -> &mut Vec<String> {
        match kind {
            SenseKind::See => &mut self.see,
            SenseKind::Hear => &mut self.hear,
            SenseKind::Touch => &mut self.touch,
            SenseKind::Smell => &mut self.smell,
            SenseKind::Taste => &mut self.taste,
        }
    }

    /// Trimmed, non-empty items for `kind`.
    pub fn filled(&self, kind: SenseKind) -> Vec<String> {
        self.items(kind)
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn to_entry(&self, now: DateTime<Utc>) -> SensesEntry {
        SensesEntry {
            timestamp: now,
            see: self.filled(SenseKind::See),
            hear: self.filled(SenseKind::Hear),
            touch: self.filled(SenseKind::Touch),
            smell: self.filled(SenseKind::Smell),
            taste: self.filled(SenseKind::Taste),
        }
    }
}

/// Autosave and archive access for the grounding exercise.
pub struct SensesPad<S> {
    store: KeyedStore<S>,
}

impl<S: KeyValueStore> SensesPad<S> {
    pub fn new(backend: S) -> Self {
        Self {
            store: KeyedStore::new(backend),
        }
    }

    /// Saved list for `kind`, padded with blanks up to its target.
    pub fn load(&self, kind: SenseKind) -> Vec<String> {
        let mut items: Vec<String> = self.store.get(&kind.storage_key(), Vec::new());
        if items.len() < kind.target() {
            items.resize(kind.target(), String::new());
        }
        items
    }

    pub fn load_all(&self) -> SensesDraft {
        let mut draft = SensesDraft::default();
        for kind in SenseKind::ALL {
            *draft.items_mut(kind) = self.load(kind);
        }
        draft
    }

    /// Store every list trimmed with blanks removed.
    pub fn save(&self, draft: &SensesDraft) -> Result<()> {
        for kind in SenseKind::ALL {
            self.store.set(&kind.storage_key(), &draft.filled(kind))?;
        }
        Ok(())
    }

    /// Save the draft, then append it to the senses archive.
    pub fn save_to_archive(&self, draft: &SensesDraft, now: DateTime<Utc>) -> Result<SensesEntry> {
        self.save(draft)?;
        let entry = draft.to_entry(now);
        EntryArchive::new(self.store.backend()).append(&JournalEntry::Senses(entry.clone()))?;
        tracing::info!("saved grounding exercise to archive");
        Ok(entry)
    }

    /// Fresh blank draft. Nothing is written until the next save.
    pub fn reset(&self) -> SensesDraft {
        SensesDraft::blank()
    }
}
