//! Worry inbox: short captured worries awaiting review.
//!
//! The inbox is kept most-recent-first. Items leave it either one at a
//! time (`remove`), all at once (`clear_all`) or through `commit`, which
//! moves reviewed items into a `WorryDecision` archive entry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::archive::{Decision, DecisionItem, EntryArchive, JournalEntry, WorryDecision};
use crate::error::{Result, ValidationError};
use crate::storage::{keys, KeyValueStore, KeyedStore};

/// A captured worry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Worry {
    /// Stable identity; items stored without one get a fresh id on read.
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub text: String,
    #[serde(alias = "ts")]
    pub timestamp: DateTime<Utc>,
}

/// A reviewed worry staged for [`WorryInbox::commit`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    /// Inbox item this selection came from, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub text: String,
    pub decision: Decision,
    pub timestamp: DateTime<Utc>,
}

impl Selection {
    /// Selection matched against the inbox by text only.
    pub fn new(text: impl Into<String>, decision: Decision, at: DateTime<Utc>) -> Self {
        Self {
            id: None,
            text: text.into(),
            decision,
            timestamp: at,
        }
    }

    /// Selection bound to a specific inbox item.
    pub fn for_item(item: &Worry, decision: Decision, at: DateTime<Utc>) -> Self {
        Self {
            id: Some(item.id),
            text: item.text.clone(),
            decision,
            timestamp: at,
        }
    }

    fn position_in(&self, items: &[Worry]) -> Option<usize> {
        self.id
            .and_then(|id| items.iter().position(|w| w.id == id))
            .or_else(|| items.iter().position(|w| w.text == self.text))
    }
}

pub struct WorryInbox<S> {
    store: KeyedStore<S>,
}

impl<S: KeyValueStore> WorryInbox<S> {
    pub fn new(backend: S) -> Self {
        Self {
            store: KeyedStore::new(backend),
        }
    }

    /// Current items, most recent first.
    pub fn items(&self) -> Vec<Worry> {
        self.store.get(keys::WORRY_INBOX, Vec::new())
    }

    pub fn count(&self) -> usize {
        self.items().len()
    }

    fn save(&self, items: &[Worry]) -> Result<()> {
        self.store.set(keys::WORRY_INBOX, items)
    }

    fn out_of_bounds(index: usize, len: usize) -> ValidationError {
        ValidationError::OutOfBounds {
            collection: keys::WORRY_INBOX.into(),
            index,
            len,
        }
    }

    pub fn add(&self, text: &str) -> Result<Option<Worry>> {
        self.add_at(text, Utc::now())
    }

    /// Prepend a trimmed worry. Blank text is ignored and nothing is written.
    pub fn add_at(&self, text: &str, at: DateTime<Utc>) -> Result<Option<Worry>> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }

        let worry = Worry {
            id: Uuid::new_v4(),
            text: trimmed.to_string(),
            timestamp: at,
        };
        let mut items = self.items();
        items.insert(0, worry.clone());
        self.save(&items)?;
        tracing::debug!(count = items.len(), "added worry");
        Ok(Some(worry))
    }

    /// Replace the text at `index`, keeping its id and timestamp.
    pub fn edit(&self, index: usize, text: &str) -> Result<()> {
        let mut items = self.items();
        let len = items.len();
        let item = items
            .get_mut(index)
            .ok_or_else(|| Self::out_of_bounds(index, len))?;
        item.text = text.to_string();
        self.save(&items)
    }

    pub fn remove(&self, index: usize) -> Result<Worry> {
        let mut items = self.items();
        if index >= items.len() {
            return Err(Self::out_of_bounds(index, items.len()).into());
        }
        let removed = items.remove(index);
        self.save(&items)?;
        Ok(removed)
    }

    /// Empty the inbox. Callers confirm with the user first.
    pub fn clear_all(&self) -> Result<()> {
        self.save(&[])?;
        tracing::info!("cleared worry inbox");
        Ok(())
    }

    pub fn commit(&self, selections: &[Selection]) -> Result<Option<WorryDecision>> {
        self.commit_at(selections, Utc::now())
    }

    /// Move reviewed worries out of the inbox into one archived decision.
    ///
    /// Each selection removes at most one inbox item: the one with its id,
    /// else the first with identical text. Selections with no remaining
    /// match remove nothing but are still recorded. An empty slice writes
    /// nothing and returns `None`.
    pub fn commit_at(
        &self,
        selections: &[Selection],
        at: DateTime<Utc>,
    ) -> Result<Option<WorryDecision>> {
        if selections.is_empty() {
            return Ok(None);
        }

        let mut items = self.items();
        let mut removed = 0usize;
        for selection in selections {
            if let Some(pos) = selection.position_in(&items) {
                items.remove(pos);
                removed += 1;
            }
        }
        self.save(&items)?;

        let decision = WorryDecision {
            timestamp: at,
            decisions: selections
                .iter()
                .map(|s| DecisionItem {
                    text: s.text.clone(),
                    timestamp: s.timestamp,
                    decision: s.decision,
                })
                .collect(),
        };
        EntryArchive::new(self.store.backend())
            .append(&JournalEntry::WorryDecision(decision.clone()))?;

        tracing::info!(
            selections = selections.len(),
            removed,
            remaining = items.len(),
            "committed worry decisions"
        );
        Ok(Some(decision))
    }
}
