use serde_json::Value;

use super::entry::{Category, JournalEntry};
use super::render::render_value;
use crate::error::Result;
use crate::storage::{KeyValueStore, KeyedStore};

/// One stored archive item as read back from the namespace.
///
/// `raw` is exactly what was persisted; `entry` is its decoded form when
/// the value is a recognizable journal entry.
#[derive(Debug, Clone, PartialEq)]
pub struct ArchiveRecord {
    pub raw: Value,
    pub entry: Option<JournalEntry>,
}

impl ArchiveRecord {
    pub fn from_raw(raw: Value) -> Self {
        let entry = JournalEntry::from_value(&raw);
        Self { raw, entry }
    }

    pub fn from_entry(entry: &JournalEntry) -> Self {
        Self {
            raw: serde_json::to_value(entry).unwrap_or_default(),
            entry: Some(entry.clone()),
        }
    }

    pub fn render(&self) -> String {
        match &self.entry {
            Some(entry) => entry.render(),
            None => render_value(&self.raw),
        }
    }

    /// Case-insensitive substring match against the full serialized record.
    pub fn matches(&self, query: &str) -> bool {
        let needle = query.to_lowercase();
        if needle.is_empty() {
            return true;
        }
        serde_json::to_string(&self.raw)
            .map(|blob| blob.to_lowercase().contains(&needle))
            .unwrap_or(false)
    }
}

/// Append-only, per-category journal log.
pub struct EntryArchive<S> {
    store: KeyedStore<S>,
}

impl<S: KeyValueStore> EntryArchive<S> {
    pub fn new(backend: S) -> Self {
        Self {
            store: KeyedStore::new(backend),
        }
    }

    /// Raw persisted sequence for `category`, oldest first.
    fn load(&self, category: Category) -> Vec<Value> {
        self.store.get(category.storage_key(), Vec::new())
    }

    /// Append `entry` to the log of its category.
    ///
    /// Items already stored are written back untouched, including ones
    /// this build cannot decode.
    ///
    /// # Errors
    /// Returns an error if the backing store rejects the write.
    pub fn append(&self, entry: &JournalEntry) -> Result<()> {
        let category = entry.category();
        let mut items = self.load(category);
        items.push(serde_json::to_value(entry)?);
        self.store.set(category.storage_key(), &items)?;
        tracing::debug!(%category, len = items.len(), "appended archive entry");
        Ok(())
    }

    /// Records of `category`, most recently appended first, optionally
    /// filtered by `query`.
    pub fn list(&self, category: Category, query: Option<&str>) -> Vec<ArchiveRecord> {
        let query = query.unwrap_or_default();
        self.load(category)
            .into_iter()
            .rev()
            .map(ArchiveRecord::from_raw)
            .filter(|record| record.matches(query))
            .collect()
    }

    /// Decoded entries of `category`, most recent first.
    pub fn entries(&self, category: Category) -> Vec<JournalEntry> {
        self.list(category, None)
            .into_iter()
            .filter_map(|record| record.entry)
            .collect()
    }

    pub fn len(&self, category: Category) -> usize {
        self.load(category).len()
    }

    pub fn is_empty(&self, category: Category) -> bool {
        self.len(category) == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::entry::ReframeEntry;
    use crate::storage::MemoryStore;
    use chrono::{DateTime, Utc};

    fn reframe(fact: &str) -> JournalEntry {
        let ts: DateTime<Utc> = "2025-01-05T09:00:00Z".parse().unwrap();
        JournalEntry::Reframe(ReframeEntry {
            timestamp: ts,
            fact: fact.into(),
            friend: "they are swamped".into(),
            worst: "I'd be fine".into(),
        })
    }

    #[test]
    fn list_is_reverse_append_order() {
        let archive = EntryArchive::new(MemoryStore::new());
        for fact in ["A", "B", "C"] {
            archive.append(&reframe(fact)).unwrap();
        }
        let facts: Vec<String> = archive
            .entries(Category::ReframesFast)
            .into_iter()
            .map(|e| match e {
                JournalEntry::Reframe(r) => r.fact,
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(facts, vec!["C", "B", "A"]);
    }

    #[test]
    fn categories_are_disjoint() {
        let archive = EntryArchive::new(MemoryStore::new());
        archive.append(&reframe("A")).unwrap();
        assert_eq!(archive.len(Category::ReframesFast), 1);
        assert!(archive.is_empty(Category::Mood));
    }

    #[test]
    fn filter_is_case_insensitive_over_every_field() {
        let archive = EntryArchive::new(MemoryStore::new());
        archive.append(&reframe("Missed the bus")).unwrap();
        archive.append(&reframe("Late reply")).unwrap();

        assert_eq!(archive.list(Category::ReframesFast, Some("BUS")).len(), 1);
        // `friend` is identical on both entries.
        assert_eq!(archive.list(Category::ReframesFast, Some("SWAMPED")).len(), 2);
        assert_eq!(archive.list(Category::ReframesFast, Some("")).len(), 2);
        assert!(archive.list(Category::ReframesFast, Some("zebra")).is_empty());
    }

    #[test]
    fn filter_matches_field_names_too() {
        let archive = EntryArchive::new(MemoryStore::new());
        archive.append(&reframe("x")).unwrap();
        assert_eq!(archive.list(Category::ReframesFast, Some("worst")).len(), 1);
    }

    #[test]
    fn undecodable_items_survive_append() {
        let mem = MemoryStore::new();
        mem.kv_set("archive_reframes_fast", r#"[{"mystery": true}]"#)
            .unwrap();
        let archive = EntryArchive::new(&mem);
        archive.append(&reframe("new")).unwrap();

        let records = archive.list(Category::ReframesFast, None);
        assert_eq!(records.len(), 2);
        assert!(records[0].entry.is_some());
        assert!(records[1].entry.is_none());
        assert_eq!(records[1].raw["mystery"], true);
    }

    #[test]
    fn corrupt_category_lists_empty() {
        let mem = MemoryStore::new();
        mem.kv_set("archive_mood", "not json").unwrap();
        let archive = EntryArchive::new(&mem);
        assert!(archive.list(Category::Mood, None).is_empty());
    }
}
