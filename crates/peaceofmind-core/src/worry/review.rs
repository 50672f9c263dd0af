//! Review board staging: pick inbox items, mark them, then commit.
//!
//! Purely view-local state; nothing here is persisted until `commit`.

use chrono::{DateTime, Utc};

use super::inbox::{Selection, WorryInbox};
use crate::archive::{Decision, WorryDecision};
use crate::error::Result;
use crate::storage::KeyValueStore;

#[derive(Debug, Clone, Default)]
pub struct ReviewBoard {
    selected: Option<usize>,
    staged: Vec<Selection>,
}

impl ReviewBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, index: usize) {
        self.selected = Some(index);
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn staged(&self) -> &[Selection] {
        &self.staged
    }

    pub fn mark<S: KeyValueStore>(
        &mut self,
        inbox: &WorryInbox<S>,
        decision: Decision,
    ) -> Option<&Selection> {
        self.mark_at(inbox, decision, Utc::now())
    }

    /// Stage the selected inbox item with `decision`.
    ///
    /// No-op when nothing is selected or the selection no longer points at
    /// an item.
    pub fn mark_at<S: KeyValueStore>(
        &mut self,
        inbox: &WorryInbox<S>,
        decision: Decision,
        at: DateTime<Utc>,
    ) -> Option<&Selection> {
        let index = self.selected?;
        let item = inbox.items().into_iter().nth(index)?;
        self.staged.push(Selection::for_item(&item, decision, at));
        self.staged.last()
    }

    pub fn unmark(&mut self, index: usize) -> Option<Selection> {
        (index < self.staged.len()).then(|| self.staged.remove(index))
    }

    /// Commit everything staged, then reset the board.
    pub fn commit<S: KeyValueStore>(
        &mut self,
        inbox: &WorryInbox<S>,
    ) -> Result<Option<WorryDecision>> {
        let decision = inbox.commit(&self.staged)?;
        if decision.is_some() {
            self.staged.clear();
            self.selected = None;
        }
        Ok(decision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn mark_requires_a_valid_selection() {
        let inbox = WorryInbox::new(MemoryStore::new());
        inbox.add("only").unwrap();
        let mut board = ReviewBoard::new();
        assert!(board.mark(&inbox, Decision::Important).is_none());
        board.select(5);
        assert!(board.mark(&inbox, Decision::Important).is_none());
        assert!(board.staged().is_empty());
    }

    #[test]
    fn staged_items_commit_and_reset() {
        let inbox = WorryInbox::new(MemoryStore::new());
        inbox.add("deadline").unwrap();
        inbox.add("noise upstairs").unwrap();

        let mut board = ReviewBoard::new();
        board.select(0);
        let staged = board.mark(&inbox, Decision::LetGo).cloned().unwrap();
        assert_eq!(staged.text, "noise upstairs");
        board.select(1);
        board.mark(&inbox, Decision::Important);
        assert_eq!(board.staged().len(), 2);

        let decision = board.commit(&inbox).unwrap().unwrap();
        assert_eq!(decision.decisions.len(), 2);
        assert_eq!(inbox.count(), 0);
        assert!(board.staged().is_empty());
        assert_eq!(board.selected(), None);
    }

    #[test]
    fn unmark_drops_one_staged_item() {
        let inbox = WorryInbox::new(MemoryStore::new());
        inbox.add("a").unwrap();
        let mut board = ReviewBoard::new();
        board.select(0);
        board.mark(&inbox, Decision::Important);
        assert!(board.unmark(3).is_none());
        assert!(board.unmark(0).is_some());
        assert!(board.commit(&inbox).unwrap().is_none());
        assert_eq!(inbox.count(), 1);
    }
}
