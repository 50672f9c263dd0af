//! Exercise form input to archive entry conversion.
//!
//! Forms hold raw user input. Converting one never fails: text is trimmed,
//! blank optional fields are dropped, list fields keep only non-empty
//! items, and numeric fields are clamped or defaulted.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, Timelike, Utc};

use super::entry::{JournalEntry, MoodEntry, ReframeEntry, TriageEntry};

const MAX_FACTS: usize = 3;
const MAX_WINS: usize = 3;
const ENERGY_MIN: i64 = 1;
const ENERGY_MAX: i64 = 10;
const ENERGY_DEFAULT: u8 = 5;

/// Conversation triage form.
#[derive(Debug, Clone, Default)]
pub struct TriageForm {
    /// Defaults to today's local date.
    pub date: Option<NaiveDate>,
    pub tag: String,
    pub facts: Vec<String>,
    pub evidence: String,
    pub lesson: String,
}

impl TriageForm {
    pub fn into_entry(self, now: DateTime<Utc>) -> JournalEntry {
        JournalEntry::Triage(TriageEntry {
            timestamp: now,
            date: Some(
                self.date
                    .unwrap_or_else(|| now.with_timezone(&Local).date_naive()),
            ),
            tag: non_blank(&self.tag),
            facts: non_empty_items(&self.facts, MAX_FACTS),
            evidence: self.evidence.trim().to_string(),
            lesson: non_blank(&self.lesson),
        })
    }
}

/// Mood-check diary form.
#[derive(Debug, Clone, Default)]
pub struct MoodForm {
    /// Defaults to the current local time, truncated to the minute.
    pub datetime: Option<NaiveDateTime>,
    pub did: String,
    /// Raw slider/text input; see [`parse_energy`].
    pub energy_before: String,
    pub energy_after: String,
    pub noticed: String,
    pub wins: Vec<String>,
    pub negative: String,
    pub try_next: String,
}

impl MoodForm {
    pub fn into_entry(self, now: DateTime<Utc>) -> JournalEntry {
        let datetime = self.datetime.unwrap_or_else(|| {
            let local = now.with_timezone(&Local).naive_local();
            local
                .with_second(0)
                .and_then(|dt| dt.with_nanosecond(0))
                .unwrap_or(local)
        });
        JournalEntry::Mood(MoodEntry {
            timestamp: now,
            datetime: Some(datetime),
            did: non_blank(&self.did),
            energy_before: parse_energy(&self.energy_before),
            energy_after: parse_energy(&self.energy_after),
            noticed: non_blank(&self.noticed),
            wins: non_empty_items(&self.wins, MAX_WINS),
            negative: non_blank(&self.negative),
            try_next: non_blank(&self.try_next),
        })
    }
}

/// Fast cognitive reframe form.
#[derive(Debug, Clone, Default)]
pub struct ReframeForm {
    pub fact: String,
    pub friend: String,
    pub worst: String,
}

impl ReframeForm {
    pub fn into_entry(self, now: DateTime<Utc>) -> JournalEntry {
        JournalEntry::Reframe(ReframeEntry {
            timestamp: now,
            fact: self.fact.trim().to_string(),
            friend: self.friend.trim().to_string(),
            worst: self.worst.trim().to_string(),
        })
    }
}

/// Energy level from raw input, clamped to 1..=10; non-numeric input is 5.
pub fn parse_energy(raw: &str) -> u8 {
    match raw.trim().parse::<f64>() {
        Ok(n) if n.is_finite() => n.round().clamp(ENERGY_MIN as f64, ENERGY_MAX as f64) as u8,
        _ => ENERGY_DEFAULT,
    }
}

fn non_blank(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn non_empty_items(items: &[String], max: usize) -> Vec<String> {
    items
        .iter()
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .take(max)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        "2025-04-02T08:30:00Z".parse().unwrap()
    }

    #[test]
    fn energy_is_clamped_and_defaulted() {
        assert_eq!(parse_energy("7"), 7);
        assert_eq!(parse_energy("0"), 1);
        assert_eq!(parse_energy("42"), 10);
        assert_eq!(parse_energy("-3"), 1);
        assert_eq!(parse_energy("6.6"), 7);
        assert_eq!(parse_energy("tired"), 5);
        assert_eq!(parse_energy(""), 5);
    }

    #[test]
    fn triage_keeps_three_trimmed_facts() {
        let form = TriageForm {
            date: NaiveDate::from_ymd_opt(2025, 4, 1),
            tag: "  ".into(),
            facts: vec![" a ".into(), "".into(), "b".into(), "c".into(), "d".into()],
            evidence: " smiled ".into(),
            lesson: "ask".into(),
        };
        let JournalEntry::Triage(entry) = form.into_entry(now()) else {
            panic!("expected triage");
        };
        assert_eq!(entry.facts, vec!["a", "b", "c"]);
        assert_eq!(entry.tag, None);
        assert_eq!(entry.evidence, "smiled");
        assert_eq!(entry.lesson.as_deref(), Some("ask"));
        assert_eq!(entry.timestamp, now());
    }

    #[test]
    fn mood_drops_blank_optionals() {
        let form = MoodForm {
            datetime: None,
            did: "gym".into(),
            energy_before: "3".into(),
            energy_after: "abc".into(),
            noticed: " ".into(),
            wins: vec!["called mom".into(), " ".into()],
            negative: String::new(),
            try_next: "sleep early".into(),
        };
        let JournalEntry::Mood(entry) = form.into_entry(now()) else {
            panic!("expected mood");
        };
        assert_eq!(entry.did.as_deref(), Some("gym"));
        assert_eq!((entry.energy_before, entry.energy_after), (3, 5));
        assert_eq!(entry.noticed, None);
        assert_eq!(entry.wins, vec!["called mom"]);
        assert_eq!(entry.negative, None);
        assert_eq!(entry.datetime.map(|dt| dt.second()), Some(0));
    }

    #[test]
    fn reframe_trims_but_keeps_blanks() {
        let form = ReframeForm {
            fact: " left on read ".into(),
            friend: String::new(),
            worst: "I can cope".into(),
        };
        let JournalEntry::Reframe(entry) = form.into_entry(now()) else {
            panic!("expected reframe");
        };
        assert_eq!(entry.fact, "left on read");
        assert_eq!(entry.friend, "");
    }
}
