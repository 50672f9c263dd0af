//! Human-readable archive rendering.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

use super::entry::{
    JournalEntry, MoodEntry, ReframeEntry, SensesEntry, TriageEntry, WorryDecision,
};
use super::store::ArchiveRecord;

const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M";
const EMPTY_LISTING: &str = "No entries yet.";

impl JournalEntry {
    /// Category-specific multi-line text.
    pub fn render(&self) -> String {
        match self {
            JournalEntry::WorryDecision(e) => render_decisions(e),
            JournalEntry::Triage(e) => render_triage(e),
            JournalEntry::Mood(e) => render_mood(e),
            JournalEntry::Senses(e) => render_senses(e),
            JournalEntry::Reframe(e) => render_reframe(e),
        }
    }
}

fn render_decisions(entry: &WorryDecision) -> String {
    entry
        .decisions
        .iter()
        .map(|d| format!("• {} — {}", d.text, d.decision))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_triage(entry: &TriageEntry) -> String {
    let mut lines = Vec::new();
    if let Some(date) = entry.date {
        lines.push(format!("Date: {date}"));
    }
    push_labeled(&mut lines, "Tag", entry.tag.as_deref());
    lines.push(if entry.facts.is_empty() {
        "Facts: (none)".to_string()
    } else {
        format!("Facts:\n{}", bullets(&entry.facts))
    });
    lines.push(if entry.evidence.is_empty() {
        "Evidence: (none)".to_string()
    } else {
        format!("Evidence: {}", entry.evidence)
    });
    push_labeled(&mut lines, "Lesson/Next", entry.lesson.as_deref());
    lines.join("\n")
}

fn render_mood(entry: &MoodEntry) -> String {
    let mut lines = Vec::new();
    if let Some(datetime) = entry.datetime {
        lines.push(format!("When: {}", datetime.format("%Y-%m-%dT%H:%M")));
    }
    push_labeled(&mut lines, "Did", entry.did.as_deref());
    lines.push(format!(
        "Energy: {} → {}",
        entry.energy_before, entry.energy_after
    ));
    push_labeled(&mut lines, "Noticed", entry.noticed.as_deref());
    if !entry.wins.is_empty() {
        lines.push(format!("Wins:\n{}", bullets(&entry.wins)));
    }
    push_labeled(&mut lines, "Negative", entry.negative.as_deref());
    push_labeled(&mut lines, "Try next", entry.try_next.as_deref());
    lines.join("\n")
}

fn render_senses(entry: &SensesEntry) -> String {
    [
        ("See", &entry.see),
        ("Hear", &entry.hear),
        ("Touch", &entry.touch),
        ("Smell", &entry.smell),
        ("Taste", &entry.taste),
    ]
    .into_iter()
    .filter(|(_, items)| !items.is_empty())
    .map(|(label, items)| format!("{label}: {}", items.join(", ")))
    .collect::<Vec<_>>()
    .join("\n")
}

fn render_reframe(entry: &ReframeEntry) -> String {
    [
        ("Fact", &entry.fact),
        ("Friend", &entry.friend),
        ("Worst", &entry.worst),
    ]
    .into_iter()
    .map(|(label, text)| {
        if text.is_empty() {
            format!("{label}: (blank)")
        } else {
            format!("{label}: {text}")
        }
    })
    .collect::<Vec<_>>()
    .join("\n")
}

fn push_labeled(lines: &mut Vec<String>, label: &str, value: Option<&str>) {
    if let Some(value) = value.filter(|v| !v.is_empty()) {
        lines.push(format!("{label}: {value}"));
    }
}

fn bullets(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("  - {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Generic structured dump for values no renderer recognizes.
pub fn render_value(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// When an entry happened, in local time, for the card header.
pub fn display_time(record: &ArchiveRecord) -> Option<String> {
    if let Some(entry) = &record.entry {
        return Some(format_local(entry.timestamp()));
    }

    let obj = record.raw.as_object()?;
    for key in ["timestamp", "ts"] {
        if let Some(ts) = obj
            .get(key)
            .and_then(Value::as_str)
            .and_then(|s| s.parse::<DateTime<Utc>>().ok())
        {
            return Some(format_local(ts));
        }
    }
    if let Some(dt) = obj
        .get("datetime")
        .and_then(Value::as_str)
        .and_then(|s| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M").ok())
    {
        return Some(dt.format(DISPLAY_FORMAT).to_string());
    }
    obj.get("date")
        .and_then(Value::as_str)
        .and_then(|s| s.parse::<NaiveDate>().ok())
        .map(|d| d.to_string())
}

fn format_local(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format(DISPLAY_FORMAT).to_string()
}

/// One archive card: time header followed by the rendered body.
pub fn render_card(record: &ArchiveRecord) -> String {
    let body = record.render();
    match display_time(record) {
        Some(when) => format!("[{when}]\n{body}"),
        None => body,
    }
}

/// Cards separated by blank lines, or a placeholder for an empty listing.
pub fn render_listing(records: &[ArchiveRecord]) -> String {
    if records.is_empty() {
        return EMPTY_LISTING.to_string();
    }
    records
        .iter()
        .map(render_card)
        .collect::<Vec<_>>()
        .join("\n\n")
}
