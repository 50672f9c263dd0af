//! Archived journal entry shapes.
//!
//! Every entry is written with an explicit `kind` tag. Entries saved by
//! older builds carry no tag (and `ts` instead of `timestamp`); those are
//! classified by which fields they have, see [`JournalEntry::from_value`].

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::ValidationError;
use crate::storage::keys;

/// Archive category. Each one is an exclusive, append-only log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Senses,
    ReframesFast,
    Triage,
    Mood,
    WorryDecisions,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Senses,
        Category::ReframesFast,
        Category::Triage,
        Category::Mood,
        Category::WorryDecisions,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Senses => "senses",
            Category::ReframesFast => "reframes_fast",
            Category::Triage => "triage",
            Category::Mood => "mood",
            Category::WorryDecisions => "worry_decisions",
        }
    }

    /// Key of the persisted sequence for this category.
    pub fn storage_key(self) -> &'static str {
        match self {
            Category::Senses => keys::ARCHIVE_SENSES,
            Category::ReframesFast => keys::ARCHIVE_REFRAMES_FAST,
            Category::Triage => keys::ARCHIVE_TRIAGE,
            Category::Mood => keys::ARCHIVE_MOOD,
            Category::WorryDecisions => keys::ARCHIVE_WORRY_DECISIONS,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Senses => "Senses (5-4-3-2-1)",
            Category::ReframesFast => "Reframes (Fast)",
            Category::Triage => "Conversation Triage",
            Category::Mood => "Mood-Check Diary",
            Category::WorryDecisions => "Worry Decisions",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s.trim())
            .ok_or_else(|| ValidationError::InvalidValue {
                field: "category".into(),
                message: format!(
                    "unknown category '{s}' (expected one of: senses, reframes_fast, triage, mood, worry_decisions)"
                ),
            })
    }
}

/// Outcome chosen for a worry during review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    Important,
    #[serde(alias = "Let go")]
    LetGo,
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Important => f.write_str("Important"),
            Decision::LetGo => f.write_str("Let go"),
        }
    }
}

/// One reviewed worry inside a [`WorryDecision`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionItem {
    pub text: String,
    #[serde(alias = "ts")]
    pub timestamp: DateTime<Utc>,
    pub decision: Decision,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorryDecision {
    #[serde(alias = "ts")]
    pub timestamp: DateTime<Utc>,
    pub decisions: Vec<DecisionItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriageEntry {
    #[serde(alias = "ts")]
    pub timestamp: DateTime<Utc>,
    #[serde(default, with = "lenient_date", skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "blank_as_none", skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default)]
    pub facts: Vec<String>,
    #[serde(default)]
    pub evidence: String,
    #[serde(default, deserialize_with = "blank_as_none", skip_serializing_if = "Option::is_none")]
    pub lesson: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodEntry {
    #[serde(alias = "ts")]
    pub timestamp: DateTime<Utc>,
    #[serde(default, with = "local_minutes", skip_serializing_if = "Option::is_none")]
    pub datetime: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "blank_as_none", skip_serializing_if = "Option::is_none")]
    pub did: Option<String>,
    pub energy_before: u8,
    pub energy_after: u8,
    #[serde(default, deserialize_with = "blank_as_none", skip_serializing_if = "Option::is_none")]
    pub noticed: Option<String>,
    #[serde(default)]
    pub wins: Vec<String>,
    #[serde(default, deserialize_with = "blank_as_none", skip_serializing_if = "Option::is_none")]
    pub negative: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none", skip_serializing_if = "Option::is_none")]
    pub try_next: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensesEntry {
    #[serde(alias = "ts")]
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub see: Vec<String>,
    #[serde(default)]
    pub hear: Vec<String>,
    #[serde(default)]
    pub touch: Vec<String>,
    #[serde(default)]
    pub smell: Vec<String>,
    #[serde(default)]
    pub taste: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReframeEntry {
    #[serde(alias = "ts")]
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub fact: String,
    #[serde(default)]
    pub friend: String,
    #[serde(default)]
    pub worst: String,
}

/// A completed, immutable archive entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum JournalEntry {
    Senses(SensesEntry),
    Reframe(ReframeEntry),
    Triage(TriageEntry),
    Mood(MoodEntry),
    WorryDecision(WorryDecision),
}

impl JournalEntry {
    pub fn category(&self) -> Category {
        match self {
            JournalEntry::Senses(_) => Category::Senses,
            JournalEntry::Reframe(_) => Category::ReframesFast,
            JournalEntry::Triage(_) => Category::Triage,
            JournalEntry::Mood(_) => Category::Mood,
            JournalEntry::WorryDecision(_) => Category::WorryDecisions,
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            JournalEntry::Senses(e) => e.timestamp,
            JournalEntry::Reframe(e) => e.timestamp,
            JournalEntry::Triage(e) => e.timestamp,
            JournalEntry::Mood(e) => e.timestamp,
            JournalEntry::WorryDecision(e) => e.timestamp,
        }
    }

    /// Decode a stored value, tagged or legacy.
    ///
    /// Untagged values are classified in this order: `decisions` array,
    /// `facts` with `evidence`, both energies set, any sense list, `fact`
    /// with `friend`. Returns `None` when nothing matches or the matched
    /// shape fails to decode.
    pub fn from_value(value: &Value) -> Option<JournalEntry> {
        let obj = value.as_object()?;
        if obj.contains_key("kind") {
            return serde_json::from_value(value.clone()).ok();
        }

        let kind = legacy_kind(obj)?;
        let mut tagged = obj.clone();
        tagged.insert("kind".into(), Value::String(kind.into()));
        serde_json::from_value(Value::Object(tagged)).ok()
    }
}

fn legacy_kind(obj: &serde_json::Map<String, Value>) -> Option<&'static str> {
    if obj.get("decisions").is_some_and(Value::is_array) {
        return Some("worry_decision");
    }
    if truthy(obj.get("facts")) && obj.contains_key("evidence") {
        return Some("triage");
    }
    if truthy(obj.get("energyBefore")) && truthy(obj.get("energyAfter")) {
        return Some("mood");
    }
    if ["see", "hear", "touch", "smell", "taste"]
        .iter()
        .any(|sense| truthy(obj.get(*sense)))
    {
        return Some("senses");
    }
    if obj.contains_key("fact") && obj.contains_key("friend") {
        return Some("reframe");
    }
    None
}

/// Loose truthiness used for legacy shape detection: absent, null, false,
/// zero and the empty string are falsy; arrays and objects are truthy.
fn truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

/// Optional text where a blank string counts as absent.
fn blank_as_none<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    let raw = Option::<String>::deserialize(d)?;
    Ok(raw.filter(|s| !s.trim().is_empty()))
}

/// Trimmed string content of a stored date field, if any.
fn date_text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    let raw = Option::<Value>::deserialize(d)?;
    Ok(raw
        .as_ref()
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string))
}

/// `YYYY-MM-DD` form values. Cleared or unreadable dates read as absent.
mod lenient_date {
    use chrono::NaiveDate;
    use serde::{Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S: Serializer>(date: &Option<NaiveDate>, s: S) -> Result<S::Ok, S::Error> {
        match date {
            Some(date) => s.collect_str(&date.format(FORMAT)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
        Ok(super::date_text(d)?.and_then(|raw| NaiveDate::parse_from_str(&raw, FORMAT).ok()))
    }
}

/// `YYYY-MM-DDTHH:MM` local form values; seconds are tolerated on read.
/// Cleared or unreadable values read as absent.
mod local_minutes {
    use chrono::NaiveDateTime;
    use serde::{Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%dT%H:%M";
    const FORMAT_SECS: &str = "%Y-%m-%dT%H:%M:%S";

    pub fn serialize<S: Serializer>(dt: &Option<NaiveDateTime>, s: S) -> Result<S::Ok, S::Error> {
        match dt {
            Some(dt) => s.collect_str(&dt.format(FORMAT)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<Option<NaiveDateTime>, D::Error> {
        Ok(super::date_text(d)?.and_then(|raw| {
            NaiveDateTime::parse_from_str(&raw, FORMAT)
                .or_else(|_| NaiveDateTime::parse_from_str(&raw, FORMAT_SECS))
                .ok()
        }))
    }
}
