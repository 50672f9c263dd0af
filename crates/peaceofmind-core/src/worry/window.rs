//! Worry window gate.
//!
//! The review board is only offered during a daily window. The gate state is
//! a pure function of wall-clock time and the saved window:
//!
//! ```text
//! BeforeWindow --(now >= start)--> Open --(now > end)--> AfterWindow
//! ```
//!
//! Both bounds are inclusive. [`WorryWindow`] wraps the pure evaluation with
//! persistence and the view-local "open anyway" override.

use std::time::Duration;

use chrono::{Local, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::cancel::CancelToken;
use crate::error::Result;
use crate::storage::{keys, KeyValueStore, KeyedStore};

pub const DEFAULT_DURATION_MINUTES: u32 = 15;
pub const MIN_DURATION_MINUTES: u32 = 5;
pub const POLL_INTERVAL: Duration = Duration::from_secs(30);

const START_FORMAT: &str = "%H:%M";

fn default_start() -> NaiveTime {
    NaiveTime::from_hms_opt(19, 0, 0).unwrap_or_default()
}

/// Clamp a requested length in minutes. Unparseable means default.
fn normalize_minutes(requested: f64) -> u32 {
    if !requested.is_finite() {
        return DEFAULT_DURATION_MINUTES;
    }
    let minutes = requested.round().max(f64::from(MIN_DURATION_MINUTES));
    minutes.min(f64::from(u32::MAX)) as u32
}

fn minutes_from_value(value: &Value) -> u32 {
    let requested = match value {
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => parse_minutes(s),
        _ => f64::NAN,
    };
    normalize_minutes(requested)
}

fn parse_minutes(input: &str) -> f64 {
    input.trim().parse().unwrap_or(f64::NAN)
}

/// Saved daily window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorryWindowConfig {
    #[serde(serialize_with = "serialize_start")]
    pub start_time: NaiveTime,
    pub duration_minutes: u32,
}

fn serialize_start<S: Serializer>(
    start: &NaiveTime,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&start.format(START_FORMAT).to_string())
}

/// Stored shape, tolerant of older key names and loosely typed values.
#[derive(Deserialize)]
struct StoredWindow {
    #[serde(default, rename = "startTime", alias = "start")]
    start_time: Option<Value>,
    #[serde(default, rename = "durationMinutes", alias = "durationMin")]
    duration_minutes: Option<Value>,
}

impl<'de> Deserialize<'de> for WorryWindowConfig {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let stored = StoredWindow::deserialize(deserializer)?;
        let start_time = stored
            .start_time
            .as_ref()
            .and_then(Value::as_str)
            .and_then(Self::parse_start)
            .unwrap_or_else(default_start);
        let duration_minutes = stored
            .duration_minutes
            .as_ref()
            .map_or(DEFAULT_DURATION_MINUTES, minutes_from_value);
        Ok(Self {
            start_time,
            duration_minutes,
        })
    }
}

impl Default for WorryWindowConfig {
    fn default() -> Self {
        Self {
            start_time: default_start(),
            duration_minutes: DEFAULT_DURATION_MINUTES,
        }
    }
}

impl WorryWindowConfig {
    pub fn new(start_time: NaiveTime, duration_minutes: i64) -> Self {
        Self {
            start_time,
            duration_minutes: normalize_minutes(duration_minutes as f64),
        }
    }

    /// Build from raw form input. A bad start falls back to 19:00.
    pub fn from_inputs(start: &str, duration: &str) -> Self {
        Self {
            start_time: Self::parse_start(start).unwrap_or_else(default_start),
            duration_minutes: Self::duration_from_input(duration),
        }
    }

    /// Parse `HH:MM` (seconds tolerated).
    pub fn parse_start(input: &str) -> Option<NaiveTime> {
        let trimmed = input.trim();
        NaiveTime::parse_from_str(trimmed, START_FORMAT)
            .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
            .ok()
    }

    /// Lenient minutes: non-numeric → 15, otherwise at least 5.
    pub fn duration_from_input(input: &str) -> u32 {
        normalize_minutes(parse_minutes(input))
    }

    /// Today's window bounds relative to `now`.
    pub fn bounds(&self, now: NaiveDateTime) -> (NaiveDateTime, NaiveDateTime) {
        let start = now.date().and_time(self.start_time);
        let end = start + chrono::Duration::minutes(i64::from(self.duration_minutes));
        (start, end)
    }

    pub fn evaluate(&self, now: NaiveDateTime) -> GateStatus {
        let (start, end) = self.bounds(now);
        let state = if now < start {
            GateState::BeforeWindow
        } else if now > end {
            GateState::AfterWindow
        } else {
            GateState::Open
        };
        GateStatus {
            state,
            start,
            end,
            duration_minutes: self.duration_minutes,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateState {
    BeforeWindow,
    Open,
    AfterWindow,
}

/// One evaluation of the gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GateStatus {
    pub state: GateState,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub duration_minutes: u32,
}

impl GateStatus {
    pub fn is_open(&self) -> bool {
        self.state == GateState::Open
    }

    /// Closed-notice text, `None` while open.
    pub fn message(&self) -> Option<String> {
        match self.state {
            GateState::Open => None,
            GateState::BeforeWindow => Some(format!(
                "Your worry window opens at {} for {}m.",
                self.start.format(START_FORMAT),
                self.duration_minutes
            )),
            GateState::AfterWindow => Some(format!(
                "Your worry window ended at {}.",
                self.end.format(START_FORMAT)
            )),
        }
    }
}

/// What the view should show after an evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GateView {
    pub status: GateStatus,
    /// Board shown despite a closed gate.
    pub overridden: bool,
}

impl GateView {
    pub fn board_visible(&self) -> bool {
        self.overridden || self.status.is_open()
    }

    pub fn notice(&self) -> Option<String> {
        if self.board_visible() {
            None
        } else {
            self.status.message()
        }
    }
}

/// Gate controller bound to the saved window.
pub struct WorryWindow<S> {
    store: KeyedStore<S>,
    fallback: WorryWindowConfig,
    open_override: bool,
}

impl<S: KeyValueStore> WorryWindow<S> {
    pub fn new(backend: S) -> Self {
        Self::with_fallback(backend, WorryWindowConfig::default())
    }

    /// `fallback` is used until a window has been saved.
    pub fn with_fallback(backend: S, fallback: WorryWindowConfig) -> Self {
        Self {
            store: KeyedStore::new(backend),
            fallback,
            open_override: false,
        }
    }

    pub fn config(&self) -> WorryWindowConfig {
        self.store.get(keys::WORRY_WINDOW_CFG, self.fallback)
    }

    /// Persist `config` and re-evaluate immediately.
    pub fn save_config(&mut self, config: WorryWindowConfig, now: NaiveDateTime) -> Result<GateView> {
        self.store.set(keys::WORRY_WINDOW_CFG, &config)?;
        tracing::info!(
            start = %config.start_time.format(START_FORMAT),
            minutes = config.duration_minutes,
            "saved worry window"
        );
        Ok(self.poll(now))
    }

    /// Natural re-evaluation. Clears any "open anyway" override.
    pub fn poll(&mut self, now: NaiveDateTime) -> GateView {
        self.open_override = false;
        self.view(now)
    }

    /// Show the board without touching the saved window or gate state.
    pub fn open_anyway(&mut self, now: NaiveDateTime) -> GateView {
        self.open_override = true;
        self.view(now)
    }

    pub fn view(&self, now: NaiveDateTime) -> GateView {
        let status = self.config().evaluate(now);
        GateView {
            overridden: self.open_override && !status.is_open(),
            status,
        }
    }

    /// Poll every `interval` until `cancel` fires, handing each view to
    /// `on_view`. The first poll happens immediately. Returns the number
    /// of polls made.
    pub async fn watch<C, F>(
        &mut self,
        interval: Duration,
        cancel: &CancelToken,
        mut clock: C,
        mut on_view: F,
    ) -> usize
    where
        C: FnMut() -> NaiveDateTime,
        F: FnMut(&GateView),
    {
        let mut ticker = tokio::time::interval(interval);
        let mut polls = 0;
        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    let view = self.poll(clock());
                    tracing::trace!(state = ?view.status.state, "gate polled");
                    on_view(&view);
                    polls += 1;
                }
            }
        }
        tracing::debug!(polls, "gate watch stopped");
        polls
    }
}

/// Current local wall-clock time, the clock used outside tests.
pub fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}
