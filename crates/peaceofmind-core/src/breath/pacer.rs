//! Breathing pacer.
//!
//! [`PacerCursor`] is the pure tick sequence: every phase counts down from
//! its length to zero inclusive, then the next phase begins. [`BreathPacer`]
//! drives a cursor in real time and stops when its [`CancelToken`] fires.
//!
//! ```text
//! Inhale (n..=0) -> Hold (n..=0) -> Exhale (n..=0) -> [scale reset] -> Inhale ...
//! ```

use std::time::Duration;

use serde::Serialize;

use super::schedule::{BreathDurations, Phase};
use crate::cancel::CancelToken;

pub const DEFAULT_TICK: Duration = Duration::from_secs(1);
pub const REST_SCALE: f64 = 1.0;

/// One step of the countdown.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PacerTick {
    pub phase: Phase,
    /// Seconds left in the phase, shown as the countdown.
    pub remaining: u32,
    /// Guide scale for this tick, when the phase animates it.
    pub scale: Option<f64>,
    pub phase_start: bool,
    pub cycle_end: bool,
}

/// Infinite tick sequence for a set of durations.
#[derive(Debug, Clone)]
pub struct PacerCursor {
    durations: BreathDurations,
    phase: Phase,
    remaining: u32,
    phase_start: bool,
}

impl PacerCursor {
    pub fn new(durations: BreathDurations) -> Self {
        Self {
            durations,
            phase: Phase::Inhale,
            remaining: durations.inhale,
            phase_start: true,
        }
    }

    fn scale_at(phase: Phase, seconds: u32, remaining: u32) -> Option<f64> {
        let target = phase.target_scale()?;
        if seconds == 0 {
            return None;
        }
        let progress = 1.0 - f64::from(remaining) / f64::from(seconds);
        Some(REST_SCALE + (target - REST_SCALE) * progress)
    }
}

impl Iterator for PacerCursor {
    type Item = PacerTick;

    fn next(&mut self) -> Option<PacerTick> {
        let seconds = self.durations.seconds(self.phase);
        let tick = PacerTick {
            phase: self.phase,
            remaining: self.remaining,
            scale: Self::scale_at(self.phase, seconds, self.remaining),
            phase_start: self.phase_start,
            cycle_end: self.phase == Phase::Exhale && self.remaining == 0,
        };

        if self.remaining == 0 {
            self.phase = self.phase.next();
            self.remaining = self.durations.seconds(self.phase);
            self.phase_start = true;
        } else {
            self.remaining -= 1;
            self.phase_start = false;
        }
        Some(tick)
    }
}

/// What the pacer reports to its display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PacerEvent {
    PhaseStarted { phase: Phase },
    Tick(PacerTick),
    /// Exhale finished; the guide returns to rest scale.
    CycleCompleted { cycles: u64 },
    Paused,
}

impl PacerEvent {
    /// Label the display shows for this event, if it changes it.
    pub fn label(&self) -> Option<&'static str> {
        match self {
            PacerEvent::PhaseStarted { phase } => Some(phase.label()),
            PacerEvent::Paused => Some("Paused"),
            _ => None,
        }
    }
}

/// Terminal status of a pacer run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PacerOutcome {
    Paused { cycles_completed: u64, ticks: u64 },
}

#[derive(Debug, Clone)]
pub struct BreathPacer {
    durations: BreathDurations,
    tick: Duration,
}

impl BreathPacer {
    pub fn new(durations: BreathDurations) -> Self {
        Self {
            durations,
            tick: DEFAULT_TICK,
        }
    }

    pub fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = tick;
        self
    }

    pub fn durations(&self) -> BreathDurations {
        self.durations
    }

    /// Run cycles until `cancel` fires, reporting every event.
    ///
    /// Cancellation is checked before every tick and observed while
    /// waiting between ticks, so the loop ends within one tick. A final
    /// [`PacerEvent::Paused`] is always emitted.
    pub async fn run<F>(&self, cancel: &CancelToken, mut on_event: F) -> PacerOutcome
    where
        F: FnMut(PacerEvent),
    {
        let mut cycles_completed = 0u64;
        let mut ticks = 0u64;
        tracing::debug!(durations = ?self.durations, "breath pacer started");

        for tick in PacerCursor::new(self.durations) {
            if cancel.is_cancelled() {
                break;
            }
            if tick.phase_start {
                on_event(PacerEvent::PhaseStarted { phase: tick.phase });
            }
            on_event(PacerEvent::Tick(tick));
            ticks += 1;

            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(self.tick) => {}
            }

            if tick.cycle_end {
                cycles_completed += 1;
                on_event(PacerEvent::CycleCompleted {
                    cycles: cycles_completed,
                });
            }
        }

        on_event(PacerEvent::Paused);
        tracing::debug!(cycles_completed, ticks, "breath pacer paused");
        PacerOutcome::Paused {
            cycles_completed,
            ticks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Option<f64>, b: f64) -> bool {
        a.is_some_and(|a| (a - b).abs() < 1e-9)
    }

    #[test]
    fn default_cycle_shape() {
        let ticks: Vec<PacerTick> = PacerCursor::new(BreathDurations::default())
            .take(18)
            .collect();

        let inhale: Vec<u32> = ticks[..5].iter().map(|t| t.remaining).collect();
        assert_eq!(inhale, vec![4, 3, 2, 1, 0]);
        assert!(ticks[..5].iter().all(|t| t.phase == Phase::Inhale));
        assert!(ticks[5..10].iter().all(|t| t.phase == Phase::Hold));
        assert!(ticks[10..17].iter().all(|t| t.phase == Phase::Exhale));
        assert_eq!(ticks[10].remaining, 6);

        assert!(ticks[16].cycle_end);
        assert_eq!(ticks.iter().filter(|t| t.cycle_end).count(), 1);
        assert!(ticks[17].phase_start);
        assert_eq!(ticks[17].phase, Phase::Inhale);
    }

    #[test]
    fn scale_interpolates_toward_target() {
        let ticks: Vec<PacerTick> = PacerCursor::new(BreathDurations::default())
            .take(17)
            .collect();
        assert!(close(ticks[0].scale, 1.0));
        assert!(close(ticks[2].scale, 1.125));
        assert!(close(ticks[4].scale, 1.25));
        assert!(ticks[5..10].iter().all(|t| t.scale.is_none()));
        assert!(close(ticks[10].scale, 1.0));
        assert!(close(ticks[16].scale, 0.85));
    }

    #[test]
    fn zero_hold_is_a_single_tick() {
        let durations = BreathDurations::new(1, 0, 1);
        assert_eq!(durations.ticks_per_cycle(), 5);
        let phases: Vec<(Phase, u32)> = PacerCursor::new(durations)
            .take(5)
            .map(|t| (t.phase, t.remaining))
            .collect();
        assert_eq!(
            phases,
            vec![
                (Phase::Inhale, 1),
                (Phase::Inhale, 0),
                (Phase::Hold, 0),
                (Phase::Exhale, 1),
                (Phase::Exhale, 0),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_pauses_within_one_tick() {
        let pacer = BreathPacer::new(BreathDurations::default());
        let cancel = CancelToken::new();
        let started = tokio::time::Instant::now();
        {
            let cancel = cancel.clone();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(2500)).await;
                cancel.cancel();
            });
        }

        let mut events = Vec::new();
        let outcome = pacer.run(&cancel, |e| events.push(e)).await;

        assert_eq!(started.elapsed(), Duration::from_millis(2500));
        assert_eq!(
            outcome,
            PacerOutcome::Paused {
                cycles_completed: 0,
                ticks: 3
            }
        );
        assert_eq!(
            events.first(),
            Some(&PacerEvent::PhaseStarted {
                phase: Phase::Inhale
            })
        );
        assert_eq!(events.last(), Some(&PacerEvent::Paused));
        let countdown: Vec<u32> = events
            .iter()
            .filter_map(|e| match e {
                PacerEvent::Tick(t) => Some(t.remaining),
                _ => None,
            })
            .collect();
        assert_eq!(countdown, vec![4, 3, 2]);
    }

    #[tokio::test(start_paused = true)]
    async fn completed_cycle_is_reported() {
        let pacer = BreathPacer::new(BreathDurations::new(1, 0, 1))
            .with_tick(Duration::from_millis(100));
        let cancel = CancelToken::new();
        {
            let cancel = cancel.clone();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(550)).await;
                cancel.cancel();
            });
        }

        let mut events = Vec::new();
        let outcome = pacer.run(&cancel, |e| events.push(e)).await;
        assert_eq!(
            outcome,
            PacerOutcome::Paused {
                cycles_completed: 1,
                ticks: 6
            }
        );
        assert!(events.contains(&PacerEvent::CycleCompleted { cycles: 1 }));
        let labels: Vec<&str> = events.iter().filter_map(PacerEvent::label).collect();
        assert_eq!(labels, vec!["Inhale", "Hold", "Exhale", "Inhale", "Paused"]);
    }

    #[tokio::test]
    async fn already_cancelled_token_pauses_immediately() {
        let cancel = CancelToken::new();
        cancel.cancel();
        let mut events = Vec::new();
        let outcome = BreathPacer::new(BreathDurations::default())
            .run(&cancel, |e| events.push(e))
            .await;
        assert_eq!(events, vec![PacerEvent::Paused]);
        assert_eq!(
            outcome,
            PacerOutcome::Paused {
                cycles_completed: 0,
                ticks: 0
            }
        );
    }
}
