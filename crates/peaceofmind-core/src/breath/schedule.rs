use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Inhale,
    Hold,
    Exhale,
}

impl Phase {
    pub const CYCLE: [Phase; 3] = [Phase::Inhale, Phase::Hold, Phase::Exhale];

    pub fn label(self) -> &'static str {
        match self {
            Phase::Inhale => "Inhale",
            Phase::Hold => "Hold",
            Phase::Exhale => "Exhale",
        }
    }

    /// Scale the guide circle eases toward during this phase.
    /// `None` leaves the scale where it is.
    pub fn target_scale(self) -> Option<f64> {
        match self {
            Phase::Inhale => Some(1.25),
            Phase::Hold => None,
            Phase::Exhale => Some(0.85),
        }
    }

    pub fn next(self) -> Phase {
        match self {
            Phase::Inhale => Phase::Hold,
            Phase::Hold => Phase::Exhale,
            Phase::Exhale => Phase::Inhale,
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Phase lengths in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreathDurations {
    pub inhale: u32,
    pub hold: u32,
    pub exhale: u32,
}

impl Default for BreathDurations {
    fn default() -> Self {
        Self {
            inhale: 4,
            hold: 4,
            exhale: 6,
        }
    }
}

fn clamp_secs(secs: i64, min: u32) -> u32 {
    u32::try_from(secs.max(i64::from(min))).unwrap_or(u32::MAX)
}

/// Whole seconds from form input, `None` when blank or non-numeric.
fn parse_secs(input: &str) -> Option<i64> {
    let n: f64 = input.trim().parse().ok()?;
    n.is_finite().then(|| n.round() as i64)
}

impl BreathDurations {
    /// Inhale and exhale are at least one second; hold may be zero.
    pub fn new(inhale: i64, hold: i64, exhale: i64) -> Self {
        Self {
            inhale: clamp_secs(inhale, 1),
            hold: clamp_secs(hold, 0),
            exhale: clamp_secs(exhale, 1),
        }
    }

    /// Parse raw form input, substituting 4/4/6 for anything non-numeric.
    pub fn from_inputs(inhale: &str, hold: &str, exhale: &str) -> Self {
        let defaults = Self::default();
        Self::new(
            parse_secs(inhale).unwrap_or(i64::from(defaults.inhale)),
            parse_secs(hold).unwrap_or(i64::from(defaults.hold)),
            parse_secs(exhale).unwrap_or(i64::from(defaults.exhale)),
        )
    }

    pub fn seconds(&self, phase: Phase) -> u32 {
        match phase {
            Phase::Inhale => self.inhale,
            Phase::Hold => self.hold,
            Phase::Exhale => self.exhale,
        }
    }

    /// Ticks in one full cycle; each phase counts down to zero inclusive.
    pub fn ticks_per_cycle(&self) -> u64 {
        Phase::CYCLE
            .iter()
            .map(|p| u64::from(self.seconds(*p)) + 1)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimums_are_enforced() {
        let d = BreathDurations::new(0, -2, -5);
        assert_eq!((d.inhale, d.hold, d.exhale), (1, 0, 1));
    }

    #[test]
    fn non_numeric_input_uses_defaults() {
        let d = BreathDurations::from_inputs("abc", "", "x");
        assert_eq!(d, BreathDurations::default());
        let d = BreathDurations::from_inputs("5", "0", " 7 ");
        assert_eq!((d.inhale, d.hold, d.exhale), (5, 0, 7));
    }

    #[test]
    fn default_cycle_is_seventeen_ticks() {
        assert_eq!(BreathDurations::default().ticks_per_cycle(), 17);
    }

    #[test]
    fn phases_cycle() {
        assert_eq!(Phase::Exhale.next(), Phase::Inhale);
        assert_eq!(Phase::Hold.target_scale(), None);
        assert_eq!(Phase::Inhale.to_string(), "Inhale");
    }
}
