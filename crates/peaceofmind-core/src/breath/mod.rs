mod pacer;
mod schedule;

pub use pacer::{
    BreathPacer, PacerCursor, PacerEvent, PacerOutcome, PacerTick, DEFAULT_TICK, REST_SCALE,
};
pub use schedule::{BreathDurations, Phase};
