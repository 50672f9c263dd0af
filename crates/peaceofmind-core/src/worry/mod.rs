//! Worry capture, the daily review window, and review staging.

mod inbox;
mod review;
mod window;

pub use inbox::{Selection, Worry, WorryInbox};
pub use review::ReviewBoard;
pub use window::{
    local_now, GateState, GateStatus, GateView, WorryWindow, WorryWindowConfig,
    DEFAULT_DURATION_MINUTES, MIN_DURATION_MINUTES, POLL_INTERVAL,
};
