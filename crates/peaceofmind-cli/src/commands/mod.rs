pub mod archive;
pub mod breath;
pub mod config;
pub mod log;
pub mod senses;
pub mod window;
pub mod worry;

use peaceofmind_core::{Config, Database, WorryWindow};

/// Gate controller with the configured first-run window as fallback.
pub(crate) fn worry_window(db: &Database) -> WorryWindow<&Database> {
    let config = Config::load_or_default();
    WorryWindow::with_fallback(db, config.default_window())
}

/// Single-threaded runtime for the commands that wait on timers.
pub(crate) fn runtime() -> std::io::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
}
