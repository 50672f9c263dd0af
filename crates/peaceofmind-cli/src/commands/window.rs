use clap::Subcommand;
use peaceofmind_core::error::ValidationError;
use peaceofmind_core::worry::local_now;
use peaceofmind_core::{CancelToken, Config, Database, GateView, WorryWindowConfig};

#[derive(Subcommand)]
pub enum WindowAction {
    /// Show whether the worry window is open
    Status {
        /// Show the review board even when closed
        #[arg(long)]
        open_anyway: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Save the daily window
    Set {
        /// Start time, HH:MM
        start: String,
        /// Length in minutes (at least 5; non-numeric means 15)
        minutes: String,
    },
    /// Re-check the window periodically until Ctrl-C
    Watch,
}

fn describe(view: &GateView) -> String {
    match view.notice() {
        Some(notice) => notice,
        None if view.overridden => "Worry window is closed; review board opened anyway.".into(),
        None => format!(
            "Worry window is open until {}.",
            view.status.end.format("%H:%M")
        ),
    }
}

pub fn run(action: WindowAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let mut window = super::worry_window(&db);

    match action {
        WindowAction::Status { open_anyway, json } => {
            let now = local_now();
            let view = if open_anyway {
                window.open_anyway(now)
            } else {
                window.poll(now)
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                println!("{}", describe(&view));
            }
        }
        WindowAction::Set { start, minutes } => {
            if WorryWindowConfig::parse_start(&start).is_none() {
                return Err(ValidationError::InvalidValue {
                    field: "start".into(),
                    message: format!("expected HH:MM, got '{start}'"),
                }
                .into());
            }
            let config = WorryWindowConfig::from_inputs(&start, &minutes);
            let view = window.save_config(config, local_now())?;
            println!(
                "saved: {} for {}m",
                config.start_time.format("%H:%M"),
                config.duration_minutes
            );
            println!("{}", describe(&view));
        }
        WindowAction::Watch => {
            let interval = Config::load_or_default().poll_interval();
            let cancel = CancelToken::new();
            let rt = super::runtime()?;
            rt.block_on(async {
                let stopper = cancel.clone();
                tokio::spawn(async move {
                    if tokio::signal::ctrl_c().await.is_ok() {
                        stopper.cancel();
                    }
                });

                let mut last = None;
                window
                    .watch(interval, &cancel, local_now, |view| {
                        let line = describe(view);
                        if last.as_ref() != Some(&line) {
                            println!("{line}");
                            last = Some(line);
                        }
                    })
                    .await;
            });
        }
    }
    Ok(())
}
