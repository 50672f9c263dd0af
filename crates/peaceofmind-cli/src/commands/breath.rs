use clap::Args;
use peaceofmind_core::breath::DEFAULT_TICK;
use peaceofmind_core::{BreathDurations, BreathPacer, CancelToken, Config, PacerEvent, PacerOutcome};

#[derive(Args)]
pub struct BreathArgs {
    /// Inhale seconds (at least 1)
    #[arg(long)]
    inhale: Option<String>,
    /// Hold seconds (0 skips the hold)
    #[arg(long)]
    hold: Option<String>,
    /// Exhale seconds (at least 1)
    #[arg(long)]
    exhale: Option<String>,
    /// Stop on its own after this many cycles
    #[arg(long)]
    cycles: Option<u64>,
}

impl BreathArgs {
    /// Flags override the configured defaults; non-numeric flags fall back
    /// to 4/4/6.
    fn durations(&self, config: &Config) -> BreathDurations {
        let configured = config.breath_durations();
        let pick = |flag: &Option<String>, fallback: u32| {
            flag.clone().unwrap_or_else(|| fallback.to_string())
        };
        BreathDurations::from_inputs(
            &pick(&self.inhale, configured.inhale),
            &pick(&self.hold, configured.hold),
            &pick(&self.exhale, configured.exhale),
        )
    }
}

fn print_event(event: &PacerEvent) {
    match event {
        PacerEvent::PhaseStarted { phase } => println!("{phase}"),
        PacerEvent::Tick(tick) => match tick.scale {
            Some(scale) => println!("  {:>2}  ({scale:.2}x)", tick.remaining),
            None => println!("  {:>2}", tick.remaining),
        },
        PacerEvent::CycleCompleted { cycles } => println!("-- cycle {cycles} --"),
        PacerEvent::Paused => println!("Paused"),
    }
}

pub fn run(args: BreathArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let durations = args.durations(&config);
    let pacer = BreathPacer::new(durations).with_tick(DEFAULT_TICK);
    println!(
        "Inhale {}s · Hold {}s · Exhale {}s (Ctrl-C to pause)",
        durations.inhale, durations.hold, durations.exhale
    );

    let cancel = CancelToken::new();
    let rt = super::runtime()?;
    let outcome = rt.block_on(async {
        let stopper = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                stopper.cancel();
            }
        });

        let limit = args.cycles;
        pacer
            .run(&cancel, |event| {
                print_event(&event);
                if let PacerEvent::CycleCompleted { cycles } = event {
                    if limit.is_some_and(|limit| cycles >= limit) {
                        cancel.cancel();
                    }
                }
            })
            .await
    });

    let PacerOutcome::Paused {
        cycles_completed, ..
    } = outcome;
    println!("{cycles_completed} cycle(s) completed");
    Ok(())
}
