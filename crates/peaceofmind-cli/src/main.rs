use clap::{Parser, Subcommand};
use peaceofmind_core::storage::keys;
use peaceofmind_core::{Config, Database, KeyedStore};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "peaceofmind-cli", version, about = "Peace of Mind CLI")]
struct Cli {
    /// Verbose logging (debug level)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Worry inbox and review
    Worry {
        #[command(subcommand)]
        action: commands::worry::WorryAction,
    },
    /// Daily worry window
    Window {
        #[command(subcommand)]
        action: commands::window::WindowAction,
    },
    /// Browse the journal archive
    Archive {
        #[command(subcommand)]
        action: commands::archive::ArchiveAction,
    },
    /// Record a completed exercise
    Log {
        #[command(subcommand)]
        action: commands::log::LogAction,
    },
    /// 5-4-3-2-1 grounding draft
    Senses {
        #[command(subcommand)]
        action: commands::senses::SensesAction,
    },
    /// Guided breathing (Ctrl-C pauses)
    Breath(commands::breath::BreathArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Show the last command area used
    Last,
}

impl Commands {
    fn destination(&self) -> Option<&'static str> {
        match self {
            Commands::Worry { .. } => Some("worry"),
            Commands::Window { .. } => Some("window"),
            Commands::Archive { .. } => Some("archive"),
            Commands::Log { .. } => Some("log"),
            Commands::Senses { .. } => Some("senses"),
            Commands::Breath(_) => Some("breath"),
            Commands::Config { .. } | Commands::Last => None,
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose {
        "debug".to_string()
    } else {
        Config::load_or_default().log_level
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Remember where the user was last, for `last`.
fn record_destination(destination: &str) {
    let result = Database::open()
        .map_err(peaceofmind_core::CoreError::from)
        .and_then(|db| KeyedStore::new(&db).set(keys::LAST_DESTINATION, destination));
    if let Err(e) = result {
        tracing::warn!(error = %e, "could not record last destination");
    }
}

fn show_last() -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let last: Option<String> = KeyedStore::new(&db).get(keys::LAST_DESTINATION, None);
    println!("{}", last.as_deref().unwrap_or("(none)"));
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let destination = cli.command.destination();
    let result = match cli.command {
        Commands::Worry { action } => commands::worry::run(action),
        Commands::Window { action } => commands::window::run(action),
        Commands::Archive { action } => commands::archive::run(action),
        Commands::Log { action } => commands::log::run(action),
        Commands::Senses { action } => commands::senses::run(action),
        Commands::Breath(args) => commands::breath::run(args),
        Commands::Config { action } => commands::config::run(action),
        Commands::Last => show_last(),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
    if let Some(destination) = destination {
        record_destination(destination);
    }
}
