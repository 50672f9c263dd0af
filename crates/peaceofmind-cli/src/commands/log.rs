use chrono::{NaiveDate, NaiveDateTime, Utc};
use clap::Subcommand;
use peaceofmind_core::archive::{render_card, ArchiveRecord};
use peaceofmind_core::{
    Database, EntryArchive, JournalEntry, MoodForm, ReframeForm, SensesPad, TriageForm,
};

#[derive(Subcommand)]
pub enum LogAction {
    /// Conversation triage: facts versus feelings
    Triage {
        /// Conversation date, YYYY-MM-DD (default today)
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long, default_value = "")]
        tag: String,
        /// Observed fact (up to 3)
        #[arg(long = "fact")]
        facts: Vec<String>,
        #[arg(long, default_value = "")]
        evidence: String,
        #[arg(long, default_value = "")]
        lesson: String,
    },
    /// Mood-check diary
    Mood {
        /// When it happened, YYYY-MM-DDTHH:MM (default now)
        #[arg(long, value_parser = parse_local_minutes)]
        at: Option<NaiveDateTime>,
        #[arg(long, default_value = "")]
        did: String,
        /// Energy before, 1-10
        #[arg(long, default_value = "")]
        before: String,
        /// Energy after, 1-10
        #[arg(long, default_value = "")]
        after: String,
        #[arg(long, default_value = "")]
        noticed: String,
        /// Small win (up to 3)
        #[arg(long = "win")]
        wins: Vec<String>,
        #[arg(long, default_value = "")]
        negative: String,
        #[arg(long = "try-next", default_value = "")]
        try_next: String,
    },
    /// Fast reframe
    Reframe {
        #[arg(long, default_value = "")]
        fact: String,
        #[arg(long, default_value = "")]
        friend: String,
        #[arg(long, default_value = "")]
        worst: String,
    },
    /// Archive the current grounding draft
    Senses,
}

fn parse_local_minutes(raw: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M")
        .map_err(|e| format!("expected YYYY-MM-DDTHH:MM: {e}"))
}

pub fn run(action: LogAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let now = Utc::now();

    let entry = match action {
        LogAction::Triage {
            date,
            tag,
            facts,
            evidence,
            lesson,
        } => TriageForm {
            date,
            tag,
            facts,
            evidence,
            lesson,
        }
        .into_entry(now),
        LogAction::Mood {
            at,
            did,
            before,
            after,
            noticed,
            wins,
            negative,
            try_next,
        } => MoodForm {
            datetime: at,
            did,
            energy_before: before,
            energy_after: after,
            noticed,
            wins,
            negative,
            try_next,
        }
        .into_entry(now),
        LogAction::Reframe {
            fact,
            friend,
            worst,
        } => ReframeForm {
            fact,
            friend,
            worst,
        }
        .into_entry(now),
        LogAction::Senses => {
            let pad = SensesPad::new(&db);
            let entry = pad.save_to_archive(&pad.load_all(), now)?;
            print_saved(&JournalEntry::Senses(entry));
            return Ok(());
        }
    };

    EntryArchive::new(&db).append(&entry)?;
    print_saved(&entry);
    Ok(())
}

fn print_saved(entry: &JournalEntry) {
    println!("Saved to {}:", entry.category().label());
    println!("{}", render_card(&ArchiveRecord::from_entry(entry)));
}
