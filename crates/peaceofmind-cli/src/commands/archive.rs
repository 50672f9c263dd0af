use clap::Subcommand;
use peaceofmind_core::archive::render_listing;
use peaceofmind_core::{Category, Database, EntryArchive};

#[derive(Subcommand)]
pub enum ArchiveAction {
    /// List entries of one category, most recent first
    List {
        /// senses, reframes_fast, triage, mood or worry_decisions
        category: Category,
        /// Case-insensitive text to search for
        #[arg(long)]
        filter: Option<String>,
        /// Output stored values as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show entry counts per category
    Summary,
}

pub fn run(action: ArchiveAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let archive = EntryArchive::new(&db);

    match action {
        ArchiveAction::List {
            category,
            filter,
            json,
        } => {
            let records = archive.list(category, filter.as_deref());
            if json {
                let raw: Vec<_> = records.iter().map(|r| &r.raw).collect();
                println!("{}", serde_json::to_string_pretty(&raw)?);
            } else {
                println!("{}", category.label());
                println!("{}", render_listing(&records));
            }
        }
        ArchiveAction::Summary => {
            for category in Category::ALL {
                println!("{:<26} {}", category.label(), archive.len(category));
            }
        }
    }
    Ok(())
}
