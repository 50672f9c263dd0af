use clap::Subcommand;
use peaceofmind_core::{Database, SenseKind, SensesPad};

#[derive(Subcommand)]
pub enum SensesAction {
    /// Show the current draft
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Replace the list for one sense
    Set {
        /// see, hear, touch, smell or taste
        kind: SenseKind,
        items: Vec<String>,
    },
    /// Clear every list
    Reset,
}

pub fn run(action: SensesAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let pad = SensesPad::new(&db);

    match action {
        SensesAction::Show { json } => {
            let draft = pad.load_all();
            if json {
                println!("{}", serde_json::to_string_pretty(&draft)?);
                return Ok(());
            }
            for kind in SenseKind::ALL {
                let items: Vec<&str> = draft
                    .items(kind)
                    .iter()
                    .map(|s| if s.is_empty() { "_" } else { s.as_str() })
                    .collect();
                println!("{:<6} ({}) {}", kind.as_str(), kind.target(), items.join(" | "));
            }
        }
        SensesAction::Set { kind, items } => {
            let mut draft = pad.load_all();
            *draft.items_mut(kind) = items;
            pad.save(&draft)?;
            println!("saved {} item(s) for {kind}", draft.filled(kind).len());
        }
        SensesAction::Reset => {
            pad.save(&pad.reset())?;
            println!("draft cleared");
        }
    }
    Ok(())
}
