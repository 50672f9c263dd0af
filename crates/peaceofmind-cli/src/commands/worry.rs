use chrono::Local;
use clap::Subcommand;
use peaceofmind_core::worry::local_now;
use peaceofmind_core::{Database, Decision, ReviewBoard, WorryInbox};

#[derive(Subcommand)]
pub enum WorryAction {
    /// Capture a worry for later review
    Add {
        /// Worry text (blank text is ignored)
        text: String,
    },
    /// List the inbox, most recent first
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Replace the text of an item
    Edit {
        /// Item number as shown by `list`
        index: usize,
        text: String,
    },
    /// Delete an item
    Remove {
        /// Item number as shown by `list`
        index: usize,
    },
    /// Delete every item
    Clear {
        /// Confirm clearing the inbox
        #[arg(long)]
        yes: bool,
    },
    /// Review items and move them to the archive
    Commit {
        /// Item numbers to keep as important
        #[arg(long, num_args = 1..)]
        important: Vec<usize>,
        /// Item numbers to let go
        #[arg(long = "let-go", num_args = 1..)]
        let_go: Vec<usize>,
        /// Review even though the worry window is closed
        #[arg(long)]
        open_anyway: bool,
    },
}

/// `list` numbers items from 1.
fn to_index(number: usize) -> Result<usize, Box<dyn std::error::Error>> {
    number
        .checked_sub(1)
        .ok_or_else(|| "item numbers start at 1".into())
}

pub fn run(action: WorryAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let inbox = WorryInbox::new(&db);

    match action {
        WorryAction::Add { text } => match inbox.add(&text)? {
            Some(_) => println!("added ({} in inbox)", inbox.count()),
            None => println!("nothing to add"),
        },
        WorryAction::List { json } => {
            let items = inbox.items();
            if json {
                println!("{}", serde_json::to_string_pretty(&items)?);
            } else if items.is_empty() {
                println!("Inbox is empty.");
            } else {
                for (i, item) in items.iter().enumerate() {
                    println!(
                        "{:>3}. {}  ({})",
                        i + 1,
                        item.text,
                        item.timestamp.with_timezone(&Local).format("%Y-%m-%d %H:%M")
                    );
                }
            }
        }
        WorryAction::Edit { index, text } => {
            inbox.edit(to_index(index)?, &text)?;
            println!("ok");
        }
        WorryAction::Remove { index } => {
            let removed = inbox.remove(to_index(index)?)?;
            println!("removed: {}", removed.text);
        }
        WorryAction::Clear { yes } => {
            if !yes {
                return Err("refusing to clear the inbox without --yes".into());
            }
            inbox.clear_all()?;
            println!("inbox cleared");
        }
        WorryAction::Commit {
            important,
            let_go,
            open_anyway,
        } => {
            let mut window = super::worry_window(&db);
            let now = local_now();
            let view = if open_anyway {
                window.open_anyway(now)
            } else {
                window.poll(now)
            };
            if let Some(notice) = view.notice() {
                return Err(format!("{notice} Use --open-anyway to review now.").into());
            }

            let marks = important
                .iter()
                .map(|n| (*n, Decision::Important))
                .chain(let_go.iter().map(|n| (*n, Decision::LetGo)));
            let mut board = ReviewBoard::new();
            let mut seen = Vec::new();
            for (number, decision) in marks {
                if seen.contains(&number) {
                    return Err(format!("item {number} was marked twice").into());
                }
                seen.push(number);
                board.select(to_index(number)?);
                if board.mark(&inbox, decision).is_none() {
                    return Err(format!("no inbox item {number}").into());
                }
            }

            match board.commit(&inbox)? {
                Some(decision) => println!(
                    "archived {} decision(s), {} left in inbox",
                    decision.decisions.len(),
                    inbox.count()
                ),
                None => println!("nothing selected"),
            }
        }
    }
    Ok(())
}
