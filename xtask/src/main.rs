//! xtask - Development tasks for today-reminders

use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Duration, Local, NaiveDate};

use today_reminders::store::file::{StoreFile, StoredItem, StoredList};

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Development tasks for today-reminders")]
struct Xtask {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate CLI documentation from clap definitions
    GenDocs,

    /// Write a sample JSON reminder store for manual runs
    SampleStore {
        /// Destination of the store file
        #[arg(default_value = "reminders.json")]
        path: PathBuf,
    },
}

fn main() {
    let args = Xtask::parse();
    match args.command {
        Commands::GenDocs => generate_cli_docs(),
        Commands::SampleStore { path } => write_sample_store(&path),
    }
}

fn generate_cli_docs() {
    let markdown = clap_markdown::help_markdown::<today_reminders::cli::Cli>();

    let docs_dir = Path::new("docs");
    fs::create_dir_all(docs_dir).expect("Failed to create docs directory");

    let output_path = docs_dir.join("cli.md");
    fs::write(&output_path, markdown).expect("Failed to write CLI reference");

    println!("Generated CLI documentation at {}", output_path.display());
}

fn write_sample_store(path: &Path) {
    let today = Local::now().date_naive();
    let at = |day: NaiveDate, hour: u32| day.and_hms_opt(hour, 0, 0);
    let last_week = today - Duration::days(7);
    let next_month = today + Duration::days(30);

    let store = StoreFile {
        lists: vec![
            StoredList {
                id: "personal".to_string(),
                title: "Personal".to_string(),
                items: vec![
                    StoredItem::new(Some("Buy milk"), at(today, 9), false),
                    StoredItem::new(
                        Some("Call the dentist about the appointment that got moved to next week and ask about the invoice"),
                        None,
                        false,
                    ),
                    StoredItem::new(Some("Water plants"), at(today, 8), true),
                ],
            },
            StoredList {
                id: "work".to_string(),
                title: "Work".to_string(),
                items: vec![
                    StoredItem::new(Some("Send weekly report"), at(last_week, 17), false),
                    StoredItem::new(None, at(today, 12), false),
                    StoredItem::new(Some("Plan next quarter"), at(next_month, 9), false),
                ],
            },
        ],
    };

    let json = store.to_json().expect("Failed to serialize sample store");
    fs::write(path, json).expect("Failed to write sample store");
    println!("Wrote sample store to {}", path.display());
}
