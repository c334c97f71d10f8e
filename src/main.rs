//! today-reminders - Export today's and overdue reminders to a markdown file

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use today_reminders::cli::{self, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    if std::env::var("TODAY_REMINDERS_DEBUG").is_ok() {
        tracing_subscriber::fmt()
            .with_env_filter("today_reminders=debug")
            .with_writer(std::io::stderr)
            .init();
    }

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Completion { shell }) => {
            generate(shell, &mut Cli::command(), "today-reminders", &mut std::io::stdout());
            Ok(())
        }
        None => cli::export::run(cli.export).await,
    }
}
