//! Top-level clap definitions

use clap::{Parser, Subcommand};
use clap_complete::Shell;

use super::export::ExportArgs;

/// Export today's and overdue reminders to a markdown file.
///
/// Run without arguments to write `today_reminders_<timestamp>.md` to the
/// current directory.
#[derive(Parser)]
#[command(name = "today-reminders", version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub export: ExportArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print a shell completion script
    Completion {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}
