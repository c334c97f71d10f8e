//! today-reminders library - Export today's and overdue reminders as markdown

pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod store;

pub use error::ExportError;
