//! Default command: export today's reminders

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Local;
use clap::builder::RangedU64ValueParser;
use clap::Args;

use crate::config::Config;
use crate::export::{local_today, write_report, Extractor, WrapMode};
use crate::store::{self, Backend, TaskStore};

#[derive(Args, Debug, Default)]
pub struct ExportArgs {
    /// Path to a JSON reminder store (implies --backend file)
    #[arg(long, value_name = "PATH")]
    pub store: Option<PathBuf>,

    /// Where to read reminders from
    #[arg(long, value_enum)]
    pub backend: Option<Backend>,

    /// Directory to write the report to (defaults to the current directory)
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Keep each reminder on a single line
    #[arg(long)]
    pub no_wrap: bool,

    /// Wrap width in characters
    #[arg(long, value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
    pub width: Option<usize>,

    /// Print the report instead of writing a file
    #[arg(long)]
    pub stdout: bool,
}

/// Effective settings after merging flags over the config file.
#[derive(Debug, Clone)]
pub struct ExportSettings {
    pub backend: Backend,
    pub store_path: PathBuf,
    pub mode: WrapMode,
    pub output_dir: PathBuf,
    pub to_stdout: bool,
}

impl ExportSettings {
    pub fn resolve(args: &ExportArgs, config: &Config) -> Result<Self> {
        let backend = match (&args.store, args.backend) {
            (_, Some(backend)) => backend,
            (Some(_), None) => Backend::File,
            (None, None) => config.store.backend,
        };

        let store_path = match &args.store {
            Some(path) => path.clone(),
            None => config.store.resolved_path()?,
        };

        let wrap = config.export.wrap && !args.no_wrap;
        let width = args.width.unwrap_or(config.export.width);

        let output_dir = args
            .output_dir
            .clone()
            .or_else(|| config.export.resolved_output_dir())
            .unwrap_or_default();

        Ok(Self {
            backend,
            store_path,
            mode: WrapMode::new(wrap, width),
            output_dir,
            to_stdout: args.stdout,
        })
    }

    /// Progress goes to stderr when stdout carries the report.
    fn progress(&self, msg: &str) {
        if self.to_stdout {
            eprintln!("{}", msg);
        } else {
            println!("{}", msg);
        }
    }
}

pub async fn run(args: ExportArgs) -> Result<()> {
    let config = Config::load();
    let settings = ExportSettings::resolve(&args, &config)?;

    let store = store::open(settings.backend, settings.store_path.clone())
        .with_context(|| format!("Failed to open {:?} reminder store", settings.backend))?;

    execute(Arc::from(store), &settings).await?;
    Ok(())
}

/// Run the export against `store`. Returns the written path, or `None` when
/// the report went to stdout.
pub async fn execute(
    store: Arc<dyn TaskStore>,
    settings: &ExportSettings,
) -> Result<Option<PathBuf>> {
    settings.progress("Starting Reminders Extraction...");

    let extraction = Extractor::new(store).extract(local_today()).await?;
    settings.progress(&format!("Found {} reminder lists", extraction.lists.len()));
    settings.progress(&format!(
        "Found {} reminders in Today list",
        extraction.items.len()
    ));

    if settings.to_stdout {
        print!("{}", extraction.render(settings.mode).to_markdown());
        return Ok(None);
    }

    let path = write_report(
        &extraction,
        settings.mode,
        &settings.output_dir,
        &Local::now(),
    )?;
    settings.progress(&format!("Created markdown file: {}", path.display()));

    Ok(Some(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::DEFAULT_WIDTH;

    #[test]
    fn test_defaults_match_plain_invocation() -> Result<()> {
        let config = Config {
            store: crate::config::StoreConfig {
                path: Some("/data/reminders.json".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let settings = ExportSettings::resolve(&ExportArgs::default(), &config)?;
        assert_eq!(settings.mode, WrapMode::Width(DEFAULT_WIDTH));
        assert_eq!(settings.output_dir, PathBuf::new());
        assert_eq!(settings.backend, Backend::Auto);
        assert_eq!(settings.store_path, PathBuf::from("/data/reminders.json"));
        assert!(!settings.to_stdout);
        Ok(())
    }

    #[test]
    fn test_store_flag_implies_file_backend() -> Result<()> {
        let args = ExportArgs {
            store: Some(PathBuf::from("/tmp/r.json")),
            ..Default::default()
        };
        let settings = ExportSettings::resolve(&args, &Config::default())?;
        assert_eq!(settings.backend, Backend::File);
        assert_eq!(settings.store_path, PathBuf::from("/tmp/r.json"));
        Ok(())
    }

    #[test]
    fn test_flags_override_config() -> Result<()> {
        let mut config = Config::default();
        config.export.width = 60;
        config.export.output_dir = Some("/from/config".to_string());
        config.store.path = Some("/from/config.json".to_string());

        let args = ExportArgs {
            no_wrap: true,
            output_dir: Some(PathBuf::from("/from/flag")),
            ..Default::default()
        };
        let settings = ExportSettings::resolve(&args, &config)?;
        assert_eq!(settings.mode, WrapMode::None);
        assert_eq!(settings.output_dir, PathBuf::from("/from/flag"));

        let args = ExportArgs {
            width: Some(100),
            ..Default::default()
        };
        let settings = ExportSettings::resolve(&args, &config)?;
        assert_eq!(settings.mode, WrapMode::Width(100));
        assert_eq!(settings.output_dir, PathBuf::from("/from/config"));
        Ok(())
    }

    #[test]
    fn test_config_can_disable_wrapping() -> Result<()> {
        let mut config = Config::default();
        config.export.wrap = false;
        config.store.path = Some("/x.json".to_string());
        let settings = ExportSettings::resolve(&ExportArgs::default(), &config)?;
        assert_eq!(settings.mode, WrapMode::None);
        Ok(())
    }
}
