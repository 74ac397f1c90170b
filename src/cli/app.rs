//! Main CLI application structure

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use super::output::{Output, OutputFormat};
use super::{config_cmd, course, profile, query};
use crate::ingest::{DirectorySource, GraphBuilder};
use crate::storage::{Config, ProfileStore};

/// Environment variable holding a `tracing` filter directive
pub const LOG_ENV: &str = "CURRICULUM_LOG";

#[derive(Parser)]
#[command(name = "curriculum")]
#[command(author, version, about = "Curriculum prerequisite graph and optional-unit eligibility")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (defaults to the configured format)
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Directory of saved course pages
    #[arg(long, global = true, env = "CURRICULUM_SOURCE")]
    pub source: Option<PathBuf>,

    /// Student profile file
    #[arg(long, global = true, env = "CURRICULUM_PROFILE")]
    pub profile: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Inspect a course's curriculum matrix
    #[command(subcommand)]
    Course(course::CourseCommands),

    /// Manage the student profile
    #[command(subcommand)]
    Profile(profile::ProfileCommands),

    /// Show optional units the student can take now
    Eligible {
        /// Build this course from the source instead of using the profile
        #[arg(long)]
        course: Option<u32>,

        /// Completed unit (repeatable, with --course)
        #[arg(long = "completed", requires = "course")]
        completed: Vec<String>,
    },

    /// Show optional units still waiting on their prerequisite
    Blocked {
        /// Build this course from the source instead of using the profile
        #[arg(long)]
        course: Option<u32>,

        /// Completed unit (repeatable, with --course)
        #[arg(long = "completed", requires = "course")]
        completed: Vec<String>,
    },

    /// Manage configuration
    #[command(subcommand)]
    Config(config_cmd::ConfigCommands),
}

/// Resolved settings shared by all commands
pub struct Settings {
    pub config: Config,
    pub documents_dir: PathBuf,
    pub profile_path: PathBuf,
}

impl Settings {
    fn resolve(config: Config, source: Option<PathBuf>, profile: Option<PathBuf>) -> Self {
        let documents_dir = source.unwrap_or_else(|| config.source.documents_dir.clone());
        let profile_path = profile.unwrap_or_else(|| config.profile.clone());
        Self {
            config,
            documents_dir,
            profile_path,
        }
    }

    pub fn builder(&self) -> GraphBuilder {
        GraphBuilder::new(self.config.parse.clone())
    }

    pub fn source(&self) -> DirectorySource {
        DirectorySource::new(&self.documents_dir)
    }

    pub fn profile_store(&self) -> ProfileStore {
        ProfileStore::new(&self.profile_path)
    }
}

/// Initializes the `tracing` subscriber on stderr
///
/// `CURRICULUM_LOG` wins; otherwise `--verbose` selects debug and the
/// default only shows warnings.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load()?;
    let format = cli.format.unwrap_or_else(|| config.default_format.into());
    let output = Output::new(format);
    let settings = Settings::resolve(config, cli.source, cli.profile);

    output.verbose(&format!(
        "Using documents at {} and profile {}",
        settings.documents_dir.display(),
        settings.profile_path.display()
    ));

    match cli.command {
        Commands::Course(cmd) => course::run(cmd, &settings, &output)?,
        Commands::Profile(cmd) => profile::run(cmd, &settings, &output)?,

        Commands::Eligible { course, completed } => {
            output.verbose_ctx("eligible", &format!("Course override: {:?}", course));
            query::eligible(&settings, &output, course, &completed)?
        }
        Commands::Blocked { course, completed } => {
            output.verbose_ctx("blocked", &format!("Course override: {:?}", course));
            query::blocked(&settings, &output, course, &completed)?
        }

        Commands::Config(cmd) => config_cmd::run(cmd, &settings, &output)?,
    }

    output.verbose("Command completed successfully");
    Ok(())
}
