//! Configuration CLI commands

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Subcommand;

use super::app::Settings;
use super::output::Output;
use crate::storage::{Config, LOCAL_CONFIG_FILE};

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Write a default configuration file
    Init {
        /// Write the global config instead of ./curriculum.toml
        #[arg(long)]
        global: bool,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Show the effective configuration
    Show,
}

pub fn run(cmd: ConfigCommands, settings: &Settings, output: &Output) -> Result<()> {
    match cmd {
        ConfigCommands::Init { global, force } => init_config(output, global, force),
        ConfigCommands::Show => show_config(settings, output),
    }
}

fn init_config(output: &Output, global: bool, force: bool) -> Result<()> {
    let path = if global {
        Config::global_config_dir()
            .context("Could not determine config directory")?
            .join("config.toml")
    } else {
        PathBuf::from(LOCAL_CONFIG_FILE)
    };

    if path.exists() && !force {
        bail!("Config already exists at {}. Use --force to replace it.", path.display());
    }

    Config::default().save(&path)?;
    output.success(&format!("Wrote default config to {}", path.display()));
    Ok(())
}

fn show_config(settings: &Settings, output: &Output) -> Result<()> {
    if output.is_json() {
        // Flag and environment overrides win over the file values
        let mut effective = settings.config.clone();
        effective.source.documents_dir = settings.documents_dir.clone();
        effective.profile = settings.profile_path.clone();
        output.data(&effective);
        return Ok(());
    }

    let config = &settings.config;
    println!("documents_dir  {}", settings.documents_dir.display());
    println!("profile        {}", settings.profile_path.display());
    println!("optional_rule  {}", config.parse.optional_rule.as_str());
    println!("none_literal   {}", config.parse.none_literal);
    println!("hours_suffix   {}", config.parse.hours_suffix);
    Ok(())
}
