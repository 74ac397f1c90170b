//! # Storage Layer
//!
//! Local files used by the CLI.
//!
//! ## Storage Formats
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Config | TOML | `./curriculum.toml` or `~/.config/curriculum/config.toml` |
//! | Profile | JSON | `profile.json` (configurable) |
//!
//! ## Concurrency Safety
//!
//! - [`ProfileStore`] locks the file (`fs2`) while reading and writing
//! - Profile writes are atomic (temp file + rename)

mod config;
mod profile;

pub use config::{Config, ConfigError, OutputFormat, SourceConfig, LOCAL_CONFIG_FILE};
pub use profile::{Profile, ProfileError, ProfileStore};
