//! # Command-Line Interface
//!
//! User-facing CLI commands and output formatting.
//!
//! ## Command Groups
//!
//! | Group | Purpose | Examples |
//! |-------|---------|----------|
//! | Course | Inspect a curriculum matrix | `course show 1906`, `course optional 1906` |
//! | Profile | Student's completed units | `profile new Ana 1906`, `profile complete "Cálculo I"` |
//! | Query | Eligibility | `eligible`, `blocked` |
//! | Config | Settings | `config init`, `config show` |
//!
//! ## Output Formats
//!
//! All commands support `--format` flag:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! ## Verbose Mode
//!
//! Use `--verbose` (or `-v`) for debug logging on stderr, or set
//! `CURRICULUM_LOG` to a `tracing` filter:
//! ```bash
//! curriculum --verbose course show 1906
//! CURRICULUM_LOG=curriculum_cli=debug curriculum eligible
//! ```
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod output;
mod course;
mod profile;
mod query;
mod config_cmd;

pub use app::{Cli, Commands, Settings, run};
pub use output::{Output, OutputFormat};
