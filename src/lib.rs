//! Curriculum CLI - prerequisite graphs for published curriculum tables
//!
//! Reads a university's curriculum table (unit names, credit hours,
//! prerequisite text), builds a validated graph of units linked by their
//! prerequisites, and answers which optional units a student can take next.

pub mod domain;
pub mod ingest;
pub mod storage;
pub mod cli;

pub use domain::{Course, EligibilityResolver, Unit};
pub use ingest::{BuildError, BuildOutcome, BuildReport, GraphBuilder};
