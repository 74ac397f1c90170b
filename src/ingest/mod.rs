//! # Curriculum Ingestion
//!
//! Turns the academic-records pages of a course into a validated
//! [`Course`](crate::domain::Course).
//!
//! ## Pipeline
//!
//! | Step | Module | Output |
//! |------|--------|--------|
//! | Fetch | [`source`] | course name + table rows |
//! | Extract | [`html`] | `Vec<Vec<String>>` in document order |
//! | Parse | [`row`] | [`ParsedRow`] or [`RowError`] per row |
//! | Link | [`builder`] | [`BuildOutcome`] (course + report) |
//!
//! Row-level failures are recorded in the [`BuildReport`] and never abort a
//! build. A course fails to materialize only with
//! [`BuildError::CourseNotFound`] or [`BuildError::NoUsableRows`] (or when
//! the source itself cannot be read).

pub mod builder;
pub mod html;
pub mod row;
pub mod source;

pub use builder::{
    BuildError, BuildOutcome, BuildReport, GraphBuilder, RowRejection, UnresolvedPrerequisite,
    UnresolvedReason,
};
pub use row::{clean_name, parse_row, OptionalRule, ParseOptions, ParsedRow, RowError};
pub use source::{load_course, CourseSource, DirectorySource, SourceError};
