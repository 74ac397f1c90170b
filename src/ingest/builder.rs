//! Curriculum graph builder
//!
//! Builds a [`Course`] from the rows of one prerequisite table in two passes:
//! units are materialized first, then prerequisites are linked by name, since
//! a prerequisite may appear later in table order than the unit requiring it.
//!
//! Row failures never abort the build. They are collected in a
//! [`BuildReport`] next to the course.

use std::collections::HashMap;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use super::row::{parse_row, ParseOptions, RowError};
use super::source::SourceError;
use crate::domain::{Course, CourseError, GraphError, PrerequisiteGraph, Unit};

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Course {0} does not exist")]
    CourseNotFound(u32),

    #[error("No usable rows in the curriculum table of course {0}")]
    NoUsableRows(u32),

    #[error("Invalid course: {0}")]
    InvalidCourse(#[from] CourseError),

    #[error(transparent)]
    Source(#[from] SourceError),
}

/// A row skipped during pass 1
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowRejection {
    /// Zero-based position of the row in the table
    pub row: usize,
    #[serde(serialize_with = "serialize_display")]
    pub reason: RowError,
}

/// Why a prerequisite reference was left unlinked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnresolvedReason {
    /// No unit in this course carries the referenced name
    NotInMatrix,
    /// The unit names itself as prerequisite
    SelfReference,
    /// Linking would close a prerequisite cycle
    Cycle,
}

impl std::fmt::Display for UnresolvedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            UnresolvedReason::NotInMatrix => "not in this course",
            UnresolvedReason::SelfReference => "refers to itself",
            UnresolvedReason::Cycle => "would close a cycle",
        };
        f.write_str(label)
    }
}

/// A prerequisite reference left unlinked during pass 2
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnresolvedPrerequisite {
    pub unit: String,
    pub reference: String,
    pub reason: UnresolvedReason,
}

/// Everything that did not make it into the course as written
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildReport {
    /// Rows rejected by field validation or duplicate names
    pub rejected: Vec<RowRejection>,
    /// Decoration rows (section headers, spacers) silently skipped
    pub skipped: usize,
    /// Prerequisite references that could not be linked
    pub unresolved: Vec<UnresolvedPrerequisite>,
}

impl BuildReport {
    /// Returns true if every content row was used and every link resolved
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty() && self.unresolved.is_empty()
    }
}

/// A built course and the report of its build
#[derive(Debug)]
pub struct BuildOutcome {
    pub course: Course,
    pub report: BuildReport,
}

/// Builds courses from raw table rows
#[derive(Debug, Clone, Default)]
pub struct GraphBuilder {
    options: ParseOptions,
}

impl GraphBuilder {
    pub fn new(options: ParseOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Builds one course from its table rows, in document order
    pub fn build<S: AsRef<str>>(
        &self,
        id: u32,
        name: &str,
        rows: &[Vec<S>],
    ) -> Result<BuildOutcome, BuildError> {
        let mut report = BuildReport::default();

        // Pass 1: materialize units without prerequisites
        let mut units: Vec<Unit> = Vec::new();
        let mut references: Vec<Option<String>> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for (row, cells) in rows.iter().enumerate() {
            let parsed = match parse_row(cells, &self.options) {
                Ok(parsed) => parsed,
                Err(RowError::MalformedRow(filled)) => {
                    debug!(course = id, row, filled, "skipping decoration row");
                    report.skipped += 1;
                    continue;
                }
                Err(reason) => {
                    reject(&mut report, id, row, reason);
                    continue;
                }
            };

            if index.contains_key(&parsed.name) {
                reject(&mut report, id, row, RowError::DuplicateUnitName(parsed.name));
                continue;
            }

            let unit = match Unit::new(parsed.name.clone(), parsed.credit_hours, parsed.optional) {
                Ok(unit) => unit,
                Err(e) => {
                    reject(&mut report, id, row, RowError::InvalidName(e.to_string()));
                    continue;
                }
            };

            index.insert(parsed.name, units.len());
            units.push(unit);
            references.push(parsed.prerequisite);
        }

        if units.is_empty() {
            return Err(BuildError::NoUsableRows(id));
        }

        // Pass 2: link prerequisites by name
        let mut graph = PrerequisiteGraph::new();
        for unit in &units {
            graph.add_unit(unit.name());
        }

        let mut linked = Vec::with_capacity(units.len());
        for (mut unit, reference) in units.into_iter().zip(references) {
            let Some(reference) = reference else {
                linked.push(unit);
                continue;
            };

            let reason = if !index.contains_key(&reference) {
                UnresolvedReason::NotInMatrix
            } else {
                match graph.add_prerequisite(unit.name(), &reference) {
                    Ok(()) => {
                        unit.link_prerequisite(reference);
                        linked.push(unit);
                        continue;
                    }
                    Err(GraphError::SelfPrerequisite(_)) => UnresolvedReason::SelfReference,
                    Err(GraphError::CycleDetected(_, _)) => UnresolvedReason::Cycle,
                    Err(GraphError::UnitNotFound(_)) => UnresolvedReason::NotInMatrix,
                }
            };

            warn!(course = id, unit = unit.name(), reference = %reference, %reason, "prerequisite left unresolved");
            report.unresolved.push(UnresolvedPrerequisite {
                unit: unit.name().to_string(),
                reference,
                reason,
            });
            linked.push(unit);
        }

        let course = Course::new(id, name, linked)?;
        debug!(
            course = id,
            units = course.len(),
            rejected = report.rejected.len(),
            unresolved = report.unresolved.len(),
            "course built"
        );

        Ok(BuildOutcome { course, report })
    }
}

fn reject(report: &mut BuildReport, course: u32, row: usize, reason: RowError) {
    warn!(course, row, %reason, "rejecting row");
    report.rejected.push(RowRejection { row, reason });
}

fn serialize_display<T: std::fmt::Display, S: serde::Serializer>(
    value: &T,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}
