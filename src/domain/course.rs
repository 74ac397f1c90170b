//! Course domain model
//!
//! A course owns its curriculum matrix: the units in table order, keyed by
//! name. Prerequisite references never leave the matrix.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

use super::graph::{GraphError, PrerequisiteGraph};
use super::unit::Unit;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum CourseError {
    #[error("Course name is empty")]
    EmptyName,

    #[error("Unit already present in the matrix: {0}")]
    DuplicateUnitName(String),

    #[error("Unit '{unit}' requires '{prerequisite}', which is not in the matrix")]
    UnknownPrerequisite { unit: String, prerequisite: String },

    #[error("Prerequisite cycle between '{0}' and '{1}'")]
    CyclicPrerequisite(String, String),
}

/// A named course and its ordered curriculum matrix
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CourseRecord", into = "CourseRecord")]
pub struct Course {
    id: u32,
    name: String,
    matrix: Vec<Unit>,
}

impl Course {
    /// Creates a course, validating the whole matrix
    pub fn new(id: u32, name: impl Into<String>, matrix: Vec<Unit>) -> Result<Self, CourseError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(CourseError::EmptyName);
        }

        let mut seen = HashSet::new();
        for unit in &matrix {
            if !seen.insert(unit.name()) {
                return Err(CourseError::DuplicateUnitName(unit.name().to_string()));
            }
        }

        PrerequisiteGraph::from_units(&matrix).map_err(|e| match e {
            GraphError::UnitNotFound(prerequisite) => {
                let unit = matrix
                    .iter()
                    .find(|u| u.prerequisite() == Some(prerequisite.as_str()))
                    .map(|u| u.name().to_string())
                    .unwrap_or_default();
                CourseError::UnknownPrerequisite { unit, prerequisite }
            }
            GraphError::CycleDetected(a, b) => CourseError::CyclicPrerequisite(a, b),
            GraphError::SelfPrerequisite(a) => CourseError::CyclicPrerequisite(a.clone(), a),
        })?;

        Ok(Self { id, name, matrix })
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Units in table order
    pub fn units(&self) -> &[Unit] {
        &self.matrix
    }

    /// Looks up a unit by its cleaned name
    pub fn unit(&self, name: &str) -> Option<&Unit> {
        self.matrix.iter().find(|u| u.name() == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.unit(name).is_some()
    }

    pub fn optional_units(&self) -> impl Iterator<Item = &Unit> {
        self.matrix.iter().filter(|u| u.is_optional())
    }

    pub fn required_units(&self) -> impl Iterator<Item = &Unit> {
        self.matrix.iter().filter(|u| !u.is_optional())
    }

    pub fn total_credit_hours(&self) -> u32 {
        self.matrix.iter().map(Unit::credit_hours).sum()
    }

    pub fn len(&self) -> usize {
        self.matrix.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matrix.is_empty()
    }

    /// Builds the prerequisite graph of this course
    pub fn graph(&self) -> PrerequisiteGraph {
        // The matrix was validated on construction
        PrerequisiteGraph::from_units(&self.matrix).unwrap_or_default()
    }

    /// Appends a unit to the matrix
    ///
    /// Its prerequisite, if any, must already be in the matrix, which also
    /// rules out cycles.
    pub fn add_unit(&mut self, unit: Unit) -> Result<(), CourseError> {
        if self.contains(unit.name()) {
            return Err(CourseError::DuplicateUnitName(unit.name().to_string()));
        }

        if let Some(prerequisite) = unit.prerequisite() {
            if !self.contains(prerequisite) {
                return Err(CourseError::UnknownPrerequisite {
                    unit: unit.name().to_string(),
                    prerequisite: prerequisite.to_string(),
                });
            }
        }

        self.matrix.push(unit);
        Ok(())
    }

    /// Removes a unit, clearing the links of units that required it
    pub fn remove_unit(&mut self, name: &str) -> Option<Unit> {
        let pos = self.matrix.iter().position(|u| u.name() == name)?;
        let removed = self.matrix.remove(pos);

        for unit in &mut self.matrix {
            if unit.prerequisite() == Some(name) {
                unit.clear_prerequisite();
            }
        }

        Some(removed)
    }
}

impl fmt::Display for Course {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}) {}", self.id, self.name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CourseRecord {
    id: u32,
    name: String,
    matrix: Vec<Unit>,
}

impl TryFrom<CourseRecord> for Course {
    type Error = CourseError;

    fn try_from(record: CourseRecord) -> Result<Self, Self::Error> {
        Course::new(record.id, record.name, record.matrix)
    }
}

impl From<Course> for CourseRecord {
    fn from(course: Course) -> Self {
        Self {
            id: course.id,
            name: course.name,
            matrix: course.matrix,
        }
    }
}
