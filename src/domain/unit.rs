//! Curriculum unit domain model
//!
//! A unit is one subject of a course's curriculum matrix. It is validated
//! once, at construction, and never mutated after its prerequisite is linked.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum UnitError {
    #[error("Unit name is empty")]
    EmptyName,

    #[error("Credit hours must be positive for unit '{0}'")]
    ZeroCreditHours(String),

    #[error("Unit cannot be its own prerequisite: {0}")]
    SelfPrerequisite(String),
}

/// A curriculum unit with at most one direct prerequisite
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "UnitRecord", into = "UnitRecord")]
pub struct Unit {
    name: String,
    credit_hours: u32,
    prerequisite: Option<String>,
    optional: bool,
}

impl Unit {
    /// Creates a unit without a prerequisite
    pub fn new(name: impl Into<String>, credit_hours: u32, optional: bool) -> Result<Self, UnitError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(UnitError::EmptyName);
        }
        if credit_hours == 0 {
            return Err(UnitError::ZeroCreditHours(name));
        }

        Ok(Self {
            name,
            credit_hours,
            prerequisite: None,
            optional,
        })
    }

    /// Returns this unit linked to the named prerequisite
    pub fn with_prerequisite(mut self, prerequisite: impl Into<String>) -> Result<Self, UnitError> {
        let prerequisite = prerequisite.into();
        if prerequisite == self.name {
            return Err(UnitError::SelfPrerequisite(self.name));
        }
        self.prerequisite = Some(prerequisite);
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn credit_hours(&self) -> u32 {
        self.credit_hours
    }

    /// Name of the linked prerequisite, if one was resolved
    pub fn prerequisite(&self) -> Option<&str> {
        self.prerequisite.as_deref()
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    /// Returns the marker the curriculum table uses for this unit
    pub fn marker(&self) -> &'static str {
        if self.optional {
            "OPT"
        } else {
            "OBR"
        }
    }

    /// Links a prerequisite the caller has already checked against the graph
    pub(crate) fn link_prerequisite(&mut self, prerequisite: String) {
        self.prerequisite = Some(prerequisite);
    }

    /// Drops the prerequisite link (used when the referenced unit leaves the course)
    pub(crate) fn clear_prerequisite(&mut self) {
        self.prerequisite = None;
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}) {} ({}h)", self.marker(), self.name, self.credit_hours)
    }
}

/// Serialized shape of a unit; converted through [`Unit::new`] on load
#[derive(Debug, Clone, Serialize, Deserialize)]
struct UnitRecord {
    name: String,
    credit_hours: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    prerequisite: Option<String>,
    optional: bool,
}

impl TryFrom<UnitRecord> for Unit {
    type Error = UnitError;

    fn try_from(record: UnitRecord) -> Result<Self, Self::Error> {
        let unit = Unit::new(record.name, record.credit_hours, record.optional)?;
        match record.prerequisite {
            Some(prerequisite) => unit.with_prerequisite(prerequisite),
            None => Ok(unit),
        }
    }
}

impl From<Unit> for UnitRecord {
    fn from(unit: Unit) -> Self {
        Self {
            name: unit.name,
            credit_hours: unit.credit_hours,
            prerequisite: unit.prerequisite,
            optional: unit.optional,
        }
    }
}
