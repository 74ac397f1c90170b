//! Eligibility of optional units
//!
//! Given the units a student has completed, decides which optional units
//! they can take now. Only one prerequisite hop is considered; planning
//! across several terms is left to the caller.

use std::collections::HashSet;

use super::course::Course;
use super::unit::Unit;

/// Answers eligibility queries against one course
#[derive(Debug, Clone, Copy)]
pub struct EligibilityResolver<'a> {
    course: &'a Course,
}

impl<'a> EligibilityResolver<'a> {
    pub fn new(course: &'a Course) -> Self {
        Self { course }
    }

    /// Returns optional units that are not completed and whose prerequisite
    /// (if any) is completed, in matrix order
    ///
    /// Completed names that are not in the course are ignored. Unresolved
    /// prerequisites never block a unit.
    pub fn eligible(&self, completed: &HashSet<String>) -> Vec<&'a Unit> {
        self.course
            .optional_units()
            .filter(|unit| self.is_eligible(unit, completed))
            .collect()
    }

    /// Returns optional units that are not completed and still wait on
    /// their prerequisite, in matrix order
    pub fn blocked(&self, completed: &HashSet<String>) -> Vec<&'a Unit> {
        self.course
            .optional_units()
            .filter(|unit| !completed.contains(unit.name()))
            .filter(|unit| {
                unit.prerequisite()
                    .is_some_and(|prerequisite| !completed.contains(prerequisite))
            })
            .collect()
    }

    /// Returns true if `unit` is optional, not completed, and unblocked
    pub fn is_eligible(&self, unit: &Unit, completed: &HashSet<String>) -> bool {
        if !unit.is_optional() || completed.contains(unit.name()) {
            return false;
        }

        match unit.prerequisite() {
            None => true,
            Some(prerequisite) => completed.contains(prerequisite),
        }
    }
}
