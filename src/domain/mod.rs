//! Domain models for the curriculum graph
//!
//! Contains the core entities and queries without any I/O concerns.

mod unit;
mod course;
mod graph;
mod eligibility;

pub use unit::{Unit, UnitError};
pub use course::{Course, CourseError};
pub use graph::{PrerequisiteGraph, GraphError};
pub use eligibility::EligibilityResolver;
