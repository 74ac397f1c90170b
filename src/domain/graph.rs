//! Prerequisite graph for curriculum units
//!
//! Tracks which unit unlocks which, with cycle detection and a
//! prerequisites-first study order. Uses petgraph for graph operations.

use petgraph::algo::{is_cyclic_directed, toposort};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use std::collections::HashMap;
use thiserror::Error;

use super::unit::Unit;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum GraphError {
    #[error("Prerequisite would create a cycle: {0} -> {1}")]
    CycleDetected(String, String),

    #[error("Unit not found: {0}")]
    UnitNotFound(String),

    #[error("Unit cannot be its own prerequisite: {0}")]
    SelfPrerequisite(String),
}

/// Directed graph of prerequisite edges between units of one course
///
/// The edge direction is `prerequisite -> unit`, so a topological order
/// lists prerequisites before the units they unlock.
#[derive(Debug, Default)]
pub struct PrerequisiteGraph {
    graph: DiGraph<String, ()>,
    node_map: HashMap<String, NodeIndex>,
}

impl PrerequisiteGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a graph from units and their resolved prerequisites
    pub fn from_units<'a>(units: impl IntoIterator<Item = &'a Unit>) -> Result<Self, GraphError> {
        let mut graph = Self::new();

        // Nodes first, so prerequisites listed later in the table resolve
        let units: Vec<_> = units.into_iter().collect();
        for unit in &units {
            graph.add_unit(unit.name());
        }

        for unit in &units {
            if let Some(prerequisite) = unit.prerequisite() {
                graph.add_prerequisite(unit.name(), prerequisite)?;
            }
        }

        Ok(graph)
    }

    /// Adds a unit node (no-op if already present)
    pub fn add_unit(&mut self, name: &str) {
        if !self.node_map.contains_key(name) {
            let idx = self.graph.add_node(name.to_string());
            self.node_map.insert(name.to_string(), idx);
        }
    }

    /// Adds an edge meaning `prerequisite` must be completed before `unit`
    ///
    /// The edge is rolled back if it would close a cycle.
    pub fn add_prerequisite(&mut self, unit: &str, prerequisite: &str) -> Result<(), GraphError> {
        if unit == prerequisite {
            return Err(GraphError::SelfPrerequisite(unit.to_string()));
        }

        let unit_idx = *self
            .node_map
            .get(unit)
            .ok_or_else(|| GraphError::UnitNotFound(unit.to_string()))?;
        let prereq_idx = *self
            .node_map
            .get(prerequisite)
            .ok_or_else(|| GraphError::UnitNotFound(prerequisite.to_string()))?;

        let edge = self.graph.add_edge(prereq_idx, unit_idx, ());

        if is_cyclic_directed(&self.graph) {
            self.graph.remove_edge(edge);
            return Err(GraphError::CycleDetected(
                unit.to_string(),
                prerequisite.to_string(),
            ));
        }

        Ok(())
    }

    /// Returns the direct prerequisites of a unit
    pub fn prerequisites(&self, unit: &str) -> Vec<String> {
        self.neighbors(unit, Direction::Incoming)
    }

    /// Returns the units that list `unit` as their prerequisite
    pub fn dependents(&self, unit: &str) -> Vec<String> {
        self.neighbors(unit, Direction::Outgoing)
    }

    fn neighbors(&self, unit: &str, direction: Direction) -> Vec<String> {
        let Some(idx) = self.node_map.get(unit) else {
            return vec![];
        };

        let mut names: Vec<String> = self
            .graph
            .neighbors_directed(*idx, direction)
            .filter_map(|n| self.graph.node_weight(n).cloned())
            .collect();
        // petgraph yields neighbors newest-edge first
        names.reverse();
        names
    }

    /// Returns all units with prerequisites ahead of the units they unlock
    pub fn study_order(&self) -> Result<Vec<String>, GraphError> {
        toposort(&self.graph, None)
            .map(|order| {
                order
                    .into_iter()
                    .filter_map(|idx| self.graph.node_weight(idx).cloned())
                    .collect()
            })
            .map_err(|cycle| {
                let name = self
                    .graph
                    .node_weight(cycle.node_id())
                    .cloned()
                    .unwrap_or_default();
                GraphError::CycleDetected(name.clone(), name)
            })
    }

    pub fn contains(&self, unit: &str) -> bool {
        self.node_map.contains_key(unit)
    }

    pub fn len(&self) -> usize {
        self.node_map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_map.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph_with(names: &[&str]) -> PrerequisiteGraph {
        let mut graph = PrerequisiteGraph::new();
        for name in names {
            graph.add_unit(name);
        }
        graph
    }

    #[test]
    fn empty_graph() {
        let graph = PrerequisiteGraph::new();
        assert!(graph.is_empty());
        assert_eq!(graph.len(), 0);
    }

    #[test]
    fn add_unit_is_idempotent() {
        let mut graph = graph_with(&["Calculus I"]);
        graph.add_unit("Calculus I");
        assert_eq!(graph.len(), 1);
        assert!(graph.contains("Calculus I"));
    }

    #[test]
    fn add_prerequisite() {
        let mut graph = graph_with(&["Calculus I", "Calculus II"]);

        graph.add_prerequisite("Calculus II", "Calculus I").unwrap();

        assert_eq!(graph.prerequisites("Calculus II"), vec!["Calculus I"]);
        assert_eq!(graph.dependents("Calculus I"), vec!["Calculus II"]);
    }

    #[test]
    fn cycle_detection() {
        let mut graph = graph_with(&["A", "B", "C"]);

        graph.add_prerequisite("B", "A").unwrap();
        graph.add_prerequisite("C", "B").unwrap();
        let result = graph.add_prerequisite("A", "C");

        assert!(matches!(result, Err(GraphError::CycleDetected(_, _))));
        // Rolled back
        assert!(graph.prerequisites("A").is_empty());
        assert!(graph.study_order().is_ok());
    }

    #[test]
    fn self_prerequisite_rejected() {
        let mut graph = graph_with(&["A"]);
        let result = graph.add_prerequisite("A", "A");
        assert_eq!(result, Err(GraphError::SelfPrerequisite("A".to_string())));
    }

    #[test]
    fn unknown_unit_returns_error() {
        let mut graph = graph_with(&["A"]);
        let result = graph.add_prerequisite("A", "Missing");
        assert_eq!(result, Err(GraphError::UnitNotFound("Missing".to_string())));
    }

    #[test]
    fn study_order_puts_prerequisites_first() {
        let mut graph = graph_with(&["Calculus III", "Calculus II", "Calculus I"]);
        graph.add_prerequisite("Calculus III", "Calculus II").unwrap();
        graph.add_prerequisite("Calculus II", "Calculus I").unwrap();

        let order = graph.study_order().unwrap();
        let pos = |name: &str| order.iter().position(|n| n == name).unwrap();

        assert!(pos("Calculus I") < pos("Calculus II"));
        assert!(pos("Calculus II") < pos("Calculus III"));
    }

    #[test]
    fn from_units() {
        let calc1 = Unit::new("Calculus I", 60, false).unwrap();
        let calc2 = Unit::new("Calculus II", 60, true)
            .unwrap()
            .with_prerequisite("Calculus I")
            .unwrap();

        // Prerequisite listed after its dependent
        let graph = PrerequisiteGraph::from_units([&calc2, &calc1]).unwrap();

        assert_eq!(graph.len(), 2);
        assert_eq!(graph.prerequisites("Calculus II"), vec!["Calculus I"]);
    }

    #[test]
    fn from_units_with_missing_prerequisite() {
        let orphan = Unit::new("Compilers", 60, true)
            .unwrap()
            .with_prerequisite("Automata")
            .unwrap();

        let result = PrerequisiteGraph::from_units([&orphan]);
        assert_eq!(result.unwrap_err(), GraphError::UnitNotFound("Automata".to_string()));
    }
}
