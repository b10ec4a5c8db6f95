//! State machine database implementation
//!
//! Stores the states and transitions produced by one parse. States exist
//! only as transition endpoints and keep first-appearance order.

use crate::core::{Database, Transition};
use anyhow::{bail, Result};
use indexmap::IndexSet;

/// Ordered state set plus transition sequence
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateDatabase {
    states: IndexSet<String>,
    transitions: Vec<Transition>,
}

impl StateDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a transition, registering both endpoints as states
    pub fn add_transition(&mut self, transition: Transition) {
        if !self.states.contains(&transition.from) {
            self.states.insert(transition.from.clone());
        }
        if !self.states.contains(&transition.to) {
            self.states.insert(transition.to.clone());
        }
        self.transitions.push(transition);
    }

    /// States in first-appearance order
    pub fn states(&self) -> &IndexSet<String> {
        &self.states
    }

    /// Transitions in text order
    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    pub fn contains_state(&self, id: &str) -> bool {
        self.states.contains(id)
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    pub fn transition_count(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    /// Clear all data
    pub fn clear_all(&mut self) {
        self.states.clear();
        self.transitions.clear();
    }
}

impl Database for StateDatabase {
    type Node = String;
    type Edge = Transition;

    /// States exist only as transition endpoints, so a bare state is refused
    fn add_node(&mut self, node: Self::Node) -> Result<()> {
        bail!("state '{node}' needs a transition")
    }

    fn add_edge(&mut self, edge: Self::Edge) -> Result<()> {
        self.add_transition(edge);
        Ok(())
    }

    fn get_node(&self, id: &str) -> Option<&Self::Node> {
        self.states.get(id)
    }

    fn nodes(&self) -> impl Iterator<Item = &Self::Node> {
        self.states.iter()
    }

    fn edges(&self) -> impl Iterator<Item = &Self::Edge> {
        self.transitions.iter()
    }

    fn clear(&mut self) {
        self.clear_all()
    }

    fn node_count(&self) -> usize {
        self.state_count()
    }

    fn edge_count(&self) -> usize {
        self.transition_count()
    }
}
