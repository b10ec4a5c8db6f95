//! Reconciliation of visual nodes against a new state set
//!
//! Identity is exact string equality on the state id. Nodes of surviving
//! states stay untouched in their slot, nodes of new states are appended in
//! state order, and the rest are handed back for destruction.

use anyhow::Result;
use indexmap::IndexSet;
use tracing::{debug, span, trace, Level};

use super::visual::{NodeMap, VisualNode};

/// Outcome of one reconciliation
#[derive(Debug, Default)]
pub struct Reconciliation {
    /// Nodes whose state disappeared
    pub destroyed: Vec<VisualNode>,
    /// Number of nodes built by this reconciliation
    pub created: usize,
}

/// Match `current` states against the nodes in `nodes`, in place
///
/// `create` is called once for every state without a node. Nodes are only
/// dropped from the map after every creation succeeded, so on error `nodes`
/// still holds each node that exists, including the ones built before the
/// failure.
pub fn reconcile<F>(
    nodes: &mut NodeMap,
    current: &IndexSet<String>,
    mut create: F,
) -> Result<Reconciliation>
where
    F: FnMut(&str) -> Result<VisualNode>,
{
    let diff_span = span!(
        Level::DEBUG,
        "reconcile",
        previous = nodes.len(),
        current = current.len()
    );
    let _enter = diff_span.enter();

    let mut created = 0;
    for id in current {
        if !nodes.contains_key(id) {
            let node = create(id)?;
            trace!(id = %id, handle = %node.handle, "Created node");
            nodes.insert(id.clone(), node);
            created += 1;
        }
    }

    let mut destroyed = Vec::new();
    for (id, node) in std::mem::take(nodes) {
        if current.contains(&id) {
            trace!(id = %id, handle = %node.handle, "Reusing node");
            nodes.insert(id, node);
        } else {
            trace!(id = %id, handle = %node.handle, "Destroying node");
            destroyed.push(node);
        }
    }

    debug!(
        retained = nodes.len() - created,
        created,
        destroyed = destroyed.len(),
        "Reconciled nodes"
    );
    Ok(Reconciliation { destroyed, created })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{NodeHandle, Point};

    fn states(ids: &[&str]) -> IndexSet<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    /// Builds nodes with increasing handles starting at `start`
    fn factory(start: usize) -> impl FnMut(&str) -> Result<VisualNode> {
        let mut next = start;
        move |id| {
            next += 1;
            Ok(VisualNode::new(id, NodeHandle::new(next), 8.0))
        }
    }

    fn ids(nodes: &NodeMap) -> Vec<&str> {
        nodes.keys().map(String::as_str).collect()
    }

    #[test]
    fn test_creates_all_from_empty() {
        let mut nodes = NodeMap::new();
        let result = reconcile(&mut nodes, &states(&["A", "B"]), factory(0)).unwrap();
        assert_eq!(ids(&nodes), vec!["A", "B"]);
        assert_eq!(result.created, 2);
        assert!(result.destroyed.is_empty());
    }

    #[test]
    fn test_reuses_existing_nodes() {
        let mut nodes = NodeMap::new();
        reconcile(&mut nodes, &states(&["A", "B"]), factory(0)).unwrap();
        nodes.get_mut("A").unwrap().position = Point::new(39.0, 39.0);
        let handle_a = nodes["A"].handle;
        let handle_b = nodes["B"].handle;

        let second = reconcile(&mut nodes, &states(&["A", "B", "C"]), factory(10)).unwrap();
        assert_eq!(nodes["A"].handle, handle_a);
        assert_eq!(nodes["B"].handle, handle_b);
        assert_eq!(nodes["A"].position, Point::new(39.0, 39.0));
        assert_eq!(second.created, 1);
        assert!(second.destroyed.is_empty());
    }

    #[test]
    fn test_destroys_missing_states() {
        let mut nodes = NodeMap::new();
        reconcile(&mut nodes, &states(&["A", "B"]), factory(0)).unwrap();
        let second = reconcile(&mut nodes, &states(&["C", "D"]), factory(10)).unwrap();

        let destroyed: Vec<&str> = second.destroyed.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(destroyed, vec!["A", "B"]);
        assert_eq!(ids(&nodes), vec!["C", "D"]);
        assert_eq!(second.created, 2);
    }

    #[test]
    fn test_retained_nodes_keep_their_slot() {
        let mut nodes = NodeMap::new();
        reconcile(&mut nodes, &states(&["A", "B", "C"]), factory(0)).unwrap();
        reconcile(&mut nodes, &states(&["D", "C", "A"]), factory(10)).unwrap();
        assert_eq!(ids(&nodes), vec!["A", "C", "D"]);
    }

    #[test]
    fn test_create_failure_propagates() {
        let mut nodes = NodeMap::new();
        let result = reconcile(&mut nodes, &states(&["A"]), |_| {
            Err(anyhow::anyhow!("surface unavailable"))
        });
        assert!(result.is_err());
        assert!(nodes.is_empty());
    }

    #[test]
    fn test_create_failure_keeps_existing_nodes() {
        let mut nodes = NodeMap::new();
        reconcile(&mut nodes, &states(&["A", "B"]), factory(0)).unwrap();
        let handle_a = nodes["A"].handle;

        // C is built, D fails; A and B must not be dropped
        let mut make = factory(10);
        let result = reconcile(&mut nodes, &states(&["A", "C", "D"]), |id| {
            if id == "D" {
                Err(anyhow::anyhow!("surface unavailable"))
            } else {
                make(id)
            }
        });
        assert!(result.is_err());
        assert_eq!(ids(&nodes), vec!["A", "B", "C"]);
        assert_eq!(nodes["A"].handle, handle_a);

        let retry = reconcile(&mut nodes, &states(&["A", "C", "D"]), factory(20)).unwrap();
        assert_eq!(retry.created, 1);
        assert_eq!(nodes["A"].handle, handle_a);
        let destroyed: Vec<&str> = retry.destroyed.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(destroyed, vec!["B"]);
    }
}
