use std::collections::HashMap;

use petgraph::graph::{DiGraph, NodeIndex};

use crate::suite::builder::Suite;

/// A dependency edge in the graph view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepEdge {
    pub with_return: bool,
}

/// A suite's dependency graph backed by petgraph.
///
/// Nodes are entry names in registration order; an edge points from an entry
/// to each entry it depends on.
pub struct SuiteGraph {
    pub name: String,
    pub graph: DiGraph<String, DepEdge>,
    pub node_indices: Vec<NodeIndex>,
}

/// Build a petgraph `DiGraph` from a suite's declared dependencies.
///
/// Edges targeting unknown entries are skipped here; the resolver rejects
/// them before dispatch.
pub fn build(suite: &Suite) -> SuiteGraph {
    let mut graph = DiGraph::new();
    let mut by_name: HashMap<&str, NodeIndex> = HashMap::new();
    let node_indices: Vec<NodeIndex> = suite
        .entries()
        .iter()
        .map(|e| {
            let idx = graph.add_node(e.name.clone());
            by_name.insert(e.name.as_str(), idx);
            idx
        })
        .collect();

    for entry in suite.entries() {
        let from = by_name[entry.name.as_str()];
        for dep in &entry.dependencies {
            if let Some(&to) = by_name.get(dep.name.as_str()) {
                graph.add_edge(
                    from,
                    to,
                    DepEdge {
                        with_return: dep.with_return,
                    },
                );
            }
        }
    }

    SuiteGraph {
        name: suite.name.clone(),
        graph,
        node_indices,
    }
}
