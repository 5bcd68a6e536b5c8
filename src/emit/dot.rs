use crate::graph::builder::SuiteGraph;

/// Emit a suite's dependency graph as a DOT (Graphviz) diagram.
///
/// An edge points from an entry to the entry it depends on; edges that
/// forward a return value are labeled.
pub fn emit_dot(sg: &SuiteGraph) -> String {
    let mut out = format!("digraph \"{}\" {{\n", sg.name);

    for &idx in &sg.node_indices {
        let name = &sg.graph[idx];
        out.push_str(&format!("  \"{name}\";\n"));
    }

    for edge_idx in sg.graph.edge_indices() {
        let (src, dst) = sg.graph.edge_endpoints(edge_idx).unwrap();
        let src_name = &sg.graph[src];
        let dst_name = &sg.graph[dst];
        if sg.graph[edge_idx].with_return {
            out.push_str(&format!(
                "  \"{src_name}\" -> \"{dst_name}\" [label=\"return\"];\n"
            ));
        } else {
            out.push_str(&format!("  \"{src_name}\" -> \"{dst_name}\";\n"));
        }
    }

    out.push_str("}\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    use crate::graph::builder::build;
    use crate::suite::builder::Suite;
    use crate::suite::entry::Entry;

    fn noop(name: &str) -> Entry {
        Entry::new(name, |_| Ok(Value::Null))
    }

    #[test]
    fn dot_empty_suite() {
        let suite = Suite::builder("empty").build();
        let dot = emit_dot(&build(&suite));
        assert!(dot.contains("digraph \"empty\""));
        assert!(dot.ends_with("}\n"));
    }

    #[test]
    fn dot_node_per_entry() {
        let suite = Suite::builder("simple")
            .member(noop("test_a"))
            .member(noop("test_b"))
            .build();
        let dot = emit_dot(&build(&suite));
        assert!(dot.contains("\"test_a\";"));
        assert!(dot.contains("\"test_b\";"));
    }

    #[test]
    fn dot_edge_per_dependency() {
        let suite = Suite::builder("simple")
            .member(noop("test_a").depend_on("test_b", false).unwrap())
            .member(noop("test_b"))
            .build();
        let dot = emit_dot(&build(&suite));
        assert!(dot.contains("\"test_a\" -> \"test_b\";"));
    }

    #[test]
    fn dot_labels_return_forwarding_edges() {
        let suite = Suite::builder("simple")
            .member(noop("test_a").depend_on("test_b", true).unwrap())
            .member(noop("test_b"))
            .build();
        let dot = emit_dot(&build(&suite));
        assert!(dot.contains("\"test_a\" -> \"test_b\" [label=\"return\"];"));
    }
}
