use crate::graph::builder::SuiteGraph;

/// Emit a suite's dependency graph as a Mermaid flowchart diagram.
pub fn emit_mermaid(sg: &SuiteGraph) -> String {
    let mut out = String::from("graph TD\n");

    for &idx in &sg.node_indices {
        let name = &sg.graph[idx];
        out.push_str(&format!("  {name}\n"));
    }

    for edge_idx in sg.graph.edge_indices() {
        let (src, dst) = sg.graph.edge_endpoints(edge_idx).unwrap();
        let src_name = &sg.graph[src];
        let dst_name = &sg.graph[dst];
        if sg.graph[edge_idx].with_return {
            out.push_str(&format!("  {src_name} -->|\"return\"| {dst_name}\n"));
        } else {
            out.push_str(&format!("  {src_name} --> {dst_name}\n"));
        }
    }

    out
}
