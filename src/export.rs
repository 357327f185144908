use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use clap::ValueEnum;
use petgraph::dot::{Config, Dot};
use petgraph::visit::EdgeRef;

use crate::error::Result;
use crate::graph_builder::SimilarityGraph;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Gml,
    Dot,
}

impl OutputFormat {
    /// `.dot` and `.gv` files get Graphviz output, everything else GML.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("dot") | Some("gv") => OutputFormat::Dot,
            _ => OutputFormat::Gml,
        }
    }
}

fn escape_label(label: &str) -> String {
    label.replace('&', "&amp;").replace('"', "&quot;")
}

/// Write the graph as GML, with vertex labels as node attributes.
pub fn write_gml<W: Write>(graph: &SimilarityGraph, mut out: W) -> std::io::Result<()> {
    writeln!(out, "Creator \"simgraph {}\"", env!("CARGO_PKG_VERSION"))?;
    writeln!(out, "Version 1")?;
    writeln!(out, "graph")?;
    writeln!(out, "[")?;
    writeln!(out, "  directed 0")?;
    for node in graph.node_indices() {
        writeln!(out, "  node")?;
        writeln!(out, "  [")?;
        writeln!(out, "    id {}", node.index())?;
        writeln!(out, "    label \"{}\"", escape_label(&graph[node]))?;
        writeln!(out, "  ]")?;
    }
    for edge in graph.edge_references() {
        writeln!(out, "  edge")?;
        writeln!(out, "  [")?;
        writeln!(out, "    source {}", edge.source().index())?;
        writeln!(out, "    target {}", edge.target().index())?;
        writeln!(out, "  ]")?;
    }
    writeln!(out, "]")?;
    out.flush()
}

fn escape_dot(label: &str) -> String {
    label.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Graphviz rendering of the graph.
pub fn to_dot(graph: &SimilarityGraph) -> String {
    let viz = Dot::with_attr_getters(
        graph,
        &[Config::EdgeNoLabel, Config::NodeNoLabel],
        &|_, _| String::new(),
        &|_, (_, label)| format!("label=\"{}\"", escape_dot(label)),
    );
    format!("{:?}", viz)
}

pub fn write_dot<W: Write>(graph: &SimilarityGraph, mut out: W) -> std::io::Result<()> {
    out.write_all(to_dot(graph).as_bytes())?;
    out.flush()
}

/// Write `graph` to `path` in the given format.
pub fn export(graph: &SimilarityGraph, path: &Path, format: OutputFormat) -> Result<()> {
    let out = BufWriter::new(File::create(path)?);
    match format {
        OutputFormat::Gml => write_gml(graph, out)?,
        OutputFormat::Dot => write_dot(graph, out)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_graph() -> SimilarityGraph {
        let mut graph = SimilarityGraph::new_undirected();
        let a = graph.add_node("g1".to_string());
        let b = graph.add_node("g\"2\"".to_string());
        graph.add_node("g3".to_string());
        graph.add_edge(a, b, ());
        graph
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(OutputFormat::from_path(Path::new("out.gml")), OutputFormat::Gml);
        assert_eq!(OutputFormat::from_path(Path::new("out.DOT")), OutputFormat::Dot);
        assert_eq!(OutputFormat::from_path(Path::new("dir/out.gv")), OutputFormat::Dot);
        assert_eq!(OutputFormat::from_path(Path::new("out")), OutputFormat::Gml);
    }

    #[test]
    fn test_write_gml() {
        let mut buf = Vec::new();
        write_gml(&sample_graph(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.starts_with("Creator \"simgraph"));
        assert!(text.contains("  directed 0\n"));
        assert_eq!(text.matches("  node\n").count(), 3);
        assert_eq!(text.matches("  edge\n").count(), 1);
        assert!(text.contains("    label \"g&quot;2&quot;\"\n"));
        assert!(text.contains("    source 0\n    target 1\n"));
        assert!(text.trim_end().ends_with(']'));
    }

    #[test]
    fn test_to_dot() {
        let dot = to_dot(&sample_graph());
        assert!(dot.starts_with("graph {"));
        assert!(dot.contains("label=\"g1\""));
        assert!(dot.contains("label=\"g\\\"2\\\"\""));
        assert!(dot.contains("0 -- 1"));
    }

    #[test]
    fn test_dot_escapes_backslashes() {
        assert_eq!(escape_dot(r"a\b"), r"a\\b");
        assert_eq!(escape_dot(r#"tail\"#), r#"tail\\"#);
        assert_eq!(escape_dot(r#"q"\"#), r#"q\"\\"#);

        let mut graph = SimilarityGraph::new_undirected();
        graph.add_node(r"ends\".to_string());
        assert!(to_dot(&graph).contains(r#"label="ends\\""#));
    }

    #[test]
    fn test_export_to_file() {
        let path = std::env::temp_dir().join(format!("simgraph_export_{}.gml", std::process::id()));
        export(&sample_graph(), &path, OutputFormat::Gml).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert!(text.contains("label \"g3\""));
    }
}
