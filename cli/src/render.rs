//! Table rendering for query results

use comfy_table::{ContentArrangement, Table};
use gfx::{
    AttributeMap, CentralityResult, ComponentInfo, DegreeInfo, EdgeRecord, GraphInfo,
    GraphMetadata, GraphStats, Node, PathResult,
};

fn table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(header);
    table
}

fn optional<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

fn attributes_cell(attributes: &AttributeMap) -> String {
    attributes
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join(", ")
}

fn key_value(rows: Vec<(&str, String)>) -> Table {
    let mut table = table(vec!["Field", "Value"]);
    for (field, value) in rows {
        table.add_row(vec![field.to_string(), value]);
    }
    table
}

pub fn metadata(meta: &GraphMetadata) -> Table {
    key_value(vec![
        ("version", meta.version.to_string()),
        ("creator", optional(meta.creator.as_deref())),
        ("description", optional(meta.description.as_deref())),
        ("keywords", optional(meta.keywords.as_deref())),
        ("last modified", optional(meta.last_modified.as_deref())),
        ("mode", meta.mode.to_string()),
        ("edge type", meta.default_edge_type.to_string()),
        ("nodes", meta.node_count.to_string()),
        ("edges", meta.edge_count.to_string()),
    ])
}

pub fn info(info: &GraphInfo) -> Table {
    key_value(vec![
        ("version", info.version.to_string()),
        ("mode", info.mode.to_string()),
        ("edge type", info.default_edge_type.to_string()),
        ("nodes", info.node_count.to_string()),
        ("edges", info.edge_count.to_string()),
        ("node attributes", info.node_attributes.join(", ")),
        ("edge attributes", info.edge_attributes.join(", ")),
    ])
}

pub fn stats(stats: &GraphStats) -> Table {
    key_value(vec![
        ("nodes", stats.node_count.to_string()),
        ("edges", stats.edge_count.to_string()),
        ("directed", stats.is_directed.to_string()),
        ("density", format!("{:.4}", stats.density)),
        ("average degree", format!("{:.4}", stats.avg_degree)),
        ("average clustering", format!("{:.4}", stats.avg_clustering)),
        ("connected", stats.is_connected.to_string()),
        ("components", stats.num_components.to_string()),
        ("has cycles", stats.has_cycles.to_string()),
        ("diameter", optional(stats.diameter)),
        ("radius", optional(stats.radius)),
        ("average path length", optional(stats.avg_path_length.map(|v| format!("{:.4}", v)))),
    ])
}

pub fn nodes(nodes: &[&Node]) -> Table {
    let mut table = table(vec!["ID", "Label", "Attributes"]);
    for node in nodes {
        table.add_row(vec![
            node.id.clone(),
            optional(node.label.as_deref()),
            attributes_cell(&node.attributes),
        ]);
    }
    table
}

pub fn edges(edges: &[EdgeRecord<'_>]) -> Table {
    let mut table = table(vec!["ID", "Source", "Target", "Weight", "Kind", "Attributes"]);
    for edge in edges {
        table.add_row(vec![
            edge.id.to_string(),
            edge.source.to_string(),
            edge.target.to_string(),
            optional(edge.weight),
            optional(edge.kind),
            attributes_cell(edge.attributes),
        ]);
    }
    table
}

pub fn paths(paths: &[PathResult]) -> Table {
    let mut table = table(vec!["#", "Length", "Weight", "Path"]);
    for (i, path) in paths.iter().enumerate() {
        table.add_row(vec![
            (i + 1).to_string(),
            path.length.to_string(),
            optional(path.total_weight),
            path.path.join(" -> "),
        ]);
    }
    table
}

pub fn scores(result: &CentralityResult, top: usize) -> Table {
    let mut table = table(vec!["Rank", "Node", result.kind.as_str()]);
    for (rank, (node, score)) in result.top_n(top).into_iter().enumerate() {
        table.add_row(vec![(rank + 1).to_string(), node.to_string(), format!("{:.6}", score)]);
    }
    table
}

pub fn components(info: &ComponentInfo) -> Table {
    let mut table = table(vec!["#", "Size", "Members"]);
    for (i, members) in info.components.iter().enumerate() {
        table.add_row(vec![(i + 1).to_string(), members.len().to_string(), members.join(", ")]);
    }
    table
}

pub fn degrees(degrees: &[DegreeInfo]) -> Table {
    let mut table = table(vec!["Node", "In", "Out", "Total"]);
    for info in degrees {
        table.add_row(vec![
            info.node.clone(),
            info.in_degree.to_string(),
            info.out_degree.to_string(),
            info.degree.to_string(),
        ]);
    }
    table
}
