//! GraphML export

use super::xml_error;
use crate::error::GfxResult;
use crate::graph::{infer_types, AttributeMap, AttributeType, Graph};
use indexmap::IndexMap;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

const NAMESPACE: &str = "http://graphml.graphdrawing.org/xmlns";
const LABEL_KEY: &str = "label";
const WEIGHT_KEY: &str = "weight";

/// `<key>` ids for one element class, by attribute name
struct Keys {
    ids: IndexMap<String, (String, AttributeType)>,
}

impl Keys {
    fn new(prefix: &str, columns: IndexMap<String, AttributeType>) -> Self {
        let ids = columns
            .into_iter()
            .enumerate()
            .map(|(i, (name, kind))| (name, (format!("{}{}", prefix, i), kind)))
            .collect();
        Keys { ids }
    }

    fn id(&self, name: &str) -> Option<&str> {
        self.ids.get(name).map(|(id, _)| id.as_str())
    }
}

fn write_key(
    writer: &mut Writer<Vec<u8>>,
    id: &str,
    class: &str,
    name: &str,
    kind: AttributeType,
) -> GfxResult<()> {
    let mut key = BytesStart::new("key");
    key.push_attribute(("id", id));
    key.push_attribute(("for", class));
    key.push_attribute(("attr.name", name));
    key.push_attribute(("attr.type", kind.xml_name()));
    writer.write_event(Event::Empty(key)).map_err(xml_error)
}

fn write_data(writer: &mut Writer<Vec<u8>>, key: &str, value: &str) -> GfxResult<()> {
    let mut data = BytesStart::new("data");
    data.push_attribute(("key", key));
    writer.write_event(Event::Start(data)).map_err(xml_error)?;
    writer
        .write_event(Event::Text(BytesText::new(value)))
        .map_err(xml_error)?;
    writer
        .write_event(Event::End(BytesEnd::new("data")))
        .map_err(xml_error)
}

fn write_attribute_data(writer: &mut Writer<Vec<u8>>, keys: &Keys, attributes: &AttributeMap) -> GfxResult<()> {
    for (name, value) in attributes {
        if let Some(key) = keys.id(name) {
            write_data(writer, key, &value.to_string())?;
        }
    }
    Ok(())
}

/// Serialize as GraphML. Node labels and edge weights get dedicated keys
/// next to the attribute columns.
pub fn write(graph: &Graph) -> GfxResult<String> {
    let node_keys = Keys::new("n", infer_types(graph.nodes().map(|n| &n.attributes)));
    let edge_keys = Keys::new("e", infer_types(graph.edges().map(|e| &e.attributes)));
    let has_labels = graph.nodes().any(|n| n.label.is_some());
    let has_weights = graph.edges().any(|e| e.weight.is_some());

    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(xml_error)?;

    let mut root = BytesStart::new("graphml");
    root.push_attribute(("xmlns", NAMESPACE));
    writer.write_event(Event::Start(root)).map_err(xml_error)?;

    if has_labels {
        write_key(&mut writer, LABEL_KEY, "node", "label", AttributeType::String)?;
    }
    for (name, (id, kind)) in &node_keys.ids {
        write_key(&mut writer, id, "node", name, *kind)?;
    }
    if has_weights {
        write_key(&mut writer, WEIGHT_KEY, "edge", "weight", AttributeType::Float)?;
    }
    for (name, (id, kind)) in &edge_keys.ids {
        write_key(&mut writer, id, "edge", name, *kind)?;
    }

    let mut graph_tag = BytesStart::new("graph");
    graph_tag.push_attribute(("id", "G"));
    graph_tag.push_attribute((
        "edgedefault",
        if graph.is_directed() { "directed" } else { "undirected" },
    ));
    writer.write_event(Event::Start(graph_tag)).map_err(xml_error)?;

    for node in graph.nodes() {
        let mut tag = BytesStart::new("node");
        tag.push_attribute(("id", node.id.as_str()));
        if node.label.is_none() && node.attributes.is_empty() {
            writer.write_event(Event::Empty(tag)).map_err(xml_error)?;
            continue;
        }
        writer.write_event(Event::Start(tag)).map_err(xml_error)?;
        if let Some(label) = &node.label {
            write_data(&mut writer, LABEL_KEY, label)?;
        }
        write_attribute_data(&mut writer, &node_keys, &node.attributes)?;
        writer
            .write_event(Event::End(BytesEnd::new("node")))
            .map_err(xml_error)?;
    }

    for edge in graph.edges() {
        let (source, target) = graph.endpoints(edge);
        let mut tag = BytesStart::new("edge");
        if let Some(id) = &edge.id {
            tag.push_attribute(("id", id.as_str()));
        }
        tag.push_attribute(("source", source));
        tag.push_attribute(("target", target));
        if edge.weight.is_none() && edge.attributes.is_empty() {
            writer.write_event(Event::Empty(tag)).map_err(xml_error)?;
            continue;
        }
        writer.write_event(Event::Start(tag)).map_err(xml_error)?;
        if let Some(weight) = edge.weight {
            write_data(&mut writer, WEIGHT_KEY, &format!("{:?}", weight))?;
        }
        write_attribute_data(&mut writer, &edge_keys, &edge.attributes)?;
        writer
            .write_event(Event::End(BytesEnd::new("edge")))
            .map_err(xml_error)?;
    }

    writer
        .write_event(Event::End(BytesEnd::new("graph")))
        .map_err(xml_error)?;
    writer
        .write_event(Event::End(BytesEnd::new("graphml")))
        .map_err(xml_error)?;

    String::from_utf8(writer.into_inner()).map_err(xml_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{DefaultEdgeType, Node};

    #[test]
    fn test_typed_keys_and_data() {
        let mut builder = Graph::builder(DefaultEdgeType::Directed);
        builder.add_node(Node::new("a").with_label("A & B").with_attribute("cores", 4i64));
        builder.add_node(Node::new("b").with_attribute("cores", 2.5));
        builder.add_edge("a", "b").weight = Some(1.0);
        let xml = write(&builder.build()).unwrap();

        assert!(xml.contains(r#"<key id="label" for="node" attr.name="label" attr.type="string"/>"#));
        // integer and float values widen to one double column
        assert!(xml.contains(r#"<key id="n0" for="node" attr.name="cores" attr.type="double"/>"#));
        assert!(xml.contains(r#"<key id="weight" for="edge" attr.name="weight" attr.type="double"/>"#));
        assert!(xml.contains(r#"edgedefault="directed""#));
        assert!(xml.contains("<data key=\"label\">A &amp; B</data>"));
        assert!(xml.contains("<data key=\"weight\">1.0</data>"));
    }

    #[test]
    fn test_bare_graph() {
        let mut builder = Graph::builder(DefaultEdgeType::Undirected);
        builder.add_edge("x", "y");
        let xml = write(&builder.build()).unwrap();
        assert!(!xml.contains("<key"));
        assert!(xml.contains(r#"<node id="x"/>"#));
        assert!(xml.contains(r#"<edge source="x" target="y"/>"#));
    }
}
