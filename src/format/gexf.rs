//! GEXF reading and writing
//!
//! The reader is a single streaming pass over the document. Attribute
//! columns are declared before the nodes and edges that use them, so every
//! `<attvalue>` is typed as soon as it is read. Byte input is decoded
//! according to the XML declaration, so Latin-1 documents load as well as
//! UTF-8 ones. Nested `<nodes>` of hierarchical documents are flattened into
//! the graph with each child's [`Node::parent`] set.
//!
//! The writer emits GEXF 1.3. The format has no slot for graph-level
//! attributes, so [`Graph::attributes`] is not written; node-link JSON
//! keeps it.

use super::xml_error;
use crate::error::{GfxError, GfxResult};
use crate::graph::{
    infer_types, AttributeMap, AttributeType, AttributeValue, DefaultEdgeType, DocumentMeta,
    GexfVersion, Graph, GraphBuilder, GraphMode, Node,
};
use indexmap::IndexMap;
use quick_xml::encoding::Decoder;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::collections::HashMap;
use std::io::{self, BufRead};
use tracing::debug;

/// One declared attribute column
#[derive(Debug, Clone)]
struct Column {
    title: String,
    kind: AttributeType,
    default: Option<AttributeValue>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Class {
    Node,
    Edge,
}

/// A node whose closing tag has not been read yet
#[derive(Debug)]
struct PendingNode {
    node: Node,
    /// Stack depth of its `<node>` element
    depth: usize,
    /// Position in document order
    slot: usize,
}

/// Edge fields collected until `</edge>`
#[derive(Debug, Default)]
struct PendingEdge {
    id: Option<String>,
    source: String,
    target: String,
    weight: Option<f64>,
    label: Option<String>,
    kind: Option<String>,
    start: Option<String>,
    end: Option<String>,
    attributes: AttributeMap,
}

/// Plain attribute lookup for one start tag
struct Attrs(HashMap<String, String>);

impl Attrs {
    fn read(tag: &BytesStart<'_>, decoder: Decoder) -> GfxResult<Self> {
        let mut values = HashMap::new();
        for attr in tag.attributes() {
            let attr = attr.map_err(xml_error)?;
            let key = decode_name(attr.key.as_ref(), decoder)?;
            let value = attr.decode_and_unescape_value(decoder).map_err(xml_error)?.into_owned();
            values.insert(key, value);
        }
        Ok(Attrs(values))
    }

    fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    fn owned(&self, key: &str) -> Option<String> {
        self.0.get(key).cloned()
    }

    fn require(&self, key: &str, element: &str) -> GfxResult<String> {
        self.owned(key)
            .ok_or_else(|| GfxError::format(format!("<{}> is missing required attribute '{}'", element, key)))
    }
}

#[derive(Default)]
struct GexfReader {
    /// Local names of the currently open elements
    stack: Vec<String>,
    seen_root: bool,
    meta: DocumentMeta,
    builder: Option<GraphBuilder>,
    mode: GraphMode,
    columns: IndexMap<(Class, String), Column>,
    column_class: Option<Class>,
    open_column: Option<(Class, String)>,
    /// Open nodes, innermost last
    nodes: Vec<PendingNode>,
    /// Closed nodes waiting for their outermost ancestor to close
    finished: Vec<Option<Node>>,
    edge: Option<PendingEdge>,
    text: String,
}

impl GexfReader {
    fn parent(&self) -> Option<&str> {
        self.stack.last().map(String::as_str)
    }

    fn grandparent(&self) -> Option<&str> {
        self.stack.len().checked_sub(2).map(|i| self.stack[i].as_str())
    }

    fn in_graph_list(&self, list: &str) -> bool {
        self.parent() == Some(list) && self.grandparent() == Some("graph")
    }

    /// Whether the innermost open node sits at `depth`
    fn current_node_at(&self, depth: usize) -> bool {
        self.nodes.last().map(|pending| pending.depth) == Some(depth)
    }

    /// `<nodes>` directly under `<graph>` or under the node being read
    fn in_node_list(&self) -> bool {
        if self.parent() != Some("nodes") {
            return false;
        }
        match self.grandparent() {
            Some("graph") => true,
            Some("node") => self.current_node_at(self.stack.len() - 2),
            _ => false,
        }
    }

    fn dynamic(&self) -> bool {
        self.mode == GraphMode::Dynamic
    }

    fn builder(&mut self) -> GfxResult<&mut GraphBuilder> {
        self.builder
            .as_mut()
            .ok_or_else(|| GfxError::format("content outside of <graph>"))
    }

    fn open(&mut self, name: &str, tag: &BytesStart<'_>, decoder: Decoder) -> GfxResult<()> {
        if !self.seen_root {
            if name != "gexf" {
                return Err(GfxError::format(format!("root element is <{}>, expected <gexf>", name)));
            }
            self.seen_root = true;
            let attrs = Attrs::read(tag, decoder)?;
            self.meta.version = detect_version(&attrs)?;
            return Ok(());
        }

        match name {
            "meta" if self.parent() == Some("gexf") => {
                let attrs = Attrs::read(tag, decoder)?;
                self.meta.last_modified = attrs.owned("lastmodifieddate");
            }
            "creator" | "description" | "keywords" if self.parent() == Some("meta") => {
                self.text.clear();
            }
            "graph" if self.parent() == Some("gexf") => {
                if self.builder.is_some() {
                    return Err(GfxError::format("document contains more than one <graph>"));
                }
                let attrs = Attrs::read(tag, decoder)?;
                let edge_type = match attrs.get("defaultedgetype") {
                    Some(value) => DefaultEdgeType::parse(value)?,
                    None => DefaultEdgeType::Undirected,
                };
                let mode = match attrs.get("mode") {
                    Some(value) => GraphMode::parse(value)?,
                    None => GraphMode::Static,
                };
                self.mode = mode;
                self.builder = Some(GraphBuilder::new(edge_type).mode(mode));
            }
            "attributes" if self.parent() == Some("graph") => {
                let attrs = Attrs::read(tag, decoder)?;
                self.column_class = match attrs.get("class") {
                    Some("node") => Some(Class::Node),
                    Some("edge") => Some(Class::Edge),
                    other => {
                        debug!(class = ?other, "skipping attribute declarations");
                        None
                    }
                };
            }
            "attribute" if self.parent() == Some("attributes") => {
                if let Some(class) = self.column_class {
                    let attrs = Attrs::read(tag, decoder)?;
                    let id = attrs.require("id", "attribute")?;
                    let title = attrs.owned("title").unwrap_or_else(|| id.clone());
                    let kind = AttributeType::from_gexf(attrs.get("type").unwrap_or("string"));
                    self.columns.insert(
                        (class, id.clone()),
                        Column {
                            title,
                            kind,
                            default: None,
                        },
                    );
                    self.open_column = Some((class, id));
                }
            }
            "default" if self.parent() == Some("attribute") => {
                self.text.clear();
            }
            "node" if self.in_node_list() => {
                let attrs = Attrs::read(tag, decoder)?;
                let mut node = Node::new(attrs.require("id", "node")?);
                node.label = attrs.owned("label");
                node.parent = match self.nodes.last() {
                    Some(outer) => Some(outer.node.id.clone()),
                    None => attrs.owned("pid"),
                };
                if self.dynamic() {
                    node.start = attrs.owned("start").or_else(|| attrs.owned("startopen"));
                    node.end = attrs.owned("end").or_else(|| attrs.owned("endopen"));
                }
                let slot = self.finished.len();
                self.finished.push(None);
                self.nodes.push(PendingNode {
                    node,
                    depth: self.stack.len(),
                    slot,
                });
            }
            "edge" if self.in_graph_list("edges") => {
                let attrs = Attrs::read(tag, decoder)?;
                let weight = match attrs.get("weight") {
                    Some(raw) => Some(raw.trim().parse::<f64>().map_err(|_| {
                        GfxError::format(format!("edge weight '{}' is not a number", raw))
                    })?),
                    None => None,
                };
                let mut edge = PendingEdge {
                    id: attrs.owned("id"),
                    source: attrs.require("source", "edge")?,
                    target: attrs.require("target", "edge")?,
                    weight,
                    label: attrs.owned("label"),
                    kind: attrs.owned("kind"),
                    ..PendingEdge::default()
                };
                if self.dynamic() {
                    edge.start = attrs.owned("start").or_else(|| attrs.owned("startopen"));
                    edge.end = attrs.owned("end").or_else(|| attrs.owned("endopen"));
                }
                self.edge = Some(edge);
            }
            "attvalue" if self.parent() == Some("attvalues") => {
                self.attvalue(tag, decoder)?;
            }
            _ => {}
        }
        Ok(())
    }

    fn attvalue(&mut self, tag: &BytesStart<'_>, decoder: Decoder) -> GfxResult<()> {
        // the <node> two levels up must be the one being read, not an
        // element this reader skipped
        let class = match self.grandparent() {
            Some("node") if self.current_node_at(self.stack.len() - 2) => Class::Node,
            Some("edge") if self.edge.is_some() => Class::Edge,
            _ => return Ok(()),
        };

        let attrs = Attrs::read(tag, decoder)?;
        let column_id = match attrs.owned("for").or_else(|| attrs.owned("id")) {
            Some(id) => id,
            None => return Err(GfxError::format("<attvalue> is missing required attribute 'for'")),
        };
        let raw = attrs.require("value", "attvalue")?;

        let column = self.columns.get(&(class, column_id.clone())).ok_or_else(|| {
            GfxError::format(format!("<attvalue> references undeclared attribute '{}'", column_id))
        })?;
        let value = column.kind.parse_value(&raw).ok_or_else(|| {
            GfxError::format(format!(
                "value '{}' of attribute '{}' is not a valid {:?}",
                raw, column.title, column.kind
            ))
        })?;
        let title = column.title.clone();

        match class {
            Class::Node => {
                if let Some(pending) = self.nodes.last_mut() {
                    pending.node.attributes.insert(title, value);
                }
            }
            Class::Edge => {
                if let Some(edge) = self.edge.as_mut() {
                    edge.attributes.insert(title, value);
                }
            }
        }
        Ok(())
    }

    fn close(&mut self, name: &str) -> GfxResult<()> {
        match name {
            "creator" | "description" | "keywords" if self.parent() == Some("meta") => {
                let text = std::mem::take(&mut self.text).trim().to_string();
                let slot = match name {
                    "creator" => &mut self.meta.creator,
                    "description" => &mut self.meta.description,
                    _ => &mut self.meta.keywords,
                };
                *slot = if text.is_empty() { None } else { Some(text) };
            }
            "default" if self.parent() == Some("attribute") => {
                let raw = std::mem::take(&mut self.text);
                if let Some((class, id)) = &self.open_column {
                    if let Some(column) = self.columns.get_mut(&(*class, id.clone())) {
                        let value = column.kind.parse_value(raw.trim()).ok_or_else(|| {
                            GfxError::format(format!(
                                "default '{}' of attribute '{}' is not a valid {:?}",
                                raw.trim(),
                                column.title,
                                column.kind
                            ))
                        })?;
                        column.default = Some(value);
                    }
                }
            }
            "attribute" if self.parent() == Some("attributes") => {
                self.open_column = None;
            }
            "attributes" if self.parent() == Some("graph") => {
                self.column_class = None;
            }
            "node" if self.current_node_at(self.stack.len()) => {
                if let Some(mut pending) = self.nodes.pop() {
                    self.apply_defaults(Class::Node, &mut pending.node.attributes);
                    if let Some(slot) = self.finished.get_mut(pending.slot) {
                        *slot = Some(pending.node);
                    }
                    // parents precede their children in insertion order
                    if self.nodes.is_empty() {
                        let finished = std::mem::take(&mut self.finished);
                        let builder = self.builder()?;
                        for node in finished.into_iter().flatten() {
                            builder.add_node(node);
                        }
                    }
                }
            }
            "edge" if self.in_graph_list("edges") => {
                if let Some(mut pending) = self.edge.take() {
                    self.apply_defaults(Class::Edge, &mut pending.attributes);
                    let edge = self.builder()?.add_edge(&pending.source, &pending.target);
                    edge.id = pending.id;
                    edge.weight = pending.weight;
                    edge.label = pending.label;
                    edge.kind = pending.kind;
                    edge.start = pending.start;
                    edge.end = pending.end;
                    edge.attributes = pending.attributes;
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn apply_defaults(&self, class: Class, attributes: &mut AttributeMap) {
        for ((column_class, _), column) in &self.columns {
            if *column_class != class {
                continue;
            }
            if let Some(default) = &column.default {
                if !attributes.contains_key(&column.title) {
                    attributes.insert(column.title.clone(), default.clone());
                }
            }
        }
    }

    fn finish(self) -> GfxResult<Graph> {
        if !self.seen_root {
            return Err(GfxError::format("document has no root element"));
        }
        if !self.stack.is_empty() {
            return Err(GfxError::format(format!(
                "unexpected end of document inside <{}>",
                self.stack.join("> <")
            )));
        }
        match self.builder {
            Some(builder) => Ok(builder.meta(self.meta).build()),
            None => Err(GfxError::format("document has no <graph> element")),
        }
    }
}

/// Version from the `version` attribute, else the namespace, else 1.2.
fn detect_version(root: &Attrs) -> GfxResult<GexfVersion> {
    if let Some(version) = root.get("version") {
        return GexfVersion::parse(version);
    }
    match root.get("xmlns") {
        Some(namespace) => match GexfVersion::from_namespace(namespace) {
            Some(version) => Ok(version),
            None if namespace.contains("gexf") => Err(GfxError::Version(namespace.to_string())),
            None => Ok(GexfVersion::default()),
        },
        None => Ok(GexfVersion::default()),
    }
}

fn decode_name(bytes: &[u8], decoder: Decoder) -> GfxResult<String> {
    Ok(decoder.decode(bytes).map_err(xml_error)?.into_owned())
}

/// Stream failures stay I/O errors; everything else is malformed input.
fn read_error(err: quick_xml::Error) -> GfxError {
    match err {
        quick_xml::Error::Io(io) => GfxError::Io(io::Error::new(io.kind(), io.to_string())),
        other => xml_error(other),
    }
}

fn read_document<R: BufRead>(mut reader: Reader<R>) -> GfxResult<Graph> {
    reader.config_mut().trim_text(true);

    let mut state = GexfReader::default();
    let mut buf = Vec::new();

    loop {
        let event = reader.read_event_into(&mut buf).map_err(read_error)?;
        let decoder = reader.decoder();
        match event {
            Event::Start(tag) => {
                let name = decode_name(tag.local_name().as_ref(), decoder)?;
                state.open(&name, &tag, decoder)?;
                state.stack.push(name);
            }
            Event::Empty(tag) => {
                let name = decode_name(tag.local_name().as_ref(), decoder)?;
                state.open(&name, &tag, decoder)?;
                state.close(&name)?;
            }
            Event::End(tag) => {
                let name = decode_name(tag.local_name().as_ref(), decoder)?;
                state.stack.pop();
                state.close(&name)?;
            }
            Event::Text(text) => {
                let text = text.unescape().map_err(xml_error)?;
                state.text.push_str(&text);
            }
            Event::CData(data) => {
                let text = decoder.decode(data.as_ref()).map_err(xml_error)?;
                state.text.push_str(&text);
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    let graph = state.finish()?;
    debug!(
        version = %graph.document_meta().version,
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        directed = graph.is_directed(),
        "parsed GEXF document"
    );
    Ok(graph)
}

/// Parse a GEXF document held in memory.
pub fn parse(document: &str) -> GfxResult<Graph> {
    read_document(Reader::from_str(document))
}

/// Parse a GEXF document from a byte stream, honoring its declared encoding.
pub fn parse_reader<R: BufRead>(input: R) -> GfxResult<Graph> {
    read_document(Reader::from_reader(input))
}

fn write_text_element(writer: &mut Writer<Vec<u8>>, name: &str, text: &str) -> GfxResult<()> {
    writer
        .write_event(Event::Start(BytesStart::new(name)))
        .map_err(xml_error)?;
    writer
        .write_event(Event::Text(BytesText::new(text)))
        .map_err(xml_error)?;
    writer
        .write_event(Event::End(BytesEnd::new(name)))
        .map_err(xml_error)?;
    Ok(())
}

fn write_columns(
    writer: &mut Writer<Vec<u8>>,
    class: &str,
    columns: &IndexMap<String, AttributeType>,
) -> GfxResult<()> {
    if columns.is_empty() {
        return Ok(());
    }
    let mut open = BytesStart::new("attributes");
    open.push_attribute(("class", class));
    writer.write_event(Event::Start(open)).map_err(xml_error)?;
    for (position, (title, kind)) in columns.iter().enumerate() {
        let id = position.to_string();
        let mut column = BytesStart::new("attribute");
        column.push_attribute(("id", id.as_str()));
        column.push_attribute(("title", title.as_str()));
        column.push_attribute(("type", kind.xml_name()));
        writer.write_event(Event::Empty(column)).map_err(xml_error)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new("attributes")))
        .map_err(xml_error)?;
    Ok(())
}

fn write_attvalues(
    writer: &mut Writer<Vec<u8>>,
    columns: &IndexMap<String, AttributeType>,
    attributes: &AttributeMap,
) -> GfxResult<()> {
    if attributes.is_empty() {
        return Ok(());
    }
    writer
        .write_event(Event::Start(BytesStart::new("attvalues")))
        .map_err(xml_error)?;
    for (title, value) in attributes {
        let Some(position) = columns.get_index_of(title) else {
            continue;
        };
        let id = position.to_string();
        let rendered = value.to_string();
        let mut tag = BytesStart::new("attvalue");
        tag.push_attribute(("for", id.as_str()));
        tag.push_attribute(("value", rendered.as_str()));
        writer.write_event(Event::Empty(tag)).map_err(xml_error)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new("attvalues")))
        .map_err(xml_error)?;
    Ok(())
}

fn with_optional(tag: &mut BytesStart<'_>, key: &str, value: Option<&str>) {
    if let Some(value) = value {
        tag.push_attribute((key, value));
    }
}

/// Serialize as a GEXF 1.3 document.
pub fn write(graph: &Graph) -> GfxResult<String> {
    let node_columns = infer_types(graph.nodes().map(|n| &n.attributes));
    let edge_columns = infer_types(graph.edges().map(|e| &e.attributes));
    let meta = graph.document_meta();

    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(xml_error)?;

    let mut root = BytesStart::new("gexf");
    root.push_attribute(("xmlns", GexfVersion::V1_3.namespace()));
    root.push_attribute(("version", GexfVersion::V1_3.as_str()));
    writer.write_event(Event::Start(root)).map_err(xml_error)?;

    let has_meta = meta.creator.is_some()
        || meta.description.is_some()
        || meta.keywords.is_some()
        || meta.last_modified.is_some();
    if has_meta {
        let mut tag = BytesStart::new("meta");
        with_optional(&mut tag, "lastmodifieddate", meta.last_modified.as_deref());
        writer.write_event(Event::Start(tag)).map_err(xml_error)?;
        for (name, text) in [
            ("creator", &meta.creator),
            ("description", &meta.description),
            ("keywords", &meta.keywords),
        ] {
            if let Some(text) = text {
                write_text_element(&mut writer, name, text)?;
            }
        }
        writer
            .write_event(Event::End(BytesEnd::new("meta")))
            .map_err(xml_error)?;
    }

    let mut graph_tag = BytesStart::new("graph");
    graph_tag.push_attribute(("mode", graph.mode().as_str()));
    graph_tag.push_attribute(("defaultedgetype", graph.default_edge_type().as_str()));
    writer.write_event(Event::Start(graph_tag)).map_err(xml_error)?;

    write_columns(&mut writer, "node", &node_columns)?;
    write_columns(&mut writer, "edge", &edge_columns)?;

    writer
        .write_event(Event::Start(BytesStart::new("nodes")))
        .map_err(xml_error)?;
    for node in graph.nodes() {
        let mut tag = BytesStart::new("node");
        tag.push_attribute(("id", node.id.as_str()));
        with_optional(&mut tag, "label", node.label.as_deref());
        with_optional(&mut tag, "pid", node.parent.as_deref());
        with_optional(&mut tag, "start", node.start.as_deref());
        with_optional(&mut tag, "end", node.end.as_deref());
        if node.attributes.is_empty() {
            writer.write_event(Event::Empty(tag)).map_err(xml_error)?;
        } else {
            writer.write_event(Event::Start(tag)).map_err(xml_error)?;
            write_attvalues(&mut writer, &node_columns, &node.attributes)?;
            writer
                .write_event(Event::End(BytesEnd::new("node")))
                .map_err(xml_error)?;
        }
    }
    writer
        .write_event(Event::End(BytesEnd::new("nodes")))
        .map_err(xml_error)?;

    writer
        .write_event(Event::Start(BytesStart::new("edges")))
        .map_err(xml_error)?;
    for edge in graph.edges() {
        let (source, target) = graph.endpoints(edge);
        let weight = edge.weight.map(|w| format!("{:?}", w));
        let mut tag = BytesStart::new("edge");
        with_optional(&mut tag, "id", edge.id.as_deref());
        tag.push_attribute(("source", source));
        tag.push_attribute(("target", target));
        with_optional(&mut tag, "weight", weight.as_deref());
        with_optional(&mut tag, "label", edge.label.as_deref());
        with_optional(&mut tag, "kind", edge.kind.as_deref());
        with_optional(&mut tag, "start", edge.start.as_deref());
        with_optional(&mut tag, "end", edge.end.as_deref());
        if edge.attributes.is_empty() {
            writer.write_event(Event::Empty(tag)).map_err(xml_error)?;
        } else {
            writer.write_event(Event::Start(tag)).map_err(xml_error)?;
            write_attvalues(&mut writer, &edge_columns, &edge.attributes)?;
            writer
                .write_event(Event::End(BytesEnd::new("edge")))
                .map_err(xml_error)?;
        }
    }
    writer
        .write_event(Event::End(BytesEnd::new("edges")))
        .map_err(xml_error)?;

    writer
        .write_event(Event::End(BytesEnd::new("graph")))
        .map_err(xml_error)?;
    writer
        .write_event(Event::End(BytesEnd::new("gexf")))
        .map_err(xml_error)?;

    String::from_utf8(writer.into_inner()).map_err(xml_error)
}
