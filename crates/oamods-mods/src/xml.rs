//! Minimal owned XML tree, written and read with quick-xml.
//!
//! The MODS document is built as a tree of [`Element`]s, serialized once by
//! the transformer, and parsed back by the enricher so subjects can be
//! appended in place. Qualified names (`xlink:href`) are kept verbatim;
//! namespace declarations are ordinary attributes on the root.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Builder: add an attribute
    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    /// Builder: add a text child (empty text adds nothing)
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        if !text.is_empty() {
            self.children.push(Node::Text(text));
        }
        self
    }

    /// Builder: add a child element
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    /// Append a child element
    pub fn push(&mut self, child: Element) {
        self.children.push(Node::Element(child));
    }

    pub fn get_attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Concatenated direct text content
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|node| match node {
                Node::Text(t) => Some(t.as_str()),
                Node::Element(_) => None,
            })
            .collect()
    }

    /// Child elements, in document order
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        })
    }

    pub fn elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(|node| match node {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        })
    }

    /// Child elements with the given name
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.elements().filter(move |e| e.name == name)
    }

    /// First child element with the given name
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.elements().find(|e| e.name == name)
    }
}

fn write_element<W: Write>(xml: &mut Writer<W>, element: &Element) -> Result<()> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.children.is_empty() {
        xml.write_event(Event::Empty(start))?;
        return Ok(());
    }

    xml.write_event(Event::Start(start))?;
    for child in &element.children {
        match child {
            Node::Element(e) => write_element(xml, e)?,
            Node::Text(t) => xml.write_event(Event::Text(BytesText::new(t)))?,
        }
    }
    xml.write_event(Event::End(BytesEnd::new(element.name.as_str())))?;
    Ok(())
}

/// Serialize a document (XML declaration + root), indented by two spaces
pub fn write_document<W: Write>(root: &Element, out: W) -> Result<()> {
    let mut xml = Writer::new_with_indent(out, b' ', 2);
    xml.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    write_element(&mut xml, root)?;
    xml.get_mut().write_all(b"\n")?;
    Ok(())
}

/// Serialize a document to a string
pub fn to_string(root: &Element) -> Result<String> {
    let mut buf = Vec::new();
    write_document(root, &mut buf)?;
    String::from_utf8(buf).context("serialized XML is not UTF-8")
}

/// Write a document to `path`, replacing any existing file
pub fn write_file(path: &Path, root: &Element) -> Result<()> {
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    write_document(root, &mut writer).with_context(|| format!("write {}", path.display()))?;
    writer
        .flush()
        .with_context(|| format!("write {}", path.display()))
}

fn element_from_start(start: &BytesStart) -> Result<Element> {
    let name = std::str::from_utf8(start.name().as_ref())
        .context("element name is not UTF-8")?
        .to_string();
    let mut element = Element::new(name);
    for attr in start.attributes() {
        let attr = attr.context("malformed attribute")?;
        let key = std::str::from_utf8(attr.key.as_ref())
            .context("attribute name is not UTF-8")?
            .to_string();
        let value = attr.unescape_value()?.into_owned();
        element.attributes.push((key, value));
    }
    Ok(element)
}

/// Attach a finished element to its parent, or make it the root.
fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => parent.push(element),
        None => {
            anyhow::ensure!(root.is_none(), "more than one root element");
            *root = Some(element);
        }
    }
    Ok(())
}

/// Parse a document into an element tree.
///
/// Whitespace-only text between child elements (indentation) is dropped;
/// the whitespace-only content of a leaf element is kept, as is all other
/// text. Comments and processing instructions are ignored.
pub fn parse_document(xml: &str) -> Result<Element> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<Element> = Vec::new();
    let mut root = None;
    // whitespace seen since the last tag; kept only if it closes a leaf
    let mut blank: Option<String> = None;

    loop {
        let event = reader.read_event().context("XML parse error")?;
        let pending = blank.take();
        match event {
            Event::Start(e) => stack.push(element_from_start(&e)?),
            Event::Empty(e) => {
                let element = element_from_start(&e)?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::End(_) => {
                let mut element = stack.pop().context("unexpected closing tag")?;
                if let Some(text) = pending.filter(|_| element.children.is_empty()) {
                    element.children.push(Node::Text(text));
                }
                attach(&mut stack, &mut root, element)?;
            }
            Event::Text(t) => {
                let text = t.unescape().context("invalid text")?;
                if text.trim().is_empty() {
                    blank = Some(text.into_owned());
                    continue;
                }
                if let Some(parent) = stack.last_mut() {
                    parent.children.push(Node::Text(text.into_owned()));
                }
            }
            Event::CData(c) => {
                let text = String::from_utf8(c.into_inner().into_owned())
                    .context("CDATA is not UTF-8")?;
                if let Some(parent) = stack.last_mut() {
                    parent.children.push(Node::Text(text));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    anyhow::ensure!(stack.is_empty(), "unclosed element <{}>", stack[stack.len() - 1].name);
    root.context("document has no root element")
}

/// Read and parse a document from `path`
pub fn read_file(path: &Path) -> Result<Element> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Cannot read {}", path.display()))?;
    parse_document(&content).with_context(|| format!("Invalid XML in {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Element {
        Element::new("root")
            .attr("xmlns", "urn:test")
            .with_child(
                Element::new("item")
                    .attr("type", "a&b")
                    .with_text("Fish & <chips>"),
            )
            .with_child(Element::new("empty").attr("k", "v"))
            .with_child(Element::new("nested").with_child(Element::new("leaf").with_text("x")))
    }

    #[test]
    fn writes_declaration_and_escapes() {
        let text = to_string(&sample()).unwrap();
        assert!(text.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(text.contains(r#"<item type="a&amp;b">Fish &amp; &lt;chips&gt;</item>"#));
        assert!(text.contains(r#"<empty k="v"/>"#));
        assert!(text.contains("<leaf>x</leaf>"));
    }

    #[test]
    fn parse_restores_written_tree() {
        let original = sample();
        let text = to_string(&original).unwrap();
        assert_eq!(parse_document(&text).unwrap(), original);
    }

    #[test]
    fn empty_text_is_not_a_child() {
        let element = Element::new("namePart").with_text("");
        assert!(element.children.is_empty());
        assert_eq!(element.text(), "");
    }

    #[test]
    fn queries() {
        let root = sample();
        assert_eq!(root.get_attr("xmlns"), Some("urn:test"));
        assert_eq!(root.get_attr("missing"), None);
        assert_eq!(root.elements().count(), 3);
        assert_eq!(root.child("item").unwrap().text(), "Fish & <chips>");
        assert_eq!(root.children_named("empty").count(), 1);
        assert!(root.child("nope").is_none());
    }

    #[test]
    fn parse_keeps_prefixed_names() {
        let doc = parse_document(
            r#"<?xml version="1.0"?>
<c xmlns:xlink="http://www.w3.org/1999/xlink">
  <subject xlink:href="10205"/>
</c>"#,
        )
        .unwrap();
        let subject = doc.child("subject").unwrap();
        assert_eq!(subject.get_attr("xlink:href"), Some("10205"));
    }

    #[test]
    fn whitespace_leaf_text_survives_reparse() {
        let original = Element::new("titleInfo")
            .with_child(Element::new("title").with_text("  "))
            .with_child(Element::new("subTitle").with_text("x"));
        let text = to_string(&original).unwrap();
        let parsed = parse_document(&text).unwrap();
        assert_eq!(parsed, original);
        assert_eq!(parsed.child("title").unwrap().text(), "  ");
    }

    #[test]
    fn indentation_is_not_text() {
        let doc = parse_document("<a>\n  <b>x</b>\n  <c/>\n</a>").unwrap();
        assert_eq!(doc.children.len(), 2);
        assert_eq!(doc.text(), "");
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(parse_document("").is_err());
        assert!(parse_document("<a><b></a>").is_err());
        assert!(parse_document("<a/><b/>").is_err());
    }

    #[test]
    fn file_roundtrip() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("doc.xml");
        write_file(&path, &sample()).unwrap();
        assert_eq!(read_file(&path).unwrap(), sample());
    }
}
