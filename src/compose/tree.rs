//! Owned XML subtree for the composed document
//!
//! Source documents are parsed with roxmltree (borrowed, read-only). Their
//! children are copied into owned [`XmlElement`]s so the output tree never
//! aliases a source parse tree, then written out with quick-xml.

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use roxmltree::Node;
use std::io::Write;

pub const SVG_NS: &str = "http://www.w3.org/2000/svg";
const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";

/// A node in the output tree
#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
}

/// An owned element with a qualified name (`prefix:local` or `local`)
#[derive(Debug, Clone, PartialEq)]
pub struct XmlElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlNode>,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.push_attribute(key, value);
        self
    }

    pub fn push_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attributes.push((key.into(), value.into()));
    }

    pub fn push_child(&mut self, node: XmlNode) {
        self.children.push(node);
    }

    #[cfg(test)]
    fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Serialize this element and its descendants, without an XML declaration
    pub fn to_markup(&self) -> quick_xml::Result<String> {
        let mut writer = Writer::new(Vec::new());
        self.write_to(&mut writer)?;
        Ok(String::from_utf8_lossy(&writer.into_inner()).into_owned())
    }

    fn write_to<W: Write>(&self, writer: &mut Writer<W>) -> quick_xml::Result<()> {
        let mut start = BytesStart::new(self.name.as_str());
        for (key, value) in &self.attributes {
            start.push_attribute((key.as_str(), value.as_str()));
        }

        if self.children.is_empty() {
            return writer.write_event(Event::Empty(start));
        }

        writer.write_event(Event::Start(start))?;
        for child in &self.children {
            match child {
                XmlNode::Element(element) => element.write_to(writer)?,
                XmlNode::Text(text) => writer.write_event(Event::Text(BytesText::new(text)))?,
            }
        }
        writer.write_event(Event::End(BytesEnd::new(self.name.as_str())))
    }
}

/// Prefixes for namespaced names met while copying sources.
///
/// The declarations end up on the output root so every copied subtree
/// resolves its prefixes.
#[derive(Debug, Default)]
pub struct Namespaces {
    declared: Vec<(String, String)>,
}

impl Namespaces {
    /// `(prefix, uri)` pairs in first-seen order
    pub fn declarations(&self) -> impl Iterator<Item = (&str, &str)> {
        self.declared.iter().map(|(p, u)| (p.as_str(), u.as_str()))
    }

    fn prefix_for(&mut self, uri: &str, suggested: Option<&str>) -> String {
        if let Some((prefix, _)) = self.declared.iter().find(|(_, u)| u == uri) {
            return prefix.clone();
        }

        let taken = |p: &str| p == "xml" || p == "xmlns" || self.declared.iter().any(|(d, _)| d == p);
        let prefix = match suggested {
            Some(p) if !p.is_empty() && !taken(p) => p.to_string(),
            _ => (1..)
                .map(|n| format!("ns{}", n))
                .find(|candidate| !taken(candidate))
                .unwrap_or_default(),
        };

        self.declared.push((prefix.clone(), uri.to_string()));
        prefix
    }

    /// Elements in the SVG namespace land in the output's default namespace
    fn qualify_element(&mut self, node: Node, namespace: Option<&str>, local: &str) -> String {
        match namespace {
            None | Some(SVG_NS) => local.to_string(),
            Some(uri) => self.prefixed(node, uri, local),
        }
    }

    /// Unprefixed attributes have no namespace, so any namespaced one keeps a prefix
    fn qualify_attribute(&mut self, node: Node, namespace: Option<&str>, local: &str) -> String {
        match namespace {
            None => local.to_string(),
            Some(uri) => self.prefixed(node, uri, local),
        }
    }

    fn prefixed(&mut self, node: Node, uri: &str, local: &str) -> String {
        if uri == XML_NS {
            return format!("xml:{}", local);
        }
        let prefix = self.prefix_for(uri, node.lookup_prefix(uri));
        format!("{}:{}", prefix, local)
    }
}

/// Copy the element and text children of `source` into owned nodes.
///
/// Comments and processing instructions are dropped.
pub fn copy_children(source: Node, namespaces: &mut Namespaces) -> Vec<XmlNode> {
    source
        .children()
        .filter_map(|child| copy_node(child, namespaces))
        .collect()
}

fn copy_node(node: Node, namespaces: &mut Namespaces) -> Option<XmlNode> {
    if node.is_text() {
        return node.text().map(|t| XmlNode::Text(t.to_string()));
    }
    if !node.is_element() {
        return None;
    }

    let tag = node.tag_name();
    let mut element = XmlElement::new(namespaces.qualify_element(node, tag.namespace(), tag.name()));
    for attr in node.attributes() {
        let key = namespaces.qualify_attribute(node, attr.namespace(), attr.name());
        element.push_attribute(key, attr.value());
    }
    element.children = copy_children(node, namespaces);

    Some(XmlNode::Element(element))
}
