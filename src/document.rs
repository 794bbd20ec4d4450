//! # Document Model Adapter
//!
//! Every metadata file read or written by this crate goes through this module.
//! It owns three concerns:
//!
//! - **Parsing**: XML text is parsed with `xot` and converted into an owned
//!   [`Element`] tree. Namespaces are resolved while converting, so each element
//!   carries its local name plus an optional namespace URI and no prefix ever
//!   leaks into tag names.
//! - **Canonical serialization**: a single `<?xml version="1.0" encoding="UTF-8"?>`
//!   declaration followed by the tree, indented with 4 spaces, with no blank
//!   lines. This is the layout the platform CLI produces, so regenerated files
//!   do not show spurious diffs.
//! - **Namespace handling**: per-component files carry no namespace while
//!   aggregate files declare the metadata namespace once on their root.
//!   [`Element::strip_namespace`] and [`Element::assign_namespace`] move a tree
//!   between the two conventions.
//!
//! Attributes travel with their element, so values such as `xsi:nil="true"`
//! survive a split and a merge. Comments and processing instructions are not
//! part of the metadata component model and are not carried over.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use xot::Xot;

use crate::error::{Error, Result};

/// The namespace declared by every Salesforce metadata document.
pub const METADATA_NAMESPACE: &str = "http://soap.sforce.com/2006/04/metadata";

/// The only declaration written at the top of generated files.
pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Namespace of `xsi:nil` and `xsi:type` attributes.
pub const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";

const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

const INDENT: &str = "    ";

/// An attribute with a resolved namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub namespace: Option<String>,
    pub value: String,
}

/// A child of an [`Element`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// An owned XML element with a resolved namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    namespace: Option<String>,
    attributes: Vec<Attribute>,
    children: Vec<Node>,
}

impl Element {
    /// Create an element without a namespace.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: None,
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Create an element in the given namespace.
    pub fn with_namespace(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: Some(namespace.into()),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Create a leaf element holding a single text value, e.g. `<name>Workflow</name>`.
    pub fn text_element(name: impl Into<String>, text: impl Into<String>) -> Self {
        let mut element = Self::new(name);
        element.push_text(text);
        element
    }

    /// Local tag name, never prefixed.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Value of the attribute with the given local name and namespace.
    pub fn attribute(&self, name: &str, namespace: Option<&str>) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name && a.namespace.as_deref() == namespace)
            .map(|a| a.value.as_str())
    }

    pub fn set_attribute(
        &mut self,
        name: impl Into<String>,
        namespace: Option<&str>,
        value: impl Into<String>,
    ) {
        let name = name.into();
        let value = value.into();
        match self
            .attributes
            .iter_mut()
            .find(|a| a.name == name && a.namespace.as_deref() == namespace)
        {
            Some(existing) => existing.value = value,
            None => self.attributes.push(Attribute {
                name,
                namespace: namespace.map(str::to_string),
                value,
            }),
        }
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Iterate over the element children, skipping text.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        })
    }

    /// First child element with the given local name.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.child_elements().find(|child| child.name == name)
    }

    /// Text of the first child element with the given local name.
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).and_then(Element::text)
    }

    /// The text of a leaf element.
    ///
    /// Returns `None` when the element has element children or no text at all.
    pub fn text(&self) -> Option<&str> {
        match self.children.as_slice() {
            [Node::Text(text)] => Some(text),
            _ => None,
        }
    }

    pub fn push(&mut self, child: Element) {
        self.children.push(Node::Element(child));
    }

    pub fn push_text(&mut self, text: impl Into<String>) {
        self.children.push(Node::Text(text.into()));
    }

    /// Remove the namespace from this element and all of its descendants.
    pub fn strip_namespace(&mut self) {
        self.namespace = None;
        for child in &mut self.children {
            if let Node::Element(element) = child {
                element.strip_namespace();
            }
        }
    }

    /// Place this element and all of its descendants in `namespace`.
    pub fn assign_namespace(&mut self, namespace: &str) {
        self.namespace = Some(namespace.to_string());
        for child in &mut self.children {
            if let Node::Element(element) = child {
                element.assign_namespace(namespace);
            }
        }
    }

    /// Indentation between child elements is formatting, not content.
    fn drop_formatting_whitespace(&mut self) {
        if self.child_elements().next().is_some() {
            self.children.retain(|node| match node {
                Node::Text(text) => !text.trim().is_empty(),
                Node::Element(_) => true,
            });
        }
    }
}

/// Parse XML text into an [`Element`] tree rooted at the document element.
///
/// Returns the parser's message on failure; [`read`] attaches the path.
pub fn parse_str(xml: &str) -> std::result::Result<Element, String> {
    let mut xot = Xot::new();
    let xml = xml.strip_prefix('\u{feff}').unwrap_or(xml);
    let document = xot.parse(xml).map_err(|e| e.to_string())?;
    let root = xot.document_element(document).map_err(|e| e.to_string())?;
    let name = xot
        .element(root)
        .map(|element| element.name())
        .ok_or_else(|| "document has no root element".to_string())?;
    Ok(convert(&xot, root, name))
}

fn convert(xot: &Xot, node: xot::Node, name: xot::NameId) -> Element {
    let (local, uri) = xot.name_ns_str(name);
    let mut element = Element {
        name: local.to_string(),
        namespace: (!uri.is_empty()).then(|| uri.to_string()),
        attributes: Vec::new(),
        children: Vec::new(),
    };

    for (attribute_name, value) in xot.attributes(node).iter() {
        let (local, uri) = xot.name_ns_str(attribute_name.clone());
        element.attributes.push(Attribute {
            name: local.to_string(),
            namespace: (!uri.is_empty()).then(|| uri.to_string()),
            value: value.to_string(),
        });
    }

    for child in xot.children(node) {
        if let Some(child_element) = xot.element(child) {
            let child_name = child_element.name();
            element
                .children
                .push(Node::Element(convert(xot, child, child_name)));
        } else if let Some(text) = xot.text_str(child) {
            element.children.push(Node::Text(text.to_string()));
        }
    }

    element.drop_formatting_whitespace();
    element
}

/// Read and parse the XML file at `path`.
///
/// # Errors
///
/// - `Error::NotFound` when the path does not exist.
/// - `Error::Parse` when the content is not well-formed XML.
/// - `Error::Io` for any other read failure.
pub fn read(path: &Path) -> Result<Element> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(Error::NotFound {
                path: path.to_path_buf(),
            })
        }
        Err(e) => return Err(e.into()),
    };
    parse_str(&content).map_err(|message| Error::parse(path, message))
}

/// Serialize `root` in the canonical layout: one declaration line, 4-space
/// indentation, no blank lines, trailing newline.
pub fn to_xml_string(root: &Element) -> String {
    let mut prefixes = Vec::new();
    collect_attribute_namespaces(root, &mut prefixes);

    let mut out = String::with_capacity(256);
    out.push_str(XML_DECLARATION);
    out.push('\n');
    write_element(&mut out, root, None, &prefixes, 0);
    out
}

/// Namespaces used by attributes anywhere in the tree, with the prefix each
/// is written under, in first-use order.
fn collect_attribute_namespaces(element: &Element, prefixes: &mut Vec<(String, String)>) {
    for namespace in element.attributes.iter().filter_map(|a| a.namespace.as_deref()) {
        if prefixes.iter().any(|(uri, _)| uri == namespace) {
            continue;
        }
        let prefix = match namespace {
            XSI_NAMESPACE => "xsi".to_string(),
            XML_NAMESPACE => "xml".to_string(),
            _ => format!("ns{}", prefixes.len() + 1),
        };
        prefixes.push((namespace.to_string(), prefix));
    }
    for child in element.child_elements() {
        collect_attribute_namespaces(child, prefixes);
    }
}

fn prefix_for<'a>(prefixes: &'a [(String, String)], namespace: &str) -> Option<&'a str> {
    prefixes
        .iter()
        .find(|(uri, _)| uri == namespace)
        .map(|(_, prefix)| prefix.as_str())
}

/// Serialize `root` and write it to `path`, creating parent directories.
pub fn write(path: &Path, root: &Element) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| Error::Filesystem {
                message: format!("Failed to create directory '{}': {}", parent.display(), e),
            })?;
        }
    }
    fs::write(path, to_xml_string(root)).map_err(|e| Error::write_failed(path, e))
}

fn write_element(
    out: &mut String,
    element: &Element,
    inherited: Option<&str>,
    prefixes: &[(String, String)],
    depth: usize,
) {
    push_indent(out, depth);
    out.push('<');
    out.push_str(&element.name);
    if element.namespace() != inherited {
        out.push_str(" xmlns=\"");
        out.push_str(&escape(element.namespace().unwrap_or(""), true));
        out.push('"');
    }
    if depth == 0 {
        for (uri, prefix) in prefixes.iter().filter(|(uri, _)| uri != XML_NAMESPACE) {
            out.push_str(&format!(" xmlns:{}=\"{}\"", prefix, escape(uri, true)));
        }
    }
    for attribute in &element.attributes {
        out.push(' ');
        if let Some(prefix) = attribute
            .namespace
            .as_deref()
            .and_then(|uri| prefix_for(prefixes, uri))
        {
            out.push_str(prefix);
            out.push(':');
        }
        out.push_str(&attribute.name);
        out.push_str("=\"");
        out.push_str(&escape(&attribute.value, true));
        out.push('"');
    }

    match element.children.as_slice() {
        [] => out.push_str("/>\n"),
        [Node::Text(text)] => {
            out.push('>');
            out.push_str(&escape(text, false));
            push_close_tag(out, &element.name);
        }
        children => {
            out.push_str(">\n");
            for child in children {
                match child {
                    Node::Element(child) => {
                        write_element(out, child, element.namespace(), prefixes, depth + 1)
                    }
                    Node::Text(text) if !text.trim().is_empty() => {
                        push_indent(out, depth + 1);
                        out.push_str(&escape(text.trim(), false));
                        out.push('\n');
                    }
                    Node::Text(_) => {}
                }
            }
            push_indent(out, depth);
            push_close_tag(out, &element.name);
        }
    }
}

fn push_indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}

fn push_close_tag(out: &mut String, name: &str) {
    out.push_str("</");
    out.push_str(name);
    out.push_str(">\n");
}

fn escape(text: &str, attribute: bool) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' if attribute => escaped.push_str("&quot;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
