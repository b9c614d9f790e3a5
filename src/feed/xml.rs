//! Minimal owned XML tree for feed documents.
//!
//! The tree is built in one pass with `quick-xml` and lives only as long as
//! the [`Document`] value, so a parse that fails part-way simply drops
//! whatever was built. Attributes are not kept: nothing in a feed we read
//! depends on them.

use quick_xml::events::Event;
use quick_xml::Reader;

use super::parser::ParseError;

/// Maximum element nesting depth accepted in a feed document.
/// Guards the recursive tree walks against pathological input.
pub const MAX_XML_DEPTH: usize = 256;

/// A node in the document tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    /// Character data: unescaped text or the payload of a CDATA section.
    Text(String),
}

/// An XML element with its qualified name and ordered children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    children: Vec<Node>,
}

impl Element {
    fn new(name: String) -> Self {
        Self {
            name,
            children: Vec::new(),
        }
    }

    /// Qualified name as written in the document (e.g. `dc:creator`).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Namespace prefix, if the name has one.
    pub fn prefix(&self) -> Option<&str> {
        self.name.split_once(':').map(|(prefix, _)| prefix)
    }

    /// Name without its namespace prefix.
    pub fn local_name(&self) -> &str {
        self.name
            .split_once(':')
            .map_or(self.name.as_str(), |(_, local)| local)
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Direct element children in document order.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        })
    }

    /// First direct child element with the given qualified name.
    pub fn first_child(&self, name: &str) -> Option<&Element> {
        self.child_elements().find(|child| child.name == name)
    }

    /// Concatenated character data of this element and all descendants,
    /// in document order.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for node in &self.children {
            match node {
                Node::Text(text) => out.push_str(text),
                Node::Element(element) => element.collect_text(out),
            }
        }
    }
}

/// A parsed, well-formed XML document with exactly one root element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    root: Element,
}

impl Document {
    /// Parses `bytes` as an XML document.
    ///
    /// The character encoding comes from a byte order mark or the
    /// `<?xml encoding="..."?>` declaration and defaults to UTF-8.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] when the input cannot be decoded in its
    /// declared encoding, is not well-formed, has no root element or more
    /// than one, carries text outside the root, or nests deeper than
    /// [`MAX_XML_DEPTH`].
    pub fn parse(bytes: &[u8]) -> Result<Self, ParseError> {
        // quick-xml (0.37) never expands custom <!ENTITY> declarations, so
        // DOCTYPE-based entity attacks surface as unescape errors below.
        let mut reader = Reader::from_reader(bytes);
        reader.config_mut().check_end_names = true;

        let mut open: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) => {
                    if open.is_empty() && root.is_some() {
                        return Err(ParseError::MultipleRoots);
                    }
                    if open.len() >= MAX_XML_DEPTH {
                        return Err(ParseError::MaxDepthExceeded(MAX_XML_DEPTH));
                    }
                    open.push(Element::new(decode_name(&reader, e.name().as_ref())?));
                }
                Ok(Event::Empty(e)) => {
                    let element = Element::new(decode_name(&reader, e.name().as_ref())?);
                    attach(&mut open, &mut root, element)?;
                }
                Ok(Event::End(_)) => {
                    // check_end_names guarantees this matches the innermost open element
                    let element = open.pop().ok_or_else(|| {
                        ParseError::Xml("closing tag without an open element".to_string())
                    })?;
                    attach(&mut open, &mut root, element)?;
                }
                Ok(Event::Text(e)) => {
                    let text = e.unescape().map_err(|e| match e {
                        quick_xml::Error::Encoding(_) => ParseError::Encoding,
                        other => ParseError::Xml(other.to_string()),
                    })?;
                    push_text(&mut open, &text)?;
                }
                Ok(Event::CData(e)) => {
                    let text = e.decode().map_err(|_| ParseError::Encoding)?;
                    push_text(&mut open, &text)?;
                }
                Ok(Event::Eof) => break,
                Err(quick_xml::Error::Encoding(_)) => return Err(ParseError::Encoding),
                Err(e) => return Err(ParseError::Xml(e.to_string())),
                // Declarations, comments, processing instructions, DOCTYPE
                Ok(_) => {}
            }
        }

        if let Some(unclosed) = open.last() {
            return Err(ParseError::UnclosedElement(unclosed.name.clone()));
        }

        let root = root.ok_or(ParseError::NoRootElement)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Element {
        &self.root
    }
}

fn decode_name(reader: &Reader<&[u8]>, raw: &[u8]) -> Result<String, ParseError> {
    reader
        .decoder()
        .decode(raw)
        .map(|name| name.into_owned())
        .map_err(|_| ParseError::Encoding)
}

/// Hands a finished element to its parent, or installs it as the root.
fn attach(
    open: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
) -> Result<(), ParseError> {
    match open.last_mut() {
        Some(parent) => {
            parent.children.push(Node::Element(element));
            Ok(())
        }
        None if root.is_some() => Err(ParseError::MultipleRoots),
        None => {
            *root = Some(element);
            Ok(())
        }
    }
}

fn push_text(open: &mut [Element], text: &str) -> Result<(), ParseError> {
    match open.last_mut() {
        Some(parent) => {
            if !text.is_empty() {
                parent.children.push(Node::Text(text.to_owned()));
            }
            Ok(())
        }
        None if text.trim().is_empty() => Ok(()),
        None => Err(ParseError::TextOutsideRoot),
    }
}
