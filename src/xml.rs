use std::io::BufRead;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::ParseFault;

/// GML 3.1 namespace, used by WFS 1.1.0 responses.
pub const GML: &str = "http://www.opengis.net/gml";
/// GML 3.2 namespace, used by WFS 2.0.0 responses.
pub const GML32: &str = "http://www.opengis.net/gml/3.2";
/// GeoSciML Portrayal 4.0 namespace of `gsmlp:BoreholeView`.
pub const GSMLP: &str = "http://xmlns.geosciml.org/geosciml-portrayal/4.0";

/// Documents nested deeper than this are rejected.
pub const MAX_DEPTH: usize = 256;

/// An attribute with its namespace resolved.
#[derive(Clone, Debug, PartialEq)]
pub struct Attribute {
    pub namespace: Option<String>,
    pub name: String,
    pub value: String,
}

/// A parsed XML element.
///
/// `text` holds the character data before the first child element, so a
/// present but empty element has an empty `text` while a missing element
/// is `None` in every lookup.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Element {
    pub namespace: Option<String>,
    pub name: String,
    pub attributes: Vec<Attribute>,
    pub text: String,
    pub children: Vec<Element>,
}

impl Element {
    /// Parse a complete document and return its root element.
    pub fn parse(bytes: &[u8]) -> Result<Self, ParseFault> {
        let document = std::str::from_utf8(bytes).map_err(ParseFault::NotText)?;

        let mut xml_reader = Reader::from_str(document);

        let mut xml_buffer = Vec::new();
        let mut scopes = NamespaceScopes::default();
        let mut open_elements: Vec<Element> = Vec::new();
        let mut root = None;

        loop {
            match xml_reader.read_event(&mut xml_buffer) {
                Ok(Event::Start(ref e)) => {
                    if open_elements.len() >= MAX_DEPTH {
                        return Err(ParseFault::Xml {
                            position: xml_reader.buffer_position(),
                            message: format!("elements nested deeper than {}", MAX_DEPTH),
                        });
                    }
                    let element = scopes
                        .open(e)
                        .map_err(|error| xml_fault(&xml_reader, error))?;
                    open_elements.push(element);
                }
                Ok(Event::Empty(ref e)) => {
                    let element = scopes
                        .open(e)
                        .map_err(|error| xml_fault(&xml_reader, error))?;
                    scopes.close();
                    attach(&mut open_elements, &mut root, element);
                }
                Ok(Event::End(_)) => {
                    scopes.close();
                    if let Some(element) = open_elements.pop() {
                        attach(&mut open_elements, &mut root, element);
                    }
                }
                Ok(Event::Text(ref e)) => {
                    // indentation between elements is dropped, other text is kept as is
                    let indentation = e.escaped().iter().all(u8::is_ascii_whitespace);
                    if let Some(current) = open_elements.last_mut() {
                        if current.children.is_empty() && !indentation {
                            let text = e.unescaped().map_err(|error| xml_fault(&xml_reader, error))?;
                            current.text.push_str(&String::from_utf8_lossy(&text));
                        }
                    }
                }
                Ok(Event::CData(ref e)) => {
                    if let Some(current) = open_elements.last_mut() {
                        if current.children.is_empty() {
                            current.text.push_str(&String::from_utf8_lossy(e.escaped()));
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(xml_fault(&xml_reader, e)),
                _ => (), // declarations, comments, processing instructions
            }

            xml_buffer.clear();
        }

        root.ok_or(ParseFault::NoRootElement)
    }

    /// Does this element have the given namespace and local name?
    pub fn is(&self, namespace: &str, name: &str) -> bool {
        self.namespace.as_deref() == Some(namespace) && self.name == name
    }

    /// The first child with the given namespace and local name.
    pub fn child(&self, namespace: &str, name: &str) -> Option<&Element> {
        self.children.iter().find(|child| child.is(namespace, name))
    }

    /// Follow a path of `(namespace, local name)` steps and return the first match
    /// in document order.
    pub fn find(&self, path: &[(&str, &str)]) -> Option<&Element> {
        match path.split_first() {
            None => Some(self),
            Some((&(namespace, name), rest)) => self
                .children
                .iter()
                .filter(|child| child.is(namespace, name))
                .find_map(|child| child.find(rest)),
        }
    }

    /// The text of the first element found along `path`.
    pub fn find_text(&self, path: &[(&str, &str)]) -> Option<&str> {
        self.find(path).map(|element| element.text.as_str())
    }

    /// All elements along a path of local names, ignoring namespaces.
    /// A `*` step matches any child.
    pub fn select(&self, path: &[&str]) -> Vec<&Element> {
        match path.split_first() {
            None => vec![self],
            Some((&step, rest)) => self
                .children
                .iter()
                .filter(|child| step == "*" || child.name == step)
                .flat_map(|child| child.select(rest))
                .collect(),
        }
    }

    /// The text of the first child with the given local name, ignoring namespaces.
    pub fn local_text(&self, name: &str) -> Option<&str> {
        self.children
            .iter()
            .find(|child| child.name == name)
            .map(|child| child.text.as_str())
    }

    /// The value of an attribute. `None` as namespace selects an unqualified attribute.
    pub fn attribute(&self, namespace: Option<&str>, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attribute| attribute.namespace.as_deref() == namespace && attribute.name == name)
            .map(|attribute| attribute.value.as_str())
    }
}

/// Read the local name of the document's root element without parsing the whole tree.
pub fn root_name(bytes: &[u8]) -> Option<String> {
    let mut xml_reader = Reader::from_reader(bytes);
    let mut xml_buffer = Vec::new();

    loop {
        match xml_reader.read_event(&mut xml_buffer) {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                let (_, name) = split_qname(e.name());
                return Some(String::from_utf8_lossy(name).into_owned());
            }
            Ok(Event::Eof) | Err(_) => return None,
            _ => (),
        }

        xml_buffer.clear();
    }
}

fn attach(open_elements: &mut Vec<Element>, root: &mut Option<Element>, element: Element) {
    if let Some(parent) = open_elements.last_mut() {
        parent.children.push(element);
    } else if root.is_none() {
        *root = Some(element);
    }
}

fn xml_fault<B: BufRead>(xml_reader: &Reader<B>, error: quick_xml::Error) -> ParseFault {
    ParseFault::Xml {
        position: xml_reader.buffer_position(),
        message: error.to_string(),
    }
}

/// Split `prefix:local` into its parts.
fn split_qname(qname: &[u8]) -> (Option<&[u8]>, &[u8]) {
    match qname.iter().position(|&b| b == b':') {
        Some(index) => (Some(&qname[..index]), &qname[index + 1..]),
        None => (None, qname),
    }
}

/// The stack of in-scope `xmlns` bindings while reading a document.
#[derive(Debug, Default)]
struct NamespaceScopes {
    bindings: Vec<(Vec<u8>, String)>,
    marks: Vec<usize>,
}

impl NamespaceScopes {
    /// Enter an element: register its namespace declarations and resolve its names.
    fn open(&mut self, start: &BytesStart) -> Result<Element, quick_xml::Error> {
        self.marks.push(self.bindings.len());

        let mut raw_attributes = Vec::new();
        for attribute in start.attributes() {
            let attribute = attribute?;
            let value = String::from_utf8_lossy(&attribute.unescaped_value()?).into_owned();

            if attribute.key == b"xmlns" {
                self.bindings.push((Vec::new(), value));
            } else if let Some(prefix) = attribute.key.strip_prefix(b"xmlns:") {
                self.bindings.push((prefix.to_vec(), value));
            } else {
                raw_attributes.push((attribute.key.to_vec(), value));
            }
        }

        let (prefix, name) = split_qname(start.name());
        let element_namespace = self.resolve(prefix.unwrap_or(b""));

        let attributes = raw_attributes
            .into_iter()
            .map(|(key, value)| {
                let (prefix, name) = split_qname(&key);
                Attribute {
                    // unprefixed attributes are never in the default namespace
                    namespace: prefix.and_then(|prefix| self.resolve(prefix)),
                    name: String::from_utf8_lossy(name).into_owned(),
                    value,
                }
            })
            .collect();

        Ok(Element {
            namespace: element_namespace,
            name: String::from_utf8_lossy(name).into_owned(),
            attributes,
            text: String::new(),
            children: Vec::new(),
        })
    }

    /// Leave the innermost element.
    fn close(&mut self) {
        if let Some(mark) = self.marks.pop() {
            self.bindings.truncate(mark);
        }
    }

    fn resolve(&self, prefix: &[u8]) -> Option<String> {
        self.bindings
            .iter()
            .rev()
            .find(|(bound, _)| bound.as_slice() == prefix)
            .map(|(_, uri)| uri.clone())
            .filter(|uri| !uri.is_empty())
    }
}
