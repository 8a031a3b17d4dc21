//! Generic tree for registrar XML replies.
//!
//! The registrar answers every command with an XML document whose shape
//! depends on the command and on whether it failed. Rather than committing to
//! a schema, replies are parsed into a [`ReplyValue`] tree that mirrors the
//! element hierarchy:
//!
//! - an element with neither attributes nor children becomes `Text` (or
//!   `Null` when empty)
//! - otherwise it becomes a `Map`; attributes are keyed `@name`, child
//!   elements by tag name, and any own text under `#text`
//! - repeated sibling tags collect into a `List` in document order
//!
//! Interpretation is left to each registrar operation.

use crate::error::DomainShopError;
use crate::Result;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::fmt;

/// Top-level element of every registrar reply.
pub const INTERFACE_RESPONSE: &str = "interface-response";

/// One node of a parsed reply.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplyValue {
    Null,
    Text(String),
    List(Vec<ReplyValue>),
    Map(ReplyMap),
}

/// Ordered mapping of reply keys to values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReplyMap {
    entries: Vec<(String, ReplyValue)>,
}

impl ReplyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value; a key seen before is turned into a `List`.
    pub fn push<K: Into<String>>(&mut self, key: K, value: ReplyValue) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, ReplyValue::List(items))) => items.push(value),
            Some((_, existing)) => {
                let first = std::mem::replace(existing, ReplyValue::Null);
                *existing = ReplyValue::List(vec![first, value]);
            }
            None => self.entries.push((key, value)),
        }
    }

    /// Builder-style [`push`](Self::push) of a text value.
    pub fn with_text<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.push(key, ReplyValue::Text(value.into()));
        self
    }

    /// Builder-style [`push`](Self::push) of any value.
    pub fn with<K: Into<String>>(mut self, key: K, value: ReplyValue) -> Self {
        self.push(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&ReplyValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ReplyValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ReplyValue {
    /// Text content of a leaf node.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ReplyValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&ReplyMap> {
        match self {
            ReplyValue::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ReplyValue::Null)
    }

    /// Look up a key when this node is a `Map`.
    pub fn get(&self, key: &str) -> Option<&ReplyValue> {
        self.as_map().and_then(|map| map.get(key))
    }

    /// Depth-first, document-order collection of every text leaf stored
    /// under `key`, at any nesting level.
    fn collect_texts<'a>(&'a self, key: &str, out: &mut Vec<&'a str>) {
        match self {
            ReplyValue::Map(map) => {
                for (k, v) in map.iter() {
                    if k == key {
                        push_texts(v, out);
                    }
                    v.collect_texts(key, out);
                }
            }
            ReplyValue::List(items) => {
                for item in items {
                    item.collect_texts(key, out);
                }
            }
            ReplyValue::Null | ReplyValue::Text(_) => {}
        }
    }
}

fn push_texts<'a>(value: &'a ReplyValue, out: &mut Vec<&'a str>) {
    match value {
        ReplyValue::Text(text) => out.push(text),
        ReplyValue::List(items) => {
            for item in items {
                if let ReplyValue::Text(text) = item {
                    out.push(text);
                }
            }
        }
        ReplyValue::Null | ReplyValue::Map(_) => {}
    }
}

impl fmt::Display for ReplyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReplyValue::Null => write!(f, "none"),
            ReplyValue::Text(text) => write!(f, "{}", text),
            ReplyValue::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            ReplyValue::Map(map) => {
                write!(f, "{{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl Serialize for ReplyValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            ReplyValue::Null => serializer.serialize_none(),
            ReplyValue::Text(text) => serializer.serialize_str(text),
            ReplyValue::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            ReplyValue::Map(map) => map.serialize(serializer),
        }
    }
}

impl Serialize for ReplyMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut out = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self.iter() {
            out.serialize_entry(key, value)?;
        }
        out.end()
    }
}

/// A fully parsed registrar reply.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RegistrarReply {
    root: ReplyMap,
}

impl RegistrarReply {
    /// Wrap an already built tree, keyed by root element name.
    pub fn from_map(root: ReplyMap) -> Self {
        Self { root }
    }

    /// Decode a raw body as UTF-8, then parse it as XML.
    ///
    /// # Errors
    ///
    /// Returns `DomainShopError::Parse` if the body is not UTF-8, is not
    /// well-formed XML, or has no root element. Never yields an empty reply.
    pub fn from_bytes(body: Vec<u8>) -> Result<Self> {
        let text = String::from_utf8(body)?;
        Self::from_xml(&text)
    }

    /// Parse an XML document into a reply tree.
    pub fn from_xml(xml: &str) -> Result<Self> {
        parse_document(xml).map(Self::from_map)
    }

    pub fn root(&self) -> &ReplyMap {
        &self.root
    }

    pub fn get(&self, key: &str) -> Option<&ReplyValue> {
        self.root.get(key)
    }

    /// The `interface-response` envelope, unless absent or empty.
    pub fn interface_response(&self) -> Option<&ReplyValue> {
        self.get(INTERFACE_RESPONSE).filter(|v| !v.is_null())
    }

    /// A text field directly inside the envelope.
    pub fn envelope_text(&self, key: &str) -> Option<&str> {
        self.interface_response()
            .and_then(|envelope| envelope.get(key))
            .and_then(ReplyValue::as_text)
    }

    /// Every text value stored under `key`, anywhere in the reply.
    pub fn find_texts(&self, key: &str) -> Vec<&str> {
        let mut out = Vec::new();
        for (k, v) in self.root.iter() {
            if k == key {
                push_texts(v, &mut out);
            }
            v.collect_texts(key, &mut out);
        }
        out
    }

    /// Order identifier assigned by the registrar, if any.
    pub fn order_id(&self) -> Option<&str> {
        self.envelope_text("OrderID")
            .or_else(|| self.find_texts("OrderID").into_iter().next())
    }
}

/// Element being assembled while its children are read.
struct Frame {
    name: String,
    attributes: ReplyMap,
    children: ReplyMap,
    text: String,
}

impl Frame {
    fn open(start: &BytesStart<'_>) -> Result<Self> {
        let name = String::from_utf8(start.name().as_ref().to_vec())?;
        let mut attributes = ReplyMap::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|e| {
                DomainShopError::parse(format!("Malformed attribute on <{}>: {}", name, e))
            })?;
            let key = String::from_utf8(attr.key.as_ref().to_vec())?;
            let value = attr.unescape_value()?.into_owned();
            attributes.push(format!("@{}", key), ReplyValue::Text(value));
        }
        Ok(Self {
            name,
            attributes,
            children: ReplyMap::new(),
            text: String::new(),
        })
    }

    fn close(self) -> (String, ReplyValue) {
        if self.attributes.is_empty() && self.children.is_empty() {
            let value = if self.text.is_empty() {
                ReplyValue::Null
            } else {
                ReplyValue::Text(self.text)
            };
            return (self.name, value);
        }

        let mut map = self.attributes;
        for (key, value) in self.children.entries {
            map.push(key, value);
        }
        if !self.text.is_empty() {
            map.push("#text", ReplyValue::Text(self.text));
        }
        (self.name, ReplyValue::Map(map))
    }
}

fn attach(
    stack: &mut [Frame],
    root: &mut Option<ReplyMap>,
    name: String,
    value: ReplyValue,
) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(name, value),
        None if root.is_some() => {
            return Err(DomainShopError::parse("Document has more than one root element"));
        }
        None => *root = Some(ReplyMap::new().with(name, value)),
    }
    Ok(())
}

fn append_text(stack: &mut [Frame], text: &str) -> Result<()> {
    match stack.last_mut() {
        Some(frame) => {
            frame.text.push_str(text);
            Ok(())
        }
        None => Err(DomainShopError::parse_with_content(
            "Text outside of the root element",
            text.chars().take(64).collect::<String>(),
        )),
    }
}

fn parse_document(xml: &str) -> Result<ReplyMap> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Frame> = Vec::new();
    let mut root: Option<ReplyMap> = None;

    loop {
        match reader.read_event()? {
            Event::Start(start) => stack.push(Frame::open(&start)?),
            Event::Empty(start) => {
                let (name, value) = Frame::open(&start)?.close();
                attach(&mut stack, &mut root, name, value)?;
            }
            Event::End(_) => {
                let frame = stack
                    .pop()
                    .ok_or_else(|| DomainShopError::parse("Unexpected closing tag"))?;
                let (name, value) = frame.close();
                attach(&mut stack, &mut root, name, value)?;
            }
            Event::Text(text) => append_text(&mut stack, &text.unescape()?)?,
            Event::CData(data) => {
                let text = String::from_utf8(data.into_inner().into_owned())?;
                append_text(&mut stack, &text)?;
            }
            Event::Eof => break,
            // Declarations, comments, processing instructions, doctype
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(DomainShopError::parse(format!(
            "Unexpected end of document inside <{}>",
            open.name
        )));
    }

    root.ok_or_else(|| DomainShopError::parse("Document has no root element"))
}
