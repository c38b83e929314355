//! Object nodes: one declared `object <class> { ... }` block.
//!
//! A node keeps its header (`class`, optional leading `id`, optional `:num`
//! suffix) apart from its body. The body is an ordered list of [`Entry`]
//! values so that blank lines, comments and nested objects keep their place
//! between real properties when the block is written back out.

use std::fmt;

use serde::Serialize;

use crate::error::{FeederError, FeederResult};
use crate::NodeId;

/// Keys that live in the object header rather than in the body.
pub const HEADER_KEYS: [&str; 3] = ["class", "id", "num"];

/// A `key value;` assignment inside an object block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Property {
    pub key: String,
    pub value: String,
    /// Raw text that followed the terminating `;` on the source line.
    #[serde(skip_serializing_if = "Option::is_none")]
    trailing: Option<String>,
}

impl Property {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            trailing: None,
        }
    }

    /// Property carrying text found after its `;` (kept verbatim, never edited).
    pub fn with_trailing(
        key: impl Into<String>,
        value: impl Into<String>,
        trailing: Option<String>,
    ) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            trailing: trailing.filter(|t| !t.trim().is_empty()),
        }
    }

    pub fn trailing(&self) -> Option<&str> {
        self.trailing.as_deref()
    }
}

/// One line of an object body, in source order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Entry {
    Property(Property),
    Blank,
    /// Full comment text including the leading `//`
    Comment(String),
    /// A nested object declaration
    Child(NodeId),
}

/// A declared object with an ordered body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectNode {
    class: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num: Option<String>,
    entries: Vec<Entry>,
    semicolon: bool,
    #[serde(skip)]
    parent: Option<NodeId>,
}

impl ObjectNode {
    /// Create an empty object of the given class.
    pub fn new(class: impl Into<String>) -> FeederResult<Self> {
        let class = class.into();
        let class = class.trim();
        if class.is_empty() {
            return Err(FeederError::MissingClass);
        }
        validate_token("class", class)?;
        Ok(Self {
            class: class.to_string(),
            id: None,
            num: None,
            entries: Vec::new(),
            semicolon: false,
            parent: None,
        })
    }

    /// Build an object from an ordered property list.
    ///
    /// The list must contain `class`; `id` and `num` go to the header, every
    /// other pair becomes a property in the given order.
    pub fn from_properties<I, K, V>(properties: I) -> FeederResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let pairs: Vec<(String, String)> = properties
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        let class = pairs
            .iter()
            .find(|(k, _)| k == "class")
            .map(|(_, v)| v.clone())
            .ok_or(FeederError::MissingClass)?;
        let mut node = ObjectNode::new(class)?;
        for (key, value) in pairs {
            if key != "class" {
                node.set(key, value)?;
            }
        }
        Ok(node)
    }

    pub fn class(&self) -> &str {
        &self.class
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn num(&self) -> Option<&str> {
        self.num.as_deref()
    }

    pub fn set_id(&mut self, id: Option<String>) -> FeederResult<()> {
        if let Some(id) = &id {
            validate_token("id", id)?;
        }
        self.id = id;
        Ok(())
    }

    pub fn set_num(&mut self, num: Option<String>) -> FeederResult<()> {
        if let Some(num) = &num {
            if num.is_empty() || !num.chars().all(|c| c.is_ascii_digit()) {
                return Err(FeederError::InvalidProperty {
                    key: "num".into(),
                    reason: format!("`{num}` is not a numeric suffix"),
                });
            }
        }
        self.num = num;
        Ok(())
    }

    /// Whether the closing brace is written as `};`.
    pub fn semicolon(&self) -> bool {
        self.semicolon
    }

    pub fn set_semicolon(&mut self, semicolon: bool) {
        self.semicolon = semicolon;
    }

    /// Lexical nesting parent, if this object was declared inside another.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub(crate) fn set_parent(&mut self, parent: Option<NodeId>) {
        self.parent = parent;
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn properties(&self) -> impl Iterator<Item = &Property> {
        self.entries.iter().filter_map(|entry| match entry {
            Entry::Property(p) => Some(p),
            _ => None,
        })
    }

    /// Nested objects in declaration order.
    pub fn children(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.entries.iter().filter_map(|entry| match entry {
            Entry::Child(id) => Some(*id),
            _ => None,
        })
    }

    /// Look up a property. Header keys resolve to the header fields.
    pub fn get(&self, key: &str) -> Option<&str> {
        match key {
            "class" => Some(&self.class),
            "id" => self.id.as_deref(),
            "num" => self.num.as_deref(),
            _ => self.property(key).map(|p| p.value.as_str()),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.get("name")
    }

    pub fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn trailing(&self, key: &str) -> Option<&str> {
        self.property(key).and_then(Property::trailing)
    }

    fn property(&self, key: &str) -> Option<&Property> {
        self.properties().find(|p| p.key == key)
    }

    /// Set a property value.
    ///
    /// An existing key is updated in place and keeps its trailing text; a new
    /// key is appended after the last entry. Writing `class` always fails.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> FeederResult<()> {
        let key = key.into();
        let value = value.into();
        match key.as_str() {
            "class" => Err(FeederError::ClassImmutable {
                node: self.label(),
                class: self.class.clone(),
            }),
            "id" => self.set_id(Some(value)),
            "num" => self.set_num(Some(value)),
            _ => {
                validate_token("property", &key)?;
                validate_value(&key, &value)?;
                let existing = self.entries.iter_mut().find_map(|entry| match entry {
                    Entry::Property(p) if p.key == key => Some(p),
                    _ => None,
                });
                match existing {
                    Some(p) => p.value = value,
                    None => self.entries.push(Entry::Property(Property::new(key, value))),
                }
                Ok(())
            }
        }
    }

    /// Append a parsed property, replacing the value and trailing text of an
    /// earlier assignment to the same key.
    pub fn push_property(&mut self, property: Property) -> FeederResult<()> {
        if HEADER_KEYS.contains(&property.key.as_str()) {
            return self.set(property.key, property.value);
        }
        validate_token("property", &property.key)?;
        validate_value(&property.key, &property.value)?;
        let existing = self.entries.iter_mut().find_map(|entry| match entry {
            Entry::Property(p) if p.key == property.key => Some(p),
            _ => None,
        });
        match existing {
            Some(p) => *p = property,
            None => self.entries.push(Entry::Property(property)),
        }
        Ok(())
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        let pos = self
            .entries
            .iter()
            .position(|entry| matches!(entry, Entry::Property(p) if p.key == key))?;
        match self.entries.remove(pos) {
            Entry::Property(p) => Some(p.value),
            _ => None,
        }
    }

    pub fn push_blank(&mut self) {
        self.entries.push(Entry::Blank);
    }

    /// Append a comment line. `//` is prepended when missing.
    pub fn push_comment(&mut self, text: &str) {
        self.entries.push(Entry::Comment(comment_line(text)));
    }

    pub(crate) fn push_child(&mut self, child: NodeId) {
        self.entries.push(Entry::Child(child));
    }

    pub(crate) fn insert_entry(&mut self, index: usize, entry: Entry) {
        self.entries.insert(index.min(self.entries.len()), entry);
    }

    pub(crate) fn remove_child(&mut self, child: NodeId) -> bool {
        let pos = self
            .entries
            .iter()
            .position(|entry| *entry == Entry::Child(child));
        match pos {
            Some(pos) => {
                self.entries.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Position of a nested child within the body.
    pub(crate) fn child_position(&self, child: NodeId) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| *entry == Entry::Child(child))
    }

    /// Short human-readable identity used in messages, e.g. `recorder:7 "r1"`.
    pub fn label(&self) -> String {
        let mut label = self.class.clone();
        if let Some(num) = &self.num {
            label.push(':');
            label.push_str(num);
        }
        if let Some(name) = self.name() {
            label.push_str(&format!(" \"{name}\""));
        }
        label
    }
}

impl fmt::Display for ObjectNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Normalise free text into a `//` comment line.
pub fn comment_line(text: &str) -> String {
    let text = text.trim();
    if text.starts_with("//") {
        text.to_string()
    } else if text.is_empty() {
        "//".to_string()
    } else {
        format!("// {text}")
    }
}

fn validate_token(what: &str, token: &str) -> FeederResult<()> {
    let bad = token.is_empty()
        || token
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, ';' | '{' | '}'));
    if bad {
        return Err(FeederError::InvalidProperty {
            key: token.to_string(),
            reason: format!("{what} names must be a single token without `;`, `{{` or `}}`"),
        });
    }
    Ok(())
}

fn validate_value(key: &str, value: &str) -> FeederResult<()> {
    if value.contains('\n') || value.contains('\r') {
        return Err(FeederError::InvalidProperty {
            key: key.to_string(),
            reason: "values cannot span lines".into(),
        });
    }
    Ok(())
}
