use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::constants::ACTIVITY_NAME;
use super::timestamp::Timestamp;

///
/// Possible attribute values according to the XES Standard
///
/// The attribute kind is always explicit through the chosen variant; it is
/// never inferred from a host value. Only [`AttributeValue::List`] and
/// [`AttributeValue::Container`] carry child attributes (nesting is recursive
/// and unbounded in depth); all other variants carry a plain value.
///
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "content")]
pub enum AttributeValue {
    /// String values
    String(String),
    /// Date values (ISO 8601, offset preserved iff explicit in the source)
    Date(Timestamp),
    /// Integer values
    Int(i64),
    /// Float values
    Float(f64),
    /// Boolean values
    Boolean(bool),
    /// IDs (UUIDs)
    Id(Uuid),
    /// Ordered list of child attributes (may contain duplicate keys)
    List(Vec<Attribute>),
    /// Container of child attributes (order not meaningful, but preserved)
    Container(Vec<Attribute>),
}

impl AttributeValue {
    /// Try to get the attribute value as a String
    pub fn try_as_string(&self) -> Option<&String> {
        match self {
            AttributeValue::String(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get the attribute value as a date
    pub fn try_as_date(&self) -> Option<&Timestamp> {
        match self {
            AttributeValue::Date(v) => Some(v),
            _ => None,
        }
    }

    /// Child attributes of a [`AttributeValue::List`] or [`AttributeValue::Container`]
    pub fn children(&self) -> Option<&Vec<Attribute>> {
        match self {
            AttributeValue::List(c) | AttributeValue::Container(c) => Some(c),
            _ => None,
        }
    }
}

///
/// Attribute made up of a key and a typed value
///
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Attribute {
    /// Attribute key
    pub key: String,
    /// Attribute value
    pub value: AttributeValue,
}

impl Attribute {
    /// Create a new attribute with an explicit value kind
    pub fn new(key: impl Into<String>, value: AttributeValue) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }

    /// Create a new string attribute
    pub fn string(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(key, AttributeValue::String(value.into()))
    }

    /// Create a new date attribute
    pub fn date(key: impl Into<String>, value: Timestamp) -> Self {
        Self::new(key, AttributeValue::Date(value))
    }

    /// Create a new int attribute
    pub fn int(key: impl Into<String>, value: i64) -> Self {
        Self::new(key, AttributeValue::Int(value))
    }

    /// Create a new float attribute
    pub fn float(key: impl Into<String>, value: f64) -> Self {
        Self::new(key, AttributeValue::Float(value))
    }

    /// Create a new boolean attribute
    pub fn boolean(key: impl Into<String>, value: bool) -> Self {
        Self::new(key, AttributeValue::Boolean(value))
    }

    /// Create a new ID attribute
    pub fn id(key: impl Into<String>, value: Uuid) -> Self {
        Self::new(key, AttributeValue::Id(value))
    }

    /// Create a new list attribute from already-built children
    pub fn list(key: impl Into<String>, children: Vec<Attribute>) -> Self {
        Self::new(key, AttributeValue::List(children))
    }

    /// Create a new container attribute from already-built children
    pub fn container(key: impl Into<String>, children: Vec<Attribute>) -> Self {
        Self::new(key, AttributeValue::Container(children))
    }
}

/// Attributes are [`Vec`]s of [`Attribute`]s (order matters)
pub type Attributes = Vec<Attribute>;

///
/// Trait to add and look up attributes by key
///
pub trait AttributesExt {
    /// Append a new attribute (with key and value)
    ///
    /// Does _not_ check whether the key is already present.
    fn add_to_attributes(&mut self, key: impl Into<String>, value: AttributeValue);
    /// Get an attribute by key (linear lookup)
    fn get_by_key(&self, key: &str) -> Option<&Attribute>;
}

impl AttributesExt for Attributes {
    fn add_to_attributes(&mut self, key: impl Into<String>, value: AttributeValue) {
        self.push(Attribute::new(key, value));
    }

    fn get_by_key(&self, key: &str) -> Option<&Attribute> {
        self.iter().find(|attr| attr.key == key)
    }
}

///
/// An event consists of an ordered sequence of [`Attributes`]
///
/// Converted events always start with a `concept:name` string attribute and a
/// `time:timestamp` date attribute, followed by the remaining attributes in
/// mapping-then-extra order.
///
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Event {
    /// Event attributes
    pub attributes: Attributes,
}

impl Event {
    /// Create a new event with the provided activity (keyed by [`ACTIVITY_NAME`])
    pub fn new(activity: impl Into<String>) -> Self {
        Event {
            attributes: vec![Attribute::string(ACTIVITY_NAME, activity)],
        }
    }
}

///
/// A trace consists of trace-level attributes and the events of one case
///
/// The trace attributes contain a `concept:name` string attribute equal to
/// the case ID; events keep their original row-encounter order.
///
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Trace {
    /// Trace-level attributes
    pub attributes: Attributes,
    /// Events contained in the trace
    pub events: Vec<Event>,
}

///
/// Event log consisting of [`Trace`]s plus log-level declarations
///
/// Field order mirrors the element order the XES schema mandates for the
/// document; the serializer walks this struct top to bottom.
///
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EventLog {
    /// XES Extensions
    pub extensions: Vec<EventLogExtension>,
    /// Global trace attributes (defaults for all traces; omitted from the document when empty)
    pub global_trace_attrs: Attributes,
    /// Global event attributes (defaults for all events; omitted from the document when empty)
    pub global_event_attrs: Attributes,
    /// XES Event classifiers
    pub classifiers: Vec<EventLogClassifier>,
    /// Top-level log attributes
    pub attributes: Attributes,
    /// Traces contained in the log, in case-ID-first-seen order
    pub traces: Vec<Trace>,
}

impl EventLog {
    /// Try to get the [`EventLogClassifier`] with the given name
    pub fn get_classifier_by_name(&self, name: &str) -> Option<&EventLogClassifier> {
        self.classifiers.iter().find(|c| c.name == name)
    }
}

/// An XES Extension (a schema namespace declaration)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct EventLogExtension {
    /// Extension name
    pub name: String,
    /// Prefix of attribute keys defined by the extension
    pub prefix: String,
    /// URI pointing to the XESEXT definition
    pub uri: String,
}

///
/// Event classifier
///
/// Declares which attribute keys jointly identify an event class.
///
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EventLogClassifier {
    /// Name of the classifier
    pub name: String,
    /// Ordered list of attribute keys forming the class identity
    pub keys: Vec<String>,
}

impl EventLogClassifier {
    /// Create a new classifier from a name and attribute keys
    pub fn new<S: Into<String>>(name: impl Into<String>, keys: Vec<S>) -> Self {
        Self {
            name: name.into(),
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }
}
