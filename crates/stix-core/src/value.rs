//! # Field Values
//!
//! [`Value`] is the closed set of shapes a property may receive as raw input
//! or hand back after validation: native scalars, text, date and date-time
//! values, lists, keyword-style field mappings, and already-constructed
//! objects.
//!
//! Date-times are always zone-aware (`DateTime<FixedOffset>`). A bare
//! calendar date is kept distinct (`Value::Date`) because timestamp
//! validation treats it differently from a value that carries a time of day.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, SecondsFormat, Utc};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

/// A raw or validated property value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absent / null.
    Null,
    /// Boolean.
    Bool(bool),
    /// 64-bit signed integer.
    Int(i64),
    /// 64-bit float.
    Float(f64),
    /// UTF-8 text.
    String(String),
    /// Calendar date without a time component.
    Date(NaiveDate),
    /// Zone-aware date-time.
    DateTime(DateTime<FixedOffset>),
    /// Ordered sequence.
    List(Vec<Value>),
    /// Keyword-style field mapping (e.g. a nested object given as raw fields).
    Map(BTreeMap<String, Value>),
    /// An already-constructed object instance.
    Object(StixObject),
}

impl Value {
    /// Short name of the variant, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Date(_) => "date",
            Value::DateTime(_) => "datetime",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Object(_) => "object",
        }
    }

    /// Borrow the text if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Borrow the object if this is a constructed instance.
    pub fn as_object(&self) -> Option<&StixObject> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Borrow the date-time if this is one.
    pub fn as_datetime(&self) -> Option<&DateTime<FixedOffset>> {
        match self {
            Value::DateTime(dt) => Some(dt),
            _ => None,
        }
    }

    /// True for `Value::Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Truthiness: null, `false`, zero, and empty text/collections are false.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Int(n) => *n != 0,
            Value::Float(f) => *f != 0.0,
            Value::String(s) => !s.is_empty(),
            Value::List(items) => !items.is_empty(),
            Value::Map(fields) => !fields.is_empty(),
            Value::Date(_) | Value::DateTime(_) | Value::Object(_) => true,
        }
    }

    /// The elements produced by iterating this value, or `None` when the
    /// value is not iterable.
    ///
    /// Lists yield their items, text yields one-character strings, and
    /// mappings yield their keys in order.
    pub fn iter_elements(&self) -> Option<Vec<Value>> {
        match self {
            Value::List(items) => Some(items.clone()),
            Value::String(s) => Some(s.chars().map(|c| Value::String(c.to_string())).collect()),
            Value::Map(fields) => Some(fields.keys().cloned().map(Value::String).collect()),
            _ => None,
        }
    }
}

/// Render a date-time as RFC 3339, using `Z` for a zero offset.
pub fn format_datetime(dt: &DateTime<FixedOffset>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{x:?}"),
            Value::String(s) => f.write_str(s),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Value::DateTime(dt) => f.write_str(&format_datetime(dt)),
            Value::List(_) | Value::Map(_) | Value::Object(_) => {
                let json = serde_json::to_string(self).map_err(|_| std::fmt::Error)?;
                f.write_str(&json)
            }
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(n) => serializer.serialize_i64(*n),
            Value::Float(x) => serializer.serialize_f64(*x),
            Value::String(s) => serializer.serialize_str(s),
            Value::Date(d) => serializer.serialize_str(&d.format("%Y-%m-%d").to_string()),
            Value::DateTime(dt) => serializer.serialize_str(&format_datetime(dt)),
            Value::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Map(fields) => serialize_fields(fields, serializer),
            Value::Object(obj) => obj.serialize(serializer),
        }
    }
}

fn serialize_fields<S: Serializer>(
    fields: &BTreeMap<String, Value>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(fields.len()))?;
    for (k, v) in fields {
        map.serialize_entry(k, v)?;
    }
    map.end()
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(i64::from(n))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}

impl From<DateTime<FixedOffset>> for Value {
    fn from(dt: DateTime<FixedOffset>) -> Self {
        Value::DateTime(dt)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(dt: DateTime<Utc>) -> Self {
        Value::DateTime(dt.with_timezone(&utc_offset()))
    }
}

impl From<StixObject> for Value {
    fn from(obj: StixObject) -> Self {
        Value::Object(obj)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(fields: BTreeMap<String, Value>) -> Self {
        Value::Map(fields)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(fields) => Value::Map(
                fields
                    .into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect(),
            ),
        }
    }
}

/// The zero offset, used to label UTC date-times.
pub fn utc_offset() -> FixedOffset {
    Utc.fix()
}

// ---------------------------------------------------------------------------
// Constructed objects
// ---------------------------------------------------------------------------

/// A constructed object: its type discriminator and validated fields.
///
/// Instances are produced by an object schema after every field has passed
/// its property's validation, so the field map is trusted as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct StixObject {
    type_name: String,
    fields: BTreeMap<String, Value>,
}

impl StixObject {
    /// Assemble an object from already-validated fields.
    pub fn new(type_name: impl Into<String>, fields: BTreeMap<String, Value>) -> Self {
        Self {
            type_name: type_name.into(),
            fields,
        }
    }

    /// The object type this instance was built as.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// The `id` field, when it is present and textual.
    pub fn id(&self) -> Option<&str> {
        self.fields.get("id").and_then(Value::as_str)
    }

    /// Look up a field by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// All fields, ordered by name.
    pub fn fields(&self) -> &BTreeMap<String, Value> {
        &self.fields
    }

    /// Consume the object, returning its fields.
    pub fn into_fields(self) -> BTreeMap<String, Value> {
        self.fields
    }
}

impl Serialize for StixObject {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_fields(&self.fields, serializer)
    }
}
