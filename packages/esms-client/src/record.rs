//! Schema-less decoding of gateway responses.
//!
//! The gateway's JSON body has no contract we rely on, so every object is
//! decoded into a [`Record`]: an ordered map from field name to [`Field`],
//! tagged with a display label chosen by the caller. Lookups return
//! `Option` and callers check presence explicitly.

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use serde_json::{Number, Value};
use std::fmt;

use crate::error::Result;

/// Label used for records when the caller doesn't pick one.
pub const DEFAULT_TYPE_NAME: &str = "OtpResponse";

/// A decoded JSON value.
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Record(Record),
    List(Vec<Field>),
}

impl Field {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Field::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Field::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Field::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Field::Record(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Field]> {
        match self {
            Field::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Field::Null)
    }

    /// Look up `name` when this field is a record.
    pub fn get(&self, name: &str) -> Option<&Field> {
        self.as_record().and_then(|r| r.get(name))
    }

    fn from_value(value: Value, type_name: &str) -> Self {
        match value {
            Value::Null => Field::Null,
            Value::Bool(b) => Field::Bool(b),
            Value::Number(n) => Field::Number(n),
            Value::String(s) => Field::String(s),
            Value::Array(items) => Field::List(
                items
                    .into_iter()
                    .map(|v| Field::from_value(v, type_name))
                    .collect(),
            ),
            Value::Object(map) => {
                let fields = map
                    .into_iter()
                    .map(|(k, v)| (k, Field::from_value(v, type_name)))
                    .collect();
                Field::Record(Record {
                    type_name: type_name.to_string(),
                    fields,
                })
            }
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Null => f.write_str("None"),
            Field::Bool(b) => write!(f, "{}", b),
            Field::Number(n) => write!(f, "{}", n),
            Field::String(s) => write!(f, "{:?}", s),
            Field::Record(r) => write!(f, "{}", r),
            Field::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
        }
    }
}

impl Serialize for Field {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Field::Null => serializer.serialize_unit(),
            Field::Bool(b) => serializer.serialize_bool(*b),
            Field::Number(n) => n.serialize(serializer),
            Field::String(s) => serializer.serialize_str(s),
            Field::Record(r) => r.serialize(serializer),
            Field::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
        }
    }
}

/// A decoded JSON object with a display label.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    type_name: String,
    fields: IndexMap<String, Field>,
}

impl Record {
    /// Display label; not derived from the data.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    /// String value of `name`, if present and a string.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Field::as_str)
    }

    /// Field names in the order the gateway sent them.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Field)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.type_name)?;
        for (i, (name, value)) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}={}", name, value)?;
        }
        f.write_str(")")
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Decoded gateway response body.
#[derive(Debug, Clone, PartialEq)]
pub struct OtpResponse {
    root: Field,
}

impl OtpResponse {
    /// The body as a single record, when the gateway returned an object.
    pub fn as_record(&self) -> Option<&Record> {
        self.root.as_record()
    }

    /// The body as a sequence, when the gateway returned an array.
    pub fn as_list(&self) -> Option<&[Field]> {
        self.root.as_list()
    }

    pub fn get(&self, name: &str) -> Option<&Field> {
        self.root.get(name)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Field::as_str)
    }

    /// eSMS status code (`"100"` means the message was accepted).
    pub fn code_result(&self) -> Option<&str> {
        self.get_str("CodeResult")
    }

    pub fn sms_id(&self) -> Option<&str> {
        self.get_str("SMSID")
    }

    pub fn error_message(&self) -> Option<&str> {
        self.get_str("ErrorMessage")
    }

    pub fn is_accepted(&self) -> bool {
        self.code_result() == Some("100")
    }
}

impl fmt::Display for OtpResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root)
    }
}

impl Serialize for OtpResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.root.serialize(serializer)
    }
}

/// Decode a JSON body, labelling every object with `type_name`.
pub fn decode(text: &str, type_name: &str) -> Result<OtpResponse> {
    let value: Value = serde_json::from_str(text)?;
    Ok(OtpResponse {
        root: Field::from_value(value, type_name),
    })
}
