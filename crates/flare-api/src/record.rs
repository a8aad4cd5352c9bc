// Dynamic records
//
// Controller resources (flows, ports, datapaths, clusters, ...) have no
// fixed schema: the field set varies by controller version and OpenFlow
// protocol level. Rather than declare a struct per endpoint, responses
// are wrapped in `Record`, a read-only tree over the parsed JSON with
// explicit field lookup. Missing fields are an error, never a default --
// callers branch on field presence (e.g. `group_id` only exists on
// OpenFlow >= 1.3 controllers) and a silent `None` would mask schema
// mismatches.

use std::fmt;

use indexmap::IndexMap;
use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};
use serde_json::{Number, Value};

use crate::error::Error;

/// A read-only, schema-less view over a JSON value.
///
/// Objects expose their keys through [`get`](Self::get) and friends,
/// arrays become ordered sequences of records, scalars pass through
/// unchanged. Built once per parsed response and immutable thereafter.
///
/// Equality is structural: two records built from structurally identical
/// JSON compare equal regardless of object key order, so callers can test
/// "is this flow now present in the controller's list" by value.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Vec<Record>),
    Object(IndexMap<String, Record>),
}

impl Record {
    /// Look up a field by name.
    ///
    /// Fails with [`Error::FieldNotFound`] if the field is absent or if
    /// this record is not an object.
    pub fn get(&self, field: &str) -> Result<&Record, Error> {
        self.get_opt(field).ok_or_else(|| Error::FieldNotFound {
            field: field.to_owned(),
        })
    }

    /// Look up a field by name, returning `None` when absent.
    ///
    /// For callers that branch on the presence of optional controller
    /// fields rather than treating absence as an error.
    pub fn get_opt(&self, field: &str) -> Option<&Record> {
        match self {
            Self::Object(map) => map.get(field),
            _ => None,
        }
    }

    /// Remove and return a field by value, consuming the record.
    pub fn take(self, field: &str) -> Result<Record, Error> {
        match self {
            Self::Object(mut map) => {
                map.shift_remove(field).ok_or_else(|| Error::FieldNotFound {
                    field: field.to_owned(),
                })
            }
            _ => Err(Error::FieldNotFound {
                field: field.to_owned(),
            }),
        }
    }

    /// `true` if this record is an object containing `field`.
    pub fn contains(&self, field: &str) -> bool {
        self.get_opt(field).is_some()
    }

    /// The field names of an object record, in response order.
    ///
    /// Empty for arrays and scalars.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        let map = match self {
            Self::Object(map) => Some(map),
            _ => None,
        };
        map.into_iter().flat_map(IndexMap::keys).map(String::as_str)
    }

    // ── Shape accessors ──────────────────────────────────────────────

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_object(&self) -> Option<&IndexMap<String, Record>> {
        match self {
            Self::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Record]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    /// The elements of an array record, by value.
    pub fn into_array(self) -> Option<Vec<Record>> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::Number(n) => n.as_u64(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    /// Convert back to a plain `serde_json::Value`, e.g. to send a
    /// previously received record back in a request body.
    pub fn to_value(&self) -> Value {
        Value::from(self.clone())
    }
}

impl From<Value> for Record {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => Self::Number(n),
            Value::String(s) => Self::String(s),
            Value::Array(items) => Self::Array(items.into_iter().map(Self::from).collect()),
            Value::Object(map) => Self::Object(
                map.into_iter()
                    .map(|(key, value)| (key, Self::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        match record {
            Record::Null => Self::Null,
            Record::Bool(b) => Self::Bool(b),
            Record::Number(n) => Self::Number(n),
            Record::String(s) => Self::String(s),
            Record::Array(items) => Self::Array(items.into_iter().map(Self::from).collect()),
            Record::Object(map) => Self::Object(
                map.into_iter()
                    .map(|(key, value)| (key, Self::from(value)))
                    .collect(),
            ),
        }
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Number(n) => n.serialize(serializer),
            Self::String(s) => serializer.serialize_str(s),
            Self::Array(items) => items.serialize(serializer),
            Self::Object(map) => map.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Value::deserialize(deserializer)?.into())
    }
}

impl fmt::Display for Record {
    /// Renders as compact JSON.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&rendered)
    }
}
