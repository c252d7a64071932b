//! Model of values living in the target runtime.
//!
//! [`JsValue`] stands in for anything the embedded page's runtime can hold:
//! primitives, arrays, objects, functions. The inspector never ships these
//! across the context boundary as-is — [`JsValue::safe_copy`] produces the
//! structurally-cloneable form (primitives verbatim, everything else
//! replaced by an opaque placeholder tag).

use std::collections::BTreeMap;

use autoview_core::{PLACEHOLDER_ARRAY, PLACEHOLDER_FUNCTION, PLACEHOLDER_OBJECT};

/// A value held by the target runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum JsValue {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<JsValue>),
    Object(BTreeMap<String, JsValue>),
    Function { name: Option<String> },
}

impl JsValue {
    /// Shorthand for a string value.
    pub fn str(s: impl Into<String>) -> Self {
        Self::String(s.into())
    }

    /// Shorthand for an anonymous function value.
    pub fn func() -> Self {
        Self::Function { name: None }
    }

    /// Shorthand for an object value from key/value pairs.
    pub fn object<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, JsValue)>,
        K: Into<String>,
    {
        Self::Object(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v))
                .collect(),
        )
    }

    /// Whether this value survives a safe copy verbatim.
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            Self::Undefined | Self::Null | Self::Bool(_) | Self::Number(_) | Self::String(_)
        )
    }

    /// Field access for object values.
    pub fn get(&self, key: &str) -> Option<&JsValue> {
        match self {
            Self::Object(map) => map.get(key),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// The safe-copy rule: primitives verbatim, non-primitives replaced by
    /// an opaque placeholder tag. NaN/infinite numbers degrade to null
    /// (JSON cannot represent them).
    pub fn safe_copy(&self) -> serde_json::Value {
        match self {
            Self::Undefined | Self::Null => serde_json::Value::Null,
            Self::Bool(b) => serde_json::Value::Bool(*b),
            Self::Number(n) => serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Self::String(s) => serde_json::Value::String(s.clone()),
            Self::Array(_) => serde_json::Value::String(PLACEHOLDER_ARRAY.to_string()),
            Self::Object(_) => serde_json::Value::String(PLACEHOLDER_OBJECT.to_string()),
            Self::Function { .. } => serde_json::Value::String(PLACEHOLDER_FUNCTION.to_string()),
        }
    }
}

impl From<bool> for JsValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<f64> for JsValue {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<i32> for JsValue {
    fn from(v: i32) -> Self {
        Self::Number(v as f64)
    }
}

impl From<&str> for JsValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

/// Safe-copy an entire props/state table.
pub fn safe_copy_entries(
    entries: &BTreeMap<String, JsValue>,
) -> BTreeMap<String, serde_json::Value> {
    entries
        .iter()
        .map(|(k, v)| (k.clone(), v.safe_copy()))
        .collect()
}
