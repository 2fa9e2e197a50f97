//! Value classification.
//!
//! The engine decides what to do with a key by looking at the kinds of the
//! existing and incoming values. Hook authors get the same classifier so
//! their decisions line up with the engine's.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The structural kind of a value as seen by the merge engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    /// The key does not exist.
    Absent,
    /// An explicit `null`.
    Null,
    /// A JSON object (string-keyed map).
    Object,
    /// A JSON array.
    Array,
    /// Any leaf: booleans, numbers, strings.
    Other,
}

impl Kind {
    /// Classify a present value.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Object(_) => Self::Object,
            Value::Array(_) => Self::Array,
            Value::Bool(_) | Value::Number(_) | Value::String(_) => Self::Other,
        }
    }

    /// Stable lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Absent => "absent",
            Self::Null => "null",
            Self::Object => "object",
            Self::Array => "array",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a possibly-missing value.
///
/// `None` (the key was not found) is [`Kind::Absent`], which is distinct from
/// an explicit `null`.
pub fn classify(value: Option<&Value>) -> Kind {
    value.map_or(Kind::Absent, Kind::of)
}
