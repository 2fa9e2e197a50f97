//! Array reconciliation policies.
//!
//! Two strategies for combining an existing array with an incoming one.
//! Both are pure and compare elements by equality. They are usually
//! installed through [`ArrayHooks`](crate::policies::ArrayHooks), but can be
//! called from any custom `merge_arrays` hook.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::MergeError;

/// Signature shared by the named array policies.
pub type ArrayMergeFn = fn(&[Value], &[Value]) -> Vec<Value>;

/// Keep `target` and append every element of `source` it does not contain.
///
/// Source order is preserved. Elements already in `target` are never added
/// again. Membership is a linear scan, so this is O(n·m).
pub fn append<T: PartialEq + Clone>(target: &[T], source: &[T]) -> Vec<T> {
    let mut out = target.to_vec();
    out.extend(source.iter().filter(|v| !target.contains(v)).cloned());
    out
}

/// Splice `source` into `target` using shared elements as anchors.
///
/// Elements present in both arrays keep their position in `target`. A new
/// source element is inserted right after the most recently matched anchor;
/// new elements seen before the first anchor are inserted just ahead of it.
/// When nothing matches, `source` is appended as-is. This is a single-pass
/// heuristic, not a minimal edit script.
pub fn incremental<T: PartialEq + Clone>(target: &[T], source: &[T]) -> Vec<T> {
    let mut out = target.to_vec();
    let mut tip: Option<usize> = None;
    let mut pre: Option<Vec<T>> = Some(Vec::new());

    for v in source {
        if let Some(idx) = out.iter().position(|x| x == v) {
            let mut at = idx;
            if let Some(buffered) = pre.take() {
                at += buffered.len();
                out.splice(idx..idx, buffered);
            }
            tip = Some(at);
        } else if let Some(at) = tip {
            out.insert(at + 1, v.clone());
            tip = Some(at + 1);
        } else if let Some(buffered) = pre.as_mut() {
            buffered.push(v.clone());
        }
    }

    if let Some(buffered) = pre {
        out.extend(buffered);
    }
    out
}

fn replace(_target: &[Value], source: &[Value]) -> Vec<Value> {
    source.to_vec()
}

/// Look up a named array policy.
///
/// Accepts `append` (alias `push`) and `incremental` (aliases `incr`,
/// `inc`).
pub fn by_name(name: &str) -> Option<ArrayMergeFn> {
    match name {
        "append" | "push" => Some(append::<Value>),
        "incremental" | "incr" | "inc" => Some(incremental::<Value>),
        _ => None,
    }
}

/// A selectable array strategy, as used in configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArrayMerge {
    /// The incoming array replaces the existing one.
    #[default]
    Replace,
    /// See [`append`].
    #[serde(alias = "push")]
    Append,
    /// See [`incremental`].
    #[serde(alias = "incr", alias = "inc")]
    Incremental,
}

impl ArrayMerge {
    /// Canonical name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Replace => "replace",
            Self::Append => "append",
            Self::Incremental => "incremental",
        }
    }

    /// The function implementing this strategy.
    pub fn function(&self) -> ArrayMergeFn {
        match self {
            Self::Replace => replace,
            Self::Append => append::<Value>,
            Self::Incremental => incremental::<Value>,
        }
    }

    /// Combine `target` and `source` with this strategy.
    pub fn apply(&self, target: &[Value], source: &[Value]) -> Vec<Value> {
        (self.function())(target, source)
    }
}

impl fmt::Display for ArrayMerge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArrayMerge {
    type Err = MergeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "replace" => Ok(Self::Replace),
            "append" | "push" => Ok(Self::Append),
            "incremental" | "incr" | "inc" => Ok(Self::Incremental),
            other => Err(MergeError::UnknownArrayPolicy(other.to_string())),
        }
    }
}
