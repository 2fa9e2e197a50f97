//! The merge hook contract.
//!
//! A [`MergeHooks`] implementation customizes how the engine folds a source
//! onto a target. Every method has a default, so an empty `impl` block gives
//! plain "last source wins" deep merge. Overriding a method is the only way
//! to change the corresponding decision.
//!
//! # Lifecycle
//!
//! For one call to [`Merger::merge_onto`](crate::Merger::merge_onto):
//!
//! 1. [`start`](MergeHooks::start) once, to derive the session policy.
//! 2. Per source, per subtree: [`enter`](MergeHooks::enter), then per key
//!    [`item`](MergeHooks::item), one of the `merge*` hooks, and
//!    [`set`](MergeHooks::set), then [`exit`](MergeHooks::exit).
//! 3. [`finish`](MergeHooks::finish) once.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::MergeError;
use crate::kind::Kind;

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// What a value-level hook decided for one key.
#[derive(Clone, Debug, PartialEq)]
pub enum Resolution {
    /// Commit this value for the key.
    Commit(Value),
    /// Leave the key alone: nothing is committed and `set` is not called.
    Skip,
    /// No opinion; continue with the next rule in precedence order.
    Fallthrough,
}

impl From<Value> for Resolution {
    fn from(value: Value) -> Self {
        Self::Commit(value)
    }
}

// ---------------------------------------------------------------------------
// MergeOp
// ---------------------------------------------------------------------------

/// The branch the engine takes for a key.
///
/// Hooks called before the commit see one of the three default operations
/// chosen from the kinds; `set` sees the branch actually taken.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeOp {
    /// Both values are objects.
    MergeObjects,
    /// Both values are arrays.
    MergeArrays,
    /// Any other pairing, including mismatched kinds.
    MergeOther,
    /// `item` supplied the value.
    Override,
    /// The key was absent on the target.
    Assign,
    /// Nested objects were merged in place.
    Recursive,
}

impl MergeOp {
    /// Default operation for a pair of kinds.
    pub fn for_kinds(target: Kind, source: Kind) -> Self {
        match (target, source) {
            (Kind::Object, Kind::Object) => Self::MergeObjects,
            (Kind::Array, Kind::Array) => Self::MergeArrays,
            _ => Self::MergeOther,
        }
    }

    /// Stable snake_case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MergeObjects => "merge_objects",
            Self::MergeArrays => "merge_arrays",
            Self::MergeOther => "merge_other",
            Self::Override => "override",
            Self::Assign => "assign",
            Self::Recursive => "recursive",
        }
    }
}

impl fmt::Display for MergeOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// MergeInfo
// ---------------------------------------------------------------------------

/// The subtree currently being merged.
#[derive(Clone, Copy, Debug)]
pub struct Subtree<'a> {
    /// The source object whose keys are being walked.
    pub source: &'a Map<String, Value>,
    /// Dot-joined path of this subtree, `None` at the root.
    pub path: Option<&'a str>,
}

/// Everything the engine knows about the key being merged.
///
/// Built fresh for every key and shared by reference with every hook called
/// for that key.
#[derive(Clone, Copy, Debug)]
pub struct MergeInfo<'a> {
    /// Current operation.
    pub op: MergeOp,
    /// Kind of the value already on the target.
    pub target_kind: Kind,
    /// Kind of the incoming value.
    pub source_kind: Kind,
    /// The key within the enclosing object.
    pub key: &'a str,
    /// Dot-joined path from the merge root, innermost key last.
    pub key_path: &'a str,
    /// The enclosing subtree.
    pub outer: Subtree<'a>,
}

// ---------------------------------------------------------------------------
// MergeHooks trait
// ---------------------------------------------------------------------------

/// Optional callbacks customizing a merge.
///
/// `Error` is the failure type for the whole merge call. A hook error is
/// returned to the caller unchanged, and engine errors reach it through
/// `From<MergeError>`.
///
/// Value-level hooks return a [`Resolution`]. `merge_objects`,
/// `merge_arrays` and `merge_other` all default to [`merge`](Self::merge),
/// which defaults to [`Resolution::Fallthrough`]: recurse for objects,
/// take the source value for everything else.
pub trait MergeHooks {
    /// Error type surfaced by the merge call.
    type Error: From<MergeError>;

    /// Called once before any source is applied.
    ///
    /// Returning `Some(policy)` makes that policy the active one for this call
    /// only, which is how a policy gets session-scoped state. With `None`
    /// the configured policy is cloned.
    fn start(&self, _target: &Value, _sources: &[&Value]) -> Result<Option<Self>, Self::Error>
    where
        Self: Sized,
    {
        Ok(None)
    }

    /// Called once after every source has been applied.
    ///
    /// Returning `Some(value)` substitutes the result of the call.
    fn finish(
        &mut self,
        _target: &mut Value,
        _sources: &[&Value],
    ) -> Result<Option<Value>, Self::Error> {
        Ok(None)
    }

    /// Called before a subtree is walked.
    ///
    /// `Some(value)` skips the walk and becomes the subtree's result. At the
    /// root the result is discarded, so this skips the whole source.
    fn enter(
        &mut self,
        _target: &Map<String, Value>,
        _source: &Map<String, Value>,
        _path: Option<&str>,
    ) -> Result<Option<Value>, Self::Error> {
        Ok(None)
    }

    /// Called after a subtree has been walked. `Some(value)` replaces the
    /// subtree's result.
    fn exit(
        &mut self,
        _target: &Map<String, Value>,
        _source: &Map<String, Value>,
        _path: Option<&str>,
    ) -> Result<Option<Value>, Self::Error> {
        Ok(None)
    }

    /// First look at every key, before any other rule.
    ///
    /// `target` is `None` when the key is absent on the target.
    fn item(
        &mut self,
        _target: Option<&Value>,
        _source: &Value,
        _info: &MergeInfo<'_>,
    ) -> Result<Resolution, Self::Error> {
        Ok(Resolution::Fallthrough)
    }

    /// Two objects meet. `Fallthrough` recurses into them.
    fn merge_objects(
        &mut self,
        target: &Value,
        source: &Value,
        info: &MergeInfo<'_>,
    ) -> Result<Resolution, Self::Error> {
        self.merge(target, source, info)
    }

    /// Two arrays meet. `Fallthrough` takes the source array.
    fn merge_arrays(
        &mut self,
        target: &Value,
        source: &Value,
        info: &MergeInfo<'_>,
    ) -> Result<Resolution, Self::Error> {
        self.merge(target, source, info)
    }

    /// Any other pairing. `Fallthrough` takes the source value.
    fn merge_other(
        &mut self,
        target: &Value,
        source: &Value,
        info: &MergeInfo<'_>,
    ) -> Result<Resolution, Self::Error> {
        self.merge(target, source, info)
    }

    /// Generic fallback for the three hooks above.
    fn merge(
        &mut self,
        _target: &Value,
        _source: &Value,
        _info: &MergeInfo<'_>,
    ) -> Result<Resolution, Self::Error> {
        Ok(Resolution::Fallthrough)
    }

    /// Commit `value` for `key`.
    ///
    /// This is the only place a key binding on the target is written. An
    /// override that does not write leaves the key as it was.
    ///
    /// For [`MergeOp::Recursive`] the nested object has already been merged
    /// in place and `value` is an owned copy of it.
    fn set(
        &mut self,
        target: &mut Map<String, Value>,
        key: &str,
        value: Value,
        _info: &MergeInfo<'_>,
    ) -> Result<(), Self::Error> {
        target.insert(key.to_owned(), value);
        Ok(())
    }
}

/// The hook set with no overrides.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DefaultHooks;

impl MergeHooks for DefaultHooks {
    type Error = MergeError;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_ops_from_kinds() {
        assert_eq!(MergeOp::for_kinds(Kind::Object, Kind::Object), MergeOp::MergeObjects);
        assert_eq!(MergeOp::for_kinds(Kind::Array, Kind::Array), MergeOp::MergeArrays);
        assert_eq!(MergeOp::for_kinds(Kind::Object, Kind::Array), MergeOp::MergeOther);
        assert_eq!(MergeOp::for_kinds(Kind::Absent, Kind::Object), MergeOp::MergeOther);
        assert_eq!(MergeOp::for_kinds(Kind::Null, Kind::Null), MergeOp::MergeOther);
    }

    #[test]
    fn op_names() {
        assert_eq!(MergeOp::Recursive.to_string(), "recursive");
        assert_eq!(
            serde_json::to_value(MergeOp::MergeArrays).unwrap(),
            serde_json::json!("merge_arrays")
        );
    }

    #[test]
    fn value_converts_to_commit() {
        let r: Resolution = Value::Bool(true).into();
        assert_eq!(r, Resolution::Commit(Value::Bool(true)));
    }
}
