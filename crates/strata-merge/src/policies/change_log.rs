//! Change recording.
//!
//! [`ChangeLog`] wraps another hook set and records every key whose value
//! actually changed. Commits of a value equal to the one already present are
//! dropped without writing, so the log only names real changes. The session
//! result is substituted with a [`ChangeReport`] in JSON form.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::error::{MergeError, MergeResult};
use crate::hooks::{DefaultHooks, MergeHooks, MergeInfo, MergeOp, Resolution};

/// One recorded change.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Change {
    /// The branch that produced the value.
    pub op: MergeOp,
    /// Dot-joined path of the changed key.
    pub key_path: String,
}

/// The substituted result of a [`ChangeLog`] session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChangeReport {
    /// The merged target.
    pub merged: Value,
    /// Changes in commit order.
    pub changes: Vec<Change>,
}

impl ChangeReport {
    /// Parse the value returned by a merge run with [`ChangeLog`].
    pub fn from_value(value: Value) -> MergeResult<Self> {
        serde_json::from_value(value).map_err(|e| MergeError::MalformedReport(e.to_string()))
    }

    /// Paths of every change, in order.
    pub fn paths(&self) -> Vec<&str> {
        self.changes.iter().map(|c| c.key_path.as_str()).collect()
    }
}

/// Records changed keys on top of an inner hook set.
#[derive(Clone, Debug, Default)]
pub struct ChangeLog<H = DefaultHooks> {
    inner: H,
    changes: Vec<Change>,
}

impl<H> ChangeLog<H> {
    pub fn new(inner: H) -> Self {
        Self {
            inner,
            changes: Vec::new(),
        }
    }

    /// Changes recorded so far in this session.
    pub fn changes(&self) -> &[Change] {
        &self.changes
    }
}

impl<H> MergeHooks for ChangeLog<H>
where
    H: MergeHooks + Clone,
{
    type Error = H::Error;

    fn start(&self, target: &Value, sources: &[&Value]) -> Result<Option<Self>, H::Error> {
        let inner = match self.inner.start(target, sources)? {
            Some(derived) => derived,
            None => self.inner.clone(),
        };
        Ok(Some(Self::new(inner)))
    }

    fn finish(
        &mut self,
        target: &mut Value,
        sources: &[&Value],
    ) -> Result<Option<Value>, H::Error> {
        let merged = match self.inner.finish(target, sources)? {
            Some(substituted) => substituted,
            None => target.clone(),
        };
        let changes = std::mem::take(&mut self.changes);
        Ok(Some(json!({ "merged": merged, "changes": changes })))
    }

    fn enter(
        &mut self,
        target: &Map<String, Value>,
        source: &Map<String, Value>,
        path: Option<&str>,
    ) -> Result<Option<Value>, H::Error> {
        self.inner.enter(target, source, path)
    }

    fn exit(
        &mut self,
        target: &Map<String, Value>,
        source: &Map<String, Value>,
        path: Option<&str>,
    ) -> Result<Option<Value>, H::Error> {
        self.inner.exit(target, source, path)
    }

    fn item(
        &mut self,
        target: Option<&Value>,
        source: &Value,
        info: &MergeInfo<'_>,
    ) -> Result<Resolution, H::Error> {
        self.inner.item(target, source, info)
    }

    fn merge_objects(
        &mut self,
        target: &Value,
        source: &Value,
        info: &MergeInfo<'_>,
    ) -> Result<Resolution, H::Error> {
        self.inner.merge_objects(target, source, info)
    }

    fn merge_arrays(
        &mut self,
        target: &Value,
        source: &Value,
        info: &MergeInfo<'_>,
    ) -> Result<Resolution, H::Error> {
        self.inner.merge_arrays(target, source, info)
    }

    fn merge_other(
        &mut self,
        target: &Value,
        source: &Value,
        info: &MergeInfo<'_>,
    ) -> Result<Resolution, H::Error> {
        self.inner.merge_other(target, source, info)
    }

    fn merge(
        &mut self,
        target: &Value,
        source: &Value,
        info: &MergeInfo<'_>,
    ) -> Result<Resolution, H::Error> {
        self.inner.merge(target, source, info)
    }

    fn set(
        &mut self,
        target: &mut Map<String, Value>,
        key: &str,
        value: Value,
        info: &MergeInfo<'_>,
    ) -> Result<(), H::Error> {
        if target.get(key) == Some(&value) {
            return Ok(());
        }
        let before = target.get(key).cloned();
        self.inner.set(target, key, value, info)?;
        // The inner policy may decline the write.
        if target.get(key) == before.as_ref() {
            return Ok(());
        }
        self.changes.push(Change {
            op: info.op,
            key_path: info.key_path.to_string(),
        });
        Ok(())
    }
}
