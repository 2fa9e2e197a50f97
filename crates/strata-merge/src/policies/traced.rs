//! Lifecycle logging for any hook set.

use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::hooks::{DefaultHooks, MergeHooks, MergeInfo, Resolution};
use crate::kind::Kind;

/// Emits `tracing` events for the merge lifecycle of an inner hook set.
///
/// Subtree entry and exit are logged at `TRACE`, every commit at `DEBUG`.
#[derive(Clone, Debug, Default)]
pub struct Traced<H = DefaultHooks> {
    inner: H,
}

impl<H> Traced<H> {
    pub fn new(inner: H) -> Self {
        Self { inner }
    }
}

impl<H> MergeHooks for Traced<H>
where
    H: MergeHooks + Clone,
{
    type Error = H::Error;

    fn start(&self, target: &Value, sources: &[&Value]) -> Result<Option<Self>, H::Error> {
        debug!(
            target_kind = %Kind::of(target),
            sources = sources.len(),
            "starting merge"
        );
        Ok(self.inner.start(target, sources)?.map(Self::new))
    }

    fn finish(
        &mut self,
        target: &mut Value,
        sources: &[&Value],
    ) -> Result<Option<Value>, H::Error> {
        let result = self.inner.finish(target, sources)?;
        debug!(substituted = result.is_some(), "finished merge");
        Ok(result)
    }

    fn enter(
        &mut self,
        target: &Map<String, Value>,
        source: &Map<String, Value>,
        path: Option<&str>,
    ) -> Result<Option<Value>, H::Error> {
        trace!(path = path.unwrap_or("<root>"), keys = source.len(), "enter");
        let result = self.inner.enter(target, source, path)?;
        if result.is_some() {
            debug!(path = path.unwrap_or("<root>"), "subtree replaced on enter");
        }
        Ok(result)
    }

    fn exit(
        &mut self,
        target: &Map<String, Value>,
        source: &Map<String, Value>,
        path: Option<&str>,
    ) -> Result<Option<Value>, H::Error> {
        trace!(path = path.unwrap_or("<root>"), "exit");
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
        debug!(
            op = %info.op,
            path = info.key_path,
            target_kind = %info.target_kind,
            source_kind = %info.source_kind,
            "commit"
        );
        self.inner.set(target, key, value, info)
    }
}
