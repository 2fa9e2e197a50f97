//! Session driver: applies a list of sources onto one target.

use serde_json::Value;
use tracing::debug;

use crate::engine::merge_subtree;
use crate::error::{MergeError, MergeResult};
use crate::hooks::{DefaultHooks, MergeHooks};
use crate::kind::Kind;

// ---------------------------------------------------------------------------
// Merger
// ---------------------------------------------------------------------------

/// A configured merge function.
///
/// Holds the prototype hook set. Every call derives its own session policy
/// (via [`MergeHooks::start`], or by cloning the prototype), so a `Merger`
/// can be reused and the prototype never observes session state.
#[derive(Clone, Debug, Default)]
pub struct Merger<H = DefaultHooks> {
    hooks: H,
}

impl<H> Merger<H>
where
    H: MergeHooks + Clone,
{
    /// Create a merger around a hook set.
    pub fn new(hooks: H) -> Self {
        Self { hooks }
    }

    /// The prototype hook set.
    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    /// Fold every source onto `target` in order.
    ///
    /// A single source that is itself a JSON array is treated as the list of
    /// sources. Sources that are not objects contribute nothing. Returns
    /// `Some(value)` when [`MergeHooks::finish`] substituted the result;
    /// otherwise the result is `target` itself.
    ///
    /// On error, keys committed before the failure stay on `target`.
    pub fn merge_onto<'a, I>(&self, target: &mut Value, sources: I) -> Result<Option<Value>, H::Error>
    where
        I: IntoIterator<Item = &'a Value>,
    {
        let sources = flatten(sources.into_iter().collect());

        let mut session = match self.hooks.start(target, &sources)? {
            Some(derived) => derived,
            None => self.hooks.clone(),
        };
        debug!(sources = sources.len(), "merge session started");

        for (index, source) in sources.iter().enumerate() {
            let Value::Object(source) = source else {
                debug!(index, kind = %Kind::of(source), "skipping non-object source");
                continue;
            };
            let root = match &mut *target {
                Value::Object(root) => root,
                other => {
                    return Err(MergeError::TargetNotObject {
                        kind: Kind::of(other),
                    }
                    .into())
                }
            };
            // The root is merged in place; a root override has nowhere to go.
            if merge_subtree(&mut session, root, source, None)?.is_some() {
                debug!(index, "root subtree override discarded");
            }
        }

        let result = session.finish(target, &sources)?;
        debug!(substituted = result.is_some(), "merge session finished");
        Ok(result)
    }

    /// Like [`merge_onto`](Self::merge_onto), taking and returning the
    /// target by value.
    pub fn merge<'a, I>(&self, mut target: Value, sources: I) -> Result<Value, H::Error>
    where
        I: IntoIterator<Item = &'a Value>,
    {
        let substituted = self.merge_onto(&mut target, sources)?;
        Ok(substituted.unwrap_or(target))
    }
}

/// Build a merger from a hook set.
pub fn create<H: MergeHooks + Clone>(hooks: H) -> Merger<H> {
    Merger::new(hooks)
}

/// Deep merge with no customization: objects merge recursively, the last
/// source wins for everything else.
pub fn merge<'a, I>(target: Value, sources: I) -> MergeResult<Value>
where
    I: IntoIterator<Item = &'a Value>,
{
    Merger::<DefaultHooks>::default().merge(target, sources)
}

/// In-place form of [`merge`].
pub fn merge_onto<'a, I>(target: &mut Value, sources: I) -> MergeResult<()>
where
    I: IntoIterator<Item = &'a Value>,
{
    Merger::<DefaultHooks>::default().merge_onto(target, sources)?;
    Ok(())
}

/// A lone array source stands for its elements.
fn flatten<'a>(sources: Vec<&'a Value>) -> Vec<&'a Value> {
    if let [only] = sources[..] {
        let only: &'a Value = only;
        if let Value::Array(items) = only {
            return items.iter().collect();
        }
    }
    sources
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::{MergeInfo, Resolution};
    use serde_json::{json, Map};

    #[derive(Debug, thiserror::Error)]
    enum HookError {
        #[error("refused key {0}")]
        Refused(String),
        #[error(transparent)]
        Merge(#[from] MergeError),
    }

    #[derive(Clone, Default)]
    struct RefuseKey(&'static str);

    impl MergeHooks for RefuseKey {
        type Error = HookError;

        fn item(
            &mut self,
            _target: Option<&Value>,
            _source: &Value,
            info: &MergeInfo<'_>,
        ) -> Result<Resolution, HookError> {
            if info.key_path == self.0 {
                return Err(HookError::Refused(info.key_path.to_string()));
            }
            Ok(Resolution::Fallthrough)
        }
    }

    #[derive(Clone, Default)]
    struct Counting {
        sessions: usize,
        sets: usize,
    }

    impl MergeHooks for Counting {
        type Error = MergeError;

        fn start(&self, _target: &Value, _sources: &[&Value]) -> MergeResult<Option<Self>> {
            Ok(Some(Counting {
                sessions: self.sessions + 1,
                sets: 0,
            }))
        }

        fn set(
            &mut self,
            target: &mut Map<String, Value>,
            key: &str,
            value: Value,
            _info: &MergeInfo<'_>,
        ) -> MergeResult<()> {
            self.sets += 1;
            target.insert(key.to_owned(), value);
            Ok(())
        }

        fn finish(&mut self, target: &mut Value, _sources: &[&Value]) -> MergeResult<Option<Value>> {
            Ok(Some(json!({"result": target.clone(), "sessions": self.sessions, "sets": self.sets})))
        }
    }

    #[test]
    fn merges_sources_left_to_right() {
        let a = json!({"a": {"b": 1942, "c": "keen", "x": {"value": "yz"}}});
        let b = json!({"e": "eeee", "a": {"c": "neato", "d": "deeee"}});
        let c = json!({"a": {"x": {"value": "xyz", "inner": true}}});
        let res = merge(json!({}), [&a, &b, &c]).unwrap();
        assert_eq!(
            res,
            json!({
                "a": {"b": 1942, "c": "neato", "d": "deeee", "x": {"value": "xyz", "inner": true}},
                "e": "eeee"
            })
        );
    }

    #[test]
    fn arrays_replace_by_default() {
        let a = json!({"a": {"b": [1942, 2142], "c": ["untouched"]}});
        let b = json!({"a": {"b": [2042]}});
        let res = merge(json!({}), [&a, &b]).unwrap();
        assert_eq!(res, json!({"a": {"b": [2042], "c": ["untouched"]}}));
    }

    #[test]
    fn single_array_source_is_flattened() {
        let layers = json!([{"a": 1}, {"b": 2}, {"a": 3}]);
        let res = merge(json!({}), [&layers]).unwrap();
        assert_eq!(res, json!({"a": 3, "b": 2}));
    }

    #[test]
    fn non_object_sources_are_ignored() {
        let a = json!({"a": 1});
        let junk = json!("not an object");
        let null = Value::Null;
        let res = merge(json!({}), [&a, &junk, &null]).unwrap();
        assert_eq!(res, json!({"a": 1}));
    }

    #[test]
    fn non_object_target_is_rejected() {
        let err = merge(json!([1, 2]), [&json!({"a": 1})]).unwrap_err();
        assert_eq!(err, MergeError::TargetNotObject { kind: Kind::Array });
    }

    #[test]
    fn non_object_target_without_object_sources_is_returned() {
        let res = merge(json!(7), std::iter::empty()).unwrap();
        assert_eq!(res, json!(7));
    }

    #[test]
    fn in_place_form() {
        let mut target = json!({"keep": true});
        merge_onto(&mut target, [&json!({"add": 1})]).unwrap();
        assert_eq!(target, json!({"keep": true, "add": 1}));
    }

    #[test]
    fn hook_error_surfaces_unchanged_and_keeps_partial_state() {
        let merger = create(RefuseKey("b"));
        let mut target = json!({});
        let first = json!({"a": 1, "b": 2, "c": 3});
        let err = merger.merge_onto(&mut target, [&first]).unwrap_err();
        assert!(matches!(err, HookError::Refused(ref k) if k == "b"));
        assert_eq!(target, json!({"a": 1}));
    }

    #[test]
    fn engine_error_converts_into_hook_error() {
        let merger = create(RefuseKey("never"));
        let err = merger.merge(json!(null), [&json!({"a": 1})]).unwrap_err();
        assert!(matches!(
            err,
            HookError::Merge(MergeError::TargetNotObject { kind: Kind::Null })
        ));
    }

    #[test]
    fn start_derives_a_session_without_touching_the_prototype() {
        let merger = create(Counting::default());
        let first = merger.merge(json!({}), [&json!({"a": 1, "b": 2})]).unwrap();
        let second = merger.merge(json!({}), [&json!({"a": 1})]).unwrap();
        assert_eq!(first["sessions"], json!(1));
        assert_eq!(first["sets"], json!(2));
        assert_eq!(second["sessions"], json!(1));
        assert_eq!(second["sets"], json!(1));
        assert_eq!(merger.hooks().sessions, 0);
    }

    #[test]
    fn finish_substitutes_result() {
        let merger = create(Counting::default());
        let mut target = json!({});
        let out = merger.merge_onto(&mut target, [&json!({"x": 1})]).unwrap();
        assert_eq!(out.unwrap()["result"], json!({"x": 1}));
        assert_eq!(target, json!({"x": 1}));
    }
}
