//! The per-subtree decision procedure.
//!
//! [`merge_subtree`] walks the keys of one source object and decides, for
//! each key, whether to assign, recurse, or hand the pair to a hook. The
//! order of precedence is:
//!
//! enter override > item override > assign if absent > `merge_objects`
//! (recurse on fallthrough) > kind-specific hook > `merge` > take source.

use serde_json::{Map, Value};
use tracing::trace;

use crate::hooks::{MergeHooks, MergeInfo, MergeOp, Resolution, Subtree};
use crate::kind::{classify, Kind};

/// Merge `source` into `target` in place.
///
/// Returns `Some(value)` when `enter` or `exit` overrode the subtree, in
/// which case the caller commits that value instead of `target`.
pub fn merge_subtree<H: MergeHooks>(
    hooks: &mut H,
    target: &mut Map<String, Value>,
    source: &Map<String, Value>,
    path: Option<&str>,
) -> Result<Option<Value>, H::Error> {
    if let Some(replaced) = hooks.enter(target, source, path)? {
        return Ok(Some(replaced));
    }

    let outer = Subtree { source, path };
    for (key, src) in source {
        let key_path = match path {
            Some(p) => format!("{p}.{key}"),
            None => key.clone(),
        };
        let source_kind = Kind::of(src);
        let target_kind = classify(target.get(key));
        let op = MergeOp::for_kinds(target_kind, source_kind);
        let mut info = MergeInfo {
            op,
            target_kind,
            source_kind,
            key: key.as_str(),
            key_path: &key_path,
            outer,
        };

        let value = match hooks.item(target.get(key), src, &info)? {
            Resolution::Commit(v) => {
                info.op = MergeOp::Override;
                v
            }
            Resolution::Skip => continue,
            Resolution::Fallthrough => match target.get(key) {
                None => {
                    info.op = MergeOp::Assign;
                    src.clone()
                }
                Some(existing) if op == MergeOp::MergeObjects => {
                    match hooks.merge_objects(existing, src, &info)? {
                        Resolution::Commit(v) => v,
                        Resolution::Skip => continue,
                        Resolution::Fallthrough => {
                            info.op = MergeOp::Recursive;
                            recurse(hooks, target, key, src, &key_path)?
                        }
                    }
                }
                Some(existing) => {
                    let resolution = match op {
                        MergeOp::MergeArrays => hooks.merge_arrays(existing, src, &info)?,
                        _ => hooks.merge_other(existing, src, &info)?,
                    };
                    match resolution {
                        Resolution::Commit(v) => v,
                        Resolution::Skip => continue,
                        Resolution::Fallthrough => src.clone(),
                    }
                }
            },
        };

        hooks.set(target, key, value, &info)?;
    }

    if let Some(replaced) = hooks.exit(target, source, path)? {
        return Ok(Some(replaced));
    }
    Ok(None)
}

/// Merge two nested objects in place and produce the value to commit.
///
/// The nested map is merged where it sits, so `set` always receives a copy
/// of it. A copy is made at every level of nesting, which costs
/// O(size × depth) per source for deep trees.
fn recurse<H: MergeHooks>(
    hooks: &mut H,
    target: &mut Map<String, Value>,
    key: &str,
    src: &Value,
    key_path: &str,
) -> Result<Value, H::Error> {
    match (target.get_mut(key), src) {
        (Some(Value::Object(nested)), Value::Object(nested_src)) => {
            trace!(path = key_path, "recursing into subtree");
            let merged = merge_subtree(hooks, nested, nested_src, Some(key_path))?;
            Ok(merged.unwrap_or_else(|| Value::Object(nested.clone())))
        }
        // Callers only recurse on object/object pairs.
        _ => Ok(src.clone()),
    }
}
