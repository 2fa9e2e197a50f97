//! Array-aware deep merge.

use serde_json::Value;

use crate::arrays::ArrayMerge;
use crate::error::MergeError;
use crate::hooks::{MergeHooks, MergeInfo, Resolution};

/// Deep merge that reconciles arrays with an [`ArrayMerge`] strategy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ArrayHooks {
    strategy: ArrayMerge,
}

impl ArrayHooks {
    pub fn new(strategy: ArrayMerge) -> Self {
        Self { strategy }
    }

    pub fn append() -> Self {
        Self::new(ArrayMerge::Append)
    }

    pub fn incremental() -> Self {
        Self::new(ArrayMerge::Incremental)
    }
}

impl From<ArrayMerge> for ArrayHooks {
    fn from(strategy: ArrayMerge) -> Self {
        Self::new(strategy)
    }
}

impl MergeHooks for ArrayHooks {
    type Error = MergeError;

    fn merge_arrays(
        &mut self,
        target: &Value,
        source: &Value,
        _info: &MergeInfo<'_>,
    ) -> Result<Resolution, MergeError> {
        match (self.strategy, target, source) {
            (ArrayMerge::Replace, _, _) => Ok(Resolution::Fallthrough),
            (strategy, Value::Array(tgt), Value::Array(src)) => {
                Ok(Resolution::Commit(Value::Array(strategy.apply(tgt, src))))
            }
            _ => Ok(Resolution::Fallthrough),
        }
    }
}
