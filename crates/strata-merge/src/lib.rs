//! Recursive structural merge for JSON trees.
//!
//! Folds an ordered list of source objects onto a mutable target, key by
//! key, recursing into nested objects and handing every other decision to a
//! replaceable hook set. Typical uses are configuration layering and
//! default-plus-override composition.
//!
//! # Key Types
//!
//! - [`Merger`] -- A configured merge function (session driver)
//! - [`MergeHooks`] -- The hook contract; every method is optional
//! - [`Resolution`] -- Commit / skip / fall through, returned by value hooks
//! - [`MergeInfo`] / [`MergeOp`] -- Per-key context handed to hooks
//! - [`ArrayMerge`] -- Named array reconciliation strategies
//! - [`Kind`] / [`classify`] -- The value classifier
//!
//! # Quick Start
//!
//! ```rust
//! use serde_json::json;
//! use strata_merge::{create, merge, ArrayHooks};
//!
//! let defaults = json!({"server": {"port": 80, "tags": ["a"]}});
//! let overrides = json!({"server": {"port": 8080, "tags": ["b"]}});
//!
//! let merged = merge(json!({}), [&defaults, &overrides]).unwrap();
//! assert_eq!(merged, json!({"server": {"port": 8080, "tags": ["b"]}}));
//!
//! let appending = create(ArrayHooks::append());
//! let merged = appending.merge(json!({}), [&defaults, &overrides]).unwrap();
//! assert_eq!(merged, json!({"server": {"port": 8080, "tags": ["a", "b"]}}));
//! ```

pub mod arrays;
pub mod engine;
pub mod error;
pub mod hooks;
pub mod kind;
pub mod merger;
pub mod policies;

pub use arrays::{append, by_name, incremental, ArrayMerge, ArrayMergeFn};
pub use engine::merge_subtree;
pub use error::{MergeError, MergeResult};
pub use hooks::{DefaultHooks, MergeHooks, MergeInfo, MergeOp, Resolution, Subtree};
pub use kind::{classify, Kind};
pub use merger::{create, merge, merge_onto, Merger};
pub use policies::{ArrayHooks, Change, ChangeLog, ChangeReport, Traced};
