//! Built-in hook sets.
//!
//! [`ArrayHooks`] installs a named array policy. [`ChangeLog`] and [`Traced`]
//! wrap any other hook set and delegate to it, adding change recording and
//! `tracing` output respectively.

pub mod array;
pub mod change_log;
pub mod traced;

pub use array::ArrayHooks;
pub use change_log::{Change, ChangeLog, ChangeReport};
pub use traced::Traced;
