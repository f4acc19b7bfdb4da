//! Run-time policy switches for [`crate::categorical::Categorical`].
//!
//! The original implementation encoded these as compile-time feature
//! switches (`CAT_PRUNE_AFTER_ASSIGN`, `CAT_USE_PROGENITOR_IDS`,
//! `CAT_ALLOW_SET_FROM_SIZE0`). They are plain fields here so a single build
//! can host arrays with different policies side by side.

/// Policy knobs that affect the observable behaviour of a `Categorical`
/// without changing its data model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoricalOptions {
    /// If `true`, `set_category`, `assign`, and `replace_labels` call
    /// `prune` after a successful mutation, restoring invariant I7
    /// (every interned label appears in some column).
    pub prune_after_assign: bool,
    /// If `false`, progenitor-tag fast paths are disabled and two-array
    /// operations always run full label reconciliation, even when the tags
    /// happen to match.
    pub use_progenitor_ids: bool,
    /// If `true`, `set_category` on a size-0 array grows it to match the
    /// supplied values; if `false`, that case returns `WrongIndexSize`.
    pub allow_set_from_size0: bool,
}

impl Default for CategoricalOptions {
    fn default() -> Self {
        Self {
            prune_after_assign: false,
            use_progenitor_ids: true,
            allow_set_from_size0: true,
        }
    }
}
