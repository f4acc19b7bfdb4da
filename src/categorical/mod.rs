//! The core data structure: an N-row, K-category table of interned label
//! ids, plus the interning side-tables and progenitor tag that make
//! cross-instance id-space reconciliation possible. See SPEC_FULL.md §3-4.D.

mod combine;
mod group;
mod labels;
mod numeric;
mod query;
mod size;
mod structural;

pub use numeric::NumericMatrix;

use crate::bimap::BiMap;
use crate::error::{Error, Result, Status};
use crate::ids::{IdAllocator, ProgenitorTag};
use crate::options::CategoricalOptions;
use std::collections::{HashMap, HashSet};

/// The reserved id meaning "no label".
pub(crate) const NONE_ID: u32 = 0;

/// A column-oriented table of interned categorical labels.
///
/// All cells are 32-bit label ids; `0` means "no label". Every category
/// owns a reserved *collapsed expression* label `"<category>"` that
/// grouping operations use to mean "multiple distinct labels were merged
/// here". See SPEC_FULL.md for the full invariant list.
#[derive(Clone, Debug)]
pub struct Categorical {
    size: u64,
    columns: Vec<Vec<u32>>,
    category_names: Vec<String>,
    category_index: HashMap<String, usize>,
    label_ids: BiMap<String, u32>,
    in_category: HashMap<String, String>,
    collapsed_expressions: HashSet<String>,
    progenitor: ProgenitorTag,
    ids: IdAllocator,
    options: CategoricalOptions,
}

impl Default for Categorical {
    fn default() -> Self {
        Self::new()
    }
}

impl Categorical {
    /// Creates an empty array: 0 rows, 0 categories, a fresh progenitor tag.
    pub fn new() -> Self {
        Self::with_options(CategoricalOptions::default())
    }

    pub fn with_options(options: CategoricalOptions) -> Self {
        let mut ids = IdAllocator::new();
        let progenitor = ids.fresh_tag();
        Self {
            size: 0,
            columns: Vec::new(),
            category_names: Vec::new(),
            category_index: HashMap::new(),
            label_ids: BiMap::new(),
            in_category: HashMap::new(),
            collapsed_expressions: HashSet::new(),
            progenitor,
            ids,
            options,
        }
    }

    pub fn options(&self) -> CategoricalOptions {
        self.options
    }

    pub fn set_options(&mut self, options: CategoricalOptions) {
        self.options = options;
    }

    #[inline]
    pub fn size(&self) -> u64 {
        self.size
    }

    #[inline]
    pub fn n_categories(&self) -> u64 {
        self.category_names.len() as u64
    }

    #[inline]
    pub fn n_labels(&self) -> u64 {
        self.label_ids.len() as u64
    }

    pub fn has_category(&self, category: &str) -> bool {
        self.category_index.contains_key(category)
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.label_ids.contains_key(&label.to_string())
    }

    pub fn categories(&self) -> Vec<String> {
        self.category_names.clone()
    }

    pub fn labels(&self) -> Vec<String> {
        self.label_ids.keys().cloned().collect()
    }

    pub fn which_category(&self, label: &str) -> Option<String> {
        self.in_category.get(label).cloned()
    }

    pub fn count(&self, label: &str) -> u64 {
        let Some(id) = self.label_ids.get_by_key(&label.to_string()) else {
            return 0;
        };
        let Some(cat) = self.in_category.get(label) else {
            return 0;
        };
        let Some(&col) = self.category_index.get(cat) else {
            return 0;
        };
        self.columns[col].iter().filter(|&&v| v == *id).count() as u64
    }

    pub fn progenitor(&self) -> ProgenitorTag {
        self.progenitor
    }

    pub(crate) fn randomize_progenitor(&mut self) {
        self.progenitor = self.ids.fresh_tag();
    }

    pub(crate) fn collapsed_expression_for(category: &str) -> String {
        format!("<{category}>")
    }

    fn column_of(&self, category: &str) -> Result<usize> {
        self.category_index
            .get(category)
            .copied()
            .ok_or(Error::from(Status::CategoryDoesNotExist))
    }

    /// Raw id column for `category`. Used by [`crate::set_ops`] to hash
    /// rows without going through label strings.
    pub(crate) fn raw_column(&self, category: &str) -> Result<&[u32]> {
        Ok(&self.columns[self.column_of(category)?])
    }

    /// `true` for any label shaped like `"<...>"`, regardless of which
    /// category (if any) actually owns it.
    pub(crate) fn looks_like_collapsed_expression(label: &str) -> bool {
        label.len() >= 2 && label.starts_with('<') && label.ends_with('>')
    }

    /// Interns `label` into `category`, minting a fresh id if it is new.
    /// Fails if the label already exists in a *different* category (with
    /// `CollapsedExpressionInWrongCategory` specifically when the label is
    /// shaped like a collapsed expression), or if a brand-new label is
    /// shaped like `"<X>"` for some `X != category`.
    pub(crate) fn intern(&mut self, category: &str, label: &str) -> Result<u32> {
        if let Some(existing_cat) = self.in_category.get(label).cloned() {
            if existing_cat == category {
                return Ok(*self.label_ids.get_by_key(&label.to_string()).unwrap());
            }
            if Self::looks_like_collapsed_expression(label) {
                return Err(Error::from(Status::CollapsedExpressionInWrongCategory));
            }
            return Err(Error::from(Status::LabelExistsInOtherCategory));
        }

        if let Some(stripped) = label.strip_prefix('<').and_then(|s| s.strip_suffix('>')) {
            if stripped != category {
                return Err(Error::from(Status::CollapsedExpressionInWrongCategory));
            }
        }

        let existing_ids: HashSet<u32> = self.label_ids.values().copied().collect();
        let id = self.ids.fresh_id(&[&existing_ids]);
        self.label_ids.insert(label.to_string(), id);
        self.in_category.insert(label.to_string(), category.to_string());
        if label == Self::collapsed_expression_for(category) {
            self.collapsed_expressions.insert(label.to_string());
        }
        // A fresh id was minted: the progenitor lineage is no longer shared
        // with any array that doesn't also see this exact mint.
        self.randomize_progenitor();
        Ok(id)
    }

    pub(crate) fn id_of(&self, label: &str) -> Option<u32> {
        self.label_ids.get_by_key(&label.to_string()).copied()
    }

    pub(crate) fn label_of(&self, id: u32) -> Option<String> {
        if id == NONE_ID {
            return None;
        }
        self.label_ids.get_by_value(&id).cloned()
    }

    /// Removes a label from the interning tables. Does not touch any
    /// column; callers must ensure the id no longer appears anywhere first
    /// if I1 is to hold immediately, or rely on a subsequent `prune`.
    pub(crate) fn erase_label(&mut self, label: &str) {
        let removed = self.label_ids.erase_by_key(&label.to_string()).is_some();
        self.in_category.remove(label);
        self.collapsed_expressions.remove(label);
        if removed {
            self.randomize_progenitor();
        }
    }

    fn categories_match(&self, other: &Categorical) -> bool {
        if self.category_names.len() != other.category_names.len() {
            return false;
        }
        self.category_names
            .iter()
            .all(|c| other.has_category(c))
    }

    pub(crate) fn require_categories_match(&self, other: &Categorical) -> Result<()> {
        if self.categories_match(other) {
            Ok(())
        } else {
            Err(Error::from(Status::CategoriesDoNotMatch))
        }
    }
}
