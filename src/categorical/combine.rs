//! Combining two arrays: `append`, `assign`, `merge`; and `prune`, which
//! reclaims labels no longer referenced by any column.

use super::Categorical;
use crate::error::{Error, Result, Status};
use std::collections::{HashMap, HashSet};

impl Categorical {
    /// Builds a remap `other_id -> self_id` for every label `other` uses in
    /// `category`, interning into `self` as needed. Used whenever progenitor
    /// tags differ and a real reconciliation pass is required.
    fn reconcile_category(
        &mut self,
        other: &Categorical,
        category: &str,
    ) -> Result<HashMap<u32, u32>> {
        let mut remap = HashMap::new();
        let other_labels: Vec<(String, u32)> = other
            .in_category
            .iter()
            .filter(|(_, c)| c.as_str() == category)
            .map(|(l, _)| (l.clone(), *other.label_ids.get_by_key(l).unwrap()))
            .collect();
        for (label, other_id) in other_labels {
            let self_id = self.intern(category, &label)?;
            remap.insert(other_id, self_id);
        }
        Ok(remap)
    }

    fn remap_column(col: &[u32], remap: &HashMap<u32, u32>) -> Vec<u32> {
        col.iter().map(|id| *remap.get(id).unwrap_or(id)).collect()
    }

    /// Concatenates `other`'s rows after `self`'s. Category sets must match
    /// exactly. When progenitor tags agree (and `use_progenitor_ids` is
    /// set), columns are copied verbatim; otherwise every label is
    /// reconciled into `self`'s id space first.
    pub fn append(&mut self, other: &Categorical) -> Result<()> {
        self.require_categories_match(other)?;
        let new_size = self
            .size
            .checked_add(other.size)
            .ok_or(Error::from(Status::CatOverflow))?;

        let fast_path = self.options.use_progenitor_ids && self.progenitor == other.progenitor;

        for cat in self.category_names.clone() {
            let self_col = self.column_of(&cat)?;
            let other_col = other.column_of(&cat)?;
            let extra = if fast_path {
                other.columns[other_col].clone()
            } else {
                let remap = self.reconcile_category(other, &cat)?;
                Self::remap_column(&other.columns[other_col], &remap)
            };
            self.columns[self_col].extend(extra);
        }
        self.size = new_size;
        Ok(())
    }

    /// Writes `other`'s rows into `self` at `to_indices`. When `from_indices`
    /// is absent, `other`'s rows are taken in order and `to_indices.len()`
    /// must equal `other.size()`; otherwise both index lists must match in
    /// length.
    pub fn assign(
        &mut self,
        other: &Categorical,
        to_indices: &[u64],
        from_indices: Option<&[u64]>,
    ) -> Result<()> {
        self.require_categories_match(other)?;
        let from: Vec<u64> = match from_indices {
            Some(f) => f.to_vec(),
            None => {
                if to_indices.len() as u64 != other.size {
                    return Err(Error::from(Status::WrongIndexSize));
                }
                (0..other.size).collect()
            }
        };
        if from.len() != to_indices.len() {
            return Err(Error::from(Status::WrongIndexSize));
        }
        for &idx in to_indices {
            if idx >= self.size {
                return Err(Error::from(Status::OutOfBounds));
            }
        }
        for &idx in &from {
            if idx >= other.size {
                return Err(Error::from(Status::OutOfBounds));
            }
        }

        let fast_path = self.options.use_progenitor_ids && self.progenitor == other.progenitor;

        for cat in self.category_names.clone() {
            let self_col = self.column_of(&cat)?;
            let other_col = other.column_of(&cat)?;
            let remap = if fast_path {
                None
            } else {
                Some(self.reconcile_category(other, &cat)?)
            };
            for (&to, &src) in to_indices.iter().zip(&from) {
                let raw = other.columns[other_col][src as usize];
                let id = match &remap {
                    Some(r) => *r.get(&raw).unwrap_or(&raw),
                    None => raw,
                };
                self.columns[self_col][to as usize] = id;
            }
        }
        if self.options.prune_after_assign {
            self.prune();
        }
        Ok(())
    }

    /// Overwrites every category of `self` that `other` also has with
    /// `other`'s values. Every category of `other` must exist in `self`.
    /// Sizes must match, or `other.size() == 1` (row broadcast).
    pub fn merge(&mut self, other: &Categorical) -> Result<()> {
        for cat in &other.category_names {
            if !self.has_category(cat) {
                return Err(Error::from(Status::CategoryDoesNotExist));
            }
        }
        if other.size != 1 && other.size != self.size {
            return Err(Error::from(Status::WrongCategorySize));
        }

        let fast_path = self.options.use_progenitor_ids && self.progenitor == other.progenitor;
        let broadcast = other.size == 1;

        for cat in other.category_names.clone() {
            let self_col = self.column_of(&cat)?;
            let other_col = other.column_of(&cat)?;
            let remap = if fast_path {
                None
            } else {
                Some(self.reconcile_category(other, &cat)?)
            };
            let translate = |raw: u32| match &remap {
                Some(r) => *r.get(&raw).unwrap_or(&raw),
                None => raw,
            };
            if broadcast {
                let id = translate(other.columns[other_col][0]);
                for cell in self.columns[self_col].iter_mut() {
                    *cell = id;
                }
            } else {
                for (cell, &raw) in self.columns[self_col]
                    .iter_mut()
                    .zip(other.columns[other_col].iter())
                {
                    *cell = translate(raw);
                }
            }
        }
        if self.options.prune_after_assign {
            self.prune();
        }
        Ok(())
    }

    /// Erases every interned label that no longer appears in any column.
    pub fn prune(&mut self) {
        let used: HashSet<u32> = self
            .columns
            .iter()
            .flat_map(|col| col.iter().copied())
            .collect();
        let dangling: Vec<String> = self
            .label_ids
            .iter()
            .filter(|(_, id)| !used.contains(id))
            .map(|(label, _)| label.clone())
            .collect();
        for label in dangling {
            self.erase_label(&label);
        }
    }
}
