//! Label-level mutations within an existing category: full and partial
//! `set_category`, `fill_category`, `replace_labels`, `remove_labels`.

use super::Categorical;
use crate::error::{Error, Result, Status};
use std::collections::HashSet;

impl Categorical {
    /// Checks that every label in `values` either already belongs to
    /// `category`, or is free to be interned there, without mutating
    /// anything. Run before any interning so a rejected call leaves the
    /// array untouched.
    fn validate_for_category(&self, category: &str, values: &[String]) -> Result<()> {
        for label in values {
            if let Some(existing_cat) = self.in_category.get(label) {
                if existing_cat != category {
                    if Self::looks_like_collapsed_expression(label) {
                        return Err(Error::from(Status::CollapsedExpressionInWrongCategory));
                    }
                    return Err(Error::from(Status::LabelExistsInOtherCategory));
                }
            } else if let Some(stripped) = label.strip_prefix('<').and_then(|s| s.strip_suffix('>'))
            {
                if stripped != category {
                    return Err(Error::from(Status::CollapsedExpressionInWrongCategory));
                }
            }
        }
        Ok(())
    }

    fn maybe_prune_after_assign(&mut self) {
        if self.options.prune_after_assign {
            self.prune();
        }
    }

    /// Replaces `category`'s entire column with `values`.
    ///
    /// - `values.len() == 1` broadcasts via [`Self::fill_category`].
    /// - On a size-0 array, growing to `values.len()` is allowed only when
    ///   `allow_set_from_size0` is set; an empty `values` against a size-0
    ///   array is always accepted as a no-op.
    /// - Otherwise `values.len()` must equal `size()`.
    ///
    /// Labels that were unique to `category` and are absent from `values`
    /// are erased.
    pub fn set_category(&mut self, category: &str, values: &[String]) -> Result<()> {
        let col = self.column_of(category)?;

        if values.len() == 1 {
            if self.size == 0 {
                if !self.options.allow_set_from_size0 {
                    return Err(Error::from(Status::WrongIndexSize));
                }
                self.resize(1);
            }
            return self.fill_category(category, &values[0]);
        }

        if self.size == 0 {
            if values.is_empty() {
                return Ok(());
            }
            if !self.options.allow_set_from_size0 {
                return Err(Error::from(Status::WrongIndexSize));
            }
            self.resize(values.len() as u64);
        } else if values.len() as u64 != self.size {
            return Err(Error::from(Status::WrongCategorySize));
        }

        self.validate_for_category(category, values)?;
        let new_ids: Vec<u32> = values
            .iter()
            .map(|v| self.intern(category, v).expect("validated above"))
            .collect();
        let new_id_set: HashSet<u32> = new_ids.iter().copied().collect();

        let old_labels: Vec<String> = self
            .in_category
            .iter()
            .filter(|(_, c)| c.as_str() == category)
            .map(|(l, _)| l.clone())
            .collect();
        for label in old_labels {
            let id = *self
                .label_ids
                .get_by_key(&label)
                .expect("label_ids and in_category stay in lock-step");
            if !new_id_set.contains(&id) {
                self.erase_label(&label);
            }
        }

        let col = self.column_of(category)?;
        self.columns[col] = new_ids;
        self.maybe_prune_after_assign();
        Ok(())
    }

    /// Writes `values` at `at_indices` within `category`'s column.
    /// `values` must have length 1 (broadcast) or `at_indices.len()`.
    ///
    /// On a size-0 array, writing is allowed only when
    /// `allow_set_from_size0` is set, in which case the array grows to
    /// `max(at_indices) + 1` first; growing past `u64::MAX` fails with
    /// `CatOverflow`.
    pub fn set_category_at(
        &mut self,
        category: &str,
        values: &[String],
        at_indices: &[u64],
    ) -> Result<()> {
        let col = self.column_of(category)?;

        if self.size == 0 && !at_indices.is_empty() {
            if !self.options.allow_set_from_size0 {
                return Err(Error::from(Status::WrongIndexSize));
            }
            let max_idx = *at_indices.iter().max().unwrap();
            let needed = max_idx.checked_add(1).ok_or(Error::from(Status::CatOverflow))?;
            self.resize(needed);
        }

        for &idx in at_indices {
            if idx >= self.size {
                return Err(Error::from(Status::OutOfBounds));
            }
        }
        let broadcast = values.len() == 1;
        if !broadcast && values.len() != at_indices.len() {
            return Err(Error::from(Status::WrongIndexSize));
        }

        if broadcast {
            self.validate_for_category(category, &values[0..1])?;
        } else {
            self.validate_for_category(category, values)?;
        }

        let ids: Vec<u32> = if broadcast {
            let id = self.intern(category, &values[0])?;
            vec![id; at_indices.len()]
        } else {
            values
                .iter()
                .map(|v| self.intern(category, v))
                .collect::<Result<Vec<_>>>()?
        };

        let col = self.column_of(category)?;
        for (&idx, id) in at_indices.iter().zip(ids) {
            self.columns[col][idx as usize] = id;
        }
        self.maybe_prune_after_assign();
        Ok(())
    }

    /// Sets every row of `category`'s column to `label`, erasing every
    /// other label that belonged only to this category.
    pub fn fill_category(&mut self, category: &str, label: &str) -> Result<()> {
        self.column_of(category)?;
        self.validate_for_category(category, std::slice::from_ref(&label.to_string()))?;

        let other_labels: Vec<String> = self
            .in_category
            .iter()
            .filter(|(l, c)| c.as_str() == category && l.as_str() != label)
            .map(|(l, _)| l.clone())
            .collect();
        for other in other_labels {
            self.erase_label(&other);
        }

        let id = self.intern(category, label)?;
        let col = self.column_of(category)?;
        for cell in self.columns[col].iter_mut() {
            *cell = id;
        }
        self.maybe_prune_after_assign();
        Ok(())
    }

    /// Rewrites every occurrence of a label in `from` to `with`, wherever it
    /// appears, without changing row count. All labels in `from` that are
    /// currently interned must share one category; entries not interned
    /// anywhere are ignored. `with` must either be new or already belong to
    /// that category.
    pub fn replace_labels(&mut self, from: &[String], with: &str) -> Result<()> {
        let existing: Vec<&String> = from
            .iter()
            .filter(|l| self.which_category(l).is_some())
            .collect();
        if existing.is_empty() {
            return Ok(());
        }
        let category = self.which_category(existing[0]).unwrap();
        for label in &existing {
            if self.which_category(label).unwrap() != category {
                return Err(Error::from(Status::LabelExistsInOtherCategory));
            }
        }
        self.validate_for_category(&category, std::slice::from_ref(&with.to_string()))?;

        let new_id = self.intern(&category, with)?;
        let old_ids: HashSet<u32> = existing
            .iter()
            .filter_map(|l| self.id_of(l))
            .filter(|id| *id != new_id)
            .collect();

        let col = self.column_of(&category)?;
        for cell in self.columns[col].iter_mut() {
            if old_ids.contains(cell) {
                *cell = new_id;
            }
        }

        for label in existing {
            if self.id_of(label) != Some(new_id) {
                self.erase_label(label);
            }
        }
        self.maybe_prune_after_assign();
        Ok(())
    }

    /// Drops every row where any of `labels` occurs, erases those labels,
    /// and returns the (0-based, post-shrink) indices of the rows kept.
    pub fn remove_labels(&mut self, labels: &[String]) -> Result<Vec<u64>> {
        let mut ids_by_col: std::collections::HashMap<usize, HashSet<u32>> =
            std::collections::HashMap::new();
        for label in labels {
            if let (Some(category), Some(id)) = (self.which_category(label), self.id_of(label)) {
                let col = self.column_of(&category)?;
                ids_by_col.entry(col).or_default().insert(id);
            }
        }

        let keep_row = |row: usize, columns: &[Vec<u32>]| {
            !ids_by_col
                .iter()
                .any(|(&col, ids)| ids.contains(&columns[col][row]))
        };
        let kept_rows: Vec<usize> = (0..self.size as usize)
            .filter(|&row| keep_row(row, &self.columns))
            .collect();

        for col in self.columns.iter_mut() {
            *col = kept_rows.iter().map(|&row| col[row]).collect();
        }
        self.size = kept_rows.len() as u64;

        for label in labels {
            self.erase_label(label);
        }
        self.maybe_prune_after_assign();
        Ok(kept_rows.into_iter().map(|r| r as u64).collect())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn strings(vs: &[&str]) -> Vec<String> {
        vs.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn set_category_full_replace() {
        let mut c = Categorical::new();
        c.add_category("x").unwrap();
        c.resize(3);
        c.set_category("x", &strings(&["a", "b", "c"])).unwrap();
        assert_eq!(c.full_category("x").unwrap(), strings(&["a", "b", "c"]));
    }

    #[test]
    fn set_category_drops_no_longer_present_labels() {
        let mut c = Categorical::new();
        c.add_category("x").unwrap();
        c.resize(2);
        c.set_category("x", &strings(&["a", "b"])).unwrap();
        c.set_category("x", &strings(&["a", "a"])).unwrap();
        assert!(c.has_label("a"));
        assert!(!c.has_label("b"));
    }

    #[test]
    fn set_category_wrong_size_errors() {
        let mut c = Categorical::new();
        c.add_category("x").unwrap();
        c.resize(3);
        let err = c.set_category("x", &strings(&["a", "b"])).unwrap_err();
        assert_eq!(err.status(), Status::WrongCategorySize);
    }

    #[test]
    fn set_category_broadcasts_single_value() {
        let mut c = Categorical::new();
        c.add_category("x").unwrap();
        c.resize(3);
        c.set_category("x", &strings(&["z"])).unwrap();
        assert_eq!(c.full_category("x").unwrap(), strings(&["z", "z", "z"]));
    }

    #[test]
    fn set_category_at_partial_write() {
        let mut c = Categorical::new();
        c.add_category("x").unwrap();
        c.resize(3);
        c.set_category("x", &strings(&["a", "a", "a"])).unwrap();
        c.set_category_at("x", &strings(&["b"]), &[1]).unwrap();
        assert_eq!(c.full_category("x").unwrap(), strings(&["a", "b", "a"]));
    }

    #[test]
    fn set_category_at_out_of_bounds() {
        let mut c = Categorical::new();
        c.add_category("x").unwrap();
        c.resize(2);
        let err = c
            .set_category_at("x", &strings(&["a"]), &[5])
            .unwrap_err();
        assert_eq!(err.status(), Status::OutOfBounds);
    }

    #[test]
    fn set_category_at_grows_size0_array_when_allowed() {
        let mut c = Categorical::new();
        c.add_category("x").unwrap();
        c.set_category_at("x", &strings(&["a", "b"]), &[2, 0]).unwrap();
        assert_eq!(c.size(), 3);
        assert_eq!(c.full_category("x").unwrap(), strings(&["b", "<x>", "a"]));
    }

    #[test]
    fn set_category_at_size0_rejected_without_option() {
        let mut opts = crate::options::CategoricalOptions::default();
        opts.allow_set_from_size0 = false;
        let mut c = Categorical::with_options(opts);
        c.add_category("x").unwrap();
        let err = c
            .set_category_at("x", &strings(&["a"]), &[0])
            .unwrap_err();
        assert_eq!(err.status(), Status::WrongIndexSize);
    }

    #[test]
    fn set_category_at_wrong_index_size() {
        let mut c = Categorical::new();
        c.add_category("x").unwrap();
        c.resize(3);
        let err = c
            .set_category_at("x", &strings(&["a", "b"]), &[0, 1, 2])
            .unwrap_err();
        assert_eq!(err.status(), Status::WrongIndexSize);
    }

    #[test]
    fn fill_category_erases_other_labels() {
        let mut c = Categorical::new();
        c.add_category("x").unwrap();
        c.resize(2);
        c.set_category("x", &strings(&["a", "b"])).unwrap();
        c.fill_category("x", "z").unwrap();
        assert_eq!(c.full_category("x").unwrap(), strings(&["z", "z"]));
        assert!(!c.has_label("a"));
        assert!(!c.has_label("b"));
    }

    #[test]
    fn replace_labels_merges_into_target() {
        let mut c = Categorical::new();
        c.add_category("x").unwrap();
        c.resize(3);
        c.set_category("x", &strings(&["a", "b", "a"])).unwrap();
        c.replace_labels(&strings(&["a", "b"]), "m").unwrap();
        assert_eq!(c.full_category("x").unwrap(), strings(&["m", "m", "m"]));
        assert!(!c.has_label("a"));
        assert!(!c.has_label("b"));
    }

    #[test]
    fn remove_labels_drops_matching_rows() {
        let mut c = Categorical::new();
        c.add_category("x").unwrap();
        c.resize(3);
        c.set_category("x", &strings(&["a", "b", "a"])).unwrap();
        let kept = c.remove_labels(&strings(&["a"])).unwrap();
        assert_eq!(kept, vec![1]);
        assert_eq!(c.size(), 1);
        assert!(!c.has_label("a"));
        assert_eq!(c.full_category("x").unwrap(), strings(&["b"]));
    }
}
