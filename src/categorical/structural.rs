//! Category-level structural mutations: add, remove, rename, collapse.

use super::Categorical;
use crate::error::{Error, Result, Status};

impl Categorical {
    /// Adds a new, empty-of-content category filled with its collapsed
    /// expression. Fails with `CategoryExists` if already present, or
    /// `CollapsedExpressionInWrongCategory` if `"<category>"` is already a
    /// label of some other category.
    pub fn add_category(&mut self, category: &str) -> Result<()> {
        if self.has_category(category) {
            return Err(Error::from(Status::CategoryExists));
        }
        let collapsed = Self::collapsed_expression_for(category);
        if let Some(owner) = self.in_category.get(&collapsed) {
            if owner != category {
                return Err(Error::from(Status::CollapsedExpressionInWrongCategory));
            }
        }

        let col = self.columns.len();
        self.category_names.push(category.to_string());
        self.category_index.insert(category.to_string(), col);
        let id = self
            .intern(category, &collapsed)
            .expect("pre-checked above");
        self.columns.push(vec![id; self.size as usize]);
        tracing::debug!(category, "added category");
        Ok(())
    }

    /// `add_category`, but `OK` (no-op) if the category already exists.
    pub fn require_category(&mut self, category: &str) -> Result<()> {
        if self.has_category(category) {
            return Ok(());
        }
        self.add_category(category)
    }

    /// Removes `category` and every label that resided only in it.
    pub fn remove_category(&mut self, category: &str) -> Result<()> {
        let col = self
            .category_index
            .get(category)
            .copied()
            .ok_or(Error::from(Status::CategoryDoesNotExist))?;

        let labels_here: Vec<String> = self
            .in_category
            .iter()
            .filter(|(_, c)| c.as_str() == category)
            .map(|(l, _)| l.clone())
            .collect();
        for label in labels_here {
            self.erase_label(&label);
        }

        let last = self.columns.len() - 1;
        self.columns.swap_remove(col);
        self.category_names.swap_remove(col);
        self.category_index.remove(category);
        if col != last {
            let moved_name = self.category_names[col].clone();
            self.category_index.insert(moved_name, col);
        }

        tracing::debug!(category, "removed category");
        Ok(())
    }

    /// Renames `from` to `to`, carrying its collapsed expression and every
    /// label forward under the new category name. Rejects if `to` already
    /// exists, or if `"<to>"` is already a label of some other category.
    pub fn rename_category(&mut self, from: &str, to: &str) -> Result<()> {
        if !self.has_category(from) {
            return Err(Error::from(Status::CategoryDoesNotExist));
        }
        if self.has_category(to) {
            return Err(Error::from(Status::CategoryExists));
        }
        let new_collapsed = Self::collapsed_expression_for(to);
        if let Some(owner) = self.in_category.get(&new_collapsed) {
            if owner != from {
                return Err(Error::from(Status::CollapsedExpressionInWrongCategory));
            }
        }

        let col = self.category_index.remove(from).unwrap();
        self.category_index.insert(to.to_string(), col);
        self.category_names[col] = to.to_string();

        let old_collapsed = Self::collapsed_expression_for(from);
        let labels_here: Vec<String> = self
            .in_category
            .iter()
            .filter(|(_, c)| c.as_str() == from)
            .map(|(l, _)| l.clone())
            .collect();

        for label in labels_here {
            if label == old_collapsed {
                let id = self.label_ids.get_by_key(&label).copied().unwrap();
                self.erase_label(&label);
                self.label_ids.insert(new_collapsed.clone(), id);
                self.in_category
                    .insert(new_collapsed.clone(), to.to_string());
                self.collapsed_expressions.insert(new_collapsed.clone());
            } else {
                self.in_category.insert(label, to.to_string());
            }
        }

        Ok(())
    }

    /// Replaces every id in `category`'s column with the id of its
    /// collapsed expression, erasing every other label that lived there.
    pub fn collapse_category(&mut self, category: &str) -> Result<()> {
        let col = self
            .category_index
            .get(category)
            .copied()
            .ok_or(Error::from(Status::CategoryDoesNotExist))?;

        let collapsed = Self::collapsed_expression_for(category);
        let collapsed_id = self.intern(category, &collapsed)?;

        let other_labels: Vec<String> = self
            .in_category
            .iter()
            .filter(|(l, c)| c.as_str() == category && l.as_str() != collapsed)
            .map(|(l, _)| l.clone())
            .collect();
        for label in other_labels {
            self.erase_label(&label);
        }

        for cell in self.columns[col].iter_mut() {
            *cell = collapsed_id;
        }

        Ok(())
    }
}
