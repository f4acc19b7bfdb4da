//! Grouping: `find_all`/`find_allc` hash rows across a chosen set of
//! categories; `keep_each`/`one` reshape an array down to one row per group.

use super::Categorical;
use crate::error::Result;
use crate::row_hash::{pack_row, RowHashMap};

impl Categorical {
    /// `Some` column index per category, or `None` if any named category
    /// doesn't exist.
    fn columns_for(&self, categories: &[String]) -> Option<Vec<usize>> {
        categories.iter().map(|c| self.column_of(c).ok()).collect()
    }

    /// For each unique combination of ids across `categories`, the list of
    /// row indices (offset by `offset`) sharing that combination. Groups are
    /// ordered by first occurrence. Empty if any name in `categories` isn't
    /// a known category.
    pub fn find_all(&self, categories: &[String], offset: u64) -> Vec<Vec<u64>> {
        let Some(cols) = self.columns_for(categories) else {
            return Vec::new();
        };
        if cols.is_empty() {
            if self.size == 0 {
                return Vec::new();
            }
            return vec![(0..self.size).map(|r| r + offset).collect()];
        }
        let mut map = RowHashMap::new(cols.len());
        let mut groups: Vec<Vec<u64>> = Vec::new();
        for row in 0..self.size as usize {
            let key: Vec<u32> = cols.iter().map(|&c| self.columns[c][row]).collect();
            let (group_id, is_new) = map.get_or_insert(&pack_row(&key), groups.len() as u32);
            if is_new {
                groups.push(Vec::new());
            }
            groups[group_id as usize].push(row as u64 + offset);
        }
        groups
    }

    /// Like [`Self::find_all`], but also returns the `categories.len()`
    /// labels that identify each group, in the same order as `categories`.
    /// Empty if any name in `categories` isn't a known category.
    pub fn find_allc(&self, categories: &[String], offset: u64) -> (Vec<Vec<u64>>, Vec<Vec<String>>) {
        let Some(cols) = self.columns_for(categories) else {
            return (Vec::new(), Vec::new());
        };
        if cols.is_empty() {
            let groups = self.find_all(categories, offset);
            let labels = if groups.is_empty() { Vec::new() } else { vec![Vec::new()] };
            return (groups, labels);
        }
        let mut map = RowHashMap::new(cols.len());
        let mut groups: Vec<Vec<u64>> = Vec::new();
        let mut group_labels: Vec<Vec<String>> = Vec::new();
        for row in 0..self.size as usize {
            let key: Vec<u32> = cols.iter().map(|&c| self.columns[c][row]).collect();
            let (group_id, is_new) = map.get_or_insert(&pack_row(&key), groups.len() as u32);
            if is_new {
                groups.push(Vec::new());
                group_labels.push(
                    key.iter()
                        .map(|&id| self.label_of(id).unwrap_or_default())
                        .collect(),
                );
            }
            groups[group_id as usize].push(row as u64 + offset);
        }
        (groups, group_labels)
    }

    /// Reshapes into one row per combination of `categories`: those
    /// categories keep their group-defining id; every other category
    /// collapses to its collapsed expression id when the group was mixed,
    /// or copies the group's uniform id otherwise. Degenerates to a
    /// zero-row array if any name in `categories` isn't a known category.
    pub fn keep_each(&mut self, categories: &[String]) -> Result<()> {
        let groups = self.find_all(categories, 0);
        let n_groups = groups.len();
        let old_columns = self.columns.clone();
        let group_cols: std::collections::HashSet<usize> = self
            .columns_for(categories)
            .map(|cols| cols.into_iter().collect())
            .unwrap_or_default();

        let mut new_columns: Vec<Vec<u32>> = vec![Vec::with_capacity(n_groups); self.columns.len()];
        for rows in &groups {
            let first_row = rows[0] as usize;
            for (col_idx, col) in old_columns.iter().enumerate() {
                if group_cols.contains(&col_idx) {
                    new_columns[col_idx].push(col[first_row]);
                    continue;
                }
                let first_id = col[first_row];
                let uniform = rows.iter().all(|&r| col[r as usize] == first_id);
                if uniform {
                    new_columns[col_idx].push(first_id);
                } else {
                    let cat = self.category_names[col_idx].clone();
                    let collapsed = Self::collapsed_expression_for(&cat);
                    let collapsed_id = self.intern(&cat, &collapsed)?;
                    new_columns[col_idx].push(collapsed_id);
                }
            }
        }

        self.columns = new_columns;
        self.size = n_groups as u64;
        if self.options.prune_after_assign {
            self.prune();
        }
        Ok(())
    }

    /// `keep_each(&[])`: collapses to exactly one row, every non-uniform
    /// category replaced by its collapsed expression.
    pub fn one(&mut self) -> Result<()> {
        self.keep_each(&[])
    }
}
