//! Read-only interrogation: materialising columns as labels, and the
//! bitmask-driven `find` family.

use super::Categorical;
use crate::bit_array::BitArray;
use crate::error::{Error, Result, Status};

impl Categorical {
    /// Materialises `category`'s entire column as labels.
    pub fn full_category(&self, category: &str) -> Result<Vec<String>> {
        let col = self.column_of(category)?;
        Ok(self.columns[col]
            .iter()
            .map(|&id| self.label_of(id).unwrap_or_default())
            .collect())
    }

    /// Materialises `category` restricted to `indices`.
    pub fn partial_category(&self, category: &str, indices: &[u64]) -> Result<Vec<String>> {
        let col = self.column_of(category)?;
        let mut out = Vec::with_capacity(indices.len());
        for &idx in indices {
            if idx >= self.size {
                return Err(Error::from(Status::OutOfBounds));
            }
            out.push(
                self.label_of(self.columns[col][idx as usize])
                    .unwrap_or_default(),
            );
        }
        Ok(out)
    }

    /// Every label currently interned under `category`.
    pub fn in_category(&self, category: &str) -> Result<Vec<String>> {
        self.column_of(category)?;
        Ok(self
            .in_category
            .iter()
            .filter(|(_, c)| c.as_str() == category)
            .map(|(l, _)| l.clone())
            .collect())
    }

    /// `true` iff `category`'s column (or the view restricted to
    /// `indices`, when given) holds a single id value throughout.
    pub fn is_uniform_category(&self, category: &str, indices: Option<&[u64]>) -> Result<bool> {
        let col = self.column_of(category)?;
        match indices {
            None => Ok(self.columns[col].windows(2).all(|w| w[0] == w[1]) || self.size <= 1),
            Some(idx) => {
                let mut values = idx.iter().map(|&i| {
                    if i >= self.size {
                        Err(Error::from(Status::OutOfBounds))
                    } else {
                        Ok(self.columns[col][i as usize])
                    }
                });
                let Some(first) = values.next() else {
                    return Ok(true);
                };
                let first = first?;
                for v in values {
                    if v? != first {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
        }
    }

    fn label_mask(&self, category: &str, label: &str) -> BitArray {
        let mut mask = BitArray::new(self.size as usize);
        let Ok(col) = self.column_of(category) else {
            return mask;
        };
        let Some(id) = self.id_of(label) else {
            return mask;
        };
        for (row, &v) in self.columns[col].iter().enumerate() {
            if v == id {
                mask.set(row, true);
            }
        }
        mask
    }

    /// AND-across-category / OR-within-category mask for `labels`: for each
    /// category represented among `labels`, OR together the per-label
    /// masks, then AND those category masks together. Any named label that
    /// isn't interned anywhere yields an all-false result.
    pub fn find_mask(&self, labels: &[String]) -> BitArray {
        let mut by_category: std::collections::HashMap<String, Vec<&String>> =
            std::collections::HashMap::new();
        for label in labels {
            let Some(cat) = self.which_category(label) else {
                return BitArray::new(self.size as usize);
            };
            by_category.entry(cat).or_default().push(label);
        }

        let mut result = BitArray::new_filled(self.size as usize, true);
        for (cat, labels_here) in &by_category {
            let mut cat_mask = BitArray::new(self.size as usize);
            for label in labels_here {
                let label_mask = self.label_mask(cat, label);
                let mut next = BitArray::new(self.size as usize);
                BitArray::or(&mut next, &cat_mask, &label_mask);
                cat_mask = next;
            }
            let mut next = BitArray::new(self.size as usize);
            BitArray::and(&mut next, &result, &cat_mask);
            result = next;
        }
        result
    }

    /// Row indices (offset by `offset`) where `find_mask(labels)` is set.
    pub fn find(&self, labels: &[String], offset: u64) -> Vec<u64> {
        self.find_mask(labels).find(offset)
    }

    /// Mask that is set wherever *any* of `labels` occurs, regardless of
    /// category (a plain OR, unlike [`Self::find_mask`]'s per-category AND).
    pub fn find_or_mask(&self, labels: &[String]) -> BitArray {
        let mut result = BitArray::new(self.size as usize);
        for label in labels {
            let Some(cat) = self.which_category(label) else {
                continue;
            };
            let label_mask = self.label_mask(&cat, label);
            let mut next = BitArray::new(self.size as usize);
            BitArray::or(&mut next, &result, &label_mask);
            result = next;
        }
        result
    }

    pub fn find_or(&self, labels: &[String], offset: u64) -> Vec<u64> {
        self.find_or_mask(labels).find(offset)
    }

    /// Rows where none of `labels` occurs.
    pub fn find_none(&self, labels: &[String], offset: u64) -> Vec<u64> {
        let mut present = self.find_or_mask(labels);
        present.flip();
        present.find(offset)
    }

    /// Rows matched by `find(labels, 0)`, but restricted to `indices` first.
    pub fn find_not(&self, labels: &[String], indices: &[u64], offset: u64) -> Vec<u64> {
        let matched = self.find_mask(labels);
        indices
            .iter()
            .copied()
            .filter(|&i| i < self.size && !matched.get(i as usize))
            .map(|i| i + offset)
            .collect()
    }
}
