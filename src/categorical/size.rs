//! Row-count mutations: `resize`, `reserve`, `repeat`.

use super::Categorical;
use crate::error::{Error, Result, Status};

impl Categorical {
    /// Grows or shrinks every column to `n` rows. New rows are padded with
    /// each category's collapsed expression id (already interned, since it
    /// is created alongside the category); shrinking truncates and never
    /// mints or erases a label, so the progenitor tag is left untouched.
    pub fn resize(&mut self, n: u64) {
        if n == self.size {
            return;
        }
        let n_usize = n as usize;
        let collapsed_ids: Vec<u32> = self
            .category_names
            .iter()
            .map(|cat| {
                let collapsed = Self::collapsed_expression_for(cat);
                *self
                    .label_ids
                    .get_by_key(&collapsed)
                    .expect("every category's collapsed expression is interned on creation")
            })
            .collect();
        for (col, id) in self.columns.iter_mut().zip(collapsed_ids) {
            col.resize(n_usize, id);
        }
        self.size = n;
    }

    /// `resize(n)`, then `prune()` if that shrank the array.
    pub fn reserve(&mut self, n: u64) {
        let shrinking = n < self.size;
        self.resize(n);
        if shrinking {
            self.prune();
        }
    }

    /// Grows to `size() * (k + 1)` rows by replicating each column `k`
    /// additional times. Rejects with `CatOverflow` before allocating
    /// anything if the resulting size would overflow 64 bits.
    pub fn repeat(&mut self, k: u64) -> Result<()> {
        let multiplier = k.checked_add(1).ok_or(Error::from(Status::CatOverflow))?;
        let new_size = self
            .size
            .checked_mul(multiplier)
            .ok_or(Error::from(Status::CatOverflow))?;
        if new_size == self.size {
            return Ok(());
        }
        for col in self.columns.iter_mut() {
            let orig = col.clone();
            col.reserve(orig.len().saturating_mul(k as usize));
            for _ in 0..k {
                col.extend_from_slice(&orig);
            }
        }
        self.size = new_size;
        Ok(())
    }
}
