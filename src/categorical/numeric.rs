//! `to_numeric_matrix`/`from_numeric_matrix`: the boundary-friendly packed
//! representation used when a caller wants raw 32-bit ids plus just enough
//! of the interning tables to reconstruct the array later.

use super::Categorical;
use crate::bimap::BiMap;
use crate::error::{Error, Result, Status};
use crate::ids::IdAllocator;
use crate::options::CategoricalOptions;
use std::collections::{HashMap, HashSet};

/// A packed `N x K` matrix of label ids, plus the per-category interning
/// table needed to turn ids back into labels.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct NumericMatrix {
    pub categories: Vec<String>,
    pub n_rows: u64,
    /// Row-major: `data[row * categories.len() + category_index]`.
    pub data: Vec<u32>,
    /// Per category, the `(label, id)` pairs interned in it.
    pub interning: Vec<Vec<(String, u32)>>,
}

impl Categorical {
    /// Packs the array into a [`NumericMatrix`].
    pub fn to_numeric_matrix(&self) -> NumericMatrix {
        let k = self.category_names.len();
        let mut data = vec![0u32; self.size as usize * k];
        for (c, col) in self.columns.iter().enumerate() {
            for (row, &id) in col.iter().enumerate() {
                data[row * k + c] = id;
            }
        }
        let interning = self
            .category_names
            .iter()
            .map(|cat| {
                self.in_category
                    .iter()
                    .filter(|(_, c)| *c == cat)
                    .map(|(label, _)| (label.clone(), *self.label_ids.get_by_key(label).unwrap()))
                    .collect()
            })
            .collect();
        NumericMatrix {
            categories: self.category_names.clone(),
            n_rows: self.size,
            data,
            interning,
        }
    }

    /// Reconstructs a [`Categorical`] from a [`NumericMatrix`] produced by
    /// [`Self::to_numeric_matrix`]. Rejects if `data`'s length doesn't match
    /// `n_rows * categories.len()`.
    pub fn from_numeric_matrix(matrix: &NumericMatrix) -> Result<Categorical> {
        let k = matrix.categories.len();
        if matrix.data.len() as u64 != matrix.n_rows * k as u64 {
            return Err(Error::from(Status::IncompatibleSizes));
        }

        let mut label_ids: BiMap<String, u32> = BiMap::new();
        let mut in_category: HashMap<String, String> = HashMap::new();
        let mut collapsed_expressions: HashSet<String> = HashSet::new();
        for (cat, table) in matrix.categories.iter().zip(&matrix.interning) {
            for (label, id) in table {
                label_ids.insert(label.clone(), *id);
                in_category.insert(label.clone(), cat.clone());
                if Categorical::looks_like_collapsed_expression(label) {
                    collapsed_expressions.insert(label.clone());
                }
            }
        }

        let mut category_index = HashMap::new();
        for (i, cat) in matrix.categories.iter().enumerate() {
            category_index.insert(cat.clone(), i);
        }

        let mut columns = vec![Vec::with_capacity(matrix.n_rows as usize); k];
        for row in 0..matrix.n_rows as usize {
            for c in 0..k {
                columns[c].push(matrix.data[row * k + c]);
            }
        }

        let mut ids = IdAllocator::new();
        let progenitor = ids.fresh_tag();
        Ok(Categorical {
            size: matrix.n_rows,
            columns,
            category_names: matrix.categories.clone(),
            category_index,
            label_ids,
            in_category,
            collapsed_expressions,
            progenitor,
            ids,
            options: CategoricalOptions::default(),
        })
    }
}
