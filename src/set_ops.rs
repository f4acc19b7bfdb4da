//! Free functions that build a fresh [`Categorical`] out of one or two
//! existing ones: `unique`, `union`, `combined`. Each returns an owned
//! array; none mutate their inputs.

use crate::bit_array::BitArray;
use crate::categorical::Categorical;
use crate::error::{Error, Result, Status};
use crate::row_hash::{pack_row, RowHashMap};
use std::collections::{HashMap, HashSet};

fn mask_rows(mask: Option<&BitArray>, size: u64) -> Vec<u64> {
    match mask {
        Some(m) => m.find(0),
        None => (0..size).collect(),
    }
}

fn build_from_rows(template: &Categorical, cats: &[String], rows: &[u64]) -> Result<Categorical> {
    let mut out = Categorical::with_options(template.options());
    for c in cats {
        out.require_category(c)?;
    }
    out.resize(rows.len() as u64);
    for c in cats {
        let full = template.full_category(c)?;
        let values: Vec<String> = rows.iter().map(|&r| full[r as usize].clone()).collect();
        out.set_category(c, &values)?;
    }
    Ok(out)
}

/// Deduplicates `a`'s rows (restricted to `indices`, if given) by full row
/// identity across every category. Preserves first-encounter order.
pub fn unique(a: &Categorical, indices: Option<&[u64]>) -> Result<Categorical> {
    let cats = a.categories();
    let cols: Vec<&[u32]> = cats
        .iter()
        .map(|c| a.raw_column(c))
        .collect::<Result<_>>()?;
    let rows: Vec<u64> = match indices {
        Some(idx) => idx.to_vec(),
        None => (0..a.size()).collect(),
    };
    for &r in &rows {
        if r >= a.size() {
            return Err(Error::from(Status::OutOfBounds));
        }
    }

    let kept: Vec<u64> = if cols.is_empty() {
        rows.first().copied().into_iter().collect()
    } else {
        let mut map = RowHashMap::new(cols.len());
        let mut kept = Vec::new();
        for &row in &rows {
            let key: Vec<u32> = cols.iter().map(|c| c[row as usize]).collect();
            let (_, is_new) = map.get_or_insert(&pack_row(&key), kept.len() as u32);
            if is_new {
                kept.push(row);
            }
        }
        kept
    };

    build_from_rows(a, &cats, &kept)
}

fn uniform_label(c: &Categorical, category: &str) -> Result<Option<String>> {
    if c.is_uniform_category(category, None)? {
        Ok(c.full_category(category)?.into_iter().next())
    } else {
        Ok(None)
    }
}

fn intersection(a: &[String], b: &[String]) -> Vec<String> {
    let b_set: HashSet<&String> = b.iter().collect();
    a.iter().filter(|c| b_set.contains(c)).cloned().collect()
}

/// Rows of `a` and `b` (each optionally restricted by a mask) deduplicated
/// across both sides by matching `categories` (default: the categories `a`
/// and `b` have in common). Categories outside the key set are carried
/// through when a row came from one side only; when a key is shared by
/// both sides and they disagree on such a category, it collapses to that
/// category's collapsed expression. A category entirely absent from one
/// side is filled with that side's uniform label if it has one, else its
/// collapsed expression.
pub fn union(
    a: &Categorical,
    b: &Categorical,
    categories: Option<&[String]>,
    mask_a: Option<&BitArray>,
    mask_b: Option<&BitArray>,
) -> Result<Categorical> {
    let a_cats = a.categories();
    let b_cats = b.categories();
    let key_cats: Vec<String> = match categories {
        Some(c) => c.to_vec(),
        None => intersection(&a_cats, &b_cats),
    };
    tracing::debug!(key_cats = ?key_cats, a_size = a.size(), b_size = b.size(), "union");
    for c in &key_cats {
        if !a.has_category(c) || !b.has_category(c) {
            return Err(Error::from(Status::CategoriesDoNotMatch));
        }
    }

    let a_only: Vec<String> = a_cats
        .iter()
        .filter(|c| !b_cats.contains(c))
        .cloned()
        .collect();
    let b_only: Vec<String> = b_cats
        .iter()
        .filter(|c| !a_cats.contains(c))
        .cloned()
        .collect();
    let extra_common: Vec<String> = intersection(&a_cats, &b_cats)
        .into_iter()
        .filter(|c| !key_cats.contains(c))
        .collect();
    let all_cats: Vec<String> = a_cats
        .iter()
        .cloned()
        .chain(b_cats.iter().filter(|c| !a_cats.contains(c)).cloned())
        .collect();

    let a_full: HashMap<String, Vec<String>> = all_cats
        .iter()
        .filter(|c| a.has_category(c))
        .map(|c| Ok((c.clone(), a.full_category(c)?)))
        .collect::<Result<_>>()?;
    let b_full: HashMap<String, Vec<String>> = all_cats
        .iter()
        .filter(|c| b.has_category(c))
        .map(|c| Ok((c.clone(), b.full_category(c)?)))
        .collect::<Result<_>>()?;

    let key_of = |full: &HashMap<String, Vec<String>>, row: u64| -> Vec<String> {
        key_cats
            .iter()
            .map(|c| full[c][row as usize].clone())
            .collect()
    };

    let rows_a = mask_rows(mask_a, a.size());
    let rows_b = mask_rows(mask_b, b.size());

    let mut order: Vec<Vec<String>> = Vec::new();
    let mut first_a: HashMap<Vec<String>, u64> = HashMap::new();
    let mut first_b: HashMap<Vec<String>, u64> = HashMap::new();
    for &row in &rows_a {
        let key = key_of(&a_full, row);
        if !first_a.contains_key(&key) {
            first_a.insert(key.clone(), row);
        }
        if !order.contains(&key) {
            order.push(key);
        }
    }
    for &row in &rows_b {
        let key = key_of(&b_full, row);
        if !first_b.contains_key(&key) {
            first_b.insert(key.clone(), row);
        }
        if !order.contains(&key) {
            order.push(key);
        }
    }

    let mut out = Categorical::with_options(a.options());
    for c in &all_cats {
        out.require_category(c)?;
    }
    out.resize(order.len() as u64);

    let a_uniform: HashMap<String, Option<String>> = all_cats
        .iter()
        .filter(|c| a.has_category(c))
        .map(|c| Ok((c.clone(), uniform_label(a, c)?)))
        .collect::<Result<_>>()?;
    let b_uniform: HashMap<String, Option<String>> = all_cats
        .iter()
        .filter(|c| b.has_category(c))
        .map(|c| Ok((c.clone(), uniform_label(b, c)?)))
        .collect::<Result<_>>()?;

    for cat in &all_cats {
        let collapsed = format!("<{cat}>");
        let mut values = Vec::with_capacity(order.len());
        for key in &order {
            let has_a = first_a.contains_key(key);
            let has_b = first_b.contains_key(key);

            let value = if key_cats.contains(cat) {
                let idx = key_cats.iter().position(|c| c == cat).unwrap();
                key[idx].clone()
            } else if a_only.contains(cat) {
                if let Some(&row) = first_a.get(key) {
                    a_full[cat][row as usize].clone()
                } else {
                    a_uniform[cat].clone().unwrap_or_else(|| collapsed.clone())
                }
            } else if b_only.contains(cat) {
                if let Some(&row) = first_b.get(key) {
                    b_full[cat][row as usize].clone()
                } else {
                    b_uniform[cat].clone().unwrap_or_else(|| collapsed.clone())
                }
            } else {
                debug_assert!(extra_common.contains(cat));
                match (has_a, has_b) {
                    (true, true) => {
                        let la = a_full[cat][first_a[key] as usize].clone();
                        let lb = b_full[cat][first_b[key] as usize].clone();
                        if la == lb {
                            la
                        } else {
                            collapsed.clone()
                        }
                    }
                    (true, false) => a_full[cat][first_a[key] as usize].clone(),
                    (false, true) => b_full[cat][first_b[key] as usize].clone(),
                    (false, false) => unreachable!("every key comes from a or b"),
                }
            };
            values.push(value);
        }
        out.set_category(cat, &values)?;
    }

    Ok(out)
}

/// `union` with `categories` always defaulted to the intersection of `a`
/// and `b`'s category sets — i.e. without the caller choosing a narrower
/// key.
pub fn combined(
    a: &Categorical,
    b: &Categorical,
    mask_a: Option<&BitArray>,
    mask_b: Option<&BitArray>,
) -> Result<Categorical> {
    union(a, b, None, mask_a, mask_b)
}

#[cfg(test)]
mod test {
    use super::*;

    fn strings(vs: &[&str]) -> Vec<String> {
        vs.iter().map(|s| s.to_string()).collect()
    }

    fn make(cat: &str, vals: &[&str]) -> Categorical {
        let mut c = Categorical::new();
        c.add_category(cat).unwrap();
        c.resize(vals.len() as u64);
        c.set_category(cat, &strings(vals)).unwrap();
        c
    }

    #[test]
    fn unique_dedupes_preserving_order() {
        let c = make("x", &["a", "b", "a", "c", "b"]);
        let u = unique(&c, None).unwrap();
        assert_eq!(u.full_category("x").unwrap(), strings(&["a", "b", "c"]));
    }

    #[test]
    fn unique_restricted_to_indices() {
        let c = make("x", &["a", "b", "a", "c"]);
        let u = unique(&c, Some(&[0, 1, 3])).unwrap();
        assert_eq!(u.full_category("x").unwrap(), strings(&["a", "b", "c"]));
    }

    #[test]
    fn union_merges_shared_key_rows() {
        let a = make("x", &["a", "b"]);
        let b = make("x", &["b", "c"]);
        let u = union(&a, &b, None, None, None).unwrap();
        assert_eq!(u.full_category("x").unwrap(), strings(&["a", "b", "c"]));
    }

    #[test]
    fn union_fills_side_only_categories() {
        let mut a = Categorical::new();
        a.add_category("id").unwrap();
        a.add_category("color").unwrap();
        a.resize(2);
        a.set_category("id", &strings(&["1", "2"])).unwrap();
        a.set_category("color", &strings(&["red", "green"])).unwrap();

        let mut b = Categorical::new();
        b.add_category("id").unwrap();
        b.resize(2);
        b.set_category("id", &strings(&["2", "3"])).unwrap();

        let u = union(&a, &b, None, None, None).unwrap();
        assert_eq!(u.full_category("id").unwrap(), strings(&["1", "2", "3"]));
        assert!(u.has_category("color"));
        // row "3" only came from b, which has no "color" column; a is not
        // uniform in color, so it collapses.
        assert_eq!(u.full_category("color").unwrap()[2], "<color>");
    }

    #[test]
    fn combined_defaults_to_full_intersection() {
        let a = make("x", &["a"]);
        let b = make("x", &["a"]);
        let u = combined(&a, &b, None, None).unwrap();
        assert_eq!(u.full_category("x").unwrap(), strings(&["a"]));
    }
}
