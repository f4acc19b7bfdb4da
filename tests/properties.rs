use categorical::Categorical;
use proptest::collection::vec;
use proptest::prelude::*;

fn label_strategy() -> impl Strategy<Value = String> {
    "[a-e]".prop_map(|s| s)
}

fn column_strategy(len: impl Into<proptest::collection::SizeRange>) -> impl Strategy<Value = Vec<String>> {
    vec(label_strategy(), len)
}

fn build(x: &[String], y: &[String]) -> Categorical {
    let mut c = Categorical::new();
    c.add_category("x").unwrap();
    c.add_category("y").unwrap();
    c.resize(x.len() as u64);
    c.set_category("x", x).unwrap();
    c.set_category("y", y).unwrap();
    c
}

proptest! {
    // append is a left identity: appending any array onto an empty one with
    // the same categories reproduces the appended array's columns exactly.
    #[test]
    fn append_left_identity(x in column_strategy(0..8), y in column_strategy(0..8)) {
        let len = x.len().min(y.len());
        let x = &x[..len];
        let y = &y[..len];

        let mut empty = Categorical::new();
        empty.add_category("x").unwrap();
        empty.add_category("y").unwrap();

        let rhs = build(x, y);
        empty.append(&rhs).unwrap();

        prop_assert_eq!(empty.full_category("x").unwrap(), rhs.full_category("x").unwrap());
        prop_assert_eq!(empty.full_category("y").unwrap(), rhs.full_category("y").unwrap());
    }

    // append is associative: (a ++ b) ++ c == a ++ (b ++ c), compared by
    // the resulting label sequence (ids may differ across reconciliation).
    #[test]
    fn append_associativity(
        a in column_strategy(0..4),
        b in column_strategy(0..4),
        cc in column_strategy(0..4),
    ) {
        let len = a.len().min(b.len()).min(cc.len());
        let a = &a[..len];
        let b = &b[..len];
        let cc = &cc[..len];

        let ya: Vec<String> = a.iter().map(|_| "1".to_string()).collect();
        let yb: Vec<String> = b.iter().map(|_| "1".to_string()).collect();
        let yc: Vec<String> = cc.iter().map(|_| "1".to_string()).collect();

        let ca = build(a, &ya);
        let cb = build(b, &yb);
        let cc_arr = build(cc, &yc);

        let mut left = ca.clone();
        let mut bc = cb.clone();
        bc.append(&cc_arr).unwrap();
        left.append(&bc).unwrap();

        let mut right = ca.clone();
        right.append(&cb).unwrap();
        right.append(&cc_arr).unwrap();

        prop_assert_eq!(left.full_category("x").unwrap(), right.full_category("x").unwrap());
    }

    // Round-tripping through the numeric matrix form is lossless at the
    // label level, for any column contents.
    #[test]
    fn round_trip_through_numeric_form(x in column_strategy(0..12), y in column_strategy(0..12)) {
        let len = x.len().min(y.len());
        let x = &x[..len];
        let y = &y[..len];
        let c = build(x, y);

        let matrix = c.to_numeric_matrix();
        let rebuilt = Categorical::from_numeric_matrix(&matrix).unwrap();

        prop_assert_eq!(rebuilt.full_category("x").unwrap(), c.full_category("x").unwrap());
        prop_assert_eq!(rebuilt.full_category("y").unwrap(), c.full_category("y").unwrap());
        prop_assert_eq!(rebuilt.size(), c.size());
    }

    // find/find_all consistency: every row find() returns for a single
    // label must appear in exactly one of find_all's groups for that
    // category, and every row in that group must carry the same label.
    #[test]
    fn find_and_find_all_agree(x in column_strategy(1..10)) {
        let y: Vec<String> = x.iter().map(|_| "const".to_string()).collect();
        let c = build(&x, &y);

        let groups = c.find_all(&["x".to_string()], 0);
        let mut covered = std::collections::HashSet::new();
        for group in &groups {
            let labels: std::collections::HashSet<String> = group
                .iter()
                .map(|&row| c.partial_category("x", &[row]).unwrap()[0].clone())
                .collect();
            prop_assert_eq!(labels.len(), 1);
            for &row in group {
                prop_assert!(covered.insert(row));
            }
        }
        prop_assert_eq!(covered.len(), x.len());

        for label in x.iter().collect::<std::collections::HashSet<_>>() {
            let found = c.find(&[label.clone()], 0);
            let group = groups
                .iter()
                .find(|g| {
                    !g.is_empty() && c.partial_category("x", &[g[0]]).unwrap()[0] == *label
                })
                .cloned()
                .unwrap_or_default();
            let mut found_sorted = found.clone();
            found_sorted.sort_unstable();
            let mut group_sorted = group.clone();
            group_sorted.sort_unstable();
            prop_assert_eq!(found_sorted, group_sorted);
        }
    }

    // keep_each is idempotent: applying it a second time changes nothing.
    #[test]
    fn keep_each_is_idempotent(x in column_strategy(0..10), y in column_strategy(0..10)) {
        let len = x.len().min(y.len());
        let x = &x[..len];
        let y = &y[..len];
        let mut c = build(x, y);

        c.keep_each(&["x".to_string()]).unwrap();
        let once_x = c.full_category("x").unwrap();
        let once_y = c.full_category("y").unwrap();

        c.keep_each(&["x".to_string()]).unwrap();
        prop_assert_eq!(c.full_category("x").unwrap(), once_x);
        prop_assert_eq!(c.full_category("y").unwrap(), once_y);
    }

    // Progenitor-tag stability: any sequence of read-only operations never
    // changes the tag, regardless of array contents.
    #[test]
    fn progenitor_tag_stable_under_reads(x in column_strategy(0..8), y in column_strategy(0..8)) {
        let len = x.len().min(y.len());
        let x = &x[..len];
        let y = &y[..len];
        let c = build(x, y);

        let before = c.progenitor();
        let _ = c.full_category("x").unwrap();
        let _ = c.find(&["a".to_string()], 0);
        let _ = c.find_all(&["x".to_string()], 0);
        for label in x {
            let _ = c.count(label);
        }
        prop_assert_eq!(c.progenitor(), before);
    }
}
