//! Exercises the dispatch table the way a host-language binding would:
//! create a handle, drive it through a handful of op-codes, print the
//! results, then tear it down.

use categorical::dispatch::{op_table, Registry, Value};

fn main() {
    let table = op_table();
    let mut registry = Registry::new();
    let handle = registry.create();

    (table["add_category"])(&mut registry, handle, &[Value::Scalar("fruit".into())]).unwrap();
    (table["resize"])(&mut registry, handle, &[Value::UInt(4)]).unwrap();
    (table["set_category"])(
        &mut registry,
        handle,
        &[
            Value::Scalar("fruit".into()),
            Value::Strings(vec![
                "apple".into(),
                "banana".into(),
                "apple".into(),
                "cherry".into(),
            ]),
        ],
    )
    .unwrap();

    let full = (table["full_category"])(&mut registry, handle, &[Value::Scalar("fruit".into())])
        .unwrap();
    println!("fruit column: {full:?}");

    let rows = (table["find"])(
        &mut registry,
        handle,
        &[Value::Strings(vec!["apple".into()])],
    )
    .unwrap();
    println!("rows where fruit == apple: {rows:?}");

    let size = (table["size"])(&mut registry, handle, &[]).unwrap();
    println!("size: {size:?}");

    registry.destroy(handle);
}
