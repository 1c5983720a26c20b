use rill::collectors::ToList;
use rill::testing::*;
use rill::{from_iter, from_vec, iterate};

#[test]
fn sorted_by_natural_order() -> anyhow::Result<()> {
    let out = from_vec(vec![
        "Charlie".to_string(),
        "Alice".to_string(),
        "Bob".to_string(),
    ])
    .sorted()
    .collect(ToList::new())?;

    assert_collections_equal(
        &out,
        &[
            "Alice".to_string(),
            "Bob".to_string(),
            "Charlie".to_string(),
        ],
    );
    Ok(())
}

#[test]
fn sorted_descending_then_limit_gives_top_n() -> anyhow::Result<()> {
    let salaries = vec![
        ("Alice".to_string(), 75_000u64),
        ("Bob".to_string(), 90_000),
        ("Charlie".to_string(), 80_000),
        ("David".to_string(), 65_000),
        ("Eve".to_string(), 95_000),
    ];

    let top3 = from_vec(salaries)
        .sorted_by(|a, b| b.1.cmp(&a.1))
        .limit(3)
        .map(|e| e.0)
        .collect(ToList::new())?;

    assert_collections_equal(
        &top3,
        &["Eve".to_string(), "Bob".to_string(), "Charlie".to_string()],
    );
    Ok(())
}

#[test]
fn sorted_by_key_projection() -> anyhow::Result<()> {
    let out = from_vec(vec!["ccc".to_string(), "a".to_string(), "bb".to_string()])
        .sorted_by_key(|w| w.len())
        .collect(ToList::new())?;

    assert_collections_equal(
        &out,
        &["a".to_string(), "bb".to_string(), "ccc".to_string()],
    );
    Ok(())
}

#[test]
fn sort_is_stable_for_equal_keys() -> anyhow::Result<()> {
    let records = vec![(2, "first"), (1, "x"), (2, "second"), (2, "third"), (1, "y")];
    let out = from_vec(records).sorted_by_key(|r| r.0).collect(ToList::new())?;

    assert_collections_equal(
        &out,
        &[(1, "x"), (1, "y"), (2, "first"), (2, "second"), (2, "third")],
    );
    Ok(())
}

#[test]
fn sorted_is_legal_downstream_of_limit_on_an_infinite_source() -> anyhow::Result<()> {
    // 9, 8, ..., 0 after limiting a descending unbounded cursor.
    let out = iterate(9i64, |n| n - 1)
        .limit(10)
        .sorted()
        .collect(ToList::new())?;

    assert_collections_equal(&out, &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9]);
    Ok(())
}

#[test]
fn sorted_then_skip_drops_the_smallest() -> anyhow::Result<()> {
    let out = from_iter(vec![5, 3, 9, 1, 7]).sorted().skip(2).collect(ToList::new())?;
    assert_collections_equal(&out, &[5, 7, 9]);
    Ok(())
}
