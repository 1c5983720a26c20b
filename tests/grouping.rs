use rill::collectors::{
    Averaging, Counting, GroupingBy, Mapping, PartitioningBy, Summing, ToList,
};
use rill::testing::*;
use rill::{from_iter, from_vec};

#[test]
fn grouping_with_downstream_sum() -> anyhow::Result<()> {
    let rows = vec![
        ("X".to_string(), 10i64),
        ("X".to_string(), 5),
        ("Y".to_string(), 1),
    ];

    let sums = from_vec(rows).collect(GroupingBy::with(
        |r: &(String, i64)| r.0.clone(),
        Mapping::new(|r: (String, i64)| r.1, Summing::new()),
    ))?;

    assert_eq!(sums.len(), 2);
    assert_eq!(sums["X"], 15);
    assert_eq!(sums["Y"], 1);
    Ok(())
}

#[test]
fn grouping_buckets_partition_the_input() -> anyhow::Result<()> {
    let data: Vec<i32> = (0..50).collect();
    let groups = from_vec(data.clone()).collect(GroupingBy::new(|n: &i32| n % 3))?;

    // Union of the buckets is exactly the input multiset.
    let flattened: Vec<i32> = groups.values().flatten().copied().collect();
    assert_collections_unordered_equal(&flattened, &data);
    Ok(())
}

#[test]
fn raw_buckets_preserve_source_order() -> anyhow::Result<()> {
    let words = vec![
        "apple".to_string(),
        "avocado".to_string(),
        "banana".to_string(),
        "apricot".to_string(),
    ];
    let by_initial = from_vec(words)
        .collect(GroupingBy::new(|w: &String| w.chars().next().unwrap()))?;

    assert_collections_equal(
        &by_initial[&'a'],
        &[
            "apple".to_string(),
            "avocado".to_string(),
            "apricot".to_string(),
        ],
    );
    assert_collections_equal(&by_initial[&'b'], &["banana".to_string()]);
    Ok(())
}

#[test]
fn multi_level_grouping_nests_downstreams() -> anyhow::Result<()> {
    fn band(price: f64) -> &'static str {
        if price < 100.0 {
            "low"
        } else if price < 500.0 {
            "mid"
        } else {
            "high"
        }
    }

    let orders = vec![
        ("Laptop", 1200.0, "Electronics"),
        ("Mouse", 25.0, "Electronics"),
        ("Desk", 300.0, "Furniture"),
        ("Keyboard", 80.0, "Electronics"),
        ("Chair", 150.0, "Furniture"),
        ("Monitor", 400.0, "Electronics"),
    ];

    let by_category_and_band = from_vec(orders).collect(GroupingBy::with(
        |o: &(&str, f64, &str)| o.2,
        GroupingBy::with(|o: &(&str, f64, &str)| band(o.1), Counting::new()),
    ))?;

    assert_eq!(by_category_and_band["Electronics"]["low"], 2);
    assert_eq!(by_category_and_band["Electronics"]["mid"], 1);
    assert_eq!(by_category_and_band["Electronics"]["high"], 1);
    assert_eq!(by_category_and_band["Furniture"]["mid"], 2);
    Ok(())
}

#[test]
fn grouping_with_averaging_downstream() -> anyhow::Result<()> {
    let employees = vec![
        ("Alice".to_string(), "IT".to_string(), 50_000u32),
        ("Bob".to_string(), "HR".to_string(), 45_000),
        ("Charlie".to_string(), "IT".to_string(), 60_000),
        ("Eve".to_string(), "IT".to_string(), 58_000),
    ];

    let avg_by_dept = from_vec(employees).collect(GroupingBy::with(
        |e: &(String, String, u32)| e.1.clone(),
        Mapping::new(|e: (String, String, u32)| e.2, Averaging::new()),
    ))?;

    assert!((avg_by_dept["IT"] - 56_000.0).abs() < 1e-9);
    assert!((avg_by_dept["HR"] - 45_000.0).abs() < 1e-9);
    Ok(())
}

#[test]
fn partitioning_covers_the_input_with_two_buckets() -> anyhow::Result<()> {
    let parts = from_iter(1..=10).collect(PartitioningBy::new(|n| n % 2 == 0))?;

    assert_collections_equal(&parts.matched, &[2, 4, 6, 8, 10]);
    assert_collections_equal(&parts.unmatched, &[1, 3, 5, 7, 9]);
    Ok(())
}

#[test]
fn partitioning_always_yields_both_buckets() -> anyhow::Result<()> {
    // Nothing is odd here, but the matched bucket still exists.
    let parts = from_vec(vec![2, 4, 6]).collect(PartitioningBy::new(|n| n % 2 == 1))?;

    assert_collection_size(&parts.matched, 0);
    assert_collections_equal(&parts.unmatched, &[2, 4, 6]);
    Ok(())
}

#[test]
fn partitioning_with_downstream_collector() -> anyhow::Result<()> {
    let scores = vec![
        ("Alice".to_string(), 86.25),
        ("Bob".to_string(), 85.25),
        ("Charlie".to_string(), 90.25),
        ("David".to_string(), 75.0),
    ];

    let parts = from_vec(scores).collect(PartitioningBy::with(
        |s: &(String, f64)| s.1 >= 85.0,
        Mapping::new(|s: (String, f64)| s.0, ToList::new()),
    ))?;

    assert_collections_equal(
        &parts.matched,
        &[
            "Alice".to_string(),
            "Bob".to_string(),
            "Charlie".to_string(),
        ],
    );
    assert_collections_equal(&parts.unmatched, &["David".to_string()]);
    Ok(())
}
