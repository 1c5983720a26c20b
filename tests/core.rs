use rill::collectors::ToList;
use rill::testing::*;
use rill::{from_iter, from_vec};

#[test]
fn map_filter_flatmap_chain() -> anyhow::Result<()> {
    let lines = from_vec(vec![
        "The quick brown fox".to_string(),
        "jumps over the lazy dog".to_string(),
    ]);

    let out = lines
        .flat_map(|s: String| {
            s.split_whitespace()
                .map(str::to_lowercase)
                .collect::<Vec<_>>()
        })
        .filter(|w| w.len() >= 4)
        .collect(ToList::new())?;

    assert_collections_equal(
        &out,
        &[
            "quick".to_string(),
            "brown".to_string(),
            "jumps".to_string(),
            "over".to_string(),
            "lazy".to_string(),
        ],
    );
    Ok(())
}

#[test]
fn filter_then_map_preserves_source_order() -> anyhow::Result<()> {
    let out = from_iter(1..=20)
        .filter(|n| n % 3 == 0)
        .map(|n| n * 10)
        .collect(ToList::new())?;

    assert_collections_equal(&out, &[30, 60, 90, 120, 150, 180]);
    Ok(())
}

#[test]
fn flat_map_exhausts_subsequences_in_input_order() -> anyhow::Result<()> {
    let out = from_vec(vec![1u32, 2, 3])
        .flat_map(|n| vec![n; n as usize])
        .collect(ToList::new())?;

    assert_collections_equal(&out, &[1, 2, 2, 3, 3, 3]);
    Ok(())
}

#[test]
fn flat_map_may_emit_nothing() -> anyhow::Result<()> {
    let out = from_iter(1..=6)
        .flat_map(|n| if n % 2 == 0 { vec![n] } else { vec![] })
        .collect(ToList::new())?;

    assert_collections_equal(&out, &[2, 4, 6]);
    Ok(())
}

#[test]
fn filter_map_drops_absent_results() -> anyhow::Result<()> {
    let raw = vec!["123", "456", "abc", "789", "def"];
    let out = from_iter(raw.into_iter().map(String::from))
        .filter_map(|s| s.parse::<i32>().ok())
        .collect(ToList::new())?;

    assert_collections_equal(&out, &[123, 456, 789]);
    Ok(())
}

#[test]
fn limit_and_skip_bound_emission() -> anyhow::Result<()> {
    let first5 = from_iter(1..=10).limit(5).collect(ToList::new())?;
    assert_collections_equal(&first5, &[1, 2, 3, 4, 5]);

    let after3 = from_iter(1..=10).skip(3).collect(ToList::new())?;
    assert_collections_equal(&after3, &[4, 5, 6, 7, 8, 9, 10]);

    let window = from_iter(1..=10).skip(2).limit(3).collect(ToList::new())?;
    assert_collections_equal(&window, &[3, 4, 5]);
    Ok(())
}

#[test]
fn skip_past_the_end_yields_nothing() -> anyhow::Result<()> {
    let out = from_iter(1..=3).skip(10).collect(ToList::new())?;
    assert_collection_size(&out, 0);
    Ok(())
}

#[test]
fn inspect_observes_without_changing() -> anyhow::Result<()> {
    use std::sync::Mutex;
    use std::sync::Arc;

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let out = from_iter(1..=4)
        .inspect(move |n| sink.lock().unwrap().push(*n))
        .map(|n| n * 2)
        .collect(ToList::new())?;

    assert_collections_equal(&out, &[2, 4, 6, 8]);
    assert_collections_equal(&seen.lock().unwrap(), &[1, 2, 3, 4]);
    Ok(())
}

#[test]
fn count_and_match_terminals() -> anyhow::Result<()> {
    let names = || {
        from_vec(vec![
            "Alice".to_string(),
            "Bob".to_string(),
            "Charlie".to_string(),
            "David".to_string(),
            "Eve".to_string(),
        ])
    };

    assert_eq!(names().filter(|n| n.len() > 4).count()?, 2);
    assert!(names().any_match(|n| n.len() > 6)?);
    assert!(names().all_match(|n| n.len() < 10)?);
    assert!(names().none_match(|n| n.is_empty())?);
    assert_eq!(
        names().filter(|n| n.len() > 4).find_first()?,
        Some("Alice".to_string())
    );
    Ok(())
}

#[test]
fn for_each_visits_in_order() -> anyhow::Result<()> {
    let mut visited = Vec::new();
    from_iter(1..=5).map(|n| n * n).for_each(|n| visited.push(n))?;
    assert_collections_equal(&visited, &[1, 4, 9, 16, 25]);
    Ok(())
}

#[test]
fn min_and_max_terminals() -> anyhow::Result<()> {
    assert_eq!(from_iter(vec![3, 1, 4, 1, 5]).min()?, Some(1));
    assert_eq!(from_iter(vec![3, 1, 4, 1, 5]).max()?, Some(5));

    // First maximal element wins ties.
    let people = vec![("alice", 32), ("bob", 35), ("carol", 35)];
    let oldest = from_vec(people).max_by(|a, b| a.1.cmp(&b.1))?;
    assert_eq!(oldest, Some(("bob", 35)));
    Ok(())
}

#[test]
fn empty_input_flows_through() -> anyhow::Result<()> {
    let empty: Vec<u32> = Vec::new();
    let out = from_vec(empty).map(|n| n + 1).filter(|n| *n > 0).collect(ToList::new())?;
    assert_collection_size(&out, 0);

    assert_eq!(from_vec(Vec::<u32>::new()).find_first()?, None);
    assert_eq!(from_vec(Vec::<u32>::new()).min()?, None);
    assert_eq!(from_vec(Vec::<u32>::new()).count()?, 0);
    Ok(())
}
