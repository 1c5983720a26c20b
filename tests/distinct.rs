use rill::collectors::ToList;
use rill::from_vec;
use rill::testing::*;

#[test]
fn distinct_keeps_first_occurrence_in_order() -> anyhow::Result<()> {
    let out = from_vec(vec![1, 2, 2, 3, 3, 3, 4]).distinct().collect(ToList::new())?;
    assert_collections_equal(&out, &[1, 2, 3, 4]);
    Ok(())
}

#[test]
fn distinct_is_idempotent() -> anyhow::Result<()> {
    let data = vec![5, 1, 5, 2, 1, 2, 2, 9];
    let once = from_vec(data.clone()).distinct().collect(ToList::new())?;
    let twice = from_vec(data).distinct().distinct().collect(ToList::new())?;
    assert_collections_equal(&twice, &once);
    Ok(())
}

#[test]
fn distinct_on_strings_uses_value_equality() -> anyhow::Result<()> {
    let out = from_vec(vec![
        "java".to_string(),
        "rust".to_string(),
        "java".to_string(),
        "go".to_string(),
        "rust".to_string(),
    ])
    .distinct()
    .collect(ToList::new())?;

    assert_collections_equal(
        &out,
        &["java".to_string(), "rust".to_string(), "go".to_string()],
    );
    Ok(())
}

#[test]
fn distinct_by_uses_the_explicit_key() -> anyhow::Result<()> {
    // Two words of the same length are duplicates under this key.
    let out = from_vec(vec![
        "a".to_string(),
        "bb".to_string(),
        "cc".to_string(),
        "ddd".to_string(),
    ])
    .distinct_by(|w| w.len())
    .collect(ToList::new())?;

    assert_collections_equal(
        &out,
        &["a".to_string(), "bb".to_string(), "ddd".to_string()],
    );
    Ok(())
}

#[test]
fn distinct_composes_with_other_stages() -> anyhow::Result<()> {
    let out = from_vec(vec![1, 2, 2, 3, 3, 3, 4, 5, 6])
        .distinct()
        .filter(|n| n % 2 == 0)
        .map(|n| n * 100)
        .collect(ToList::new())?;

    assert_collections_equal(&out, &[200, 400, 600]);
    Ok(())
}
