use rill::collectors::ToList;
use rill::testing::*;
use rill::{from_fn, from_iter, generate, iterate};

#[test]
fn iterate_drives_a_fibonacci_cursor() -> anyhow::Result<()> {
    let fib = iterate((0u64, 1u64), |&(a, b)| (b, a + b))
        .map(|(a, _)| a)
        .limit(10)
        .collect(ToList::new())?;

    assert_collections_equal(&fib, &[0, 1, 1, 2, 3, 5, 8, 13, 21, 34]);
    Ok(())
}

#[test]
fn iterate_drives_an_arithmetic_progression() -> anyhow::Result<()> {
    let evens = iterate(0i32, |n| n + 2).limit(10).collect(ToList::new())?;
    assert_collections_equal(&evens, &[0, 2, 4, 6, 8, 10, 12, 14, 16, 18]);
    Ok(())
}

#[test]
fn generate_drives_a_stateful_prime_cursor() -> anyhow::Result<()> {
    fn is_prime(n: u32) -> bool {
        if n < 2 {
            return false;
        }
        let mut i = 2;
        while i * i <= n {
            if n % i == 0 {
                return false;
            }
            i += 1;
        }
        true
    }

    let mut current = 1u32;
    let primes = generate(move || {
        loop {
            current += 1;
            if is_prime(current) {
                return current;
            }
        }
    })
    .limit(10)
    .collect(ToList::new())?;

    assert_collections_equal(&primes, &[2, 3, 5, 7, 11, 13, 17, 19, 23, 29]);
    Ok(())
}

#[test]
fn from_fn_ends_when_the_cursor_is_exhausted() -> anyhow::Result<()> {
    let mut remaining = 5u32;
    let out = from_fn(move || {
        if remaining == 0 {
            None
        } else {
            remaining -= 1;
            Some(remaining)
        }
    })
    .limit(10)
    .collect(ToList::new())?;

    assert_collections_equal(&out, &[4, 3, 2, 1, 0]);
    Ok(())
}

#[test]
fn from_fn_counts_as_unbounded_for_validation() {
    let mut remaining = 3u32;
    let err = from_fn(move || {
        if remaining == 0 {
            None
        } else {
            remaining -= 1;
            Some(remaining)
        }
    })
    .collect(ToList::new())
    .unwrap_err();

    assert!(matches!(err, rill::Error::Unbounded { .. }));
}

#[test]
fn generator_output_composes_with_stages() -> anyhow::Result<()> {
    let out = iterate(1u64, |n| n * 2)
        .limit(12)
        .filter(|n| *n > 16)
        .map(|n| n / 2)
        .collect(ToList::new())?;

    assert_collections_equal(&out, &[16, 32, 64, 128, 256, 512, 1024]);
    Ok(())
}

#[test]
fn from_iter_accepts_any_iterable() -> anyhow::Result<()> {
    let out = from_iter("a b c".split_whitespace().map(String::from))
        .collect(ToList::new())?;
    assert_collections_equal(
        &out,
        &["a".to_string(), "b".to_string(), "c".to_string()],
    );
    Ok(())
}
