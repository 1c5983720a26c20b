//! The same reduction run sequentially and across the worker pool, with
//! execution metrics from the parallel run.
//!
//! Run with: `cargo run --example parallel_reduce`

use rill::from_iter;

fn expensive(n: u64) -> u64 {
    // A few rounds of mixing to give the workers something to chew on.
    (0..50).fold(n, |acc, i| acc.wrapping_mul(6364136223846793005).wrapping_add(i))
}

fn main() -> anyhow::Result<()> {
    let n = 2_000_000u64;

    let sequential = from_iter(0..n)
        .map(expensive)
        .reduce(0, u64::wrapping_add)?;
    println!("sequential result: {sequential}");

    #[cfg(feature = "metrics")]
    {
        let metrics = rill::MetricsCollector::new();
        let parallel = from_iter(0..n)
            .with_metrics(metrics.clone())
            .parallel()
            .map(expensive)
            .reduce(0, u64::wrapping_add)?;
        println!("parallel result:   {parallel}");
        assert_eq!(sequential, parallel);
        metrics.print();
    }

    #[cfg(not(feature = "metrics"))]
    {
        let parallel = from_iter(0..n)
            .parallel()
            .map(expensive)
            .reduce(0, u64::wrapping_add)?;
        println!("parallel result:   {parallel}");
        assert_eq!(sequential, parallel);
    }

    Ok(())
}
