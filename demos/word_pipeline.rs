//! Text processing with lazy stages and custom collectors: tokenize, dedup,
//! sort, join, and summarize word lengths.
//!
//! Run with: `cargo run --example word_pipeline`

use rill::collector;
use rill::collectors::{Joining, Mapping, Summarizing};
use rill::from_vec;

fn main() -> anyhow::Result<()> {
    let lines = vec![
        "the quick brown fox".to_string(),
        "jumps over the lazy dog".to_string(),
        "the dog barks".to_string(),
    ];

    let vocabulary = from_vec(lines.clone())
        .flat_map(|line: String| {
            line.split_whitespace()
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .distinct()
        .sorted()
        .collect(Joining::with(", "))?;
    println!("Vocabulary: {vocabulary}");

    let lengths = from_vec(lines.clone())
        .flat_map(|line: String| {
            line.split_whitespace()
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .collect(Mapping::new(|w: String| w.len() as u32, Summarizing::new()))?;
    println!(
        "Word lengths: n={} mean={:.2} min={} max={}",
        lengths.count,
        lengths.mean,
        lengths.min.unwrap_or(0.0),
        lengths.max.unwrap_or(0.0),
    );

    // A custom four-function collector: longest word wins.
    let longest = collector::of(
        || None::<String>,
        |acc: &mut Option<String>, word: String| {
            let better = acc.as_ref().is_none_or(|cur| word.len() > cur.len());
            if better {
                *acc = Some(word);
            }
        },
        |a, b| match (a, b) {
            (Some(a), Some(b)) => Some(if b.len() > a.len() { b } else { a }),
            (a, None) => a,
            (None, b) => b,
        },
        |acc| acc.unwrap_or_default(),
    );
    let word = from_vec(lines)
        .flat_map(|line: String| {
            line.split_whitespace()
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .collect(longest)?;
    println!("Longest word: {word}");

    Ok(())
}
