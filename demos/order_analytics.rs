//! Grouping and partitioning over a small order book: per-category totals,
//! price-band breakdowns, and a two-way split by order value.
//!
//! Run with: `cargo run --example order_analytics`

use rill::collectors::{Counting, GroupingBy, Mapping, PartitioningBy, Summarizing, Summing};
use rill::from_vec;

#[derive(Clone, Debug)]
struct Order {
    id: &'static str,
    product: &'static str,
    price: f64,
    category: &'static str,
}

fn orders() -> Vec<Order> {
    vec![
        Order { id: "A001", product: "Laptop", price: 1200.0, category: "Electronics" },
        Order { id: "A002", product: "Mouse", price: 25.0, category: "Electronics" },
        Order { id: "A003", product: "Desk", price: 300.0, category: "Furniture" },
        Order { id: "A004", product: "Keyboard", price: 80.0, category: "Electronics" },
        Order { id: "A005", product: "Chair", price: 150.0, category: "Furniture" },
        Order { id: "A006", product: "Monitor", price: 400.0, category: "Electronics" },
    ]
}

fn price_band(price: f64) -> &'static str {
    if price < 100.0 {
        "budget"
    } else if price < 500.0 {
        "mid-range"
    } else {
        "premium"
    }
}

fn main() -> anyhow::Result<()> {
    // Revenue per category.
    let revenue = from_vec(orders()).collect(GroupingBy::with(
        |o: &Order| o.category,
        Mapping::new(|o: Order| o.price, Summing::new()),
    ))?;
    println!("Revenue by category:");
    for (category, total) in &revenue {
        println!("  {category}: ${total:.2}");
    }

    // Two-level breakdown: category, then price band.
    let breakdown = from_vec(orders()).collect(GroupingBy::with(
        |o: &Order| o.category,
        GroupingBy::with(|o: &Order| price_band(o.price), Counting::new()),
    ))?;
    println!("\nOrders by category and price band:");
    for (category, bands) in &breakdown {
        println!("  {category}:");
        for (band, count) in bands {
            println!("    {band}: {count}");
        }
    }

    // Price statistics per category, one pass per bucket.
    let stats = from_vec(orders()).collect(GroupingBy::with(
        |o: &Order| o.category,
        Mapping::new(|o: Order| o.price, Summarizing::new()),
    ))?;
    println!("\nPrice statistics:");
    for (category, s) in &stats {
        println!(
            "  {category}: n={} total=${:.2} mean=${:.2} min=${:.2} max=${:.2}",
            s.count,
            s.sum,
            s.mean,
            s.min.unwrap_or(0.0),
            s.max.unwrap_or(0.0),
        );
    }

    // High-value vs. everyday orders.
    let split = from_vec(orders()).collect(PartitioningBy::with(
        |o: &Order| o.price >= 150.0,
        Mapping::new(|o: Order| format!("{} ({})", o.product, o.id), rill::collectors::ToList::new()),
    ))?;
    println!("\nHigh-value orders: {:?}", split.matched);
    println!("Everyday orders:   {:?}", split.unmatched);

    // Top three orders by price.
    let top3 = from_vec(orders())
        .sorted_by(|a, b| b.price.total_cmp(&a.price))
        .limit(3)
        .map(|o| o.product)
        .collect(rill::collectors::ToList::new())?;
    println!("\nTop 3 by price: {top3:?}");

    Ok(())
}
