use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Datelike, Duration, NaiveDate};

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform integer in `lo..=hi`.
    fn range(&mut self, lo: i64, hi: i64) -> i64 {
        lo + (self.next_f64() * (hi - lo + 1) as f64) as i64
    }
}

fn season_of(date: NaiveDate) -> &'static str {
    match date.month() {
        12 | 1 | 2 => "Winter",
        3..=5 => "Spring",
        6..=8 => "Summer",
        _ => "Autumn",
    }
}

fn main() -> Result<()> {
    let output_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data/retail_store_inventory.csv"));
    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
    }

    let mut rng = SimpleRng::new(42);

    let stores = [
        ("S001", "North"),
        ("S002", "North"),
        ("S003", "South"),
        ("S004", "East"),
        ("S005", "West"),
    ];
    // (category, min price, max price)
    let categories = [
        ("Clothing", 15, 80),
        ("Electronics", 50, 400),
        ("Furniture", 80, 600),
        ("Groceries", 2, 20),
        ("Toys", 5, 60),
    ];

    let mut writer = csv::Writer::from_path(&output_path)
        .with_context(|| format!("creating {}", output_path.display()))?;
    writer.write_record([
        "Date",
        "Store ID",
        "Region",
        "Category",
        "Inventory Level",
        "Units Sold",
        "Price",
        "Seasonality",
    ])?;

    let start = NaiveDate::from_ymd_opt(2024, 1, 1).context("start date")?;
    let mut rows = 0usize;
    for day in (0..366).step_by(3) {
        let date = start + Duration::days(day);
        for &(store, region) in &stores {
            for &(category, lo, hi) in &categories {
                let inventory = rng.range(20, 520);
                let units = rng.range(0, 180);
                let price = rng.range(lo * 100, hi * 100) as f64 / 100.0;
                writer.write_record([
                    date.format("%m/%d/%y").to_string(),
                    store.to_string(),
                    region.to_string(),
                    category.to_string(),
                    inventory.to_string(),
                    units.to_string(),
                    format!("{price:.2}"),
                    season_of(date).to_string(),
                ])?;
                rows += 1;
            }
        }
    }

    // A couple of malformed dates to exercise the unknown-date path.
    for bad_date in ["13/45/24", "n/a"] {
        writer.write_record([bad_date, "S001", "North", "Toys", "150", "12", "9.99", "Winter"])?;
        rows += 1;
    }
    writer.flush()?;

    println!("Wrote {rows} rows to {}", output_path.display());
    Ok(())
}
