use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use super::model::{Record, StockStatus};

/// Bin count of the inventory distribution chart.
pub const INVENTORY_HISTOGRAM_BINS: usize = 30;

// ---------------------------------------------------------------------------
// Scalar KPIs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Kpis {
    pub total_revenue: f64,
    /// Zero when there are no rows.
    pub avg_inventory: f64,
    pub low_stock_count: usize,
    pub overstock_count: usize,
    pub row_count: usize,
}

pub fn kpis(rows: &[&Record]) -> Kpis {
    let mut k = Kpis {
        row_count: rows.len(),
        ..Kpis::default()
    };
    let mut inventory_total = 0.0;
    for rec in rows {
        k.total_revenue += rec.revenue();
        inventory_total += rec.inventory_level() as f64;
        k.low_stock_count += usize::from(rec.is_low_stock());
        k.overstock_count += usize::from(rec.is_overstock());
    }
    if !rows.is_empty() {
        k.avg_inventory = inventory_total / rows.len() as f64;
    }
    k
}

// ---------------------------------------------------------------------------
// Single-key group aggregates
// ---------------------------------------------------------------------------

/// Categorical field to group by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKey {
    Region,
    Category,
    Store,
    Seasonality,
    /// Calendar month of the record date; unknown dates are left out.
    Month,
}

impl GroupKey {
    /// Domain sort rank plus label. Months rank by calendar number,
    /// everything else ranks equal and so sorts by label.
    fn key_of(self, rec: &Record) -> Option<(u32, &str)> {
        match self {
            GroupKey::Region => Some((0, rec.region())),
            GroupKey::Category => Some((0, rec.category())),
            GroupKey::Store => Some((0, rec.store_id())),
            GroupKey::Seasonality => Some((0, rec.seasonality())),
            GroupKey::Month => rec.month().map(|m| m.number_from_month()).zip(rec.month_name()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Measure {
    Revenue,
    InventoryLevel,
    UnitsSold,
}

impl Measure {
    fn value_of(self, rec: &Record) -> f64 {
        match self {
            Measure::Revenue => rec.revenue(),
            Measure::InventoryLevel => rec.inventory_level() as f64,
            Measure::UnitsSold => rec.units_sold() as f64,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregation {
    Sum,
    Mean,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesOrder {
    ValueDescending,
    ValueAscending,
    /// Calendar order for months, alphabetical otherwise.
    Domain,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub key: String,
    pub value: f64,
    /// Rows that contributed to this point.
    pub count: usize,
}

/// Ordered key → value series backing one chart.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Series {
    pub points: Vec<SeriesPoint>,
}

impl Series {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.points.iter().map(|p| p.key.as_str())
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.points.iter().find(|p| p.key == key).map(|p| p.value)
    }

    pub fn total(&self) -> f64 {
        self.points.iter().map(|p| p.value).sum()
    }

    /// `(min, max)` of the values, `None` when empty.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        value_range(self.points.iter().map(|p| p.value))
    }
}

/// Group rows by `key`, aggregate `measure`, and order the result.
///
/// Ties under a value ordering keep domain order.
pub fn group(
    rows: &[&Record],
    key: GroupKey,
    measure: Measure,
    aggregation: Aggregation,
    order: SeriesOrder,
) -> Series {
    let mut groups: BTreeMap<(u32, &str), (f64, usize)> = BTreeMap::new();
    for rec in rows {
        let Some(k) = key.key_of(rec) else {
            continue;
        };
        let acc = groups.entry(k).or_insert((0.0, 0));
        acc.0 += measure.value_of(rec);
        acc.1 += 1;
    }

    let mut points: Vec<SeriesPoint> = groups
        .into_iter()
        .map(|((_, label), (sum, count))| SeriesPoint {
            key: label.to_string(),
            value: match aggregation {
                Aggregation::Sum => sum,
                Aggregation::Mean => sum / count as f64,
            },
            count,
        })
        .collect();

    match order {
        SeriesOrder::ValueDescending => {
            points.sort_by(|a, b| b.value.partial_cmp(&a.value).unwrap_or(Ordering::Equal))
        }
        SeriesOrder::ValueAscending => {
            points.sort_by(|a, b| a.value.partial_cmp(&b.value).unwrap_or(Ordering::Equal))
        }
        SeriesOrder::Domain => {}
    }

    Series { points }
}

// ---------------------------------------------------------------------------
// Two-key pivot
// ---------------------------------------------------------------------------

/// Cross-tab of summed values. A `None` cell means no rows fell into it,
/// which is different from rows summing to zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Pivot {
    pub row_keys: Vec<String>,
    pub column_keys: Vec<String>,
    /// `cells[row][column]`.
    pub cells: Vec<Vec<Option<f64>>>,
}

impl Pivot {
    pub fn is_empty(&self) -> bool {
        self.row_keys.is_empty()
    }

    pub fn cell(&self, row_key: &str, column_key: &str) -> Option<f64> {
        let r = self.row_keys.iter().position(|k| k == row_key)?;
        let c = self.column_keys.iter().position(|k| k == column_key)?;
        self.cells[r][c]
    }

    /// `(min, max)` over the populated cells.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        value_range(self.cells.iter().flatten().flatten().copied())
    }
}

/// Sum `measure` into a `rows_by` × `columns_by` grid, keys in domain order.
pub fn pivot_sum(
    rows: &[&Record],
    rows_by: GroupKey,
    columns_by: GroupKey,
    measure: Measure,
) -> Pivot {
    let mut sums: BTreeMap<((u32, &str), (u32, &str)), f64> = BTreeMap::new();
    let mut row_keys = BTreeSet::new();
    let mut column_keys = BTreeSet::new();

    for rec in rows {
        let (Some(r), Some(c)) = (rows_by.key_of(rec), columns_by.key_of(rec)) else {
            continue;
        };
        row_keys.insert(r);
        column_keys.insert(c);
        *sums.entry((r, c)).or_insert(0.0) += measure.value_of(rec);
    }

    let cells: Vec<Vec<Option<f64>>> = row_keys
        .iter()
        .map(|r| {
            column_keys
                .iter()
                .map(|c| sums.get(&(*r, *c)).copied())
                .collect()
        })
        .collect();

    Pivot {
        row_keys: row_keys.iter().map(|(_, k)| k.to_string()).collect(),
        column_keys: column_keys.iter().map(|(_, k)| k.to_string()).collect(),
        cells,
    }
}

// ---------------------------------------------------------------------------
// Stock classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StockCounts {
    pub low: usize,
    pub optimal: usize,
    pub high: usize,
}

impl StockCounts {
    pub fn total(&self) -> usize {
        self.low + self.optimal + self.high
    }
}

pub fn stock_classification(rows: &[&Record]) -> StockCounts {
    let mut counts = StockCounts::default();
    for rec in rows {
        match rec.stock_status() {
            StockStatus::Low => counts.low += 1,
            StockStatus::Optimal => counts.optimal += 1,
            StockStatus::High => counts.high += 1,
        }
    }
    counts
}

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

/// Half-open `[start, end)` bin; the last bin of a histogram also holds `end`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Histogram {
    pub bins: Vec<HistogramBin>,
}

impl Histogram {
    pub fn total(&self) -> usize {
        self.bins.iter().map(|b| b.count).sum()
    }
}

/// Equal-width bins spanning the observed range of `values`.
///
/// A constant input gets a single unit-wide bin.
pub fn histogram(values: impl IntoIterator<Item = f64>, bin_count: usize) -> Histogram {
    let values: Vec<f64> = values.into_iter().filter(|v| v.is_finite()).collect();
    let Some((min, max)) = value_range(values.iter().copied()) else {
        return Histogram::default();
    };
    if bin_count == 0 {
        return Histogram::default();
    }

    if max == min {
        return Histogram {
            bins: vec![HistogramBin {
                start: min,
                end: min + 1.0,
                count: values.len(),
            }],
        };
    }

    let width = (max - min) / bin_count as f64;
    let mut bins: Vec<HistogramBin> = (0..bin_count)
        .map(|i| HistogramBin {
            start: min + i as f64 * width,
            end: if i + 1 == bin_count {
                max
            } else {
                min + (i + 1) as f64 * width
            },
            count: 0,
        })
        .collect();

    for v in values {
        let idx = (((v - min) / width).floor() as usize).min(bin_count - 1);
        bins[idx].count += 1;
    }
    Histogram { bins }
}

fn value_range(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}
