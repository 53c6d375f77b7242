use std::collections::BTreeSet;
use std::fmt;

use chrono::{Datelike, Month, NaiveDate};
use serde::Serialize;

/// Rows with fewer units on hand than this are low on stock.
pub const LOW_STOCK_THRESHOLD: i64 = 100;
/// Rows with more units on hand than this are overstocked.
pub const OVERSTOCK_THRESHOLD: i64 = 400;

/// Source date format: month/day/two-digit year.
pub const DATE_FORMAT: &str = "%m/%d/%y";

// ---------------------------------------------------------------------------
// Facet – one of the filterable dimensions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Facet {
    Region,
    Category,
    Store,
}

impl Facet {
    pub const ALL: [Facet; 3] = [Facet::Region, Facet::Category, Facet::Store];

    pub fn label(self) -> &'static str {
        match self {
            Facet::Region => "Region",
            Facet::Category => "Category",
            Facet::Store => "Store",
        }
    }

    /// The record's value for this facet.
    pub fn value_of(self, record: &Record) -> &str {
        match self {
            Facet::Region => record.region(),
            Facet::Category => record.category(),
            Facet::Store => record.store_id(),
        }
    }

    fn index(self) -> usize {
        match self {
            Facet::Region => 0,
            Facet::Category => 1,
            Facet::Store => 2,
        }
    }
}

impl fmt::Display for Facet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Stock status – three-way inventory classification
// ---------------------------------------------------------------------------

/// Low (< 100), optimal (100..=400) or high (> 400) inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StockStatus {
    Low,
    Optimal,
    High,
}

impl StockStatus {
    pub fn classify(inventory_level: i64) -> Self {
        if inventory_level < LOW_STOCK_THRESHOLD {
            StockStatus::Low
        } else if inventory_level > OVERSTOCK_THRESHOLD {
            StockStatus::High
        } else {
            StockStatus::Optimal
        }
    }
}

// ---------------------------------------------------------------------------
// Record – one row of the source table
// ---------------------------------------------------------------------------

/// The base fields of a row exactly as they come out of the source.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    /// `None` when the source date could not be parsed.
    pub date: Option<NaiveDate>,
    pub store_id: String,
    pub region: String,
    pub category: String,
    pub inventory_level: i64,
    pub units_sold: i64,
    pub price: f64,
    pub seasonality: String,
}

/// A sale/inventory observation together with its derived columns.
///
/// Derived columns are computed once in [`Record::new`]. Every field is
/// read-only so the derived values cannot drift from the base ones.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    date: Option<NaiveDate>,
    store_id: String,
    region: String,
    category: String,
    inventory_level: i64,
    units_sold: i64,
    price: f64,
    seasonality: String,
    revenue: f64,
    month: Option<Month>,
    is_low_stock: bool,
    is_overstock: bool,
}

impl Record {
    pub fn new(obs: Observation) -> Self {
        let revenue = obs.units_sold as f64 * obs.price;
        let month = obs
            .date
            .and_then(|d| Month::try_from(d.month() as u8).ok());

        Record {
            revenue,
            month,
            is_low_stock: obs.inventory_level < LOW_STOCK_THRESHOLD,
            is_overstock: obs.inventory_level > OVERSTOCK_THRESHOLD,
            date: obs.date,
            store_id: obs.store_id,
            region: obs.region,
            category: obs.category,
            inventory_level: obs.inventory_level,
            units_sold: obs.units_sold,
            price: obs.price,
            seasonality: obs.seasonality,
        }
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn store_id(&self) -> &str {
        &self.store_id
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn inventory_level(&self) -> i64 {
        self.inventory_level
    }

    pub fn units_sold(&self) -> i64 {
        self.units_sold
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn seasonality(&self) -> &str {
        &self.seasonality
    }

    /// `units_sold * price`.
    pub fn revenue(&self) -> f64 {
        self.revenue
    }

    pub fn month(&self) -> Option<Month> {
        self.month
    }

    /// Full calendar month name ("January"…), `None` for unknown dates.
    pub fn month_name(&self) -> Option<&'static str> {
        self.month.map(|m| m.name())
    }

    pub fn is_low_stock(&self) -> bool {
        self.is_low_stock
    }

    pub fn is_overstock(&self) -> bool {
        self.is_overstock
    }

    pub fn stock_status(&self) -> StockStatus {
        StockStatus::classify(self.inventory_level)
    }
}

// ---------------------------------------------------------------------------
// DateParseWarning – non-fatal per-row date problem
// ---------------------------------------------------------------------------

/// A row whose date could not be parsed. The row is kept with an unknown date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateParseWarning {
    pub row: usize,
    pub raw: String,
}

impl fmt::Display for DateParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row {}: unparsable date '{}'", self.row, self.raw)
    }
}

// ---------------------------------------------------------------------------
// InventoryTable – the complete loaded table
// ---------------------------------------------------------------------------

/// The immutable base table with the discovered value set of every facet.
#[derive(Debug, Clone)]
pub struct InventoryTable {
    records: Vec<Record>,
    /// Sorted unique values, indexed by [`Facet::index`].
    facet_values: [BTreeSet<String>; 3],
    date_warnings: Vec<DateParseWarning>,
}

impl InventoryTable {
    pub fn from_records(records: Vec<Record>, date_warnings: Vec<DateParseWarning>) -> Self {
        let mut facet_values: [BTreeSet<String>; 3] = Default::default();
        for rec in &records {
            for facet in Facet::ALL {
                let values = &mut facet_values[facet.index()];
                let value = facet.value_of(rec);
                if !values.contains(value) {
                    values.insert(value.to_string());
                }
            }
        }
        InventoryTable {
            records,
            facet_values,
            date_warnings,
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    /// Every value of `facet` present in the table, sorted.
    pub fn facet_values(&self, facet: Facet) -> &BTreeSet<String> {
        &self.facet_values[facet.index()]
    }

    pub fn date_warnings(&self) -> &[DateParseWarning] {
        &self.date_warnings
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
