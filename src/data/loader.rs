use std::fs::File;
use std::path::Path;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Date32Type, Float32Type, Float64Type, Int32Type, Int64Type};
use arrow::temporal_conversions::date32_to_datetime;
use chrono::NaiveDate;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::error::DataSourceError;
use super::model::{DateParseWarning, Facet, InventoryTable, Observation, Record, DATE_FORMAT};

/// Columns every source must carry, in canonical order.
pub const REQUIRED_COLUMNS: [&str; 8] = [
    "Date",
    "Store ID",
    "Region",
    "Category",
    "Inventory Level",
    "Units Sold",
    "Price",
    "Seasonality",
];

const DATE: usize = 0;
const STORE_ID: usize = 1;
const REGION: usize = 2;
const CATEGORY: usize = 3;
const INVENTORY_LEVEL: usize = 4;
const UNITS_SOLD: usize = 5;
const PRICE: usize = 6;
const SEASONALITY: usize = 7;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load an inventory table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – delimited table with a header row
/// * `.parquet` – same columns; `Date` as text or as a Date32 column
pub fn load_file(path: &Path) -> Result<InventoryTable, DataSourceError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "csv" => load_csv(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => return Err(DataSourceError::UnsupportedFormat(other.to_string())),
    };

    if table.is_empty() {
        log::warn!("{} contains no data rows", path.display());
    }
    log::info!(
        "Loaded {} rows from {} ({} regions, {} categories, {} stores)",
        table.len(),
        path.display(),
        table.facet_values(Facet::Region).len(),
        table.facet_values(Facet::Category).len(),
        table.facet_values(Facet::Store).len(),
    );
    if let Some(first) = table.date_warnings().first() {
        log::warn!(
            "{} row(s) have an unparsable date and are kept with an unknown date (first: {first})",
            table.date_warnings().len()
        );
    }
    Ok(table)
}

// ---------------------------------------------------------------------------
// Column resolution
// ---------------------------------------------------------------------------

/// Position of each required column within the source header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ColumnIndex([usize; 8]);

impl ColumnIndex {
    /// Locate every required column; reports all missing ones at once.
    fn resolve<'a>(headers: impl IntoIterator<Item = &'a str>) -> Result<Self, DataSourceError> {
        let headers: Vec<&str> = headers.into_iter().map(str::trim).collect();
        let mut positions = [0usize; 8];
        let mut missing = Vec::new();

        for (slot, name) in REQUIRED_COLUMNS.iter().enumerate() {
            match headers.iter().position(|h| h == name) {
                Some(pos) => positions[slot] = pos,
                None => missing.push(name.to_string()),
            }
        }

        if missing.is_empty() {
            Ok(ColumnIndex(positions))
        } else {
            Err(DataSourceError::MissingColumns { missing })
        }
    }
}

// ---------------------------------------------------------------------------
// Row conversion (shared by every format)
// ---------------------------------------------------------------------------

#[derive(Default)]
struct TableBuilder {
    records: Vec<Record>,
    date_warnings: Vec<DateParseWarning>,
}

impl TableBuilder {
    /// Convert one row of raw cells (in [`REQUIRED_COLUMNS`] order).
    fn push_row(&mut self, row: usize, cells: [&str; 8]) -> Result<(), DataSourceError> {
        let date = match NaiveDate::parse_from_str(cells[DATE], DATE_FORMAT) {
            Ok(d) => Some(d),
            Err(e) => {
                log::debug!("row {row}: date '{}' not parsed: {e}", cells[DATE]);
                self.date_warnings.push(DateParseWarning {
                    row,
                    raw: cells[DATE].to_string(),
                });
                None
            }
        };

        let obs = Observation {
            date,
            store_id: cells[STORE_ID].to_string(),
            region: cells[REGION].to_string(),
            category: cells[CATEGORY].to_string(),
            inventory_level: parse_integer(cells[INVENTORY_LEVEL], row, INVENTORY_LEVEL)?,
            units_sold: parse_integer(cells[UNITS_SOLD], row, UNITS_SOLD)?,
            price: parse_number(cells[PRICE], row, PRICE)?,
            seasonality: cells[SEASONALITY].to_string(),
        };
        self.records.push(Record::new(obs));
        Ok(())
    }

    fn finish(self) -> InventoryTable {
        InventoryTable::from_records(self.records, self.date_warnings)
    }
}

fn invalid(s: &str, row: usize, col: usize) -> DataSourceError {
    DataSourceError::InvalidValue {
        row,
        column: REQUIRED_COLUMNS[col],
        value: s.to_string(),
    }
}

/// Integers, also accepting integral floats such as `120.0`.
fn parse_integer(s: &str, row: usize, col: usize) -> Result<i64, DataSourceError> {
    if let Ok(i) = s.parse::<i64>() {
        return Ok(i);
    }
    match s.parse::<f64>() {
        Ok(f) if f.is_finite() && f.fract() == 0.0 => Ok(f as i64),
        _ => Err(invalid(s, row, col)),
    }
}

fn parse_number(s: &str, row: usize, col: usize) -> Result<f64, DataSourceError> {
    match s.parse::<f64>() {
        Ok(f) if f.is_finite() => Ok(f),
        _ => Err(invalid(s, row, col)),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<InventoryTable, DataSourceError> {
    let file = File::open(path).map_err(|e| DataSourceError::io(path, e))?;
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(file);

    let columns = ColumnIndex::resolve(reader.headers()?.iter())?;
    let mut builder = TableBuilder::default();

    for (row_no, result) in reader.records().enumerate() {
        let record = result?;
        let cells = columns.0.map(|idx| record.get(idx).unwrap_or(""));
        builder.push_row(row_no, cells)?;
    }

    Ok(builder.finish())
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with the same eight columns as the CSV source.
///
/// Text columns may be Utf8 or LargeUtf8, numeric columns any of
/// Int32/Int64/Float32/Float64, and `Date` either text or Date32.
fn load_parquet(path: &Path) -> Result<InventoryTable, DataSourceError> {
    let file = File::open(path).map_err(|e| DataSourceError::io(path, e))?;
    let reader_builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let columns = ColumnIndex::resolve(
        reader_builder
            .schema()
            .fields()
            .iter()
            .map(|f| f.name().as_str()),
    )?;
    let reader = reader_builder.build()?;

    let mut builder = TableBuilder::default();
    let mut row_offset = 0;

    for batch_result in reader {
        let batch = batch_result?;
        let arrays: Vec<&ArrayRef> = columns.0.iter().map(|&idx| batch.column(idx)).collect();

        for row in 0..batch.num_rows() {
            let row_no = row_offset + row;
            let mut texts: [String; 8] = Default::default();
            for (slot, array) in arrays.iter().enumerate() {
                texts[slot] = cell_text(array, row, row_no, slot)?;
            }
            let cells: [&str; 8] = std::array::from_fn(|slot| texts[slot].as_str());
            builder.push_row(row_no, cells)?;
        }
        row_offset += batch.num_rows();
    }

    Ok(builder.finish())
}

/// Render a single Arrow cell as the text the CSV path would have seen.
fn cell_text(
    col: &ArrayRef,
    row: usize,
    row_no: usize,
    slot: usize,
) -> Result<String, DataSourceError> {
    if col.is_null(row) {
        return Ok(String::new());
    }
    let text = match col.data_type() {
        DataType::Utf8 => col.as_string::<i32>().value(row).to_string(),
        DataType::LargeUtf8 => col.as_string::<i64>().value(row).to_string(),
        DataType::Int32 => col.as_primitive::<Int32Type>().value(row).to_string(),
        DataType::Int64 => col.as_primitive::<Int64Type>().value(row).to_string(),
        DataType::Float32 => col.as_primitive::<Float32Type>().value(row).to_string(),
        DataType::Float64 => col.as_primitive::<Float64Type>().value(row).to_string(),
        DataType::Date32 => date32_to_datetime(col.as_primitive::<Date32Type>().value(row))
            .map(|dt| dt.format(DATE_FORMAT).to_string())
            .unwrap_or_default(),
        other => return Err(invalid(&format!("<{other}>"), row_no, slot)),
    };
    Ok(text)
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Arc;

    use arrow::array::{Date32Array, Float64Array, Int64Array, StringArray};
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;
    use tempfile::TempDir;

    use super::*;

    const HEADER: &str = "Date,Store ID,Region,Category,Inventory Level,Units Sold,Price,Seasonality";

    fn write_csv(dir: &TempDir, name: &str, body: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(body.as_bytes()).unwrap();
        path
    }

    #[test]
    fn loads_csv_and_derives_columns() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            &dir,
            "inv.csv",
            &format!(
                "{HEADER}\n\
                 01/15/24,S001,North,Toys,80,10,2.5,Winter\n\
                 07/04/24, S002 ,South,Groceries,450.0,3,10,Summer\n"
            ),
        );

        let table = load_file(&path).unwrap();
        assert_eq!(table.len(), 2);
        assert!(table.date_warnings().is_empty());

        let first = &table.records()[0];
        assert_eq!(first.date(), NaiveDate::from_ymd_opt(2024, 1, 15));
        assert_eq!(first.month_name(), Some("January"));
        assert_eq!(first.revenue(), 25.0);
        assert!(first.is_low_stock());

        let second = &table.records()[1];
        assert_eq!(second.store_id(), "S002");
        assert_eq!(second.inventory_level(), 450);
        assert!(second.is_overstock());
    }

    #[test]
    fn column_order_and_extra_columns_do_not_matter() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            &dir,
            "inv.csv",
            "Seasonality,Price,Notes,Units Sold,Inventory Level,Category,Region,Store ID,Date\n\
             Autumn,4,hello,5,200,Toys,East,S009,10/01/23\n",
        );

        let table = load_file(&path).unwrap();
        let rec = &table.records()[0];
        assert_eq!(rec.region(), "East");
        assert_eq!(rec.revenue(), 20.0);
        assert_eq!(rec.month_name(), Some("October"));
    }

    #[test]
    fn bad_dates_are_kept_with_warning() {
        let _ = env_logger::builder().is_test(true).try_init();
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            &dir,
            "inv.csv",
            &format!(
                "{HEADER}\n\
                 13/45/24,S001,North,Toys,80,10,2.5,Winter\n\
                 ,S001,North,Toys,80,10,2.5,Winter\n\
                 02/01/24,S001,North,Toys,80,10,2.5,Winter\n"
            ),
        );

        let table = load_file(&path).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(
            table.date_warnings(),
            &[
                DateParseWarning { row: 0, raw: "13/45/24".into() },
                DateParseWarning { row: 1, raw: String::new() },
            ]
        );
        assert_eq!(table.records()[0].date(), None);
        assert_eq!(table.records()[0].revenue(), 25.0);
    }

    #[test]
    fn missing_columns_are_all_reported() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "inv.csv", "Date,Region,Category,Price\n01/01/24,N,T,1\n");

        match load_file(&path) {
            Err(DataSourceError::MissingColumns { missing }) => assert_eq!(
                missing,
                ["Store ID", "Inventory Level", "Units Sold", "Seasonality"]
            ),
            other => panic!("expected MissingColumns, got {other:?}"),
        }
    }

    #[test]
    fn non_numeric_value_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            &dir,
            "inv.csv",
            &format!("{HEADER}\n01/01/24,S001,North,Toys,lots,10,2.5,Winter\n"),
        );

        match load_file(&path) {
            Err(DataSourceError::InvalidValue { row, column, value }) => {
                assert_eq!(row, 0);
                assert_eq!(column, "Inventory Level");
                assert_eq!(value, "lots");
            }
            other => panic!("expected InvalidValue, got {other:?}"),
        }
    }

    #[test]
    fn unreadable_source_is_an_io_error() {
        let dir = TempDir::new().unwrap();
        let err = load_file(&dir.path().join("absent.csv")).unwrap_err();
        assert!(matches!(err, DataSourceError::Io { .. }));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = load_file(Path::new("inventory.xlsx")).unwrap_err();
        assert!(matches!(err, DataSourceError::UnsupportedFormat(ext) if ext == "xlsx"));
    }

    fn write_parquet(path: &Path, schema: Arc<Schema>, batch: Option<RecordBatch>) {
        let file = File::create(path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        if let Some(batch) = batch {
            writer.write(&batch).unwrap();
        }
        writer.close().unwrap();
    }

    #[test]
    fn empty_parquet_with_missing_columns_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.parquet");
        let schema = Arc::new(Schema::new(vec![Field::new("Region", DataType::Utf8, false)]));
        write_parquet(&path, schema, None);

        match load_file(&path) {
            Err(DataSourceError::MissingColumns { missing }) => {
                assert_eq!(missing.len(), 7);
                assert!(!missing.iter().any(|m| m == "Region"));
            }
            other => panic!("expected MissingColumns, got {other:?}"),
        }
    }

    #[test]
    fn loads_parquet_with_text_dates() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("inv.parquet");

        let schema = Arc::new(Schema::new(vec![
            Field::new("Date", DataType::Utf8, false),
            Field::new("Store ID", DataType::Utf8, false),
            Field::new("Region", DataType::Utf8, false),
            Field::new("Category", DataType::Utf8, false),
            Field::new("Inventory Level", DataType::Int64, false),
            Field::new("Units Sold", DataType::Int64, false),
            Field::new("Price", DataType::Float64, false),
            Field::new("Seasonality", DataType::Utf8, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["03/09/24", "bad"])),
                Arc::new(StringArray::from(vec!["S001", "S002"])),
                Arc::new(StringArray::from(vec!["North", "South"])),
                Arc::new(StringArray::from(vec!["Toys", "Toys"])),
                Arc::new(Int64Array::from(vec![50, 200])),
                Arc::new(Int64Array::from(vec![3, 1])),
                Arc::new(Float64Array::from(vec![4.0, 1.5])),
                Arc::new(StringArray::from(vec!["Spring", "Summer"])),
            ],
        )
        .unwrap();
        write_parquet(&path, schema, Some(batch));

        let table = load_file(&path).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.records()[0].date(), NaiveDate::from_ymd_opt(2024, 3, 9));
        assert_eq!(table.records()[0].revenue(), 12.0);
        assert!(table.records()[0].is_low_stock());
        assert_eq!(
            table.date_warnings(),
            &[DateParseWarning { row: 1, raw: "bad".into() }]
        );
    }

    #[test]
    fn loads_parquet_with_date32_dates() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("inv.parquet");

        let schema = Arc::new(Schema::new(vec![
            Field::new("Date", DataType::Date32, true),
            Field::new("Store ID", DataType::Utf8, false),
            Field::new("Region", DataType::Utf8, false),
            Field::new("Category", DataType::Utf8, false),
            Field::new("Inventory Level", DataType::Int64, false),
            Field::new("Units Sold", DataType::Int64, false),
            Field::new("Price", DataType::Float64, false),
            Field::new("Seasonality", DataType::Utf8, false),
        ]));
        // 19737 days after the epoch is 2024-01-15.
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(Date32Array::from(vec![Some(19737), None])),
                Arc::new(StringArray::from(vec!["S001", "S002"])),
                Arc::new(StringArray::from(vec!["North", "South"])),
                Arc::new(StringArray::from(vec!["Toys", "Toys"])),
                Arc::new(Int64Array::from(vec![100, 500])),
                Arc::new(Int64Array::from(vec![4, 2])),
                Arc::new(Float64Array::from(vec![2.5, 1.0])),
                Arc::new(StringArray::from(vec!["Winter", "Summer"])),
            ],
        )
        .unwrap();

        write_parquet(&path, schema, Some(batch));

        let table = load_file(&path).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.records()[0].date(), NaiveDate::from_ymd_opt(2024, 1, 15));
        assert_eq!(table.records()[0].revenue(), 10.0);
        assert_eq!(table.records()[1].date(), None);
        assert_eq!(table.date_warnings().len(), 1);
        assert!(table.records()[1].is_overstock());
    }
}
