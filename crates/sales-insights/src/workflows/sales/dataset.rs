use super::engine::InsightError;
use serde::Serialize;
use std::io::Read;
use std::path::Path;
use tracing::debug;

pub const DATE_COLUMN: &str = "date";
pub const CATEGORY_COLUMN: &str = "category";
pub const SALES_COLUMN: &str = "sales";

/// Columns the engine requires, in the order they are checked.
pub const REQUIRED_COLUMNS: [&str; 3] = [DATE_COLUMN, CATEGORY_COLUMN, SALES_COLUMN];

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("failed to read sales data: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid sales CSV data: {0}")]
    Csv(#[from] csv::Error),
}

/// One order row after the required columns have been resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesRecord {
    pub date: String,
    pub category: String,
    pub sales: f64,
}

impl SalesRecord {
    pub fn new(date: impl Into<String>, category: impl Into<String>, sales: f64) -> Self {
        Self {
            date: date.into(),
            category: category.into(),
            sales,
        }
    }
}

/// Uploaded table as parsed from CSV. Cells stay textual until
/// [`Dataset::sales_records`] validates them, so schema problems surface at
/// computation time rather than while reading.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

/// First rows of a dataset for on-screen inspection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetPreview {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Dataset {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let headers = headers.iter().map(|header| normalize_header(header)).collect();
        Self { headers, rows }
    }

    pub fn from_records(records: &[SalesRecord]) -> Self {
        let headers = REQUIRED_COLUMNS.iter().map(|column| column.to_string()).collect();
        let rows = records
            .iter()
            .map(|record| {
                vec![
                    record.date.clone(),
                    record.category.clone(),
                    record.sales.to_string(),
                ]
            })
            .collect();

        Self { headers, rows }
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, DatasetError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DatasetError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv_reader
            .headers()?
            .iter()
            .map(normalize_header)
            .collect::<Vec<_>>();

        let mut rows = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        debug!(columns = headers.len(), rows = rows.len(), "sales dataset loaded");
        Ok(Self { headers, rows })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }

    pub fn preview(&self, limit: usize) -> DatasetPreview {
        DatasetPreview {
            headers: self.headers.clone(),
            rows: self.rows.iter().take(limit).cloned().collect(),
        }
    }

    /// Resolves the required columns and converts every row.
    ///
    /// Fails on the first missing column (checked in [`REQUIRED_COLUMNS`]
    /// order) or the first sales cell that is not a finite number. Row
    /// numbers in errors count data rows from 1.
    pub fn sales_records(&self) -> Result<Vec<SalesRecord>, InsightError> {
        let date = self.require_column(DATE_COLUMN)?;
        let category = self.require_column(CATEGORY_COLUMN)?;
        let sales = self.require_column(SALES_COLUMN)?;

        self.rows
            .iter()
            .enumerate()
            .map(|(index, row)| {
                let cell = |column: usize| row.get(column).map(String::as_str).unwrap_or("");
                let raw_sales = cell(sales);
                let amount = parse_sales(raw_sales).ok_or_else(|| InsightError::InvalidSales {
                    row: index + 1,
                    value: raw_sales.to_string(),
                })?;

                Ok(SalesRecord::new(cell(date), cell(category), amount))
            })
            .collect()
    }

    fn require_column(&self, column: &'static str) -> Result<usize, InsightError> {
        self.column_index(column)
            .ok_or(InsightError::Schema { column })
    }
}

fn normalize_header(value: &str) -> String {
    value.replace(['\u{feff}', '\u{200b}'], "").trim().to_string()
}

fn parse_sales(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn from_reader_trims_cells_and_strips_bom() {
        let dataset = Dataset::from_reader(Cursor::new(
            "\u{feff}date , category,sales\n2024-01-01,  Books ,12.50\n",
        ))
        .expect("csv parses");

        assert_eq!(dataset.headers(), ["date", "category", "sales"]);
        assert_eq!(dataset.rows()[0], ["2024-01-01", "Books", "12.50"]);
        assert_eq!(dataset.len(), 1);
    }

    #[test]
    fn from_reader_rejects_ragged_rows() {
        let error = Dataset::from_reader(Cursor::new(
            "date,category,sales\n2024-01-01,Books,10\n2024-01-02,Toys\n",
        ))
        .expect_err("ragged row rejected");

        assert!(matches!(error, DatasetError::Csv(_)));
    }

    #[test]
    fn from_path_propagates_io_errors() {
        let error = Dataset::from_path("./does-not-exist.csv").expect_err("expected io error");
        match error {
            DatasetError::Io(_) => {}
            other => panic!("expected io error, got {other:?}"),
        }
    }

    #[test]
    fn sales_records_names_first_missing_column() {
        let dataset = Dataset::from_reader(Cursor::new("date,amount\n2024-01-01,4\n"))
            .expect("csv parses");

        match dataset.sales_records() {
            Err(InsightError::Schema { column }) => assert_eq!(column, "category"),
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn sales_records_rejects_non_numeric_sales() {
        let dataset = Dataset::from_reader(Cursor::new(
            "date,category,sales\n2024-01-01,Books,10\n2024-01-02,Toys,n/a\n",
        ))
        .expect("csv parses");

        match dataset.sales_records() {
            Err(InsightError::InvalidSales { row, value }) => {
                assert_eq!(row, 2);
                assert_eq!(value, "n/a");
            }
            other => panic!("expected invalid sales error, got {other:?}"),
        }
    }

    #[test]
    fn sales_records_treats_blank_sales_as_invalid() {
        let dataset = Dataset::new(
            vec!["date".into(), "category".into(), "sales".into()],
            vec![vec!["2024-01-01".into(), "Books".into(), "".into()]],
        );

        assert!(matches!(
            dataset.sales_records(),
            Err(InsightError::InvalidSales { row: 1, .. })
        ));
    }

    #[test]
    fn extra_columns_are_ignored() {
        let dataset = Dataset::from_reader(Cursor::new(
            "order_id,sales,region,category,date\n17,3.5,EU,Games,2024-02-01\n",
        ))
        .expect("csv parses");

        let records = dataset.sales_records().expect("records resolve");
        assert_eq!(records, vec![SalesRecord::new("2024-02-01", "Games", 3.5)]);
    }

    #[test]
    fn from_records_round_trips_amounts() {
        let records = vec![
            SalesRecord::new("2024-01-01", "Books", 0.1),
            SalesRecord::new("2024-01-02", "Toys", 1234.5678),
        ];
        let dataset = Dataset::from_records(&records);

        assert_eq!(dataset.sales_records().expect("records resolve"), records);
    }

    #[test]
    fn preview_limits_rows() {
        let records: Vec<_> = (1..=8)
            .map(|day| SalesRecord::new(format!("2024-01-0{day}"), "Books", day as f64))
            .collect();
        let preview = Dataset::from_records(&records).preview(5);

        assert_eq!(preview.headers, ["date", "category", "sales"]);
        assert_eq!(preview.rows.len(), 5);
        assert_eq!(preview.rows[4][0], "2024-01-05");
    }
}
