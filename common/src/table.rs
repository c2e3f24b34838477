use std::io::Read;

use chrono::{NaiveDate, NaiveDateTime};
use nalgebra::DMatrix;

use crate::{ChartError, Result};

const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d/%m/%Y"];

/// The period (row) axis of an observation table.
///
/// Datetime and numeric axes are orderable and can be interpolated; a label
/// axis can only be forward-filled.
#[derive(Debug, Clone, PartialEq)]
pub enum PeriodAxis {
    /// Periods are points in time
    DateTime(Vec<NaiveDateTime>),
    /// Periods are plain numbers
    Numeric(Vec<f64>),
    /// Periods are opaque labels
    Labels(Vec<String>),
}

impl PeriodAxis {
    /// Number of periods on the axis
    pub fn len(&self) -> usize {
        match self {
            PeriodAxis::DateTime(v) => v.len(),
            PeriodAxis::Numeric(v) => v.len(),
            PeriodAxis::Labels(v) => v.len(),
        }
    }

    /// True if the axis holds no periods
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the axis values have a total order usable for interpolation
    pub fn is_orderable(&self) -> bool {
        !matches!(self, PeriodAxis::Labels(_))
    }

    /// The axis value at `i` as a plain number.
    ///
    /// Datetimes map to seconds since the epoch; labels map to their
    /// positional index.
    pub fn position(&self, i: usize) -> f64 {
        match self {
            PeriodAxis::DateTime(v) => v[i].and_utc().timestamp_micros() as f64 / 1e6,
            PeriodAxis::Numeric(v) => v[i],
            PeriodAxis::Labels(_) => i as f64,
        }
    }

    /// Human-readable label for the axis value at `i`.
    ///
    /// `fmt` is a chrono format string applied to datetime axes only.
    pub fn label(&self, i: usize, fmt: Option<&str>) -> String {
        match self {
            PeriodAxis::DateTime(v) => v[i].format(fmt.unwrap_or("%d/%m/%Y")).to_string(),
            PeriodAxis::Numeric(v) => format!("{}", v[i]),
            PeriodAxis::Labels(v) => v[i].clone(),
        }
    }
}

/// A "wide" observation table: one row per period, one numeric column per
/// category, `NaN` marking missing cells.
///
/// The category set is fixed for the lifetime of the table and every
/// derived (interpolated) table keeps the same columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    axis: PeriodAxis,
    columns: Vec<String>,
    values: DMatrix<f64>,
}

impl Table {
    /// Create a table from its parts, validating that the shapes agree
    pub fn new(axis: PeriodAxis, columns: Vec<String>, values: DMatrix<f64>) -> Result<Self> {
        if axis.is_empty() {
            return Err(ChartError::Configuration(
                "table must contain at least one period".to_string(),
            ));
        }
        if axis.len() != values.nrows() {
            return Err(ChartError::DataShape(format!(
                "axis has {} periods but values have {} rows",
                axis.len(),
                values.nrows()
            )));
        }
        if columns.len() != values.ncols() {
            return Err(ChartError::DataShape(format!(
                "{} column names for {} value columns",
                columns.len(),
                values.ncols()
            )));
        }
        if columns.is_empty() {
            return Err(ChartError::Configuration(
                "no numeric data columns found for plotting".to_string(),
            ));
        }

        Ok(Self {
            axis,
            columns,
            values,
        })
    }

    /// Parse a table from CSV.
    ///
    /// The first column becomes the period axis (datetime when every entry
    /// parses as one, numeric when every entry parses as a number, labels
    /// otherwise). Remaining columns are kept only when every non-empty
    /// cell parses as a number; other columns are dropped with a warning.
    /// Empty cells become `NaN`.
    pub fn from_csv<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::Reader::from_reader(reader);
        let headers: Vec<String> = rdr
            .headers()
            .map_err(|e| ChartError::Configuration(format!("invalid csv header: {}", e)))?
            .iter()
            .map(|h| h.to_string())
            .collect();
        if headers.len() < 2 {
            return Err(ChartError::Configuration(
                "csv must have an index column and at least one data column".to_string(),
            ));
        }

        let mut axis_raw: Vec<String> = vec![];
        let mut cells: Vec<Vec<String>> = vec![];
        for record in rdr.records() {
            let record =
                record.map_err(|e| ChartError::Configuration(format!("invalid csv row: {}", e)))?;
            let mut row: Vec<String> = record.iter().map(|c| c.trim().to_string()).collect();
            if row.len() != headers.len() {
                return Err(ChartError::DataShape(format!(
                    "csv row {} has {} fields, expected {}",
                    axis_raw.len() + 1,
                    row.len(),
                    headers.len()
                )));
            }
            axis_raw.push(row.remove(0));
            cells.push(row);
        }
        if axis_raw.is_empty() {
            return Err(ChartError::Configuration(
                "table must contain at least one period".to_string(),
            ));
        }

        // Keep only the columns where every non-empty cell is numeric
        let n_rows = cells.len();
        let mut columns: Vec<String> = vec![];
        let mut numeric: Vec<Vec<f64>> = vec![];
        for (c, name) in headers.iter().skip(1).enumerate() {
            let mut col: Vec<f64> = Vec::with_capacity(n_rows);
            let mut ok = true;
            for row in &cells {
                let cell = &row[c];
                if cell.is_empty() {
                    col.push(f64::NAN);
                } else if let Ok(v) = cell.parse::<f64>() {
                    col.push(v);
                } else {
                    ok = false;
                    break;
                }
            }
            if ok {
                columns.push(name.clone());
                numeric.push(col);
            } else {
                warn!("dropping non-numeric column `{}`", name);
            }
        }
        if columns.is_empty() {
            return Err(ChartError::Configuration(
                "no numeric data columns found for plotting".to_string(),
            ));
        }

        let values =
            DMatrix::from_fn(n_rows, columns.len(), |r, c| numeric[c][r]);
        Table::new(parse_axis(axis_raw), columns, values)
    }

    /// Number of periods (rows)
    #[inline(always)]
    pub fn nrows(&self) -> usize {
        self.values.nrows()
    }

    /// Number of categories (data columns)
    #[inline(always)]
    pub fn ncols(&self) -> usize {
        self.values.ncols()
    }

    /// The period axis
    #[inline(always)]
    pub fn axis(&self) -> &PeriodAxis {
        &self.axis
    }

    /// The category names, in column order
    #[inline(always)]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// The raw values, rows are periods and columns are categories
    #[inline(always)]
    pub fn values(&self) -> &DMatrix<f64> {
        &self.values
    }

    /// A new table containing `names` in the given order.
    ///
    /// Fails with a data-shape error when a requested category does not
    /// exist in this table.
    pub fn select_columns(&self, names: &[String]) -> Result<Table> {
        let mut indices = Vec::with_capacity(names.len());
        for name in names {
            let idx = self
                .columns
                .iter()
                .position(|c| c == name)
                .ok_or_else(|| {
                    ChartError::DataShape(format!("category `{}` not found in table", name))
                })?;
            indices.push(idx);
        }
        let values = DMatrix::from_fn(self.nrows(), indices.len(), |r, c| {
            self.values[(r, indices[c])]
        });
        Table::new(self.axis.clone(), names.to_vec(), values)
    }

    /// Period-over-period difference of every data column.
    ///
    /// The first row has no predecessor and becomes `NaN`.
    pub fn diff(&self) -> Table {
        let values = DMatrix::from_fn(self.nrows(), self.ncols(), |r, c| {
            if r == 0 {
                f64::NAN
            } else {
                self.values[(r, c)] - self.values[(r - 1, c)]
            }
        });
        Self {
            axis: self.axis.clone(),
            columns: self.columns.clone(),
            values,
        }
    }
}

fn parse_axis(raw: Vec<String>) -> PeriodAxis {
    for fmt in DATETIME_FORMATS {
        let parsed: Vec<NaiveDateTime> = raw
            .iter()
            .filter_map(|s| NaiveDateTime::parse_from_str(s, fmt).ok())
            .collect();
        if parsed.len() == raw.len() {
            return PeriodAxis::DateTime(parsed);
        }
    }
    for fmt in DATE_FORMATS {
        let parsed: Vec<NaiveDateTime> = raw
            .iter()
            .filter_map(|s| {
                NaiveDate::parse_from_str(s, fmt)
                    .ok()
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
            })
            .collect();
        if parsed.len() == raw.len() {
            return PeriodAxis::DateTime(parsed);
        }
    }
    let nums: Vec<f64> = raw.iter().filter_map(|s| s.parse().ok()).collect();
    if nums.len() == raw.len() {
        return PeriodAxis::Numeric(nums);
    }
    PeriodAxis::Labels(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_by_two() -> Table {
        Table::new(
            PeriodAxis::Numeric(vec![0.0, 1.0]),
            vec!["A".to_string(), "B".to_string()],
            DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 3.0, 4.0]),
        )
        .unwrap()
    }

    #[test]
    fn from_csv_detects_date_axis() {
        let csv = "date,A,B\n2020-03-29,1,2\n2020-03-30,3,4\n";
        let table = Table::from_csv(csv.as_bytes()).unwrap();
        assert_eq!(table.nrows(), 2);
        assert_eq!(table.columns(), ["A".to_string(), "B".to_string()]);
        assert!(matches!(table.axis(), PeriodAxis::DateTime(_)));
        assert_eq!(table.values()[(1, 1)], 4.0);
    }

    #[test]
    fn from_csv_drops_non_numeric_columns() {
        if let Err(_) = pretty_env_logger::try_init() {}

        let csv = "idx,A,comment\n0,1,foo\n1,2,bar\n";
        let table = Table::from_csv(csv.as_bytes()).unwrap();
        assert_eq!(table.columns(), ["A".to_string()]);
    }

    #[test]
    fn from_csv_without_numeric_columns_fails() {
        let csv = "idx,comment\n0,foo\n1,bar\n";
        let err = Table::from_csv(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, ChartError::Configuration(_)));
    }

    #[test]
    fn from_csv_empty_cell_becomes_nan() {
        let csv = "idx,A\n0,1\n1,\n2,3\n";
        let table = Table::from_csv(csv.as_bytes()).unwrap();
        assert!(table.values()[(1, 0)].is_nan());
    }

    #[test]
    fn select_columns_reorders() {
        let table = two_by_two();
        let sel = table
            .select_columns(&["B".to_string(), "A".to_string()])
            .unwrap();
        assert_eq!(sel.columns(), ["B".to_string(), "A".to_string()]);
        assert_eq!(sel.values()[(0, 0)], 2.0);
        assert_eq!(sel.values()[(0, 1)], 1.0);
    }

    #[test]
    fn select_columns_unknown_category() {
        let table = two_by_two();
        let err = table.select_columns(&["C".to_string()]).unwrap_err();
        assert!(matches!(err, ChartError::DataShape(_)));
    }

    #[test]
    fn diff_first_row_is_nan() {
        let table = two_by_two();
        let diff = table.diff();
        assert!(diff.values()[(0, 0)].is_nan());
        assert_eq!(diff.values()[(1, 0)], 2.0);
        assert_eq!(diff.values()[(1, 1)], 2.0);
    }

    #[test]
    fn labels_are_not_orderable() {
        let axis = PeriodAxis::Labels(vec!["a".to_string(), "b".to_string()]);
        assert!(!axis.is_orderable());
        assert!(PeriodAxis::Numeric(vec![1.0]).is_orderable());
    }
}
