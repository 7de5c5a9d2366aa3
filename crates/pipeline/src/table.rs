//! Field-by-fund aggregate tables.

use std::{fs::File, marker::PhantomData, path::Path};

use greenbond_math::DescriptiveStats;
use greenbond_primitives::{FundName, RegressionResult, VolatilityResult};
use polars::prelude::*;
use tracing::debug;

use crate::PipelineError;

/// Name of the leading label column.
const FIELD_COLUMN: &str = "field";

/// Selects the `(field, value)` pairs a per-fund result contributes to an
/// aggregate table.
pub trait TableRow {
    /// Result type the fields are read from.
    type Source: ?Sized;

    /// `(field, value)` pairs in output order.
    fn fields(source: &Self::Source) -> Vec<(String, f64)>;
}

impl TableRow for DescriptiveStats {
    type Source = Self;

    fn fields(source: &Self) -> Vec<(String, f64)> {
        source.fields()
    }
}

impl TableRow for VolatilityResult {
    type Source = Self;

    fn fields(source: &Self) -> Vec<(String, f64)> {
        source.fit.param_pairs()
    }
}

/// Coefficients of a [`RegressionResult`].
#[derive(Debug, Clone, Copy)]
pub struct RegressionCoefficients;

impl TableRow for RegressionCoefficients {
    type Source = RegressionResult;

    fn fields(source: &RegressionResult) -> Vec<(String, f64)> {
        source.coefficient_pairs()
    }
}

/// Two-sided p-values of a [`RegressionResult`].
#[derive(Debug, Clone, Copy)]
pub struct RegressionPValues;

impl TableRow for RegressionPValues {
    type Source = RegressionResult;

    fn fields(source: &RegressionResult) -> Vec<(String, f64)> {
        source.p_value_pairs()
    }
}

/// Collects one column per fund, in append order.
#[derive(Debug)]
pub struct AggregateTableBuilder<R> {
    funds: Vec<FundName>,
    columns: Vec<Vec<(String, f64)>>,
    _row: PhantomData<fn() -> R>,
}

impl<R: TableRow> Default for AggregateTableBuilder<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: TableRow> AggregateTableBuilder<R> {
    /// Empty builder.
    #[must_use]
    pub const fn new() -> Self {
        Self { funds: Vec::new(), columns: Vec::new(), _row: PhantomData }
    }

    /// Append a fund's column.
    pub fn append(&mut self, fund: &FundName, row: &R::Source) {
        self.funds.push(fund.clone());
        self.columns.push(R::fields(row));
    }

    /// Number of appended funds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.funds.len()
    }

    /// Whether nothing has been appended.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.funds.is_empty()
    }

    /// Build the table. Rows are the union of fields in first-seen order;
    /// a fund without a field gets a missing cell.
    #[must_use]
    pub fn finalize(self) -> AggregateTable {
        let mut fields: Vec<String> = Vec::new();
        for column in &self.columns {
            for (name, _) in column {
                if !fields.contains(name) {
                    fields.push(name.clone());
                }
            }
        }

        let cells = self
            .columns
            .iter()
            .map(|column| {
                fields
                    .iter()
                    .map(|f| column.iter().find(|(name, _)| name == f).map(|(_, v)| *v))
                    .collect()
            })
            .collect();

        AggregateTable { fields, funds: self.funds, cells }
    }
}

/// Fields down, funds across.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateTable {
    fields: Vec<String>,
    funds: Vec<FundName>,
    /// `cells[fund][field]`
    cells: Vec<Vec<Option<f64>>>,
}

impl AggregateTable {
    /// Row labels.
    #[must_use]
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Column labels.
    #[must_use]
    pub fn funds(&self) -> &[FundName] {
        &self.funds
    }

    /// Cell value, `None` if the fund did not report the field.
    #[must_use]
    pub fn get(&self, field: &str, fund: &str) -> Option<f64> {
        let row = self.fields.iter().position(|f| f == field)?;
        let col = self.funds.iter().position(|f| f.as_str() == fund)?;
        self.cells[col][row]
    }

    /// Convert to a data frame with a leading `field` column.
    ///
    /// # Errors
    /// Returns `PolarsError` if two funds share a name.
    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let mut columns = Vec::with_capacity(self.funds.len() + 1);
        columns.push(Column::new(FIELD_COLUMN.into(), self.fields.clone()));
        for (fund, cells) in self.funds.iter().zip(&self.cells) {
            columns.push(Column::new(fund.as_str().into(), cells.clone()));
        }
        DataFrame::new(columns)
    }

    /// Write as CSV with a header row.
    ///
    /// # Errors
    /// Returns `PipelineError::Io` if the file cannot be created and
    /// `PipelineError::Polars` if serialization fails.
    pub fn write_csv(&self, path: &Path) -> Result<(), PipelineError> {
        let mut frame = self.to_dataframe()?;
        let mut file = File::create(path).map_err(|e| PipelineError::io(path, e))?;
        CsvWriter::new(&mut file).include_header(true).finish(&mut frame)?;
        debug!(path = %path.display(), shape = ?frame.shape(), "wrote aggregate table");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use greenbond_math::describe;
    use greenbond_primitives::RegressionFit;
    use ndarray::array;
    use tempfile::TempDir;

    use super::*;

    struct Params(Vec<(&'static str, f64)>);

    impl TableRow for Params {
        type Source = Self;

        fn fields(source: &Self) -> Vec<(String, f64)> {
            source.0.iter().map(|(n, v)| ((*n).to_string(), *v)).collect()
        }
    }

    fn regression(fund: &str) -> RegressionResult {
        RegressionResult {
            fund: FundName::new(fund),
            fit: RegressionFit {
                regressors: vec!["const".into(), "Mkt-RF".into()],
                coefficients: array![0.001, 0.9],
                std_errors: array![0.0005, 0.05],
                t_values: array![2.0, 18.0],
                p_values: array![0.05, 0.0],
                r_squared: 0.8,
                adj_r_squared: 0.79,
                n_obs: 100,
                df_resid: 98,
                log_likelihood: 300.0,
            },
            summary: String::new(),
        }
    }

    #[test]
    fn union_of_fields_in_first_seen_order() {
        let mut builder = AggregateTableBuilder::<Params>::new();
        builder.append(&"B".into(), &Params(vec![("mu", 1.0), ("omega", 2.0)]));
        builder.append(&"A".into(), &Params(vec![("Const", 3.0), ("omega", 4.0)]));
        let table = builder.finalize();

        assert_eq!(table.fields(), ["mu", "omega", "Const"]);
        assert_eq!(table.funds(), [FundName::new("B"), FundName::new("A")]);
        assert_eq!(table.get("omega", "A"), Some(4.0));
        assert_eq!(table.get("mu", "A"), None);
        assert_eq!(table.get("Const", "B"), None);
    }

    #[test]
    fn regression_views() {
        let result = regression("FundA");
        let mut coefs = AggregateTableBuilder::<RegressionCoefficients>::new();
        let mut pvalues = AggregateTableBuilder::<RegressionPValues>::new();
        coefs.append(&result.fund, &result);
        pvalues.append(&result.fund, &result);

        let coefs = coefs.finalize();
        let pvalues = pvalues.finalize();
        assert_eq!(coefs.fields(), ["const", "Mkt-RF"]);
        assert_eq!(coefs.get("Mkt-RF", "FundA"), Some(0.9));
        assert_eq!(pvalues.get("const", "FundA"), Some(0.05));
    }

    #[test]
    fn stats_table_layout() {
        let mut builder = AggregateTableBuilder::<DescriptiveStats>::new();
        builder.append(&"FundA".into(), &describe(&[1.0, 2.0, 3.0]));
        let frame = builder.finalize().to_dataframe().unwrap();

        assert_eq!(frame.shape(), (8, 2));
        let names: Vec<String> = frame.get_column_names().iter().map(|n| n.to_string()).collect();
        assert_eq!(names, ["field", "FundA"]);
    }

    #[test]
    fn writes_csv_with_empty_missing_cells() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("table.csv");

        let mut builder = AggregateTableBuilder::<Params>::new();
        builder.append(&"FundA".into(), &Params(vec![("x", 1.5)]));
        builder.append(&"FundB".into(), &Params(vec![("y", 2.5)]));
        builder.finalize().write_csv(&path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, ["field,FundA,FundB", "x,1.5,", "y,,2.5"]);
    }

    #[test]
    fn empty_builder_has_only_the_field_column() {
        let table = AggregateTableBuilder::<Params>::new().finalize();
        let frame = table.to_dataframe().unwrap();
        assert_eq!(frame.shape(), (0, 1));
    }

    #[test]
    fn write_to_missing_directory_is_io() {
        let table = AggregateTableBuilder::<Params>::new().finalize();
        let err = table.write_csv(Path::new("/definitely/not/here/t.csv")).unwrap_err();
        assert!(matches!(err, PipelineError::Io { .. }));
    }
}
