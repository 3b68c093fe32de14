//! Single-column dataset loading.

use crate::core::TimeSeries;
use crate::error::{LoadError, Result};
use chrono::NaiveDate;
use log::debug;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Reference monthly milk production (pounds per cow), 168 months.
const REFERENCE_CSV: &str = include_str!("../../data/monthly-milk-production.csv");

/// Raw observations read once from a static source.
///
/// The dataset is immutable; every pipeline run derives a fresh
/// [`TimeSeries`] from it with [`Dataset::to_series`].
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    values: Vec<f64>,
    source: String,
}

impl Dataset {
    /// Parse a header-less CSV whose first column holds the observations.
    pub fn from_reader<R: Read>(reader: R, source: impl Into<String>) -> Result<Self> {
        let source = source.into();
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut values = Vec::new();
        for (row, record) in csv_reader.records().enumerate() {
            let record = record.map_err(|e| LoadError::Io {
                source_name: source.clone(),
                message: e.to_string(),
            })?;
            let field = record.get(0).unwrap_or("");
            let value: f64 = field.parse().map_err(|_| LoadError::NonNumeric {
                row,
                value: field.to_string(),
            })?;
            if !value.is_finite() || value < 0.0 {
                return Err(LoadError::InvalidValue { row, value }.into());
            }
            values.push(value);
        }

        if values.is_empty() {
            return Err(LoadError::Empty.into());
        }

        debug!("loaded {} observations from {}", values.len(), source);
        Ok(Self { values, source })
    }

    /// Read a dataset from a file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| LoadError::Io {
            source_name: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_reader(file, path.display().to_string())
    }

    /// The embedded reference dataset.
    pub fn reference() -> Result<Self> {
        Self::from_reader(REFERENCE_CSV.as_bytes(), "embedded reference dataset")
    }

    /// Wrap already-parsed values.
    pub fn from_values(values: Vec<f64>, source: impl Into<String>) -> Result<Self> {
        if values.is_empty() {
            return Err(LoadError::Empty.into());
        }
        if let Some((row, &value)) = values
            .iter()
            .enumerate()
            .find(|(_, v)| !v.is_finite() || **v < 0.0)
        {
            return Err(LoadError::InvalidValue { row, value }.into());
        }
        Ok(Self {
            values,
            source: source.into(),
        })
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Where the values came from (path or description).
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Stamp row *i* at the month-end of `anchor + i` months.
    pub fn to_series(&self, anchor: NaiveDate) -> Result<TimeSeries> {
        let mut series = TimeSeries::monthly(anchor, self.values.clone())?;
        series.set_label("production");
        Ok(series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ForecastError;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn reference_dataset_has_fourteen_years() {
        let data = Dataset::reference().unwrap();
        assert_eq!(data.len(), 168);
        assert_eq!(data.values()[0], 589.0);
        assert_eq!(data.values()[167], 843.0);
    }

    #[test]
    fn parses_single_column_without_header() {
        let csv = "1.5\n 2 \n\n3\n";
        let data = Dataset::from_reader(csv.as_bytes(), "inline").unwrap();
        assert_eq!(data.values(), &[1.5, 2.0, 3.0]);
        assert_eq!(data.source(), "inline");
    }

    #[test]
    fn takes_first_column_only() {
        let csv = "10,a\n20,b\n";
        let data = Dataset::from_reader(csv.as_bytes(), "inline").unwrap();
        assert_eq!(data.values(), &[10.0, 20.0]);
    }

    #[test]
    fn empty_input_is_load_error() {
        let result = Dataset::from_reader("".as_bytes(), "inline");
        assert_eq!(result, Err(ForecastError::Load(LoadError::Empty)));
    }

    #[test]
    fn text_input_is_load_error() {
        let result = Dataset::from_reader("month\nproduction\n".as_bytes(), "inline");
        assert!(matches!(
            result,
            Err(ForecastError::Load(LoadError::NonNumeric { row: 0, .. }))
        ));
    }

    #[test]
    fn negative_input_is_load_error() {
        let result = Dataset::from_reader("1\n-2\n".as_bytes(), "inline");
        assert!(matches!(
            result,
            Err(ForecastError::Load(LoadError::InvalidValue { row: 1, .. }))
        ));
    }

    #[test]
    fn missing_file_is_load_error() {
        let result = Dataset::from_path("/definitely/not/here.csv");
        assert!(matches!(
            result,
            Err(ForecastError::Load(LoadError::Io { .. }))
        ));
    }

    #[test]
    fn from_values_validates() {
        assert!(Dataset::from_values(vec![], "v").is_err());
        assert!(Dataset::from_values(vec![1.0, f64::INFINITY], "v").is_err());
        assert_eq!(Dataset::from_values(vec![1.0], "v").unwrap().len(), 1);
    }

    #[test]
    fn to_series_stamps_month_ends() {
        let data = Dataset::from_values(vec![1.0, 2.0, 3.0], "v").unwrap();
        let series = data.to_series(date(2024, 5, 1)).unwrap();

        assert_eq!(series.len(), 3);
        assert_eq!(series.first_timestamp(), Some(date(2024, 5, 31)));
        assert_eq!(series.last_timestamp(), Some(date(2024, 7, 31)));
        assert_eq!(series.label(), "production");
    }
}
