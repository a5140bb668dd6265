//! CSV-based historical dataset loader
//!
//! Expected columns: `Year,Stocks,Bonds,Cash,Inflation` with returns as
//! decimals (0.26 = 26%).

use std::path::Path;

use crate::error::DatasetError;

use super::{HistoricalDataset, HistoricalYear};

/// Default path to the historical returns file
pub const DEFAULT_HISTORY_PATH: &str = "data/historical_returns.csv";

/// Raw CSV row matching the historical_returns.csv columns
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(rename = "Year")]
    year: u16,
    #[serde(rename = "Stocks")]
    stocks: f64,
    #[serde(rename = "Bonds")]
    bonds: f64,
    #[serde(rename = "Cash")]
    cash: f64,
    #[serde(rename = "Inflation")]
    inflation: f64,
}

impl From<CsvRow> for HistoricalYear {
    fn from(row: CsvRow) -> Self {
        HistoricalYear {
            year: row.year,
            stocks: row.stocks,
            bonds: row.bonds,
            cash: row.cash,
            inflation: row.inflation,
        }
    }
}

/// Load a historical dataset from a CSV file
pub fn load_history<P: AsRef<Path>>(path: P) -> Result<HistoricalDataset, DatasetError> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut years = Vec::new();

    for result in reader.deserialize() {
        let row: CsvRow = result?;
        years.push(HistoricalYear::from(row));
    }

    if years.is_empty() {
        return Err(DatasetError::Empty);
    }

    log::debug!(
        "loaded {} historical years ({}-{})",
        years.len(),
        years.first().map(|y| y.year).unwrap_or(0),
        years.last().map(|y| y.year).unwrap_or(0),
    );

    Ok(HistoricalDataset::new(years))
}

/// Load a historical dataset from any reader (string buffer, network stream, ...)
pub fn load_history_from_reader<R: std::io::Read>(
    reader: R,
) -> Result<HistoricalDataset, DatasetError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut years = Vec::new();

    for result in csv_reader.deserialize() {
        let row: CsvRow = result?;
        years.push(HistoricalYear::from(row));
    }

    if years.is_empty() {
        return Err(DatasetError::Empty);
    }

    Ok(HistoricalDataset::new(years))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_load_from_reader() {
        let csv = "Year,Stocks,Bonds,Cash,Inflation\n\
                   1995,0.3720,0.2348,0.0549,0.0250\n\
                   1996,0.2268,0.0143,0.0501,0.0330\n";
        let dataset = load_history_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.year_at(0).year, 1995);
        assert_relative_eq!(dataset.year_at(1).stocks, 0.2268);
    }

    #[test]
    fn test_empty_file_rejected() {
        let csv = "Year,Stocks,Bonds,Cash,Inflation\n";
        let result = load_history_from_reader(csv.as_bytes());
        assert!(matches!(result, Err(DatasetError::Empty)));
    }

    #[test]
    fn test_malformed_row_rejected() {
        let csv = "Year,Stocks,Bonds,Cash,Inflation\n1995,not_a_number,0.2,0.05,0.02\n";
        let result = load_history_from_reader(csv.as_bytes());
        assert!(matches!(result, Err(DatasetError::Csv(_))));
    }

    #[test]
    fn test_missing_file_is_io_or_csv_error() {
        let result = load_history("does/not/exist.csv");
        assert!(result.is_err());
    }
}
