//! CSV export of a price history.

use std::path::Path;

use tickerscope_core::HistoricalSeries;

use crate::error::CliError;

/// Write `date,open,high,low,close,volume` rows to `path`, replacing any
/// existing file. Returns the number of data rows written.
pub fn write_series_csv(path: &Path, series: &HistoricalSeries) -> Result<usize, CliError> {
    let mut writer = csv::Writer::from_path(path)?;
    for point in series.points() {
        writer.serialize(point)?;
    }
    writer.flush()?;
    Ok(series.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tickerscope_core::PricePoint;
    use time::macros::date;

    #[test]
    fn writes_header_and_iso_dated_rows() {
        let series = HistoricalSeries::new(vec![
            PricePoint::new(date!(2024 - 01 - 02), 10.0, 11.0, 9.5, 10.5, 1200).expect("valid"),
            PricePoint::new(date!(2024 - 01 - 03), 10.5, 12.25, 10.0, 12.0, 0).expect("valid"),
        ])
        .expect("ordered");
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("aapl.csv");

        let rows = write_series_csv(&path, &series).expect("export");

        assert_eq!(rows, 2);
        let written = std::fs::read_to_string(&path).expect("readable");
        let lines = written.lines().collect::<Vec<_>>();
        assert_eq!(lines[0], "date,open,high,low,close,volume");
        assert_eq!(lines[1], "2024-01-02,10.0,11.0,9.5,10.5,1200");
        assert_eq!(lines[2], "2024-01-03,10.5,12.25,10.0,12.0,0");
    }

    #[test]
    fn missing_directory_is_an_io_class_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("missing").join("out.csv");

        let error = write_series_csv(&path, &HistoricalSeries::empty()).expect_err("no such dir");
        assert_eq!(error.exit_code(), 10);
    }
}
