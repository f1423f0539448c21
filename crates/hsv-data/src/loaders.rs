use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use hsv_types::{DataError, HsvResult, Observation, TimeSeries};

/// Date formats tried after the configured one
const FALLBACK_DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%d-%m-%Y"];

/// Header names accepted as the date column when the configured one is absent
const DATE_COLUMN_ALIASES: [&str; 4] = ["date", "timestamp", "datetime", "time"];

/// Named time series read from one delimited table, in column order
#[derive(Debug, Clone, Default)]
pub struct SeriesTable {
    columns: Vec<String>,
    series: BTreeMap<String, TimeSeries>,
}

impl SeriesTable {
    pub fn get(&self, column: &str) -> Option<&TimeSeries> {
        self.series.get(column)
    }

    /// Look up a column, failing with [`DataError::ColumnNotFound`].
    pub fn column(&self, column: &str) -> HsvResult<&TimeSeries> {
        self.series.get(column).ok_or_else(|| {
            DataError::ColumnNotFound {
                column: column.to_string(),
            }
            .into()
        })
    }

    /// Instrument column names in file order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn into_series(mut self, column: &str) -> HsvResult<TimeSeries> {
        self.series.remove(column).ok_or_else(|| {
            DataError::ColumnNotFound {
                column: column.to_string(),
            }
            .into()
        })
    }
}

/// Reads delimited text with one date column and one column per instrument
#[derive(Debug, Clone)]
pub struct SeriesLoader {
    delimiter: u8,
    date_column: String,
    date_format: String,
}

impl Default for SeriesLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl SeriesLoader {
    /// Tab-delimited, `date` column, day-first dates.
    pub fn new() -> Self {
        Self {
            delimiter: b'\t',
            date_column: "date".to_string(),
            date_format: "%d/%m/%Y".to_string(),
        }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_date_column(mut self, date_column: &str) -> Self {
        self.date_column = date_column.to_string();
        self
    }

    pub fn with_date_format(mut self, date_format: &str) -> Self {
        self.date_format = date_format.to_string();
        self
    }

    /// Load every instrument column of a file.
    pub fn load_table<P: AsRef<Path>>(&self, file_path: P) -> HsvResult<SeriesTable> {
        let path = file_path.as_ref();
        tracing::info!("Loading series table from: {}", path.display());

        if !path.exists() {
            return Err(DataError::SourceNotFound(path.display().to_string()).into());
        }

        let file = std::fs::File::open(path)?;
        let table = self.load_table_from_reader(file)?;

        tracing::info!(
            "Loaded {} series from {}",
            table.len(),
            path.display()
        );
        Ok(table)
    }

    /// Load a single instrument column of a file.
    pub fn load_series<P: AsRef<Path>>(&self, file_path: P, column: &str) -> HsvResult<TimeSeries> {
        self.load_table(file_path)?.into_series(column)
    }

    pub fn load_table_from_reader<R: Read>(&self, reader: R) -> HsvResult<SeriesTable> {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = rdr
            .headers()
            .map_err(|e| DataError::LoadingFailed {
                message: format!("Failed to read headers: {}", e),
            })?
            .clone();
        tracing::debug!("Series headers: {:?}", headers);

        let date_idx = self.detect_date_column(&headers)?;
        let columns: Vec<(usize, String)> = headers
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != date_idx)
            .map(|(i, name)| (i, name.to_string()))
            .collect();

        if columns.is_empty() {
            return Err(DataError::InvalidFormat {
                message: "No instrument columns next to the date column".to_string(),
            }
            .into());
        }

        let mut series: BTreeMap<String, TimeSeries> = columns
            .iter()
            .map(|(_, name)| (name.clone(), TimeSeries::new(name)))
            .collect();

        for (line_num, result) in rdr.records().enumerate() {
            // header occupies line 1
            let line = line_num + 2;
            let record = result.map_err(|e| DataError::LoadingFailed {
                message: format!("Failed to read record at line {}: {}", line, e),
            })?;

            let date = self.parse_date(record.get(date_idx).unwrap_or(""), line)?;

            for (idx, name) in &columns {
                let cell = record.get(*idx).unwrap_or("");
                if cell.is_empty() {
                    tracing::warn!("Skipping empty {} value at line {}", name, line);
                    continue;
                }
                let value = Self::parse_value(cell, name, line)?;
                if let Some(target) = series.get_mut(name) {
                    target.push(Observation::new(date, value))?;
                }
            }
        }

        Ok(SeriesTable {
            columns: columns.into_iter().map(|(_, name)| name).collect(),
            series,
        })
    }

    fn detect_date_column(&self, headers: &csv::StringRecord) -> HsvResult<usize> {
        let configured = self.date_column.to_lowercase();
        let find = |wanted: &str| headers.iter().position(|h| h.to_lowercase() == wanted);

        find(configured.as_str())
            .or_else(|| DATE_COLUMN_ALIASES.iter().find_map(|alias| find(*alias)))
            .ok_or_else(|| {
                DataError::ColumnNotFound {
                    column: self.date_column.clone(),
                }
                .into()
            })
    }

    fn parse_date(&self, date_str: &str, line: usize) -> HsvResult<NaiveDate> {
        std::iter::once(self.date_format.as_str())
            .chain(FALLBACK_DATE_FORMATS)
            .find_map(|format| NaiveDate::parse_from_str(date_str, format).ok())
            .ok_or_else(|| {
                DataError::ParseError {
                    message: format!("Could not parse date '{}' at line {}", date_str, line),
                }
                .into()
            })
    }

    fn parse_value(value_str: &str, column: &str, line: usize) -> HsvResult<f64> {
        let value = value_str.parse::<f64>().map_err(|e| DataError::ParseError {
            message: format!(
                "Could not parse {} value '{}' at line {}: {}",
                column, value_str, line, e
            ),
        })?;
        if !value.is_finite() {
            return Err(DataError::ParseError {
                message: format!("Non-finite {} value '{}' at line {}", column, value_str, line),
            }
            .into());
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hsv_types::HsvError;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_tab_file_loading() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "date\tccy-1\tccy-2").unwrap();
        writeln!(temp_file, "04/01/2021\t1.3612\t0.7421").unwrap();
        writeln!(temp_file, "01/01/2021\t1.3500\t0.7390").unwrap();
        writeln!(temp_file, "31/12/2020\t1.3480\t0.7402").unwrap();
        temp_file.flush().unwrap();

        let table = SeriesLoader::new().load_table(temp_file.path()).unwrap();
        assert_eq!(table.columns(), &["ccy-1".to_string(), "ccy-2".to_string()]);

        let ccy1 = table.column("ccy-1").unwrap();
        assert_eq!(ccy1.len(), 3);
        // newest-first input comes out chronological
        assert_eq!(ccy1.first_date(), Some(day(2020, 12, 31)));
        assert_eq!(ccy1.last_date(), Some(day(2021, 1, 4)));
        assert_eq!(ccy1.get(&day(2021, 1, 1)), Some(1.35));

        let ccy2 = table.column("ccy-2").unwrap();
        assert_eq!(ccy2.get(&day(2021, 1, 4)), Some(0.7421));
    }

    #[test]
    fn test_load_single_series() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "date\tccy-1\tccy-2").unwrap();
        writeln!(temp_file, "01/02/2021\t1.0\t2.0").unwrap();
        temp_file.flush().unwrap();

        let series = SeriesLoader::new().load_series(temp_file.path(), "ccy-2").unwrap();
        assert_eq!(series.name, "ccy-2");
        assert_eq!(series.get(&day(2021, 2, 1)), Some(2.0));

        let missing = SeriesLoader::new().load_series(temp_file.path(), "ccy-3");
        assert!(matches!(
            missing,
            Err(HsvError::Data(DataError::ColumnNotFound { .. }))
        ));
    }

    #[test]
    fn test_comma_delimited_iso_dates() {
        let data = "Date,EURUSD\n2021-03-01,1.21\n2021-03-02,1.20\n";
        let table = SeriesLoader::new()
            .with_delimiter(b',')
            .load_table_from_reader(data.as_bytes())
            .unwrap();

        let series = table.column("EURUSD").unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.get(&day(2021, 3, 2)), Some(1.20));
    }

    #[test]
    fn test_custom_date_column_and_format() {
        let data = "as_of;px\n03.01.2022;10.5\n04.01.2022;10.7\n";
        let table = SeriesLoader::new()
            .with_delimiter(b';')
            .with_date_column("as_of")
            .with_date_format("%d.%m.%Y")
            .load_table_from_reader(data.as_bytes())
            .unwrap();

        assert_eq!(table.column("px").unwrap().first_date(), Some(day(2022, 1, 3)));
    }

    #[test]
    fn test_empty_cells_are_skipped_per_column() {
        let data = "date\ta\tb\n01/01/2021\t1.0\t\n02/01/2021\t1.1\t2.0\n";
        let table = SeriesLoader::new().load_table_from_reader(data.as_bytes()).unwrap();

        assert_eq!(table.column("a").unwrap().len(), 2);
        assert_eq!(table.column("b").unwrap().len(), 1);
    }

    #[test]
    fn test_duplicate_dates_are_rejected() {
        let data = "date\ta\n01/01/2021\t1.0\n01/01/2021\t1.1\n";
        let result = SeriesLoader::new().load_table_from_reader(data.as_bytes());

        match result {
            Err(HsvError::Data(DataError::DuplicateDate { series, date })) => {
                assert_eq!(series, "a");
                assert_eq!(date, day(2021, 1, 1));
            }
            other => panic!("Expected DuplicateDate error, got: {:?}", other),
        }
    }

    #[test]
    fn test_unparseable_value_reports_line() {
        let data = "date\ta\n01/01/2021\t1.0\n02/01/2021\tn/a-x\n";
        match SeriesLoader::new().load_table_from_reader(data.as_bytes()) {
            Err(HsvError::Data(DataError::ParseError { message })) => {
                assert!(message.contains("line 3"), "message = {message}");
            }
            other => panic!("Expected ParseError, got: {:?}", other),
        }
    }

    #[test]
    fn test_non_finite_values_are_rejected() {
        for cell in ["inf", "-inf", "NaN", "infinity"] {
            let data = format!("date\ta\n01/01/2021\t1.0\n02/01/2021\t{cell}\n");
            match SeriesLoader::new().load_table_from_reader(data.as_bytes()) {
                Err(HsvError::Data(DataError::ParseError { message })) => {
                    assert!(message.contains("Non-finite"), "message = {message}");
                    assert!(message.contains("line 3"), "message = {message}");
                }
                other => panic!("Expected ParseError for '{cell}', got: {:?}", other),
            }
        }
    }

    #[test]
    fn test_unparseable_date() {
        let data = "date\ta\nyesterday\t1.0\n";
        let result = SeriesLoader::new().load_table_from_reader(data.as_bytes());
        assert!(matches!(result, Err(HsvError::Data(DataError::ParseError { .. }))));
    }

    #[test]
    fn test_missing_date_column() {
        let data = "when\ta\n01/01/2021\t1.0\n";
        let result = SeriesLoader::new().load_table_from_reader(data.as_bytes());
        assert!(matches!(
            result,
            Err(HsvError::Data(DataError::ColumnNotFound { .. }))
        ));
    }

    #[test]
    fn test_table_without_instruments() {
        let data = "date\n01/01/2021\n";
        let result = SeriesLoader::new().load_table_from_reader(data.as_bytes());
        assert!(matches!(
            result,
            Err(HsvError::Data(DataError::InvalidFormat { .. }))
        ));
    }

    #[test]
    fn test_nonexistent_file() {
        let result = SeriesLoader::new().load_table("/path/that/does/not/exist.txt");
        match result {
            Err(HsvError::Data(DataError::SourceNotFound(_))) => (),
            other => panic!("Expected SourceNotFound error, got: {:?}", other),
        }
    }
}
