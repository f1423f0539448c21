use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use hsv_types::{DataError, HsvResult};

use crate::loaders::{SeriesLoader, SeriesTable};

/// Location and layout of a delimited series file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesSource {
    pub path: PathBuf,
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
    #[serde(default = "default_date_column")]
    pub date_column: String,
    #[serde(default = "default_date_format")]
    pub date_format: String,
}

fn default_delimiter() -> char {
    '\t'
}

fn default_date_column() -> String {
    "date".to_string()
}

fn default_date_format() -> String {
    "%d/%m/%Y".to_string()
}

impl SeriesSource {
    /// Tab-delimited file with day-first dates.
    pub fn tab_delimited(path: &str) -> Self {
        Self {
            path: PathBuf::from(path),
            delimiter: default_delimiter(),
            date_column: default_date_column(),
            date_format: default_date_format(),
        }
    }

    pub fn csv(path: &str) -> Self {
        Self {
            delimiter: ',',
            date_format: "%Y-%m-%d".to_string(),
            ..Self::tab_delimited(path)
        }
    }

    pub fn loader(&self) -> HsvResult<SeriesLoader> {
        if !self.delimiter.is_ascii() {
            return Err(DataError::InvalidFormat {
                message: format!("Delimiter {:?} is not a single-byte character", self.delimiter),
            }
            .into());
        }

        Ok(SeriesLoader::new()
            .with_delimiter(self.delimiter as u8)
            .with_date_column(&self.date_column)
            .with_date_format(&self.date_format))
    }

    pub fn load(&self) -> HsvResult<SeriesTable> {
        self.loader()?.load_table(&self.path)
    }
}
