use chrono::NaiveDate;
use thiserror::Error;

/// Main error type for the historical-simulation VaR workspace
#[derive(Error, Debug)]
pub enum HsvError {
    #[error("Data error: {0}")]
    Data(#[from] DataError),

    #[error("VaR error: {0}")]
    Var(#[from] VarError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Errors raised while ingesting or building time series
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Data source not found: {0}")]
    SourceNotFound(String),

    #[error("Column not found: {column}")]
    ColumnNotFound { column: String },

    #[error("Duplicate date {date} in series {series}")]
    DuplicateDate { series: String, date: NaiveDate },

    #[error("Invalid data format: {message}")]
    InvalidFormat { message: String },

    #[error("Data loading failed: {message}")]
    LoadingFailed { message: String },

    #[error("Data parsing error: {message}")]
    ParseError { message: String },
}

/// Errors raised by the VaR pipeline itself
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VarError {
    #[error("Invalid series value{}: earlier={earlier}, later={later} (both must be positive)", date_suffix(.date))]
    InvalidSeriesValue {
        date: Option<NaiveDate>,
        earlier: f64,
        later: f64,
    },

    #[error("Misaligned dates: {message}")]
    MisalignedDates { message: String },

    #[error("Insufficient scenarios: need at least {required}, got {available}")]
    InsufficientScenarios { required: usize, available: usize },

    #[error("Non-finite scenario PnL{}: {value}", date_suffix(.date))]
    NonFiniteScenario { date: Option<NaiveDate>, value: f64 },
}

impl VarError {
    /// Attach the scenario date to an `InvalidSeriesValue` or
    /// `NonFiniteScenario` raised without one.
    pub fn at_date(self, at: NaiveDate) -> Self {
        match self {
            VarError::InvalidSeriesValue {
                date: None,
                earlier,
                later,
            } => VarError::InvalidSeriesValue {
                date: Some(at),
                earlier,
                later,
            },
            VarError::NonFiniteScenario { date: None, value } => VarError::NonFiniteScenario {
                date: Some(at),
                value,
            },
            other => other,
        }
    }
}

fn date_suffix(date: &Option<NaiveDate>) -> String {
    date.map(|d| format!(" at {d}")).unwrap_or_default()
}

/// Result type alias for workspace operations
pub type HsvResult<T> = Result<T, HsvError>;

/// Macro for creating validation errors
#[macro_export]
macro_rules! validation_error {
    ($($arg:tt)*) => {
        $crate::HsvError::Validation(format!($($arg)*))
    };
}

/// Macro for creating configuration errors
#[macro_export]
macro_rules! config_error {
    ($($arg:tt)*) => {
        $crate::HsvError::Config(format!($($arg)*))
    };
}
