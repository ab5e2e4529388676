use std::fmt;

#[derive(Debug, PartialEq)]
pub enum CinderDepositError {
    ConfigError(String),
    DatasetLoadError(String),
    EncodingError(String),
    MissingColumn(String),
    ColumnMappingError(String),
    CsvError(String),
    IOError(String),
    DatabaseError(String),
    InvalidTableName(String),
}

impl CinderDepositError {
    /// Failures of the ingestion side: the dataset could not be turned into a table.
    pub fn is_dataset_load_error(&self) -> bool {
        matches!(
            self,
            CinderDepositError::DatasetLoadError(_)
                | CinderDepositError::EncodingError(_)
                | CinderDepositError::MissingColumn(_)
                | CinderDepositError::ColumnMappingError(_)
                | CinderDepositError::CsvError(_)
        )
    }
}

impl fmt::Display for CinderDepositError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CinderDepositError::ConfigError(msg) => write!(f, "config error: {}", msg),
            CinderDepositError::DatasetLoadError(msg) => write!(f, "dataset load error: {}", msg),
            CinderDepositError::EncodingError(msg) => write!(f, "encoding error: {}", msg),
            CinderDepositError::MissingColumn(column) => {
                write!(f, "required column '{}' is absent from the dataset", column)
            }
            CinderDepositError::ColumnMappingError(msg) => {
                write!(f, "invalid column mapping: {}", msg)
            }
            CinderDepositError::CsvError(msg) => write!(f, "csv error: {}", msg),
            CinderDepositError::IOError(msg) => write!(f, "io error: {}", msg),
            CinderDepositError::DatabaseError(msg) => write!(f, "database error: {}", msg),
            CinderDepositError::InvalidTableName(name) => {
                write!(f, "invalid table name: '{}'", name)
            }
        }
    }
}

impl std::error::Error for CinderDepositError {}

impl From<std::io::Error> for CinderDepositError {
    fn from(error: std::io::Error) -> Self {
        CinderDepositError::IOError(error.to_string())
    }
}

impl From<serde_xml_rs::Error> for CinderDepositError {
    fn from(error: serde_xml_rs::Error) -> Self {
        CinderDepositError::ConfigError(error.to_string())
    }
}

impl From<csv::Error> for CinderDepositError {
    fn from(error: csv::Error) -> Self {
        CinderDepositError::CsvError(error.to_string())
    }
}

impl From<rusqlite::Error> for CinderDepositError {
    fn from(error: rusqlite::Error) -> Self {
        CinderDepositError::DatabaseError(error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CinderDepositError>;
