// In crates/app-config/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to load configuration")]
    LoadError(#[from] config::ConfigError),

    #[error("Failed to parse CSV: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Column {0} not found")]
    MissingColumn(String),

    #[error("No symbols found in ticker list")]
    NoSymbols,
}

pub type Result<T> = std::result::Result<T, Error>;
