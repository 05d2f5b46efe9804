// Error types for the offer catalog, the dataset loader and update batches

use std::path::PathBuf;
use thiserror::Error;

// Failures raised by search and update operations on the catalog
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("City name does not exist in database: {0}")]
    CityNotFound(String),

    #[error("Date must be given in 'yyyyMMdd' format: {field}={value:?}")]
    InvalidDate { field: &'static str, value: String },

    #[error("Validation failed for {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    #[error("Unknown {kind} id {id}")]
    UnknownReference { kind: &'static str, id: i32 },

    // The store references an entity it does not hold. Never caused by input.
    #[error("Store inconsistency: {0}")]
    Inconsistency(String),
}

impl CatalogError {
    // True for conditions the caller can fix by correcting the request
    pub fn is_client_error(&self) -> bool {
        !matches!(self, CatalogError::Inconsistency(_))
    }
}

// First failing item of an update batch
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("update #{index} rejected after {applied} applied: {cause}")]
pub struct BatchError {
    pub index: usize,
    pub applied: usize,
    // How many of the applied items replaced an existing offer
    pub replaced: usize,
    #[source]
    pub cause: CatalogError,
}

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV parse error in {file}: {source}")]
    Parse {
        file: String,
        #[source]
        source: csv::Error,
    },

    #[error("Invalid record #{index} in {file}: {source}")]
    InvalidRecord {
        file: String,
        index: usize,
        #[source]
        source: CatalogError,
    },
}
