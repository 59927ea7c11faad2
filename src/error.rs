//! Ошибки подготовки данных

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PrepError>;

#[derive(Debug, Error)]
pub enum PrepError {
    // Входные данные
    #[error("failed to read {path:?}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("record {line} in {path:?} has {found} fields, expected {expected}")]
    FieldCount {
        path: PathBuf,
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("input file {0:?} contains no records")]
    EmptyInput(PathBuf),

    #[error("unknown column '{0}'")]
    MissingColumn(String),

    // Статистические предусловия
    #[error("train size {0} must be strictly between 0 and 1")]
    InvalidTrainSize(f64),

    #[error("cannot stratify: {0}")]
    Stratification(String),

    #[error("no numeric columns to standardize")]
    NoNumericColumns,

    #[error("empty dataset")]
    EmptyDataset,

    #[error("transformer is not fitted")]
    NotFitted,

    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),

    // Запись результатов
    #[error("output directory {0:?} does not exist or is not a directory")]
    OutputDir(PathBuf),

    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to (de)serialize transformer at {path:?}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: bincode::Error,
    },
}
