use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("failed to load dataset {}: {reason}", path.display())]
    DataLoad { path: PathBuf, reason: String },

    #[error("dataset {} is missing required column `{column}`", path.display())]
    MissingColumn { path: PathBuf, column: String },

    #[error("unknown metric `{0}`")]
    UnknownMetric(String),

    #[error("dataset already installed")]
    DatasetAlreadyInstalled,

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
}

pub type Result<T> = std::result::Result<T, DashboardError>;
