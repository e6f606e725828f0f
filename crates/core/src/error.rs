use guia_render::RenderError;
use std::path::PathBuf;

/// Failures while loading the asset table. All of them are fatal at start-up.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to open source table {path}: {source}", path = path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse source table: {0}")]
    Csv(#[from] csv::Error),
    #[error("source table is missing column {0:?}")]
    MissingColumn(String),
    #[error("invalid monetary value {value:?} on row {row}")]
    InvalidValue { row: usize, value: String },
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[derive(Debug, thiserror::Error)]
pub enum GuideError {
    #[error("missing required field: {0}")]
    Validation(String),
    #[error("no asset matched the submitted identifiers")]
    NotFound,
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("failed to render guide: {0}")]
    Render(#[from] RenderError),
    #[error("failed to load source table: {0}")]
    Store(#[from] StoreError),
    #[error("failed to create output directory: {0}")]
    OutputDirCreation(std::io::Error),
    #[error("failed to write guide file: {0}")]
    OutputWrite(std::io::Error),
}

pub type GuideResult<T> = std::result::Result<T, GuideError>;
