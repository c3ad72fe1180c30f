use thiserror::Error;

/// Ways a source table can violate the salary schema.
#[derive(Debug, Error, PartialEq)]
pub enum DatasetError {
    #[error("missing required column '{0}'")]
    MissingColumn(String),

    #[error("row {row}, column '{column}': invalid value '{value}'")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },

    #[error("unsupported data source: {0}")]
    UnsupportedSource(String),

    #[error("column '{column}' has unsupported type {data_type}")]
    UnsupportedColumnType { column: String, data_type: String },
}
