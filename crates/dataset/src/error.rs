use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Failed to open dataset file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read dataset header row: {0}")]
    Header(#[from] csv::Error),

    #[error("Dataset is missing required column '{0}'")]
    MissingColumn(String),

    #[error("Malformed record at line {line}: {source}")]
    Malformed {
        line: u64,
        #[source]
        source: csv::Error,
    },

    #[error(
        "Unparseable date '{value}' in column '{column}' at line {line} (expected YYYY-MM-DD or MM/DD/YYYY)"
    )]
    InvalidDate {
        line: u64,
        column: &'static str,
        value: String,
    },
}
