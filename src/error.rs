use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("Please choose at least one JSON file")]
    NoFiles,

    #[error("Invalid date \"{input}\" (expected YYYYMMDD or YYYY-MM-DD)")]
    InvalidDate { input: String },

    #[error("Invalid timezone: {input}")]
    InvalidTimezone { input: String },

    #[error("Unsupported locale: {input}")]
    UnsupportedLocale { input: String },

    #[error("{0}")]
    Jq(#[from] JqError),
}

/// Failure to turn one file into events. Never fatal for the batch.
#[derive(Debug, Error)]
pub(crate) enum IngestError {
    #[error("Failed to read {file}: {source}")]
    Read {
        file: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON format in file: {file} ({source})")]
    Parse {
        file: String,
        #[source]
        source: ParseError,
    },
}

impl IngestError {
    pub(crate) fn file(&self) -> &str {
        match self {
            IngestError::Read { file, .. } | IngestError::Parse { file, .. } => file,
        }
    }
}

#[derive(Debug, Error)]
pub(crate) enum ParseError {
    #[error("{0}")]
    Json(#[from] serde_json::Error),

    #[error("expected a JSON array of listening records")]
    NotArray,
}

#[derive(Debug, Error)]
pub(crate) enum JqError {
    #[error("jq not found. Please install jq to use --jq option.")]
    NotFound,

    #[error("Failed to run jq: {0}")]
    Spawn(std::io::Error),

    #[error("Failed to write to jq stdin: {0}")]
    Stdin(std::io::Error),

    #[error("Failed to wait for jq: {0}")]
    Wait(std::io::Error),

    #[error("Invalid UTF-8 from jq: {0}")]
    Utf8(std::string::FromUtf8Error),

    #[error("jq error: {0}")]
    Filter(String),
}
