// Error handling for the ingestion layer

use thiserror::Error;

pub type Result<T> = std::result::Result<T, IngestError>;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid input type: {0}")]
    InvalidInputType(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Length of two waveforms must be the same: expected {expected}, got {got}")]
    LengthMismatch { expected: usize, got: usize },

    #[error("Resolution unsupported: {sample_count} samples exceed {required} x {max_multiple}")]
    ResolutionUnsupported {
        sample_count: usize,
        required: usize,
        max_multiple: usize,
    },

    #[error("Trace type could not be identified")]
    UnidentifiedTrace,

    #[error("Recorder format not implemented: {0}")]
    NotImplemented(String),

    #[error("Missing {0} header block")]
    MissingHeader(&'static str),

    #[error("Header field {field} could not be parsed: {value:?}")]
    HeaderParse { field: String, value: String },

    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Peak count mismatch: {candidates} candidate lines, {parsed} parsed")]
    PeakCountMismatch { candidates: usize, parsed: usize },

    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),
}
