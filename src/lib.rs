// Field-recording ingestion: waveforms, positioned sensors and dispersion peaks
// Main library entry point

pub mod core;
pub mod models;
pub mod utils;

// Re-export main types
pub use crate::core::error::{IngestError, Result};
pub use crate::core::format::{AcquisitionInfo, HeaderConvention, RecorderFormat, Seg2Header, SuTraceHeader, Trace};
pub use crate::core::peaks::{CandidatePattern, PeakPattern, PeakRecord};
pub use crate::core::reader::ReportReader;
pub use crate::core::sensor::{PositionedSensor, SensorDefaults, SensorSnapshot};
pub use crate::core::waveform::{SensorAttribute, Waveform, WaveformSnapshot};
pub use crate::models::ingest_config::IngestConfig;
