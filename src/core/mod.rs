pub mod constants;
pub mod error;
pub mod format;
pub mod peaks;
pub mod reader;
pub mod sensor;
pub mod waveform;
