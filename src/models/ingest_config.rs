use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Frequency step, in Hz, that waveforms are zero-padded to.
    pub target_df: f64,
    pub wavetype: String,
    pub read_header: bool,
    /// Cross-check parsed peaks against the candidate line count.
    pub check_peak_count: bool,
    pub log_level: String,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            target_df: 0.2,
            wavetype: "rayleigh".to_string(),
            read_header: true,
            check_peak_count: true,
            log_level: "info".to_string(),
        }
    }
}
