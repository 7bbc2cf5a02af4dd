use std::fs;
use std::path::Path;
use std::sync::OnceLock;
use tracing::info;

use crate::core::error::{IngestError, Result};
use crate::models::ingest_config::IngestConfig;

static CONFIG_CACHE: OnceLock<IngestConfig> = OnceLock::new();

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<IngestConfig> {
    let data = fs::read_to_string(path.as_ref())?;
    let config: IngestConfig = serde_json::from_str(&data)?;

    if !(config.target_df.is_finite() && config.target_df > 0.0) {
        return Err(IngestError::InvalidArgument(format!(
            "target_df must be positive, not {}",
            config.target_df
        )));
    }

    Ok(config)
}

/// Load `path` once and keep it for the rest of the process.
pub fn init_config<P: AsRef<Path>>(path: P) -> Result<&'static IngestConfig> {
    if let Some(config) = CONFIG_CACHE.get() {
        return Ok(config);
    }

    let config = load_config(path.as_ref())?;
    info!(
        "Config initialized from {}: df = {}, wavetype = {}",
        path.as_ref().display(),
        config.target_df,
        config.wavetype
    );
    Ok(CONFIG_CACHE.get_or_init(|| config))
}

pub fn get_cached_config() -> Option<&'static IngestConfig> {
    CONFIG_CACHE.get()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_partial_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"target_df": 0.5, "wavetype": "love"}}"#).unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.target_df, 0.5);
        assert_eq!(config.wavetype, "love");
        assert!(config.read_header);
        assert!(config.check_peak_count);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_load_rejects_bad_df() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"target_df": -1.0}}"#).unwrap();

        assert!(matches!(
            load_config(file.path()),
            Err(IngestError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_load_malformed_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "target_df = 0.2").unwrap();

        assert!(matches!(load_config(file.path()), Err(IngestError::Config(_))));
    }

    #[test]
    fn test_init_caches_first_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{}}").unwrap();

        let first = init_config(file.path()).unwrap();
        let again = init_config("ignored/path.json").unwrap();
        assert!(std::ptr::eq(first, again));
        assert!(get_cached_config().is_some());
    }
}
