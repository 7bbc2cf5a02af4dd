// Trace objects and recorder header conventions

use crate::core::constants::*;
use crate::core::error::{IngestError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Raw trace handed over by an external trace-reading library.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Trace {
    pub data: Vec<f64>,
    /// Sample interval in seconds.
    pub delta: f64,
    /// Format tag reported by the reader, e.g. "SEG2" or "SU".
    pub format: Option<String>,
    pub seg2: Option<Seg2Header>,
    pub su: Option<SuTraceHeader>,
}

impl Trace {
    pub fn new(data: Vec<f64>, delta: f64) -> Self {
        Self {
            data,
            delta,
            ..Default::default()
        }
    }

    pub fn with_seg2(mut self, header: Seg2Header) -> Self {
        self.format = Some("SEG2".to_string());
        self.seg2 = Some(header);
        self
    }

    pub fn with_su(mut self, header: SuTraceHeader) -> Self {
        self.format = Some("SU".to_string());
        self.su = Some(header);
        self
    }
}

/// SEG2 trace descriptor strings, keyed by name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Seg2Header {
    pub fields: HashMap<String, String>,
}

impl Seg2Header {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, key: &str, value: impl Into<String>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    fn get(&self, key: &str) -> Result<&str> {
        self.fields
            .get(key)
            .map(|v| v.trim())
            .ok_or_else(|| IngestError::HeaderParse {
                field: key.to_string(),
                value: String::new(),
            })
    }

    fn parse<T: std::str::FromStr>(&self, key: &str) -> Result<T> {
        let raw = self.get(key)?;
        raw.parse().map_err(|_| IngestError::HeaderParse {
            field: key.to_string(),
            value: raw.to_string(),
        })
    }
}

/// The subset of the SU trace header used for acquisition geometry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SuTraceHeader {
    /// Zero-based: a single shot is stored as 0.
    pub number_of_horizontally_stacked_traces_yielding_this_trace: i32,
    pub delay_recording_time: i32,
    /// Thousandths of a meter.
    pub group_coordinate_x: i32,
    /// Thousandths of a meter.
    pub group_coordinate_y: i32,
}

/// Acquisition metadata recovered from a header.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AcquisitionInfo {
    pub stack_count: u32,
    pub delay: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// How a recorder convention stores stack count, delay and position.
pub trait HeaderConvention {
    fn stack_count(&self) -> Result<u32>;
    fn delay(&self) -> Result<f64>;
    fn position(&self) -> Result<(f64, f64, f64)>;

    fn acquisition(&self) -> Result<AcquisitionInfo> {
        let (x, y, z) = self.position()?;
        Ok(AcquisitionInfo {
            stack_count: self.stack_count()?,
            delay: self.delay()?,
            x,
            y,
            z,
        })
    }
}

impl HeaderConvention for Seg2Header {
    fn stack_count(&self) -> Result<u32> {
        self.parse(SEG2_STACK)
    }

    fn delay(&self) -> Result<f64> {
        self.parse(SEG2_DELAY)
    }

    fn position(&self) -> Result<(f64, f64, f64)> {
        Ok((self.parse(SEG2_RECEIVER_LOCATION)?, 0.0, 0.0))
    }
}

impl HeaderConvention for SuTraceHeader {
    fn stack_count(&self) -> Result<u32> {
        let raw = self.number_of_horizontally_stacked_traces_yielding_this_trace;
        u32::try_from(raw)
            .ok()
            .and_then(|n| n.checked_add(1))
            .ok_or_else(|| IngestError::HeaderParse {
                field: "number_of_horizontally_stacked_traces_yielding_this_trace".to_string(),
                value: raw.to_string(),
            })
    }

    fn delay(&self) -> Result<f64> {
        Ok(self.delay_recording_time as f64)
    }

    fn position(&self) -> Result<(f64, f64, f64)> {
        Ok((
            self.group_coordinate_x as f64 / SU_COORDINATE_SCALE,
            self.group_coordinate_y as f64 / SU_COORDINATE_SCALE,
            0.0,
        ))
    }
}

/// Supported recorder conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderFormat {
    Seg2,
    Su,
}

impl RecorderFormat {
    pub fn from_tag(tag: &str) -> Result<Self> {
        match tag.trim().to_uppercase().as_str() {
            "SEG2" => Ok(RecorderFormat::Seg2),
            "SU" => Ok(RecorderFormat::Su),
            other => Err(IngestError::NotImplemented(other.to_string())),
        }
    }

    /// Identify the convention of `trace` from its format tag.
    pub fn identify(trace: &Trace) -> Result<Self> {
        let tag = trace
            .format
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .ok_or(IngestError::UnidentifiedTrace)?;
        Self::from_tag(tag)
    }

    /// Read acquisition metadata from the header block this convention uses.
    pub fn acquisition(self, trace: &Trace) -> Result<AcquisitionInfo> {
        match self {
            RecorderFormat::Seg2 => trace
                .seg2
                .as_ref()
                .ok_or(IngestError::MissingHeader("SEG2"))?
                .acquisition(),
            RecorderFormat::Su => trace
                .su
                .as_ref()
                .ok_or(IngestError::MissingHeader("SU"))?
                .acquisition(),
        }
    }
}
