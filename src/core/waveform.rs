// Waveform data type with in-place zero-padding and stack averaging

use crate::core::constants::{MAX_SAMPLE_COUNT, PAD_MULTIPLES};
use crate::core::error::{IngestError, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// A single channel's amplitude record and its sampling metadata.
///
/// The first sample is associated with `delay` seconds and the last with
/// `delay + (sample_count - 1) * dt`.
#[derive(Debug, Clone, Serialize)]
pub struct Waveform {
    amplitude: Vec<f64>,
    dt: f64,
    delay: f64,
    stack_count: u32,
    zero_pad_multiple: usize,
}

/// Plain copy of a waveform's state for downstream spectral stages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaveformSnapshot {
    pub amplitude: Vec<f64>,
    pub dt: f64,
    pub delay: f64,
    pub stack_count: u32,
    pub zero_pad_multiple: usize,
}

impl Waveform {
    pub fn new(amplitude: Vec<f64>, dt: f64, stack_count: u32, delay: f64) -> Result<Self> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(IngestError::InvalidArgument(format!(
                "dt must be positive, not {}",
                dt
            )));
        }
        // Also rejects NaN.
        if !(delay <= 0.0) {
            return Err(IngestError::InvalidArgument(format!(
                "delay must be less than or equal to zero, not {}",
                delay
            )));
        }
        if stack_count == 0 {
            return Err(IngestError::InvalidArgument(
                "stack_count must be at least one".to_string(),
            ));
        }

        info!(
            "Initialize a Waveform: dt = {}, fs = {}, delay = {}, nsamples = {}",
            dt,
            1.0 / dt,
            delay,
            amplitude.len()
        );

        Ok(Self {
            amplitude,
            dt,
            delay,
            stack_count,
            zero_pad_multiple: 1,
        })
    }

    /// Build from flattened data plus its array shape; only 1-D shapes are accepted.
    pub fn from_shaped(data: Vec<f64>, shape: &[usize], dt: f64) -> Result<Self> {
        if shape.len() != 1 {
            return Err(IngestError::InvalidInputType(format!(
                "amplitude must be 1-dimensional, not {}-dimensional {:?}",
                shape.len(),
                shape
            )));
        }
        if shape[0] != data.len() {
            return Err(IngestError::InvalidInputType(format!(
                "shape {:?} does not describe {} samples",
                shape,
                data.len()
            )));
        }
        Self::new(data, dt, 1, 0.0)
    }

    pub fn amplitude(&self) -> &[f64] {
        &self.amplitude
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn delay(&self) -> f64 {
        self.delay
    }

    pub fn stack_count(&self) -> u32 {
        self.stack_count
    }

    pub fn zero_pad_multiple(&self) -> usize {
        self.zero_pad_multiple
    }

    pub fn sample_count(&self) -> usize {
        self.amplitude.len()
    }

    pub fn sample_rate(&self) -> f64 {
        1.0 / self.dt
    }

    pub fn nyquist(&self) -> f64 {
        0.5 * self.sample_rate()
    }

    pub fn freq_step(&self) -> f64 {
        self.sample_rate() / self.sample_count() as f64
    }

    /// Sample times in seconds, starting at the pre-trigger delay.
    pub fn times(&self) -> Vec<f64> {
        (0..self.sample_count())
            .map(|i| self.delay + i as f64 * self.dt)
            .collect()
    }

    pub fn snapshot(&self) -> WaveformSnapshot {
        WaveformSnapshot {
            amplitude: self.amplitude.clone(),
            dt: self.dt,
            delay: self.delay,
            stack_count: self.stack_count,
            zero_pad_multiple: self.zero_pad_multiple,
        }
    }

    /// Append zeros so a later transform lands on multiples of `target_df`.
    ///
    /// When the record already holds at least the required number of samples,
    /// it is padded to the smallest `required * m` (m in 1, 2, 4, ..., 32) that
    /// exceeds it and `m` is kept in `zero_pad_multiple`; acquired samples are
    /// never discarded.
    pub fn zero_pad(&mut self, target_df: f64) -> Result<()> {
        if !(target_df.is_finite() && target_df > 0.0) {
            return Err(IngestError::InvalidArgument(format!(
                "df must be positive, not {}",
                target_df
            )));
        }

        let exact = (1.0 / (target_df * self.dt)).round_ties_even();
        if !(exact.is_finite() && exact <= MAX_SAMPLE_COUNT as f64) {
            return Err(IngestError::InvalidArgument(format!(
                "df {} needs {} samples at dt {}, limit is {}",
                target_df, exact, self.dt, MAX_SAMPLE_COUNT
            )));
        }
        let required = exact as usize;
        let nsamples = self.sample_count();
        debug!("nreq = {}", required);

        let (target_len, multiple) = if required > nsamples {
            (required, 1)
        } else {
            debug!(
                "trial_n = {:?}",
                PAD_MULTIPLES
                    .iter()
                    .filter_map(|m| required.checked_mul(*m))
                    .collect::<Vec<_>>()
            );
            let multiple = PAD_MULTIPLES
                .iter()
                .copied()
                .find(|m| required.checked_mul(*m).is_some_and(|len| nsamples < len))
                .ok_or(IngestError::ResolutionUnsupported {
                    sample_count: nsamples,
                    required,
                    max_multiple: PAD_MULTIPLES[PAD_MULTIPLES.len() - 1],
                })?;
            debug!("multiple = {}", multiple);
            (required * multiple, multiple)
        };
        if target_len > MAX_SAMPLE_COUNT {
            return Err(IngestError::InvalidArgument(format!(
                "padding to {} samples exceeds the limit of {}",
                target_len, MAX_SAMPLE_COUNT
            )));
        }

        self.amplitude.resize(target_len, 0.0);
        self.zero_pad_multiple = multiple;
        debug!("nsamples = {}", target_len);
        Ok(())
    }

    /// Average `amplitude`, itself the mean of `stack_count` recordings, into
    /// this waveform.
    ///
    /// The incoming sample interval is assumed to match `dt`; it is not checked.
    pub fn stack_append(&mut self, amplitude: &[f64], stack_count: u32) -> Result<()> {
        if amplitude.len() != self.amplitude.len() {
            return Err(IngestError::LengthMismatch {
                expected: self.amplitude.len(),
                got: amplitude.len(),
            });
        }
        if stack_count == 0 {
            return Err(IngestError::InvalidArgument(
                "stack_count must be at least one".to_string(),
            ));
        }
        let combined = self.stack_count.checked_add(stack_count).ok_or_else(|| {
            IngestError::InvalidArgument(format!(
                "stack_count {} + {} overflows",
                self.stack_count, stack_count
            ))
        })?;

        let current = self.stack_count as f64;
        let incoming = stack_count as f64;
        let total = current + incoming;
        for (cur, inc) in self.amplitude.iter_mut().zip(amplitude) {
            *cur = (*cur * current + inc * incoming) / total;
        }
        self.stack_count = combined;
        Ok(())
    }

    /// Compare everything but the amplitude values, skipping excluded fields.
    pub(crate) fn is_similar(&self, other: &Waveform, exclude: &[SensorAttribute]) -> bool {
        let keep = |attr: SensorAttribute| !exclude.contains(&attr);

        (!keep(SensorAttribute::Dt) || self.dt == other.dt)
            && (!keep(SensorAttribute::Delay) || self.delay == other.delay)
            && (!keep(SensorAttribute::StackCount) || self.stack_count == other.stack_count)
            && (!keep(SensorAttribute::SampleCount) || self.sample_count() == other.sample_count())
    }
}

impl PartialEq for Waveform {
    fn eq(&self, other: &Self) -> bool {
        self.dt == other.dt
            && self.stack_count == other.stack_count
            && self.delay == other.delay
            && self.amplitude == other.amplitude
    }
}

/// Attributes that may be left out of a similarity comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorAttribute {
    X,
    Y,
    Z,
    Dt,
    Delay,
    StackCount,
    SampleCount,
}

impl std::str::FromStr for SensorAttribute {
    type Err = IngestError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "x" => Ok(SensorAttribute::X),
            "y" => Ok(SensorAttribute::Y),
            "z" => Ok(SensorAttribute::Z),
            "dt" => Ok(SensorAttribute::Dt),
            "delay" => Ok(SensorAttribute::Delay),
            "stack_count" | "nstacks" => Ok(SensorAttribute::StackCount),
            "sample_count" | "nsamples" => Ok(SensorAttribute::SampleCount),
            other => Err(IngestError::InvalidArgument(format!(
                "unknown sensor attribute {:?}",
                other
            ))),
        }
    }
}
