// Positioned single-component sensors built from recorder traces

use crate::core::error::{IngestError, Result};
use crate::core::format::{AcquisitionInfo, RecorderFormat, Trace};
use crate::core::waveform::{SensorAttribute, Waveform};
use serde::Serialize;
use tracing::{debug, info};

/// Values used when a trace's header is not trusted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorDefaults {
    pub stack_count: u32,
    pub delay: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Default for SensorDefaults {
    fn default() -> Self {
        Self {
            stack_count: 1,
            delay: 0.0,
            x: 0.0,
            y: 0.0,
            z: 0.0,
        }
    }
}

/// A waveform recorded at a fixed position (meters, relative to the survey origin).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionedSensor {
    waveform: Waveform,
    x: f64,
    y: f64,
    z: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorSnapshot {
    pub amplitude: Vec<f64>,
    pub dt: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub stack_count: u32,
    pub delay: f64,
}

impl PositionedSensor {
    pub fn new(
        amplitude: Vec<f64>,
        dt: f64,
        x: f64,
        y: f64,
        z: f64,
        stack_count: u32,
        delay: f64,
    ) -> Result<Self> {
        let waveform = Waveform::new(amplitude, dt, stack_count, delay)?;
        Ok(Self::from_waveform(waveform, x, y, z))
    }

    pub fn from_waveform(waveform: Waveform, x: f64, y: f64, z: f64) -> Self {
        Self { waveform, x, y, z }
    }

    /// Build a sensor from a trace, reading stack count, delay and position
    /// from its header when `read_header` is set, or from `defaults` otherwise.
    pub fn from_trace(trace: &Trace, read_header: bool, defaults: SensorDefaults) -> Result<Self> {
        let format = RecorderFormat::identify(trace);
        // An untagged trace is rejected even when its header would be ignored.
        if let Err(IngestError::UnidentifiedTrace) = format {
            return Err(IngestError::UnidentifiedTrace);
        }

        let info = if read_header {
            let format = format?;
            let info = format.acquisition(trace)?;
            debug!("{:?} header: {:?}", format, info);
            info
        } else {
            AcquisitionInfo {
                stack_count: defaults.stack_count,
                delay: defaults.delay,
                x: defaults.x,
                y: defaults.y,
                z: defaults.z,
            }
        };

        let sensor = Self::new(
            trace.data.clone(),
            trace.delta,
            info.x,
            info.y,
            info.z,
            info.stack_count,
            info.delay,
        )?;
        info!(
            "Sensor at ({}, {}, {}) with {} samples, {} stacks",
            sensor.x,
            sensor.y,
            sensor.z,
            sensor.waveform.sample_count(),
            sensor.waveform.stack_count()
        );
        Ok(sensor)
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn z(&self) -> f64 {
        self.z
    }

    pub fn waveform(&self) -> &Waveform {
        &self.waveform
    }

    /// Mutable access for zero-padding; position stays fixed.
    pub fn waveform_mut(&mut self) -> &mut Waveform {
        &mut self.waveform
    }

    pub fn stack_append(&mut self, amplitude: &[f64], stack_count: u32) -> Result<()> {
        self.waveform.stack_append(amplitude, stack_count)
    }

    /// Equal except possibly in amplitude values and any `exclude`d attribute.
    pub fn is_similar(&self, other: &PositionedSensor, exclude: &[SensorAttribute]) -> bool {
        let keep = |attr: SensorAttribute| !exclude.contains(&attr);

        (!keep(SensorAttribute::X) || self.x == other.x)
            && (!keep(SensorAttribute::Y) || self.y == other.y)
            && (!keep(SensorAttribute::Z) || self.z == other.z)
            && self.waveform.is_similar(&other.waveform, exclude)
    }

    pub fn snapshot(&self) -> SensorSnapshot {
        SensorSnapshot {
            amplitude: self.waveform.amplitude().to_vec(),
            dt: self.waveform.dt(),
            x: self.x,
            y: self.y,
            z: self.z,
            stack_count: self.waveform.stack_count(),
            delay: self.waveform.delay(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constants::*;
    use crate::core::format::{Seg2Header, SuTraceHeader};

    fn su_trace(stacked: i32, delay: i32, x: i32, y: i32) -> Trace {
        Trace::new(vec![0.0, 1.0, 0.5, -0.25], 0.001).with_su(SuTraceHeader {
            number_of_horizontally_stacked_traces_yielding_this_trace: stacked,
            delay_recording_time: delay,
            group_coordinate_x: x,
            group_coordinate_y: y,
        })
    }

    #[test]
    fn test_from_su_trace() {
        let sensor = PositionedSensor::from_trace(
            &su_trace(4, 0, 12000, 6000),
            true,
            SensorDefaults::default(),
        )
        .unwrap();

        assert_eq!(sensor.waveform().stack_count(), 5);
        assert_eq!(sensor.x(), 12.0);
        assert_eq!(sensor.y(), 6.0);
        assert_eq!(sensor.z(), 0.0);
        assert_eq!(sensor.waveform().dt(), 0.001);
    }

    #[test]
    fn test_from_su_trace_positive_delay() {
        let result =
            PositionedSensor::from_trace(&su_trace(0, 5, 0, 0), true, SensorDefaults::default());
        assert!(matches!(result, Err(IngestError::InvalidArgument(_))));
    }

    #[test]
    fn test_from_seg2_trace() {
        let trace = Trace::new(vec![1.0; 8], 0.00025).with_seg2(
            Seg2Header::new()
                .with_field(SEG2_STACK, "2")
                .with_field(SEG2_DELAY, "-0.1")
                .with_field(SEG2_RECEIVER_LOCATION, "22.5"),
        );

        let sensor = PositionedSensor::from_trace(&trace, true, SensorDefaults::default()).unwrap();
        let snap = sensor.snapshot();
        assert_eq!(snap.stack_count, 2);
        assert_eq!(snap.delay, -0.1);
        assert_eq!((snap.x, snap.y, snap.z), (22.5, 0.0, 0.0));
        assert_eq!(snap.amplitude, vec![1.0; 8]);
    }

    #[test]
    fn test_from_trace_without_header() {
        let defaults = SensorDefaults {
            stack_count: 3,
            delay: -0.5,
            x: 1.0,
            y: 2.0,
            z: 3.0,
        };
        let sensor = PositionedSensor::from_trace(&su_trace(9, 0, 5000, 5000), false, defaults)
            .unwrap();

        assert_eq!(sensor.waveform().stack_count(), 3);
        assert_eq!(sensor.waveform().delay(), -0.5);
        assert_eq!((sensor.x(), sensor.y(), sensor.z()), (1.0, 2.0, 3.0));
    }

    #[test]
    fn test_from_trace_unknown_format() {
        let mut trace = Trace::new(vec![0.0], 0.01);
        trace.format = Some("MSEED".to_string());

        assert!(matches!(
            PositionedSensor::from_trace(&trace, true, SensorDefaults::default()),
            Err(IngestError::NotImplemented(_))
        ));
        // Without header parsing the tag only needs to be present.
        assert!(PositionedSensor::from_trace(&trace, false, SensorDefaults::default()).is_ok());
    }

    #[test]
    fn test_from_trace_untagged() {
        let trace = Trace::new(vec![0.0], 0.01);
        for read_header in [true, false] {
            assert!(matches!(
                PositionedSensor::from_trace(&trace, read_header, SensorDefaults::default()),
                Err(IngestError::UnidentifiedTrace)
            ));
        }
    }

    #[test]
    fn test_equal_and_similar() {
        let make = |x: f64| {
            PositionedSensor::new(vec![1.0, 2.0, 3.0], 0.01, x, 0.0, 0.0, 1, 0.0).unwrap()
        };
        let a = make(10.0);
        let b = make(10.0);
        let c = make(15.0);

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(!a.is_similar(&c, &[]));
        assert!(a.is_similar(&c, &[SensorAttribute::X]));
        assert!(!a.is_similar(&c, &[SensorAttribute::Y]));
    }

    #[test]
    fn test_similar_ignores_amplitude_values() {
        let a = PositionedSensor::new(vec![1.0, 2.0], 0.01, 0.0, 0.0, 0.0, 1, 0.0).unwrap();
        let b = PositionedSensor::new(vec![7.0, 8.0], 0.01, 0.0, 0.0, 0.0, 1, 0.0).unwrap();
        let c = PositionedSensor::new(vec![1.0, 2.0], 0.02, 0.0, 0.0, 0.0, 1, 0.0).unwrap();

        assert_ne!(a, b);
        assert!(a.is_similar(&b, &[]));
        assert!(!a.is_similar(&c, &[]));
        assert!(a.is_similar(&c, &[SensorAttribute::Dt]));
    }

    #[test]
    fn test_stacking_keeps_position() {
        let mut sensor =
            PositionedSensor::new(vec![1.0, 1.0, 1.0], 0.01, 4.0, 0.0, 0.0, 1, 0.0).unwrap();
        sensor.stack_append(&[3.0, 3.0, 3.0], 1).unwrap();

        assert_eq!(sensor.waveform().amplitude(), &[2.0, 2.0, 2.0]);
        assert_eq!(sensor.waveform().stack_count(), 2);
        assert_eq!(sensor.x(), 4.0);
    }
}
