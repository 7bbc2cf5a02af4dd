// Example usage: stack two shots, pad to the configured resolution and read a report

use std::str::FromStr;

use swingest::utils::conf_helper::init_config;
use swingest::{PositionedSensor, ReportReader, SensorDefaults, SuTraceHeader, Trace};
use tracing::{info, Level};

fn main() -> anyhow::Result<()> {
    let config = init_config("data/ingest.json")?;

    tracing_subscriber::fmt()
        .with_max_level(Level::from_str(&config.log_level).unwrap_or(Level::INFO))
        .init();

    // Two repeated shots recorded by the same SU geophone
    let header = SuTraceHeader {
        number_of_horizontally_stacked_traces_yielding_this_trace: 0,
        delay_recording_time: 0,
        group_coordinate_x: 12000,
        group_coordinate_y: 0,
    };
    let first = Trace::new(vec![0.0, 0.4, 1.0, 0.2, -0.3], 0.002).with_su(header.clone());
    let second = Trace::new(vec![0.0, 0.6, 0.8, 0.0, -0.1], 0.002).with_su(header);

    let mut sensor = PositionedSensor::from_trace(&first, config.read_header, SensorDefaults::default())?;
    sensor.stack_append(&second.data, 1)?;
    sensor.waveform_mut().zero_pad(config.target_df)?;

    let waveform = sensor.waveform();
    info!(
        "Sensor at x = {} m: {} samples, {} stacks, df = {} Hz, multiple = {}",
        sensor.x(),
        waveform.sample_count(),
        waveform.stack_count(),
        waveform.freq_step(),
        waveform.zero_pad_multiple()
    );

    // Dispersion peaks from a processing report
    let reader = ReportReader::open("data/rtbf.max")?;
    let peaks = if config.check_peak_count {
        reader.read_peaks_checked(&config.wavetype, None)?
    } else {
        reader.read_peaks(&config.wavetype, None)?
    };
    info!("{} {} peaks", peaks.len(), config.wavetype);

    for time in reader.distinct_times(&config.wavetype)? {
        let at_time = reader.read_peaks(&config.wavetype, Some(time.as_str()))?;
        info!("  t = {}: {} maxima", time, at_time.len());
    }

    Ok(())
}
