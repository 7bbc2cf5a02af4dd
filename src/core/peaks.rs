// Text grammars for dispersion peaks in `.max` reports

use crate::core::constants::*;
use crate::core::error::{IngestError, Result};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

/// One local maximum reported for a (time, frequency) pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeakRecord {
    pub time: f64,
    pub frequency: f64,
    pub slowness: f64,
    pub azimuth: f64,
    pub ellipticity: f64,
    /// May be NaN or infinite.
    pub noise: f64,
    pub power: f64,
}

/// Label as it appears in reports: known wave types are capitalised,
/// anything else is used verbatim.
pub fn wave_label(wavetype: &str) -> String {
    if WAVE_TYPES.iter().any(|w| *w == wavetype) {
        capitalize(wavetype)
    } else {
        wavetype.to_string()
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// The time field opens the line, so a fixed time never matches the tail
/// of a longer value.
fn time_field(time: Option<&str>) -> String {
    match time {
        Some(t) => format!("{}({})", LINE_START, regex::escape(t)),
        None => format!("{}{}", LINE_START, TIME_FIELD),
    }
}

/// Compiled matcher for fully specified peak lines.
#[derive(Debug, Clone)]
pub struct PeakPattern {
    regex: Regex,
}

impl PeakPattern {
    /// Matcher for `wavetype` peaks, restricted to the literal `time` if given.
    pub fn strict(wavetype: &str, time: Option<&str>) -> Result<Self> {
        let pattern = format!(
            "(?m){time} {freq} {label} ({n}) ({n}) ({n}) {noise} {power} 1{end}",
            time = time_field(time),
            freq = UNSIGNED_FIELD,
            label = regex::escape(&wave_label(wavetype)),
            n = NUMBER,
            noise = NOISE_FIELD,
            power = UNSIGNED_FIELD,
            end = LINE_END,
        );
        Ok(Self {
            regex: Regex::new(&pattern)?,
        })
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Time text exactly as written on a matching line.
    pub fn captured_time<'a>(&self, line: &'a str) -> Option<&'a str> {
        self.regex
            .captures(line)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }

    pub fn parse_line(&self, line: &str) -> Result<Option<PeakRecord>> {
        self.regex
            .captures(line)
            .map(|caps| Self::record(&caps))
            .transpose()
    }

    /// Every peak in `text`, in order of appearance.
    pub fn extract_all(&self, text: &str) -> Result<Vec<PeakRecord>> {
        self.regex
            .captures_iter(text)
            .map(|caps| Self::record(&caps))
            .collect()
    }

    fn record(caps: &Captures<'_>) -> Result<PeakRecord> {
        let field = |i: usize| -> Result<f64> {
            let raw = caps.get(i).map(|m| m.as_str()).unwrap_or_default();
            raw.parse()
                .map_err(|_| IngestError::ParseError(format!("field {} {:?} is not a number", i, raw)))
        };

        Ok(PeakRecord {
            time: field(1)?,
            frequency: field(2)?,
            slowness: field(3)?,
            azimuth: field(4)?,
            ellipticity: field(5)?,
            noise: field(6)?,
            power: field(7)?,
        })
    }
}

/// Matcher that only recognises candidate peak lines, without the numeric fields.
#[derive(Debug, Clone)]
pub struct CandidatePattern {
    regex: Regex,
}

impl CandidatePattern {
    pub fn loose(wavetype: &str, time: Option<&str>) -> Result<Self> {
        let pattern = format!(
            "(?m){} .* {} .* 1{}",
            time_field(time),
            regex::escape(&capitalize(wavetype)),
            LINE_END
        );
        Ok(Self {
            regex: Regex::new(&pattern)?,
        })
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    pub fn is_match(&self, line: &str) -> bool {
        self.regex.is_match(line)
    }

    pub fn count(&self, text: &str) -> usize {
        self.regex.find_iter(text).count()
    }
}
