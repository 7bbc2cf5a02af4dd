// Sequential scanner for dispersion-processing reports

use crate::core::constants::*;
use crate::core::error::{IngestError, Result};
use crate::core::peaks::{CandidatePattern, PeakPattern, PeakRecord};
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// An in-memory report, scanned line by line.
pub struct ReportReader {
    path: Option<PathBuf>,
    lines: Vec<String>,
}

impl ReportReader {
    /// Read a plain-text report from disk.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut file = File::open(&path)?;

        let mut raw = Vec::new();
        file.read_to_end(&mut raw)?;

        let text = String::from_utf8(raw)
            .map_err(|e| IngestError::ParseError(format!("report is not UTF-8: {}", e)))?;

        let mut reader = Self::from_text(&text);
        info!(
            "Opened report {} ({} lines)",
            path.display(),
            reader.lines.len()
        );
        reader.path = Some(path);
        Ok(reader)
    }

    pub fn from_reader<R: BufRead>(source: R) -> Result<Self> {
        let lines = source.lines().collect::<std::io::Result<Vec<_>>>()?;
        Ok(Self { path: None, lines })
    }

    pub fn from_text(text: &str) -> Self {
        Self {
            path: None,
            lines: text.lines().map(str::to_string).collect(),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Non-comment lines, in file order.
    fn records(&self) -> impl Iterator<Item = &str> {
        self.lines
            .iter()
            .map(|l| l.trim_end())
            .filter(|l| !l.trim_start().starts_with(COMMENT_PREFIX))
    }

    /// Peaks of `wavetype`, optionally restricted to a single `time`.
    pub fn read_peaks(&self, wavetype: &str, time: Option<&str>) -> Result<Vec<PeakRecord>> {
        let pattern = PeakPattern::strict(wavetype, time)?;

        let mut peaks = Vec::new();
        for line in self.records() {
            if let Some(peak) = pattern.parse_line(line)? {
                peaks.push(peak);
            }
        }

        debug!("{} {} peaks parsed", peaks.len(), wavetype);
        Ok(peaks)
    }

    /// Number of lines that look like `wavetype` peaks, parsable or not.
    pub fn count_candidates(&self, wavetype: &str, time: Option<&str>) -> Result<usize> {
        let pattern = CandidatePattern::loose(wavetype, time)?;
        Ok(self.records().filter(|l| pattern.is_match(l)).count())
    }

    /// Like [`read_peaks`](Self::read_peaks), but fails if any candidate line
    /// could not be parsed into a full record.
    pub fn read_peaks_checked(&self, wavetype: &str, time: Option<&str>) -> Result<Vec<PeakRecord>> {
        let peaks = self.read_peaks(wavetype, time)?;
        let candidates = self.count_candidates(wavetype, time)?;

        if candidates != peaks.len() {
            warn!(
                "{} candidate {} lines but {} parsed peaks",
                candidates,
                wavetype,
                peaks.len()
            );
            return Err(IngestError::PeakCountMismatch {
                candidates,
                parsed: peaks.len(),
            });
        }

        Ok(peaks)
    }

    /// Time fields present in the report, as written and in order of first
    /// appearance. Each one can be handed back to [`read_peaks`](Self::read_peaks).
    pub fn distinct_times(&self, wavetype: &str) -> Result<Vec<String>> {
        let pattern = PeakPattern::strict(wavetype, None)?;

        let mut seen = HashSet::new();
        let mut times = Vec::new();
        for line in self.records() {
            if let Some(time) = pattern.captured_time(line) {
                if seen.insert(time) {
                    times.push(time.to_string());
                }
            }
        }
        Ok(times)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const REPORT: &str = "\
# MAX FILE
# abs_time frequency polarization slowness azimuth ellipticity noise power valid
0.5 5.0 Rayleigh 0.004 10 0.1 1.5 20.0 1
0.5 5.0 Love 0.005 15 0 inf 18.0 1
0.5 6.0 Rayleigh 0.0035 12 -0.2 nan 22.5 1
1.5 5.0 Rayleigh 0.0041 11 0.3 2.0 19.0 1
1.5 6.0 Rayleigh 0.0036 9 0 1.0 21.0 0
";

    #[test]
    fn test_read_peaks() {
        let reader = ReportReader::from_text(REPORT);
        let peaks = reader.read_peaks("rayleigh", None).unwrap();

        assert_eq!(peaks.len(), 3);
        assert_eq!(peaks[0].time, 0.5);
        assert_eq!(peaks[0].slowness, 0.004);
        assert!(peaks[1].noise.is_nan());
        assert_eq!(peaks[2].time, 1.5);

        let love = reader.read_peaks("love", None).unwrap();
        assert_eq!(love.len(), 1);
        assert_eq!(love[0].noise, f64::INFINITY);
    }

    #[test]
    fn test_read_peaks_at_time() {
        let reader = ReportReader::from_text(REPORT);
        let peaks = reader.read_peaks("rayleigh", Some("1.5")).unwrap();

        assert_eq!(peaks.len(), 1);
        assert_eq!(peaks[0].frequency, 5.0);
    }

    #[test]
    fn test_count_candidates() {
        let reader = ReportReader::from_text(REPORT);
        assert_eq!(reader.count_candidates("rayleigh", None).unwrap(), 3);
        assert_eq!(reader.count_candidates("rayleigh", Some("0.5")).unwrap(), 2);
        assert!(reader.read_peaks_checked("rayleigh", None).is_ok());
    }

    #[test]
    fn test_checked_detects_unparsed_lines() {
        let text = format!("{}2.5 5.0 Rayleigh 0.004 10 0.1 bad 20.0 1\n", REPORT);
        let reader = ReportReader::from_text(&text);

        assert_eq!(reader.read_peaks("rayleigh", None).unwrap().len(), 3);
        assert!(matches!(
            reader.read_peaks_checked("rayleigh", None),
            Err(IngestError::PeakCountMismatch {
                candidates: 4,
                parsed: 3
            })
        ));
    }

    #[test]
    fn test_read_peaks_time_is_whole_field() {
        let text = format!("{}10.5 5.0 Rayleigh 0.004 10 0.1 1.5 20.0 1\n", REPORT);
        let reader = ReportReader::from_text(&text);

        let peaks = reader.read_peaks("rayleigh", Some("0.5")).unwrap();
        assert_eq!(peaks.len(), 2);
        assert!(peaks.iter().all(|p| p.time == 0.5));
        assert_eq!(reader.count_candidates("rayleigh", Some("0.5")).unwrap(), 2);
        assert!(reader.read_peaks_checked("rayleigh", Some("0.5")).is_ok());
    }

    #[test]
    fn test_distinct_times() {
        let reader = ReportReader::from_text(REPORT);
        assert_eq!(reader.distinct_times("rayleigh").unwrap(), vec!["0.5", "1.5"]);
    }

    #[test]
    fn test_distinct_times_feed_read_peaks() {
        let text = "\
1.0 5.0 Rayleigh 0.004 10 0.1 1.5 20.0 1
1.0 6.0 Rayleigh 0.0035 12 -0.2 nan 22.5 1
2 5.0 Rayleigh 0.0041 11 0.3 2.0 19.0 1
";
        let reader = ReportReader::from_text(text);
        let times = reader.distinct_times("rayleigh").unwrap();
        assert_eq!(times, vec!["1.0", "2"]);

        let counts: Vec<usize> = times
            .iter()
            .map(|t| reader.read_peaks("rayleigh", Some(t.as_str())).unwrap().len())
            .collect();
        assert_eq!(counts, vec![2, 1]);
    }

    #[test]
    fn test_from_reader() {
        let reader = ReportReader::from_reader(REPORT.as_bytes()).unwrap();
        assert!(reader.path().is_none());
        assert_eq!(reader.read_peaks("rayleigh", None).unwrap().len(), 3);
    }

    #[test]
    fn test_open_plain_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(REPORT.as_bytes()).unwrap();

        let reader = ReportReader::open(file.path()).unwrap();
        assert_eq!(reader.path(), Some(file.path()));
        assert_eq!(reader.read_peaks("rayleigh", None).unwrap().len(), 3);
    }

    #[test]
    fn test_open_binary_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[0x1f, 0x8b, 0x08, 0x00, 0xff, 0xfe]).unwrap();

        assert!(matches!(
            ReportReader::open(file.path()),
            Err(IngestError::ParseError(_))
        ));
    }

    #[test]
    fn test_open_missing_file() {
        assert!(matches!(
            ReportReader::open("does/not/exist.max"),
            Err(IngestError::Io(_))
        ));
    }
}
