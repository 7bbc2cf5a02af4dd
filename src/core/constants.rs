// Numeric and format constants for the ingestion layer

/// Candidate over-padding factors, searched in order.
pub const PAD_MULTIPLES: [usize; 6] = [1, 2, 4, 8, 16, 32];

/// Largest sample count zero-padding may produce (2 GiB of samples).
pub const MAX_SAMPLE_COUNT: usize = 1 << 28;

/// SU coordinates are stored in thousandths of a meter.
pub const SU_COORDINATE_SCALE: f64 = 1000.0;

// SEG2 trace descriptor keys
pub const SEG2_STACK: &str = "STACK";
pub const SEG2_DELAY: &str = "DELAY";
pub const SEG2_RECEIVER_LOCATION: &str = "RECEIVER_LOCATION";

/// Wave types whose labels are capitalised before matching.
pub const WAVE_TYPES: [&str; 5] = ["rayleigh", "love", "vertical", "radial", "transverse"];

// Report grammar fragments
pub const LINE_START: &str = r"^[ \t]*";
pub const TIME_FIELD: &str = r"(\d+\.?\d*)";
pub const UNSIGNED_FIELD: &str = r"(\d+\.?\d*)";
pub const NUMBER: &str = r"-?\d+.?\d*[eE]?[+-]?\d*";
pub const NOISE_FIELD: &str = r"(\d+\.?\d*|-?inf|nan)";
/// The accepted-peak flag closes the line.
pub const LINE_END: &str = r"[ \t\r]*$";

/// Leading character of report comment lines.
pub const COMMENT_PREFIX: char = '#';
