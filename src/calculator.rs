//! length scaling against a reference segment

use crate::geometry::Segment;

/// parse the user's known reference length.
///
/// Leading whitespace is skipped and the leading run of ASCII digits is read
/// as a non-negative integer. Anything without a leading digit ("", "abc",
/// "-5") counts as zero, so a bad entry yields a zero measurement instead of
/// an error.
pub fn parse_reference_length(input: &str) -> u64 {
    input
        .trim()
        .chars()
        .map_while(|c| c.to_digit(10))
        .fold(0u64, |acc, d| acc.saturating_mul(10).saturating_add(d as u64))
}

/// scale a measured pixel length by `real / reference` pixels.
///
/// Any zero input gives zero rather than a division by zero.
pub fn scaled_length(reference_px: f64, reference_real: f64, measured_px: f64) -> f64 {
    if reference_px == 0.0 || reference_real == 0.0 || measured_px == 0.0 {
        return 0.0;
    }
    measured_px * (reference_real / reference_px)
}

/// real-world length of `measure`, given that `reference` is `reference_real`
/// units long.
pub fn measure(reference: &Segment, reference_real: u64, measure: &Segment) -> f64 {
    scaled_length(reference.length(), reference_real as f64, measure.length())
}
