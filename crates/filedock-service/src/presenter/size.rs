//! Human-readable byte counts.

use filedock_core::config::SizeScale;

const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

/// Format `bytes` with up to `decimals` fractional digits, trailing zeros
/// trimmed. The unit is chosen by `scale` and clamped to GB.
pub fn readable_size(bytes: u64, decimals: usize, scale: SizeScale) -> String {
    let factor = match scale {
        SizeScale::Binary => bytes.checked_ilog(1024).unwrap_or(0) as usize,
        SizeScale::DigitCount => (decimal_digits(bytes) - 1) / 3,
    }
    .min(UNITS.len() - 1);

    let value = bytes as f64 / 1024f64.powi(factor as i32);
    let formatted = format!("{value:.decimals$}");
    let trimmed = if formatted.contains('.') {
        formatted.trim_end_matches('0').trim_end_matches('.')
    } else {
        formatted.as_str()
    };
    format!("{trimmed} {}", UNITS[factor])
}

fn decimal_digits(bytes: u64) -> usize {
    bytes.checked_ilog10().map_or(1, |d| d as usize + 1)
}
