//! Byte-size formatting for terminal output.

const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

/// Renders a byte count with the largest fitting unit; fractional digits
/// only from MB up.
pub fn human_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit > 1 {
        format!("{:.1} {}", value, UNITS[unit])
    } else {
        format!("{:.0} {}", value, UNITS[unit])
    }
}
