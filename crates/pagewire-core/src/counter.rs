//! Counter text math: parsing a displayed statistic and formatting the
//! animated value.
//!
//! A counter element displays something like `"1,234 users"` or `"98%"`. The
//! numeric magnitude animates; everything else is a suffix re-appended on
//! every tick. Text with no parseable magnitude is not a counter at all —
//! the caller skips it silently.

/// Split a displayed statistic into `(magnitude, suffix)`.
///
/// Digits and the decimal point form the magnitude; commas are grouping
/// separators and belong to neither part. Every remaining character joins
/// the suffix in order. Returns `None` when no magnitude parses.
#[must_use]
pub fn parse_counter(text: &str) -> Option<(f64, String)> {
    let mut number = String::new();
    let mut suffix = String::new();
    for ch in text.chars() {
        match ch {
            '0'..='9' | '.' => number.push(ch),
            ',' => {}
            other => suffix.push(other),
        }
    }
    let magnitude: f64 = number.parse().ok()?;
    if !magnitude.is_finite() {
        return None;
    }
    Some((magnitude, suffix))
}

/// Format an animated magnitude for display.
///
/// Millions render as `X.XM`, thousands as `X.XK`, anything smaller as a
/// truncated (not rounded) integer.
#[must_use]
pub fn format_magnitude(value: f64) -> String {
    if value >= 1_000_000.0 {
        format!("{:.1}M", to_one_decimal(value / 1_000_000.0))
    } else if value >= 1_000.0 {
        format!("{:.1}K", to_one_decimal(value / 1_000.0))
    } else {
        format!("{}", value.trunc() as i64)
    }
}

fn to_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
