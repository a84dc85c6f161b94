// Utility helpers for parsing and display formatting.
//
// CSV exports from the upstream pipeline are mostly clean, but numbers can
// arrive with thousands separators or as floats for integer counts, so all
// field coercion lives here and the rest of the crate works on typed values.
use num_format::{Locale, ToFormattedString};

/// Parse a string-like value into `f64`, tolerating thousands separators.
///
/// Exponent notation (`1.5e-05`) is accepted; `NaN` and infinities are not.
pub fn parse_f64_safe(s: Option<&str>) -> Option<f64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    let s = s.replace(",", "");
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a non-negative count. Pandas writes integer columns containing
/// gaps as floats (`1200.0`), so whole floats are accepted.
pub fn parse_count_safe(s: Option<&str>) -> Option<u64> {
    let v = parse_f64_safe(s)?;
    if v < 0.0 || v.fract() != 0.0 {
        return None;
    }
    Some(v as u64)
}

/// Trimmed, non-empty text field.
pub fn parse_text(s: Option<String>) -> Option<String> {
    let s = s?.trim().to_string();
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

/// Proportional text bar used in place of a plotted line.
pub fn bar(value: f64, max: f64, width: usize) -> String {
    if max.is_nan() || max <= 0.0 || !value.is_finite() || value <= 0.0 {
        return String::new();
    }
    let filled = ((value / max) * width as f64).round() as usize;
    "█".repeat(filled.clamp(1, width))
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Fixed decimals with locale-aware thousands separators (`1,234,567.89`).
    let neg = n.is_sign_negative() && n != 0.0;
    let abs_n = n.abs();
    let s = format!("{:.*}", decimals, abs_n);
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    let int_val: i64 = int_part.parse().unwrap_or(0);
    let mut res = int_val.to_formatted_string(&Locale::en);
    if let Some(frac) = frac_part {
        if decimals > 0 {
            res.push('.');
            res.push_str(frac);
        }
    }
    if neg {
        format!("-{}", res)
    } else {
        res
    }
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::en)
}
