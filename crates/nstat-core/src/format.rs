//! Human-readable formatting for stats values.
//!
//! All formatters accept any `f64`, including negative, non-integral, and
//! very large values, and never panic.

const BYTE_UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

/// Binary byte size with two decimals: `0 → "0 B"`, `1048576 → "1.00 MB"`.
pub fn format_bytes(bytes: f64) -> String {
    if bytes == 0.0 {
        return "0 B".to_string();
    }
    if !bytes.is_finite() {
        return format!("{bytes} B");
    }
    let exp = (bytes.abs().log2() / 10.0).floor().max(0.0) as usize;
    let idx = exp.min(BYTE_UNITS.len() - 1);
    let scaled = bytes / 2f64.powi(10 * idx as i32);
    format!("{scaled:.2} {}", BYTE_UNITS[idx])
}

/// Compact count: `1500 → "1.50K"`, `2_500_000 → "2.50M"`, `42 → "42"`.
pub fn format_number(num: f64) -> String {
    if num >= 1e9 {
        format!("{:.2}B", num / 1e9)
    } else if num >= 1e6 {
        format!("{:.2}M", num / 1e6)
    } else if num >= 1e3 {
        format!("{:.2}K", num / 1e3)
    } else {
        num.to_string()
    }
}

/// Duration in seconds: `0.0005 → "500.00μs"`, `0.25 → "250.00ms"`, `1.5 → "1.500s"`.
pub fn format_time(seconds: f64) -> String {
    if seconds < 0.001 {
        format!("{:.2}μs", seconds * 1e6)
    } else if seconds < 1.0 {
        format!("{:.2}ms", seconds * 1000.0)
    } else {
        format!("{seconds:.3}s")
    }
}

/// Fraction as a percentage: `0.256 → "25.60%"`.
pub fn format_percent(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}

/// Bytes as mebibytes with two decimals, as used by the terminal report.
pub fn format_mb(bytes: f64) -> String {
    format!("{:.2} MB", bytes / 1024.0 / 1024.0)
}

/// Thousands-grouped number: `1234567 → "1,234,567"`, `1234.5 → "1,234.5"`.
///
/// At most three fractional digits are kept; trailing zeros are dropped.
pub fn format_grouped(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let rounded = (value * 1000.0).round() / 1000.0;
    let negative = rounded < 0.0;
    let abs = rounded.abs();
    let int_part = abs.trunc();

    let digits = format!("{int_part:.0}");
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 5);
    if negative {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    let frac = abs - int_part;
    if frac > 0.0 {
        let frac_str = format!("{frac:.3}");
        let trimmed = frac_str.trim_end_matches('0');
        // "0.xyz" → ".xyz"
        if let Some(rest) = trimmed.strip_prefix('0') {
            if rest.len() > 1 {
                out.push_str(rest);
            }
        }
    }
    out
}
