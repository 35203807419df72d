//! Value formatting for the Prometheus exposition format.

use std::borrow::Cow;

/// Decimals printed for floats that carry no accuracy of their own.
pub const DEFAULT_FLOAT_DECIMALS: i8 = 2;

/// Format a value rounded to `accuracy_decimals`.
///
/// A negative accuracy rounds to tens, hundreds... and prints no decimals.
/// Negative zero is printed as zero.
pub fn value_accuracy_to_string(value: f32, accuracy_decimals: i8) -> String {
    if !value.is_finite() {
        return format_non_finite(value).to_string();
    }

    let formatted = if accuracy_decimals < 0 {
        let factor = 10f32.powi(-i32::from(accuracy_decimals));
        format!("{:.0}", (value / factor).round() * factor)
    } else {
        format!("{:.*}", accuracy_decimals as usize, value)
    };

    strip_negative_zero(formatted)
}

/// Format a float with the default two decimals.
pub fn format_float(value: f32) -> String {
    value_accuracy_to_string(value, DEFAULT_FLOAT_DECIMALS)
}

/// Format a boolean as `1` or `0`.
pub fn format_bool(value: bool) -> &'static str {
    if value { "1" } else { "0" }
}

fn format_non_finite(value: f32) -> &'static str {
    if value.is_nan() {
        "NaN"
    } else if value.is_sign_positive() {
        "+Inf"
    } else {
        "-Inf"
    }
}

fn strip_negative_zero(formatted: String) -> String {
    match formatted.strip_prefix('-') {
        Some(rest) if rest.chars().all(|c| c == '0' || c == '.') => rest.to_string(),
        _ => formatted,
    }
}

/// Escape special characters in label values.
pub fn escape_label_value(value: &str) -> Cow<'_, str> {
    if !value.contains(['\\', '"', '\n']) {
        return Cow::Borrowed(value);
    }

    let mut result = String::with_capacity(value.len() + 2);
    for c in value.chars() {
        match c {
            '\\' => result.push_str("\\\\"),
            '"' => result.push_str("\\\""),
            '\n' => result.push_str("\\n"),
            _ => result.push(c),
        }
    }
    Cow::Owned(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_accuracy_positive() {
        assert_eq!(value_accuracy_to_string(21.47, 2), "21.47");
        assert_eq!(value_accuracy_to_string(21.466, 2), "21.47");
        assert_eq!(value_accuracy_to_string(21.4, 3), "21.400");
        assert_eq!(value_accuracy_to_string(21.6, 0), "22");
    }

    #[test]
    fn test_value_accuracy_negative() {
        assert_eq!(value_accuracy_to_string(1234.0, -2), "1200");
        assert_eq!(value_accuracy_to_string(1250.0, -1), "1250");
        assert_eq!(value_accuracy_to_string(1256.0, -1), "1260");
    }

    #[test]
    fn test_negative_zero_collapses() {
        assert_eq!(value_accuracy_to_string(-0.001, 2), "0.00");
        assert_eq!(value_accuracy_to_string(-0.4, 0), "0");
        assert_eq!(value_accuracy_to_string(-1.5, 1), "-1.5");
    }

    #[test]
    fn test_non_finite() {
        assert_eq!(value_accuracy_to_string(f32::NAN, 2), "NaN");
        assert_eq!(format_float(f32::INFINITY), "+Inf");
        assert_eq!(format_float(f32::NEG_INFINITY), "-Inf");
    }

    #[test]
    fn test_format_float_default_decimals() {
        assert_eq!(format_float(0.5), "0.50");
        assert_eq!(format_float(22.0), "22.00");
    }

    #[test]
    fn test_format_bool() {
        assert_eq!(format_bool(true), "1");
        assert_eq!(format_bool(false), "0");
    }

    #[test]
    fn test_escape_label_value() {
        assert!(matches!(escape_label_value("simple"), Cow::Borrowed("simple")));
        assert_eq!(escape_label_value("with\"quote"), "with\\\"quote");
        assert_eq!(escape_label_value("with\\backslash"), "with\\\\backslash");
        assert_eq!(escape_label_value("with\nnewline"), "with\\nnewline");
    }
}
