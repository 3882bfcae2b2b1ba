//! Display formatting for honk counts and play time.

/// Compact number for the HUD: `999`, `1.5k`, `2.25M`, `1.00e+9`.
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    if value < 1_000.0 {
        let whole = value.floor();
        return if whole == 0.0 {
            "0".to_string()
        } else {
            format!("{whole}")
        };
    }
    if value < 1_000_000.0 {
        return format!("{:.1}k", value / 1_000.0);
    }
    if value < 1_000_000_000.0 {
        return format!("{:.2}M", value / 1_000_000.0);
    }
    exponential(value)
}

/// `{:.2e}` prints `1.00e9`; the HUD wants an explicit exponent sign.
fn exponential(value: f64) -> String {
    let raw = format!("{value:.2e}");
    match raw.split_once('e') {
        Some((mantissa, exp)) if exp.starts_with('-') => format!("{mantissa}e{exp}"),
        Some((mantissa, exp)) => format!("{mantissa}e+{exp}"),
        None => raw,
    }
}

/// `HH:MM:SS`. Hours keep growing past 99.
pub fn format_time(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    let h = total / 3600;
    let m = (total % 3600) / 60;
    let s = total % 60;
    format!("{h:02}:{m:02}:{s:02}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_numbers_are_floored() {
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(0.9), "0");
        assert_eq!(format_number(123.7), "123");
        assert_eq!(format_number(999.99), "999");
    }

    #[test]
    fn thousands_and_millions() {
        assert_eq!(format_number(1_000.0), "1.0k");
        assert_eq!(format_number(1_550.0), "1.6k");
        assert_eq!(format_number(250_000.0), "250.0k");
        assert_eq!(format_number(1_000_000.0), "1.00M");
        assert_eq!(format_number(12_345_678.0), "12.35M");
    }

    #[test]
    fn billions_use_exponent() {
        assert_eq!(format_number(1e9), "1.00e+9");
        assert_eq!(format_number(2.5e12), "2.50e+12");
    }

    #[test]
    fn negative_small_numbers() {
        assert_eq!(format_number(-0.5), "-1");
        assert_eq!(format_number(-12.0), "-12");
    }

    #[test]
    fn time_formatting() {
        assert_eq!(format_time(0.0), "00:00:00");
        assert_eq!(format_time(59.9), "00:00:59");
        assert_eq!(format_time(3_661.0), "01:01:01");
        assert_eq!(format_time(360_000.0), "100:00:00");
        assert_eq!(format_time(-5.0), "00:00:00");
        assert_eq!(format_time(f64::NAN), "00:00:00");
    }
}
