/// Insert `,` every three digits of a non-negative integer.
fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn signed(value: f64, body: impl FnOnce(u64) -> String) -> String {
    let rounded = value.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    format!("{sign}{}", body(rounded.abs() as u64))
}

/// Whole dollars with separators, e.g. `$1,234,567`.
pub fn format_currency(value: f64) -> String {
    signed(value, |n| format!("${}", group_thousands(n)))
}

/// Short dollars for chart labels, e.g. `$2.1M`, `$450K`, `$50`.
pub fn format_compact_currency(value: f64) -> String {
    let abs_value = value.abs();
    let sign = if value < 0.0 { "-" } else { "" };

    if abs_value >= 1_000_000.0 {
        format!("{sign}${:.1}M", abs_value / 1_000_000.0)
    } else if abs_value >= 1_000.0 {
        format!("{sign}${:.0}K", abs_value / 1_000.0)
    } else {
        format!("{sign}${abs_value:.0}")
    }
}

/// `1,234 units`
pub fn format_units(value: f64) -> String {
    signed(value, |n| format!("{} units", group_thousands(n)))
}

pub fn format_count(count: usize) -> String {
    group_thousands(count as u64)
}

pub fn format_percentage(fraction: f64) -> String {
    format!("{:.1}%", fraction * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency() {
        assert_eq!(format_currency(0.0), "$0");
        assert_eq!(format_currency(999.4), "$999");
        assert_eq!(format_currency(1_234_567.5), "$1,234,568");
        assert_eq!(format_currency(-1500.0), "-$1,500");
    }

    #[test]
    fn compact_currency() {
        assert_eq!(format_compact_currency(2_100_000.0), "$2.1M");
        assert_eq!(format_compact_currency(450_000.0), "$450K");
        assert_eq!(format_compact_currency(50.0), "$50");
    }

    #[test]
    fn units_and_counts() {
        assert_eq!(format_units(274.6), "275 units");
        assert_eq!(format_units(12_000.0), "12,000 units");
        assert_eq!(format_count(1_000_000), "1,000,000");
        assert_eq!(format_count(7), "7");
        assert_eq!(format_percentage(0.125), "12.5%");
    }
}
