//! Lenient number parsing for grid cells and the display formats used by
//! the dashboard (grouped thousands, `k`/`M` suffixes, signed percentages).

use once_cell::sync::Lazy;
use regex::Regex;

static NUMERIC_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(?:[0-9]+\.?[0-9]*|\.[0-9]+)(?:[eE][+-]?[0-9]+)?")
        .expect("numeric prefix regex must compile")
});

/// Parse a locale-formatted cell entry.
///
/// Thousands separators are stripped, then the longest leading decimal
/// number is taken (`"12abc"` -> 12). Empty, unparseable or non-finite
/// input yields `0.0`; this never fails.
pub fn parse_cell_input(raw: &str) -> f64 {
    let cleaned: String = raw.chars().filter(|c| *c != ',').collect();
    NUMERIC_PREFIX
        .find(cleaned.trim_start())
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Sum that gives the same bits whatever order the values arrive in.
///
/// Values are added in ascending `total_cmp` order, so any permutation of
/// the same amounts produces an identical total.
pub fn order_independent_sum(values: impl IntoIterator<Item = f64>) -> f64 {
    let mut sorted: Vec<f64> = values.into_iter().collect();
    sorted.sort_unstable_by(f64::total_cmp);
    sorted.into_iter().sum()
}

/// Round to the nearest integer, ties toward positive infinity.
pub fn round_half_up(value: f64) -> f64 {
    let floor = value.floor();
    if value - floor >= 0.5 { floor + 1.0 } else { floor }
}

/// Round to `decimals` places, ties away from zero.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Fixed-point rendering with ties rounded away from zero.
pub fn format_fixed(value: f64, decimals: u32) -> String {
    format!("{:.*}", decimals as usize, round_to(value, decimals))
}

/// en-US grouping with up to three fraction digits (`1234567.5` -> `1,234,567.5`).
pub fn format_grouped(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let rounded = round_to(value, 3);
    let fixed = format!("{:.3}", rounded.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));

    let mut out = String::with_capacity(fixed.len() + int_part.len() / 3 + 1);
    if rounded < 0.0 {
        out.push('-');
    }
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    let frac = frac_part.trim_end_matches('0');
    if !frac.is_empty() {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Cell text: blank for zero, grouped otherwise.
pub fn format_cell(value: f64) -> String {
    if value == 0.0 {
        String::new()
    } else {
        format_grouped(value)
    }
}

/// Column footer: `216.5k`, or `-` when the column is not positive.
pub fn format_column_total(value: f64) -> String {
    if value > 0.0 {
        format!("{}k", format_fixed(value / 1000.0, 1))
    } else {
        "-".to_string()
    }
}

/// Dollar amount in millions, e.g. `$12.5M`.
pub fn format_millions(value: f64, decimals: u32) -> String {
    format!("${}M", format_fixed(value, decimals))
}

/// Percentage with an explicit `+` on positive values (`+8.7%`).
pub fn format_signed_pct(value: f64, decimals: u32) -> String {
    let sign = if value > 0.0 { "+" } else { "" };
    format!("{sign}{}%", format_fixed(value, decimals))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn sum_does_not_depend_on_order() {
        let forward = order_independent_sum([0.1, 0.2, 0.3]);
        let backward = order_independent_sum([0.3, 0.2, 0.1]);
        assert_eq!(forward.to_bits(), backward.to_bits());
        assert_eq!(order_independent_sum([]), 0.0);
    }

    #[test]
    fn parse_strips_thousands_separators() {
        assert_eq!(parse_cell_input("1,234"), 1234.0);
        assert_eq!(parse_cell_input("1,234,567.25"), 1_234_567.25);
    }

    #[test]
    fn parse_falls_back_to_zero() {
        assert_eq!(parse_cell_input(""), 0.0);
        assert_eq!(parse_cell_input("abc"), 0.0);
        assert_eq!(parse_cell_input("   "), 0.0);
        assert_eq!(parse_cell_input("-"), 0.0);
        assert_eq!(parse_cell_input("1e999"), 0.0);
    }

    #[test]
    fn parse_takes_leading_number() {
        assert_eq!(parse_cell_input("12abc"), 12.0);
        assert_eq!(parse_cell_input("  42"), 42.0);
        assert_eq!(parse_cell_input("-7.5"), -7.5);
        assert_eq!(parse_cell_input(".5"), 0.5);
        assert_eq!(parse_cell_input("3."), 3.0);
        assert_eq!(parse_cell_input("2e3"), 2000.0);
        assert_eq!(parse_cell_input("2e"), 2.0);
    }

    #[test]
    fn half_up_rounding_matches_dashboard() {
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_half_up(-2.5), -2.0);
        assert_eq!(round_half_up(154_499.4), 154_499.0);
    }

    #[test]
    fn fixed_rounds_ties_away_from_zero() {
        assert_eq!(format_fixed(9.375, 1), "9.4");
        assert_eq!(format_fixed(-5.263, 1), "-5.3");
        assert_eq!(format_fixed(0.6, 2), "0.60");
    }

    #[test]
    fn grouped_formatting() {
        assert_eq!(format_grouped(154_500.0), "154,500");
        assert_eq!(format_grouped(999.0), "999");
        assert_eq!(format_grouped(1000.0), "1,000");
        assert_eq!(format_grouped(-1_234_567.5), "-1,234,567.5");
        assert_eq!(format_grouped(0.1234), "0.123");
    }

    #[test]
    fn cell_and_footer_formatting() {
        assert_eq!(format_cell(0.0), "");
        assert_eq!(format_cell(45_000.0), "45,000");
        assert_eq!(format_column_total(216_500.0), "216.5k");
        assert_eq!(format_column_total(0.0), "-");
        assert_eq!(format_millions(12.5, 1), "$12.5M");
        assert_eq!(format_signed_pct(8.6956, 1), "+8.7%");
        assert_eq!(format_signed_pct(-5.26, 1), "-5.3%");
    }

    proptest! {
        #[test]
        fn grouped_integers_parse_back(n in 0u64..10_000_000_000) {
            let text = format_grouped(n as f64);
            prop_assert_eq!(parse_cell_input(&text), n as f64);
        }

        #[test]
        fn parse_never_yields_non_finite(s in ".*") {
            prop_assert!(parse_cell_input(&s).is_finite());
        }
    }
}
