//! Number formatting shared by the report sections.

use std::sync::OnceLock;

use numfmt::{Formatter, Precision};

/// Formats an amount in rupees with two decimal places and Indian digit
/// grouping, e.g. "₹1,53,999.50".
///
/// The amount is rounded to the nearest paisa first.
pub fn format_rupees(number: f64) -> String {
    static POSITIVE_FMT: OnceLock<Formatter> = OnceLock::new();

    let positive_fmt = POSITIVE_FMT.get_or_init(|| {
        Formatter::currency("₹")
            .expect("rupee prefix is a valid currency prefix")
            .precision(Precision::Decimals(2))
    });

    static NEGATIVE_FMT: OnceLock<Formatter> = OnceLock::new();

    let negative_fmt = NEGATIVE_FMT.get_or_init(|| {
        Formatter::currency("-₹")
            .expect("rupee prefix is a valid currency prefix")
            .precision(Precision::Decimals(2))
    });

    // numfmt switches to scientific notation below 0.01 at two decimals.
    let rounded = (number * 100.0).round() / 100.0;

    let (prefix, formatted_string) = if rounded < 0.0 {
        ("-₹", negative_fmt.fmt_string(rounded.abs()))
    } else if rounded > 0.0 {
        ("₹", positive_fmt.fmt_string(rounded))
    } else if rounded == 0.0 {
        // numfmt renders zero as "0"
        return "₹0.00".to_owned();
    } else {
        return positive_fmt.fmt_string(rounded);
    };

    // Infinite amounts come back without the prefix, and amounts too large for
    // plain notation use an exponent. Neither can be regrouped.
    let Some(amount) = formatted_string.strip_prefix(prefix) else {
        return formatted_string;
    };
    if amount.contains('e') {
        return formatted_string;
    }

    // numfmt omits trailing zeros, so "12.30" comes out as "12.3" and "12.00"
    // as "12".
    let (rupees, paise) = amount.split_once('.').unwrap_or((amount, ""));

    format!(
        "{prefix}{}.{paise:0<2}",
        group_lakhs(&rupees.replace(',', ""))
    )
}

/// Groups whole rupees the Indian way: the last three digits, then pairs.
fn group_lakhs(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_owned();
    }

    let (lakhs, thousands) = digits.split_at(digits.len() - 3);
    let mut groups = Vec::new();
    let mut end = lakhs.len();

    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&lakhs[start..end]);
        end = start;
    }

    groups.reverse();

    format!("{},{thousands}", groups.join(","))
}

/// Formats a value in the short form used in matrix cells.
///
/// Values of a crore or more use "Cr", a lakh or more "L", a thousand or more
/// "k", with at most one decimal place. Smaller values show the whole number.
///
/// ```
/// use sales_hub::format_compact;
///
/// assert_eq!(format_compact(45_000.0), "45k");
/// assert_eq!(format_compact(125_000.0), "1.3L");
/// assert_eq!(format_compact(950.0), "950");
/// ```
pub fn format_compact(value: f64) -> String {
    let (scaled, suffix) = if value >= 10_000_000.0 {
        (value / 10_000_000.0, "Cr")
    } else if value >= 100_000.0 {
        (value / 100_000.0, "L")
    } else if value >= 1_000.0 {
        (value / 1_000.0, "k")
    } else {
        return format!("{}", value.trunc() as i64);
    };

    let rounded = format!("{scaled:.1}");
    let trimmed = rounded.strip_suffix(".0").unwrap_or(&rounded);

    format!("{trimmed}{suffix}")
}

/// Formats a share as a whole-number percentage, avoiding "-0%".
pub fn format_percentage(value: f64) -> String {
    let rounded = value.round();
    if rounded.abs() < 0.5 {
        "0%".to_owned()
    } else {
        format!("{rounded:.0}%")
    }
}
