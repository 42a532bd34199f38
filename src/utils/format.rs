//! Number formatting shared by labels, hover text and summaries.

/// Percentage of `value` in `total`, rounded to two decimals
///
/// A zero (or negative) total reports 0.0 instead of dividing.
pub fn percentage(value: f64, total: f64) -> f64 {
    if total > 0.0 {
        ((value / total) * 100.0 * 100.0).round() / 100.0
    } else {
        0.0
    }
}

/// Format a percentage with two decimals and a trailing `%`
pub fn format_percentage(value: f64, total: f64) -> String {
    format!("{:.2}%", percentage(value, total))
}

/// Format a value with no decimals and `,` as thousands separator
///
/// # Example
/// ```ignore
/// assert_eq!(format_value(1234567.4), "1,234,567");
/// ```
pub fn format_value(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let rounded = format!("{:.0}", value.abs());
    let mut grouped = String::with_capacity(rounded.len() + rounded.len() / 3);
    for (i, ch) in rounded.chars().enumerate() {
        if i > 0 && (rounded.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if value < 0.0 && rounded != "0" {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// Node text shown inside a treemap box: `label (value, pct%)`
pub fn display_label(label: &str, value: f64, total: f64) -> String {
    format!(
        "{} ({}, {})",
        label,
        format_value(value),
        format_percentage(value, total)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_value_groups_thousands() {
        assert_eq!(format_value(0.0), "0");
        assert_eq!(format_value(999.0), "999");
        assert_eq!(format_value(1000.0), "1,000");
        assert_eq!(format_value(1234567.4), "1,234,567");
        assert_eq!(format_value(-25000.0), "-25,000");
    }

    #[test]
    fn test_percentage_rounding() {
        assert_eq!(percentage(1.0, 3.0), 33.33);
        assert_eq!(percentage(2.0, 3.0), 66.67);
        assert_eq!(percentage(5.0, 0.0), 0.0);
    }

    #[test]
    fn test_display_label() {
        assert_eq!(display_label("Billing", 1500.0, 6000.0), "Billing (1,500, 25.00%)");
        assert_eq!(display_label("Empty", 3.0, 0.0), "Empty (3, 0.00%)");
    }
}
