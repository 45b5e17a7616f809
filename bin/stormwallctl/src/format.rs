//! ---
//! sw_section: "05-hosts"
//! sw_subsection: "binary"
//! sw_type: "source"
//! sw_scope: "code"
//! sw_description: "Compact number formatting for terminal output."
//! sw_version: "v0.1.0"
//! sw_owner: "tbd"
//! ---

/// Render a rate or count compactly: `999`, `50k`, `1.2M`.
pub fn format_rate(value: f64) -> String {
    if !value.is_finite() || value < 0.0 {
        return "0".to_owned();
    }
    if value >= 999_950.0 {
        with_unit(value / 1_000_000.0, "M")
    } else if value >= 999.5 {
        with_unit(value / 1_000.0, "k")
    } else {
        format!("{value:.0}")
    }
}

fn with_unit(scaled: f64, unit: &str) -> String {
    let rendered = format!("{scaled:.1}");
    let trimmed = rendered.strip_suffix(".0").unwrap_or(&rendered);
    format!("{trimmed}{unit}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_across_units() {
        assert_eq!(format_rate(0.0), "0");
        assert_eq!(format_rate(999.0), "999");
        assert_eq!(format_rate(1_104.0), "1.1k");
        assert_eq!(format_rate(9_000.0), "9k");
        assert_eq!(format_rate(50_000.0), "50k");
        assert_eq!(format_rate(1_200_000.0), "1.2M");
        assert_eq!(format_rate(20_000_000.0), "20M");
    }

    #[test]
    fn promotes_at_rounding_boundaries() {
        assert_eq!(format_rate(999.7), "1k");
        assert_eq!(format_rate(999_960.0), "1M");
        assert_eq!(format_rate(f64::NAN), "0");
    }
}
