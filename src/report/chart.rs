//! Horizontal text bar chart for `(label, value)` series

/// Render one bar per entry, scaled so the largest magnitude fills `width`.
/// Negative values are drawn with `-` instead of `#`.
pub fn bar_chart(series: &[(String, f64)], width: usize) -> String {
    let label_width = series.iter().map(|(l, _)| l.chars().count()).max().unwrap_or(0);
    let max = series
        .iter()
        .map(|(_, v)| v.abs())
        .fold(0.0_f64, f64::max);

    let mut out = String::new();
    for (label, value) in series {
        let len = if max > 0.0 {
            ((value.abs() / max) * width as f64).round() as usize
        } else {
            0
        };
        let glyph = if *value < 0.0 { "-" } else { "#" };
        out.push_str(&format!(
            "{:<lw$} | {:<w$} {:.1}\n",
            label,
            glyph.repeat(len),
            value,
            lw = label_width,
            w = width
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(values: &[(&str, f64)]) -> Vec<(String, f64)> {
        values.iter().map(|(l, v)| (l.to_string(), *v)).collect()
    }

    #[test]
    fn test_bar_chart_scales_to_largest() {
        let chart = bar_chart(
            &series(&[("Part-01", 65.0), ("Part-02", 110.0), ("Part-03", 25.0)]),
            22,
        );
        insta::assert_snapshot!(chart, @r"
        Part-01 | #############          65.0
        Part-02 | ###################### 110.0
        Part-03 | #####                  25.0
        ");
    }

    #[test]
    fn test_negative_values() {
        let chart = bar_chart(&series(&[("A", 50.0), ("B", -25.0)]), 4);
        assert_eq!(chart, "A | #### 50.0\nB | --   -25.0\n");
    }

    #[test]
    fn test_empty_series() {
        assert_eq!(bar_chart(&[], 10), "");
    }
}
