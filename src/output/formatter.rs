use owo_colors::OwoColorize;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::model::{Horizon, NomogramModel, TotalPointsRange};
use crate::scoring::ScoreResult;

/// Shown wherever a survival estimate is not available
pub const NO_ESTIMATE: &str = "—";

const SCALE_INTERVALS: usize = 6;
const MIN_SCALE_WIDTH: usize = 30;
const MAX_SCALE_WIDTH: usize = 72;

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Scale width that fits the terminal, or the maximum for pipes
pub fn scale_width() -> usize {
    terminal_size()
        .map(|(Width(w), _)| (w as usize).saturating_sub(4))
        .unwrap_or(MAX_SCALE_WIDTH)
        .clamp(MIN_SCALE_WIDTH, MAX_SCALE_WIDTH)
}

/// Format a probability as a percentage ("97.1%"), or the placeholder for NaN
pub fn format_percent(p: f64, decimals: usize) -> String {
    if !p.is_finite() {
        return NO_ESTIMATE.to_string();
    }
    format!("{:.*}%", decimals, p * 100.0)
}

/// Points in shortest form: 8, 14.5
pub fn format_points(points: f64) -> String {
    format!("{}", points)
}

fn format_probability(p: f64) -> String {
    if p.is_finite() {
        format!("{:.4}", p)
    } else {
        "NaN".to_string()
    }
}

/// One-line summary: "Total=88 | s12=0.9708 s36=0.9066 s60=0.8674"
pub fn format_debug_line(result: &ScoreResult) -> String {
    format!(
        "Total={} | s12={} s36={} s60={}",
        format_points(result.total_points),
        format_probability(result.survival.s12),
        format_probability(result.survival.s36),
        format_probability(result.survival.s60)
    )
}

/// Text scale over the survival table range with a marker at `total`.
///
/// ```text
///  40      77     113     150     187     223     260
/// |-----------●----------------------------------------|
/// ```
pub fn format_scale(range: &TotalPointsRange, total: f64, width: usize, use_colors: bool) -> String {
    let width = width.max(MIN_SCALE_WIDTH);

    let mut axis = vec![' '; width];
    for (i, tick) in range.table_ticks(SCALE_INTERVALS).iter().enumerate() {
        let label: Vec<char> = format!("{}", tick.round()).chars().collect();
        let center = i * (width - 1) / SCALE_INTERVALS;
        let start = center
            .saturating_sub(label.len() / 2)
            .min(width.saturating_sub(label.len()));
        for (j, c) in label.iter().enumerate() {
            if let Some(slot) = axis.get_mut(start + j) {
                *slot = *c;
            }
        }
    }

    let marker = (range.scale_position(total) * (width - 1) as f64).round() as usize;
    let line = |span: std::ops::Range<usize>| -> String {
        span.map(|i| if i == 0 || i == width - 1 { '|' } else { '-' })
            .collect()
    };
    let before = line(0..marker);
    let after = line(marker + 1..width);
    let dot = if use_colors {
        "●".bold().green().to_string()
    } else {
        "●".to_string()
    };

    format!("{}\n{}{}{}", axis.iter().collect::<String>(), before, dot, after)
}

/// Full result: per-variable points, total, scale and survival estimates
pub fn format_score_report(
    result: &ScoreResult,
    range: &TotalPointsRange,
    decimals: usize,
    use_colors: bool,
) -> String {
    let label_width = result
        .contributions
        .iter()
        .map(|c| c.label.chars().count())
        .chain(std::iter::once("Total points".len()))
        .max()
        .unwrap_or(0);
    let option_width = result
        .contributions
        .iter()
        .map(|c| c.option.chars().count())
        .max()
        .unwrap_or(0);

    let mut lines = Vec::new();
    for c in &result.contributions {
        let points = format!("{:>5}", format_points(c.points));
        let option = format!("{:<width$}", c.option, width = option_width);
        let label = format!("{:<width$}", c.label, width = label_width);
        if use_colors {
            lines.push(format!("{}  {}  {}", label.bold(), option.cyan(), points));
        } else {
            lines.push(format!("{}  {}  {}", label, option, points));
        }
    }

    let total_label = format!("{:<width$}", "Total points", width = label_width);
    let total = format!(
        "{:>width$}",
        format_points(result.total_points),
        width = option_width + 9
    );
    if use_colors {
        lines.push(format!("{}{}", total_label.bold(), total.bold()));
    } else {
        lines.push(format!("{}{}", total_label, total));
    }

    lines.push(String::new());
    lines.push(format_scale(range, result.total_points, scale_width(), use_colors));
    lines.push(String::new());

    for horizon in Horizon::ALL {
        let value = format_percent(result.survival.value(horizon), decimals);
        let label = format!("Survival at {} months", horizon.months());
        if use_colors {
            lines.push(format!("{}  {}", label, value.bold().yellow()));
        } else {
            lines.push(format!("{}  {}", label, value));
        }
    }

    lines.join("\n")
}

/// Tab-separated result for scripting (no headers, no colors).
/// Rows: one `key, option, points` per variable, then `total` and `s12`/`s36`/`s60`.
pub fn format_tsv(result: &ScoreResult) -> String {
    let mut lines: Vec<String> = result
        .contributions
        .iter()
        .map(|c| format!("{}\t{}\t{}", c.key, c.option, format_points(c.points)))
        .collect();
    lines.push(format!("total\t\t{}", format_points(result.total_points)));
    for horizon in Horizon::ALL {
        let value = result.survival.value(horizon);
        let value = if value.is_finite() {
            format!("{:.4}", value)
        } else {
            String::new()
        };
        lines.push(format!("{}\t\t{}", horizon.field(), value));
    }
    lines.join("\n")
}

/// Variables, their options and both point ranges
pub fn format_variables(model: &NomogramModel, use_colors: bool) -> String {
    if model.variables().is_empty() {
        return "No variables defined.".to_string();
    }

    let mut lines = Vec::new();
    for variable in model.variables() {
        let header = format!(
            "{} [{}]  {}-{} pts",
            variable.label(),
            variable.key(),
            format_points(variable.min_points()),
            format_points(variable.max_points())
        );
        if use_colors {
            lines.push(header.bold().to_string());
        } else {
            lines.push(header);
        }

        let width = variable
            .options()
            .iter()
            .map(|o| o.label.chars().count())
            .max()
            .unwrap_or(0);
        for (i, option) in variable.options().iter().enumerate() {
            let default = if i == 0 { "  (default)" } else { "" };
            lines.push(format!(
                "  {:<width$}  {:>5}{}",
                option.label,
                format_points(option.points),
                default,
                width = width
            ));
        }
    }

    let range = model.total_points_range();
    lines.push(String::new());
    lines.push(format!(
        "Total by variables: {}-{}",
        format_points(range.min_by_variables),
        format_points(range.max_by_variables)
    ));
    lines.push(format!(
        "Total by table:     {}-{}",
        format_points(range.min_by_table),
        format_points(range.max_by_table)
    ));
    lines.join("\n")
}

/// Survival reference table sorted by points
pub fn format_survival_table(model: &NomogramModel, decimals: usize, use_colors: bool) -> String {
    let header = format!("{:>8}  {:>9}  {:>9}  {:>9}", "Points", "12 months", "36 months", "60 months");
    let mut lines = vec![if use_colors {
        header.bold().to_string()
    } else {
        header
    }];

    for row in model.sorted_survival_table() {
        lines.push(format!(
            "{:>8}  {:>9}  {:>9}  {:>9}",
            format_points(row.points),
            format_percent(row.s12, decimals),
            format_percent(row.s36, decimals),
            format_percent(row.s60, decimals)
        ));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{calculate_score, SelectionState};
    use crate::source::embedded_model;

    fn reference_result() -> (NomogramModel, ScoreResult) {
        let model = embedded_model().unwrap();
        let mut state = SelectionState::new();
        state.select(&model, "CA125", ">14.05").unwrap();
        state.select(&model, "PNII", "High").unwrap();
        let result = calculate_score(&model, &state);
        (model, result)
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(0.97084, 1), "97.1%");
        assert_eq!(format_percent(0.002771, 2), "0.28%");
        assert_eq!(format_percent(1.0, 0), "100%");
    }

    #[test]
    fn test_format_percent_placeholder() {
        assert_eq!(format_percent(f64::NAN, 1), "—");
        assert_eq!(format_percent(f64::INFINITY, 1), "—");
    }

    #[test]
    fn test_format_points() {
        assert_eq!(format_points(8.0), "8");
        assert_eq!(format_points(14.5), "14.5");
    }

    #[test]
    fn test_debug_line() {
        let (_, mut result) = reference_result();
        assert_eq!(result.total_points, 88.0);
        assert_eq!(
            format_debug_line(&result),
            "Total=88 | s12=0.9708 s36=0.9066 s60=0.8674"
        );
        result.survival.s36 = f64::NAN;
        assert!(format_debug_line(&result).contains("s36=NaN"));
    }

    #[test]
    fn test_scale_marker_position() {
        let (model, _) = reference_result();
        let range = model.total_points_range();

        let at_min = format_scale(range, 0.0, 40, false);
        let bar = at_min.lines().nth(1).unwrap();
        assert!(bar.starts_with('●'));
        assert_eq!(bar.chars().count(), 40);

        let at_max = format_scale(range, 500.0, 40, false);
        let bar = at_max.lines().nth(1).unwrap();
        assert!(bar.ends_with('●'));
    }

    #[test]
    fn test_scale_axis_ticks() {
        let (model, _) = reference_result();
        let scale = format_scale(model.total_points_range(), 100.0, 40, false);
        let axis = scale.lines().next().unwrap();
        assert!(axis.starts_with("40"));
        assert!(axis.trim_end().ends_with("260"));
        assert!(axis.contains("150"));
    }

    #[test]
    fn test_score_report_plain() {
        let (model, result) = reference_result();
        let report = format_score_report(&result, model.total_points_range(), 1, false);
        assert!(report.contains("Lymph metastases"));
        assert!(report.contains("Total points"));
        assert!(report.contains("Survival at 12 months  97.1%"));
        assert!(report.contains("Survival at 60 months  86.7%"));
    }

    #[test]
    fn test_score_report_placeholder() {
        let (model, mut result) = reference_result();
        result.survival.s60 = f64::NAN;
        let report = format_score_report(&result, model.total_points_range(), 1, false);
        assert!(report.contains("Survival at 60 months  —"));
    }

    #[test]
    fn test_tsv() {
        let (_, result) = reference_result();
        let tsv = format_tsv(&result);
        let lines: Vec<&str> = tsv.lines().collect();
        assert_eq!(lines[0], "Bloodloss\t≤150\t8");
        assert_eq!(lines[6], "total\t\t88");
        assert_eq!(lines[8], "s36\t\t0.9066");
    }

    #[test]
    fn test_variables_listing() {
        let model = embedded_model().unwrap();
        let listing = format_variables(&model, false);
        assert!(listing.contains("Lymph metastases [Lymph_metastases]  0-26 pts"));
        assert!(listing.contains("Stage I"));
        assert!(listing.contains("Total by variables: 40-230"));
        assert!(listing.contains("Total by table:     40-260"));
    }

    #[test]
    fn test_survival_table_listing() {
        let model = embedded_model().unwrap();
        let table = format_survival_table(&model, 1, false);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 13);
        assert!(lines[1].trim_start().starts_with("40"));
        assert!(lines[1].contains("99.0%"));
    }
}
