use crate::model::types::{Horizon, SurvivalRow};

/// Piecewise-linear survival estimate for `total_points`.
///
/// The table is sorted by points (stable), the total is clamped into the
/// table's range and never extrapolated. An exact anchor match returns that
/// row's value (first match wins on duplicate points). Returns NaN for an
/// empty table, a NaN total, a zero-width bracket or a non-finite anchor.
pub fn interpolate(table: &[SurvivalRow], total_points: f64, horizon: Horizon) -> f64 {
    if table.is_empty() || total_points.is_nan() {
        return f64::NAN;
    }

    let mut sorted: Vec<&SurvivalRow> = table.iter().collect();
    sorted.sort_by(|a, b| {
        a.points
            .partial_cmp(&b.points)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let min = sorted[0].points;
    let max = sorted[sorted.len() - 1].points;
    if !(min <= max) {
        return f64::NAN;
    }
    let x = total_points.max(min).min(max);

    if let Some(row) = sorted.iter().find(|row| row.points == x) {
        return row.value(horizon);
    }

    for pair in sorted.windows(2) {
        let (x0, x1) = (pair[0].points, pair[1].points);
        if x >= x0 && x <= x1 {
            let y0 = pair[0].value(horizon);
            let y1 = pair[1].value(horizon);
            if !y0.is_finite() || !y1.is_finite() || x1 == x0 {
                return f64::NAN;
            }
            let t = (x - x0) / (x1 - x0);
            return y0 + t * (y1 - y0);
        }
    }

    sorted[sorted.len() - 1].value(horizon)
}
