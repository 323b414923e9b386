use serde::Serialize;

use super::types::{SurvivalRow, Variable};

/// Achievable total-points bounds.
///
/// The `*_by_variables` pair is the theoretical range of any selection; the
/// `*_by_table` pair is what the survival table covers. Clamping and scale
/// positioning always use the table pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TotalPointsRange {
    pub min_by_variables: f64,
    pub max_by_variables: f64,
    pub min_by_table: f64,
    pub max_by_table: f64,
}

impl TotalPointsRange {
    pub fn compute(variables: &[Variable], table: &[SurvivalRow]) -> Self {
        let min_by_variables = variables.iter().map(Variable::min_points).fold(0.0, |acc, p| acc + p);
        let max_by_variables = variables.iter().map(Variable::max_points).fold(0.0, |acc, p| acc + p);

        let (min_by_table, max_by_table) = if table.is_empty() {
            (min_by_variables, max_by_variables)
        } else {
            table.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), row| {
                (lo.min(row.points), hi.max(row.points))
            })
        };

        Self {
            min_by_variables,
            max_by_variables,
            min_by_table,
            max_by_table,
        }
    }

    pub fn clamp_to_table(&self, total_points: f64) -> f64 {
        total_points.max(self.min_by_table).min(self.max_by_table)
    }

    /// Fraction in [0, 1] of where `total_points` sits across the table range.
    pub fn scale_position(&self, total_points: f64) -> f64 {
        let width = self.max_by_table - self.min_by_table;
        let width = if width == 0.0 { 1.0 } else { width };
        (self.clamp_to_table(total_points) - self.min_by_table) / width
    }

    /// `intervals + 1` evenly spaced tick values over the table range
    pub fn table_ticks(&self, intervals: usize) -> Vec<f64> {
        if intervals == 0 {
            return vec![self.min_by_table];
        }
        let step = (self.max_by_table - self.min_by_table) / intervals as f64;
        (0..=intervals)
            .map(|i| self.min_by_table + step * i as f64)
            .collect()
    }
}
