use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::error::ModelError;
use super::range::TotalPointsRange;
use crate::scoring::interpolate::interpolate;

/// One selectable answer for a variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableOption {
    pub label: String,
    /// Selection key, unique within the owning variable
    pub value: String,
    pub points: f64,
}

impl VariableOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>, points: f64) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            points,
        }
    }
}

/// A categorical clinical variable with its ordered options.
///
/// `min_points`/`max_points` are derived from the options and cannot be set
/// directly.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Variable {
    key: String,
    label: String,
    options: Vec<VariableOption>,
    min_points: f64,
    max_points: f64,
}

impl Variable {
    /// Build a variable, rejecting empty option lists, non-finite points and
    /// duplicate option values.
    pub fn new(
        key: impl Into<String>,
        label: impl Into<String>,
        options: Vec<VariableOption>,
    ) -> Result<Self, ModelError> {
        let key = key.into();
        if options.is_empty() {
            return Err(ModelError::EmptyVariable(key));
        }

        let mut seen = HashSet::new();
        for option in &options {
            if !option.points.is_finite() {
                return Err(ModelError::NonFinitePoints {
                    variable: key,
                    value: option.value.clone(),
                });
            }
            if !seen.insert(option.value.as_str()) {
                return Err(ModelError::DuplicateOption {
                    variable: key,
                    value: option.value.clone(),
                });
            }
        }

        let min_points = options.iter().map(|o| o.points).fold(f64::INFINITY, f64::min);
        let max_points = options
            .iter()
            .map(|o| o.points)
            .fold(f64::NEG_INFINITY, f64::max);

        Ok(Self {
            key,
            label: label.into(),
            options,
            min_points,
            max_points,
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn options(&self) -> &[VariableOption] {
        &self.options
    }

    pub fn min_points(&self) -> f64 {
        self.min_points
    }

    pub fn max_points(&self) -> f64 {
        self.max_points
    }

    /// The default selection. Options are never empty once constructed.
    pub fn first_option(&self) -> &VariableOption {
        &self.options[0]
    }

    pub fn option(&self, value: &str) -> Option<&VariableOption> {
        self.options.iter().find(|o| o.value == value)
    }
}

/// Survival horizon columns of the reference table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Horizon {
    #[serde(rename = "s12")]
    S12,
    #[serde(rename = "s36")]
    S36,
    #[serde(rename = "s60")]
    S60,
}

impl Horizon {
    pub const ALL: [Horizon; 3] = [Horizon::S12, Horizon::S36, Horizon::S60];

    pub fn months(self) -> u32 {
        match self {
            Horizon::S12 => 12,
            Horizon::S36 => 36,
            Horizon::S60 => 60,
        }
    }

    /// Field name as it appears in the reference data ("s12", ...)
    pub fn field(self) -> &'static str {
        match self {
            Horizon::S12 => "s12",
            Horizon::S36 => "s36",
            Horizon::S60 => "s60",
        }
    }
}

/// One anchor of the survival reference table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurvivalRow {
    pub points: f64,
    pub s12: f64,
    pub s36: f64,
    pub s60: f64,
}

impl SurvivalRow {
    pub fn new(points: f64, s12: f64, s36: f64, s60: f64) -> Self {
        Self {
            points,
            s12,
            s36,
            s60,
        }
    }

    pub fn value(&self, horizon: Horizon) -> f64 {
        match horizon {
            Horizon::S12 => self.s12,
            Horizon::S36 => self.s36,
            Horizon::S60 => self.s60,
        }
    }

    fn is_finite(&self) -> bool {
        [self.points, self.s12, self.s36, self.s60]
            .iter()
            .all(|v| v.is_finite())
    }
}

/// Interpolated survival probabilities for one total. NaN means no estimate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SurvivalEstimate {
    pub s12: f64,
    pub s36: f64,
    pub s60: f64,
}

impl SurvivalEstimate {
    pub fn value(&self, horizon: Horizon) -> f64 {
        match horizon {
            Horizon::S12 => self.s12,
            Horizon::S36 => self.s36,
            Horizon::S60 => self.s60,
        }
    }
}

/// Immutable, validated nomogram: variables in display order, the survival
/// reference table and the derived point ranges.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NomogramModel {
    variables: Vec<Variable>,
    survival_table: Vec<SurvivalRow>,
    total_points_range: TotalPointsRange,
}

impl NomogramModel {
    pub fn new(
        variables: Vec<Variable>,
        survival_table: Vec<SurvivalRow>,
    ) -> Result<Self, ModelError> {
        if survival_table.is_empty() {
            return Err(ModelError::EmptySurvivalTable("survival table".to_string()));
        }
        if let Some(index) = survival_table.iter().position(|row| !row.is_finite()) {
            return Err(ModelError::NonFiniteSurvivalRow { index });
        }

        let mut keys = HashSet::new();
        for variable in &variables {
            if !keys.insert(variable.key()) {
                return Err(ModelError::DuplicateVariable(variable.key().to_string()));
            }
        }

        let total_points_range = TotalPointsRange::compute(&variables, &survival_table);

        Ok(Self {
            variables,
            survival_table,
            total_points_range,
        })
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn variable(&self, key: &str) -> Option<&Variable> {
        self.variables.iter().find(|v| v.key() == key)
    }

    /// Survival rows in their original input order
    pub fn survival_table(&self) -> &[SurvivalRow] {
        &self.survival_table
    }

    /// Survival rows sorted ascending by points; ties keep input order
    pub fn sorted_survival_table(&self) -> Vec<SurvivalRow> {
        let mut rows = self.survival_table.clone();
        rows.sort_by(|a, b| {
            a.points
                .partial_cmp(&b.points)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        rows
    }

    pub fn total_points_range(&self) -> &TotalPointsRange {
        &self.total_points_range
    }

    pub fn interpolate(&self, total_points: f64, horizon: Horizon) -> f64 {
        interpolate(&self.survival_table, total_points, horizon)
    }

    pub fn estimate(&self, total_points: f64) -> SurvivalEstimate {
        SurvivalEstimate {
            s12: self.interpolate(total_points, Horizon::S12),
            s36: self.interpolate(total_points, Horizon::S36),
            s60: self.interpolate(total_points, Horizon::S60),
        }
    }
}
