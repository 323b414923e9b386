use serde::Serialize;

use super::selection::SelectionState;
use crate::model::{NomogramModel, SurvivalEstimate, Variable, VariableOption};

#[derive(Debug, Clone, Serialize)]
pub struct VariableContribution {
    pub key: String,   // e.g. "pTNM"
    pub label: String, // e.g. "Lymph metastases"
    pub option: String,
    pub points: f64,
    /// True when the recorded selection was missing or unknown and the
    /// first option was used instead
    pub defaulted: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoreResult {
    pub total_points: f64,
    pub contributions: Vec<VariableContribution>,
    pub survival: SurvivalEstimate,
    /// Position of the total across the survival table range, 0.0..=1.0
    pub scale_position: f64,
}

/// The option whose value matches `selected_value`, or the variable's first
/// option when nothing matches.
pub fn selected_option<'a>(variable: &'a Variable, selected_value: Option<&str>) -> &'a VariableOption {
    selected_value
        .and_then(|value| variable.option(value))
        .unwrap_or_else(|| variable.first_option())
}

/// Sum of the selected option points over all variables, in model order.
pub fn total_score(model: &NomogramModel, selections: &SelectionState) -> f64 {
    model
        .variables()
        .iter()
        .map(|v| finite_or_zero(selected_option(v, selections.get(v.key())).points))
        .fold(0.0, |acc, points| acc + points)
}

pub fn calculate_score(model: &NomogramModel, selections: &SelectionState) -> ScoreResult {
    let contributions: Vec<VariableContribution> = model
        .variables()
        .iter()
        .map(|variable| {
            let recorded = selections.get(variable.key());
            let option = selected_option(variable, recorded);
            VariableContribution {
                key: variable.key().to_string(),
                label: variable.label().to_string(),
                option: option.label.clone(),
                points: option.points,
                defaulted: recorded != Some(option.value.as_str()),
            }
        })
        .collect();

    let total_points = contributions
        .iter()
        .map(|c| finite_or_zero(c.points))
        .fold(0.0, |acc, points| acc + points);

    ScoreResult {
        total_points,
        contributions,
        survival: model.estimate(total_points),
        scale_position: model.total_points_range().scale_position(total_points),
    }
}

fn finite_or_zero(points: f64) -> f64 {
    if points.is_finite() {
        points
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Horizon;
    use crate::source::embedded_model;

    fn reference_selection(model: &NomogramModel) -> SelectionState {
        let mut state = SelectionState::new();
        for (key, value) in [
            ("Bloodloss", "≤150"),
            ("CA125", ">14.05"),
            ("PNII", "High"),
            ("Lymph_metastases", "≤3"),
            ("pTNM", "Stage I"),
            ("Age", "≤66"),
        ] {
            state.select(model, key, value).unwrap();
        }
        state
    }

    #[test]
    fn test_selected_option_match() {
        let model = embedded_model().unwrap();
        let variable = model.variable("pTNM").unwrap();
        assert_eq!(selected_option(variable, Some("Stage II")).points, 78.0);
    }

    #[test]
    fn test_selected_option_falls_back_to_first() {
        let model = embedded_model().unwrap();
        let variable = model.variable("pTNM").unwrap();
        assert_eq!(selected_option(variable, Some("Stage IV")).value, "Stage I");
        assert_eq!(selected_option(variable, None).value, "Stage I");
    }

    #[test]
    fn test_default_selection_law() {
        let model = embedded_model().unwrap();
        let state = SelectionState::new();
        for variable in model.variables() {
            assert_eq!(
                selected_option(variable, state.get(variable.key())),
                variable.first_option()
            );
        }
    }

    #[test]
    fn test_default_total_is_sum_of_first_options() {
        let model = embedded_model().unwrap();
        // 8 + 4 + 0 + 0 + 26 + 2
        assert_eq!(total_score(&model, &SelectionState::new()), 40.0);
    }

    #[test]
    fn test_reference_scenario() {
        let model = embedded_model().unwrap();
        let state = reference_selection(&model);
        let result = calculate_score(&model, &state);

        assert_eq!(result.total_points, 88.0);
        assert!((result.survival.s12 - 0.97084).abs() < 1e-4);
        assert!((result.survival.s36 - 0.9066).abs() < 1e-4);
        assert!((result.survival.s60 - 0.8674).abs() < 1e-4);
        assert!(result.contributions.iter().all(|c| !c.defaulted));
        assert!((result.scale_position - 48.0 / 220.0).abs() < 1e-9);
    }

    #[test]
    fn test_above_table_matches_table_max() {
        let model = embedded_model().unwrap();
        let mut state = SelectionState::new();
        for (key, value) in [
            ("Bloodloss", ">150"),
            ("CA125", ">14.05"),
            ("PNII", "High"),
            ("Lymph_metastases", ">3"),
            ("pTNM", "Stage III"),
            ("Age", ">66"),
        ] {
            state.select(&model, key, value).unwrap();
        }
        let result = calculate_score(&model, &state);
        assert_eq!(result.total_points, 230.0);

        let at_max = model.estimate(260.0);
        let beyond = model.estimate(300.0);
        assert_eq!(at_max, beyond);
        assert_eq!(beyond.value(Horizon::S12), 0.2945);
    }

    #[test]
    fn test_stale_selection_counts_as_default() {
        let model = embedded_model().unwrap();
        let mut state = SelectionState::new();
        state.insert("pTNM", "Stage IV");
        let result = calculate_score(&model, &state);
        let ptnm = result.contributions.iter().find(|c| c.key == "pTNM").unwrap();
        assert_eq!(ptnm.points, 26.0);
        assert!(ptnm.defaulted);
        assert_eq!(result.total_points, 40.0);
    }

    #[test]
    fn test_queries_do_not_mutate_selection() {
        let model = embedded_model().unwrap();
        let state = reference_selection(&model);
        let before = state.clone();
        let first = total_score(&model, &state);
        let second = total_score(&model, &state);
        let _ = calculate_score(&model, &state);
        assert_eq!(first, second);
        assert_eq!(state, before);
    }

    #[test]
    fn test_total_matches_breakdown() {
        let model = embedded_model().unwrap();
        let state = reference_selection(&model);
        let result = calculate_score(&model, &state);
        let sum: f64 = result.contributions.iter().map(|c| c.points).sum();
        assert_eq!(sum, total_score(&model, &state));
    }
}
