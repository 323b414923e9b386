use crate::model::{ModelError, NomogramModel, SurvivalRow, Variable, VariableOption};

/// key, label, options as (label, points)
type VariableDef = (&'static str, &'static str, &'static [(&'static str, f64)]);

const VARIABLES: &[VariableDef] = &[
    ("Bloodloss", "Bloodloss", &[("≤150", 8.0), (">150", 26.0)]),
    ("CA125", "CA125", &[("≤14.05", 4.0), (">14.05", 26.0)]),
    ("PNII", "PNII", &[("Low", 0.0), ("High", 26.0)]),
    ("Lymph_metastases", "Lymph metastases", &[("≤3", 0.0), (">3", 26.0)]),
    (
        "pTNM",
        "pTNM",
        &[("Stage I", 26.0), ("Stage II", 78.0), ("Stage III", 100.0)],
    ),
    ("Age", "Age", &[("≤66", 2.0), (">66", 26.0)]),
];

/// points, s12, s36, s60
const SURVIVAL_TABLE: &[[f64; 4]] = &[
    [40.0, 0.9899, 0.9668, 0.9521],
    [60.0, 0.9844, 0.9491, 0.927],
    [80.0, 0.976, 0.9225, 0.8894],
    [100.0, 0.9631, 0.8828, 0.8344],
    [120.0, 0.9436, 0.8248, 0.7559],
    [140.0, 0.9142, 0.7426, 0.649],
    [160.0, 0.8705, 0.6313, 0.5126],
    [180.0, 0.8071, 0.4912, 0.3561],
    [200.0, 0.718, 0.3334, 0.2028],
    [220.0, 0.5994, 0.1831, 0.08494],
    [240.0, 0.4534, 0.07257, 0.02214],
    [260.0, 0.2945, 0.01736, 0.002771],
];

/// The reference nomogram compiled into the binary.
pub fn embedded_model() -> Result<NomogramModel, ModelError> {
    let variables = VARIABLES
        .iter()
        .map(|(key, label, options)| {
            let options = options
                .iter()
                .map(|(label, points)| VariableOption::new(*label, *label, *points))
                .collect();
            Variable::new(*key, *label, options)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let survival_table = SURVIVAL_TABLE
        .iter()
        .map(|[points, s12, s36, s60]| SurvivalRow::new(*points, *s12, *s36, *s60))
        .collect();

    NomogramModel::new(variables, survival_table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_model_builds() {
        let model = embedded_model().unwrap();
        let keys: Vec<_> = model.variables().iter().map(|v| v.key()).collect();
        assert_eq!(
            keys,
            vec!["Bloodloss", "CA125", "PNII", "Lymph_metastases", "pTNM", "Age"]
        );
        assert_eq!(model.survival_table().len(), 12);
    }

    #[test]
    fn test_embedded_ranges() {
        let model = embedded_model().unwrap();
        let range = model.total_points_range();
        assert_eq!(range.min_by_variables, 40.0);
        assert_eq!(range.max_by_variables, 230.0);
        assert_eq!(range.min_by_table, 40.0);
        assert_eq!(range.max_by_table, 260.0);
    }

    #[test]
    fn test_embedded_labels() {
        let model = embedded_model().unwrap();
        assert_eq!(
            model.variable("Lymph_metastases").unwrap().label(),
            "Lymph metastases"
        );
    }
}
