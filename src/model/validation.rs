use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::cell::{cell_at, Cell};
use super::error::ModelError;
use super::types::{NomogramModel, SurvivalRow, Variable, VariableOption};

/// Sheet holding the survival reference table unless configured otherwise
pub const DEFAULT_SURVIVAL_SHEET: &str = "TotalPoints_AllTimes";

/// One named block of untyped rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawSheet {
    pub name: String,
    /// Display label override; derived from the variable key when absent
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub rows: Vec<Vec<Cell>>,
}

/// Ordered sheets of a tabular data source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawWorkbook {
    pub sheets: Vec<RawSheet>,
}

impl RawWorkbook {
    pub fn sheet(&self, name: &str) -> Option<&RawSheet> {
        self.sheets.iter().find(|s| s.name == name)
    }
}

/// Derive a display label from a variable key ("Lymph_metastases" -> "Lymph metastases")
pub fn pretty_label(key: &str) -> String {
    key.replace('_', " ")
}

/// Turn a raw workbook into a validated model.
///
/// Malformed rows are skipped and variable sheets without any valid option
/// are dropped. Only a missing or empty survival table fails the load.
pub fn build_model(workbook: &RawWorkbook, survival_sheet: &str) -> Result<NomogramModel, ModelError> {
    let mut variables = Vec::new();
    let mut keys = HashSet::new();

    for sheet in workbook.sheets.iter().filter(|s| s.name != survival_sheet) {
        let Some(variable) = parse_variable_sheet(sheet) else {
            continue;
        };
        if !keys.insert(variable.key().to_string()) {
            log::warn!(
                "Sheet {}: variable {} already defined, dropping sheet",
                sheet.name,
                variable.key()
            );
            continue;
        }
        variables.push(variable);
    }

    let sheet = workbook
        .sheet(survival_sheet)
        .ok_or_else(|| ModelError::MissingSurvivalSheet(survival_sheet.to_string()))?;
    let survival_table = parse_survival_rows(&sheet.rows);
    if survival_table.is_empty() {
        return Err(ModelError::EmptySurvivalTable(survival_sheet.to_string()));
    }

    if variables.is_empty() {
        log::warn!("Workbook defines no usable variables");
    }
    log::debug!(
        "Parsed {} variables and {} survival rows",
        variables.len(),
        survival_table.len()
    );

    NomogramModel::new(variables, survival_table)
}

/// Parse one variable sheet. Returns None when the sheet yields no variable.
///
/// Row 0, column 0 holds the key; every later row is `label | points`.
pub fn parse_variable_sheet(sheet: &RawSheet) -> Option<Variable> {
    if sheet.rows.len() < 2 {
        log::warn!("Sheet {}: fewer than two rows, dropping", sheet.name);
        return None;
    }

    let key = match sheet.rows[0].first().and_then(Cell::as_text) {
        Some(key) if !key.is_empty() => key,
        _ => {
            log::warn!("Sheet {}: missing variable key, dropping", sheet.name);
            return None;
        }
    };

    let mut options: Vec<VariableOption> = Vec::new();
    for (i, row) in sheet.rows.iter().enumerate().skip(1) {
        let label = cell_at(row, 0).as_text().filter(|l| !l.is_empty());
        let points = cell_at(row, 1).as_number();
        let (Some(label), Some(points)) = (label, points) else {
            log::debug!("Sheet {}: skipping malformed row {}", sheet.name, i + 1);
            continue;
        };
        if options.iter().any(|o| o.value == label) {
            log::debug!(
                "Sheet {}: skipping duplicate option '{}' in row {}",
                sheet.name,
                label,
                i + 1
            );
            continue;
        }
        options.push(VariableOption::new(label.clone(), label, points));
    }

    if options.is_empty() {
        log::warn!("Sheet {}: no valid options, dropping variable {}", sheet.name, key);
        return None;
    }

    let label = sheet
        .label
        .as_deref()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| pretty_label(&key));

    // Options are non-empty, finite and de-duplicated at this point
    Variable::new(key, label, options).ok()
}

/// Parse survival rows after the header row: `points | s12 | s36 | s60`.
pub fn parse_survival_rows(rows: &[Vec<Cell>]) -> Vec<SurvivalRow> {
    rows.iter()
        .enumerate()
        .skip(1)
        .filter_map(|(i, row)| {
            let values: Option<Vec<f64>> = (0..4).map(|c| cell_at(row, c).as_number()).collect();
            match values.as_deref() {
                Some(&[points, s12, s36, s60]) => Some(SurvivalRow::new(points, s12, s36, s60)),
                _ => {
                    log::debug!("Survival table: skipping malformed row {}", i + 1);
                    None
                }
            }
        })
        .collect()
}
