use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Calculator configuration.
///
/// Example YAML:
/// ```yaml
/// data: ~/nomogram/points_tables.json
/// survival_sheet: TotalPoints_AllTimes
/// fallback_to_embedded: true
/// percent_decimals: 1
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Workbook file (.json, .yaml, .yml). Embedded data is used when absent.
    #[serde(default)]
    pub data: Option<PathBuf>,

    /// Name of the sheet holding the survival table (default: TotalPoints_AllTimes)
    #[serde(default)]
    pub survival_sheet: Option<String>,

    /// Use the embedded data when the workbook can't be loaded (default: true)
    #[serde(default)]
    pub fallback_to_embedded: Option<bool>,

    /// Decimals shown for survival percentages (default: 1)
    #[serde(default)]
    pub percent_decimals: Option<usize>,
}

impl Config {
    /// Workbook path with a leading `~` expanded to the home directory
    pub fn data_path(&self) -> Option<PathBuf> {
        let data = self.data.as_ref()?;
        match (data.strip_prefix("~"), dirs::home_dir()) {
            (Ok(rest), Some(home)) => Some(home.join(rest)),
            _ => Some(data.clone()),
        }
    }

    pub fn survival_sheet(&self) -> &str {
        self.survival_sheet
            .as_deref()
            .unwrap_or(crate::model::DEFAULT_SURVIVAL_SHEET)
    }

    pub fn fallback_to_embedded(&self) -> bool {
        self.fallback_to_embedded.unwrap_or(true)
    }

    pub fn percent_decimals(&self) -> usize {
        self.percent_decimals.unwrap_or(1)
    }
}
