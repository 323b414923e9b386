use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;

use crate::model::RawWorkbook;

/// File formats a workbook can be read from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkbookFormat {
    Json,
    Yaml,
}

impl WorkbookFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(WorkbookFormat::Json),
            "yaml" | "yml" => Some(WorkbookFormat::Yaml),
            _ => None,
        }
    }
}

/// Parse workbook text in the given format.
///
/// Example JSON:
/// ```json
/// { "sheets": [
///     { "name": "Age", "rows": [["Age"], ["≤66", 2], [">66", 26]] },
///     { "name": "TotalPoints_AllTimes",
///       "rows": [["Total Points", "Survival_12", "Survival_36", "Survival_60"],
///                [40, 0.9899, 0.9668, 0.9521]] }
/// ] }
/// ```
pub fn parse_workbook(content: &str, format: WorkbookFormat) -> Result<RawWorkbook> {
    let workbook = match format {
        WorkbookFormat::Json => {
            serde_json::from_str(content).context("Failed to parse workbook: invalid JSON")?
        }
        WorkbookFormat::Yaml => {
            serde_saphyr::from_str(content).context("Failed to parse workbook: invalid YAML")?
        }
    };
    Ok(workbook)
}

/// Read a workbook file, picking the format from its extension.
pub fn read_workbook(path: &Path) -> Result<RawWorkbook> {
    let Some(format) = WorkbookFormat::from_path(path) else {
        bail!(
            "Unsupported workbook format: {} (expected .json, .yaml or .yml)",
            path.display()
        );
    };

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read workbook at {}", path.display()))?;

    parse_workbook(&content, format).with_context(|| format!("In {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Cell;
    use std::env;
    use std::path::PathBuf;

    const WORKBOOK_JSON: &str = r#"{
  "sheets": [
    { "name": "PNII", "rows": [["PNII"], ["Low", 0], ["High", "26"]] },
    { "name": "TotalPoints_AllTimes",
      "rows": [["Total Points", "Survival_12", "Survival_36", "Survival_60"],
               [40, 0.9899, 0.9668, 0.9521],
               [null, 0.5, 0.5, 0.5]] }
  ]
}"#;

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            WorkbookFormat::from_path(&PathBuf::from("data.JSON")),
            Some(WorkbookFormat::Json)
        );
        assert_eq!(
            WorkbookFormat::from_path(&PathBuf::from("data.yml")),
            Some(WorkbookFormat::Yaml)
        );
        assert_eq!(WorkbookFormat::from_path(&PathBuf::from("data.xlsx")), None);
        assert_eq!(WorkbookFormat::from_path(&PathBuf::from("data")), None);
    }

    #[test]
    fn test_parse_json_workbook() {
        let workbook = parse_workbook(WORKBOOK_JSON, WorkbookFormat::Json).unwrap();
        assert_eq!(workbook.sheets.len(), 2);
        let pnii = workbook.sheet("PNII").unwrap();
        assert_eq!(pnii.label, None);
        assert_eq!(pnii.rows[2][1], Cell::from("26"));
        let table = workbook.sheet("TotalPoints_AllTimes").unwrap();
        assert_eq!(table.rows[2][0], Cell::Empty);
    }

    #[test]
    fn test_invalid_json_is_error() {
        assert!(parse_workbook("{ not json", WorkbookFormat::Json).is_err());
        assert!(parse_workbook(r#"{"sheets": [], "extra": 1}"#, WorkbookFormat::Json).is_err());
    }

    #[test]
    fn test_read_workbook_from_file() {
        let temp_path = env::temp_dir().join("nomogram_test_workbook.json");
        std::fs::write(&temp_path, WORKBOOK_JSON).unwrap();

        let workbook = read_workbook(&temp_path).unwrap();
        assert_eq!(workbook.sheets[0].name, "PNII");

        let _ = std::fs::remove_file(&temp_path);
    }

    #[test]
    fn test_read_workbook_rejects_unknown_extension() {
        let err = read_workbook(&PathBuf::from("nomogram.xlsx")).unwrap_err();
        assert!(err.to_string().contains("Unsupported workbook format"));
    }

    #[test]
    fn test_read_missing_workbook() {
        let temp_path = env::temp_dir().join("nomogram_test_missing_workbook.json");
        let _ = std::fs::remove_file(&temp_path);
        assert!(read_workbook(&temp_path).is_err());
    }
}
