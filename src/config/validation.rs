use super::schema::Config;
use crate::source::WorkbookFormat;

const MAX_PERCENT_DECIMALS: usize = 6;

/// Validate configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Some(ref data) = config.data {
        if WorkbookFormat::from_path(data).is_none() {
            errors.push(format!(
                "data: unsupported file '{}' - expected .json, .yaml or .yml",
                data.display()
            ));
        }
    }

    if let Some(ref sheet) = config.survival_sheet {
        if sheet.trim().is_empty() {
            errors.push("survival_sheet: must not be empty".to_string());
        }
    }

    if let Some(decimals) = config.percent_decimals {
        if decimals > MAX_PERCENT_DECIMALS {
            errors.push(format!(
                "percent_decimals: {} is more than {}",
                decimals, MAX_PERCENT_DECIMALS
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
