mod embedded;
pub mod workbook;

pub use embedded::embedded_model;
pub use workbook::{parse_workbook, read_workbook, WorkbookFormat};

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::model::{build_model, NomogramModel, DEFAULT_SURVIVAL_SHEET};

/// Anything that can hand over a validated model.
pub trait ModelSource {
    /// Human-readable origin, e.g. a file path
    fn describe(&self) -> String;

    fn load(&self) -> Result<NomogramModel>;
}

/// The reference nomogram compiled into the binary
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedSource;

impl ModelSource for EmbeddedSource {
    fn describe(&self) -> String {
        "embedded reference data".to_string()
    }

    fn load(&self) -> Result<NomogramModel> {
        embedded_model().context("Embedded nomogram data is invalid")
    }
}

/// A workbook file on disk
#[derive(Debug, Clone)]
pub struct WorkbookSource {
    pub path: PathBuf,
    pub survival_sheet: String,
}

impl WorkbookSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            survival_sheet: DEFAULT_SURVIVAL_SHEET.to_string(),
        }
    }

    pub fn with_survival_sheet(mut self, name: impl Into<String>) -> Self {
        self.survival_sheet = name.into();
        self
    }
}

impl ModelSource for WorkbookSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<NomogramModel> {
        let workbook = read_workbook(&self.path)?;
        build_model(&workbook, &self.survival_sheet)
            .with_context(|| format!("Invalid nomogram data in {}", self.path.display()))
    }
}

/// A loaded model and where it came from
#[derive(Debug)]
pub struct LoadedModel {
    pub model: NomogramModel,
    pub origin: String,
    /// True when the primary source failed and the fallback was used
    pub fell_back: bool,
}

/// Load from `primary`, falling back to `fallback` if it fails.
///
/// Without a fallback the primary's error is returned as is.
pub fn load_with_fallback(
    primary: &dyn ModelSource,
    fallback: Option<&dyn ModelSource>,
) -> Result<LoadedModel> {
    let err = match primary.load() {
        Ok(model) => {
            log::debug!("Loaded nomogram from {}", primary.describe());
            return Ok(LoadedModel {
                model,
                origin: primary.describe(),
                fell_back: false,
            });
        }
        Err(err) => err,
    };

    let Some(fallback) = fallback else {
        return Err(err);
    };

    log::warn!(
        "Failed to load {} ({:#}), using {}",
        primary.describe(),
        err,
        fallback.describe()
    );
    let model = fallback.load()?;
    Ok(LoadedModel {
        model,
        origin: fallback.describe(),
        fell_back: true,
    })
}
