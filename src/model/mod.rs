pub mod cell;
pub mod error;
pub mod range;
pub mod types;
pub mod validation;

pub use cell::Cell;
pub use error::ModelError;
pub use range::TotalPointsRange;
pub use types::{Horizon, NomogramModel, SurvivalEstimate, SurvivalRow, Variable, VariableOption};
pub use validation::{build_model, pretty_label, RawSheet, RawWorkbook, DEFAULT_SURVIVAL_SHEET};
