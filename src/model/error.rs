use thiserror::Error;

/// Fatal problems that prevent a `NomogramModel` from being built.
///
/// Malformed rows and empty variable sheets are not represented here: the
/// validator skips them and keeps going.
#[derive(Debug, Error, PartialEq)]
pub enum ModelError {
    #[error("missing survival sheet: {0}")]
    MissingSurvivalSheet(String),
    #[error("survival sheet {0} has no valid rows")]
    EmptySurvivalTable(String),
    #[error("variable {0} has no options")]
    EmptyVariable(String),
    #[error("variable key {0} is defined more than once")]
    DuplicateVariable(String),
    #[error("variable {variable} defines option {value} more than once")]
    DuplicateOption { variable: String, value: String },
    #[error("variable {variable} option {value} has non-finite points")]
    NonFinitePoints { variable: String, value: String },
    #[error("survival row {index} contains a non-finite value")]
    NonFiniteSurvivalRow { index: usize },
}
