pub mod engine;
pub mod interpolate;
pub mod selection;

pub use engine::{calculate_score, selected_option, total_score, ScoreResult, VariableContribution};
pub use interpolate::interpolate;
pub use selection::{SelectionError, SelectionState};
