use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::model::NomogramModel;

#[derive(Debug, Error, PartialEq)]
pub enum SelectionError {
    #[error("unknown variable '{0}'")]
    UnknownVariable(String),
    #[error("variable '{variable}' has no option '{value}' (expected one of: {expected})")]
    UnknownOption {
        variable: String,
        value: String,
        expected: String,
    },
}

/// Chosen option value per variable key.
///
/// Owned by the caller and passed by reference into scoring queries, which
/// never modify it. A variable without an entry is scored at its first
/// option.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SelectionState {
    selected: BTreeMap<String, String>,
}

impl SelectionState {
    /// Empty state: every variable is at its default
    pub fn new() -> Self {
        Self::default()
    }

    /// Explicitly select the first option of every variable
    pub fn defaults(model: &NomogramModel) -> Self {
        let mut state = Self::new();
        state.reset(model);
        state
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.selected.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Record a selection without checking it against a model.
    /// Stale values are tolerated by the scoring queries.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.selected.insert(key.into(), value.into());
    }

    /// Select an option, rejecting keys and values the model doesn't define.
    pub fn select(
        &mut self,
        model: &NomogramModel,
        key: &str,
        value: &str,
    ) -> Result<(), SelectionError> {
        let variable = model
            .variable(key)
            .ok_or_else(|| SelectionError::UnknownVariable(key.to_string()))?;
        if variable.option(value).is_none() {
            return Err(SelectionError::UnknownOption {
                variable: key.to_string(),
                value: value.to_string(),
                expected: variable
                    .options()
                    .iter()
                    .map(|o| o.value.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            });
        }
        self.insert(key, value);
        Ok(())
    }

    /// Point every variable back at its first option
    pub fn reset(&mut self, model: &NomogramModel) {
        self.selected.clear();
        for variable in model.variables() {
            self.selected
                .insert(variable.key().to_string(), variable.first_option().value.clone());
        }
    }
}
