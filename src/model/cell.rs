use serde::{Deserialize, Serialize};

/// An untyped spreadsheet cell as it arrives from a data source.
///
/// Nothing past the validator sees a `Cell`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Empty,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Trimmed text form of the cell. Empty cells have none.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Bool(b) => Some(b.to_string()),
            Cell::Number(n) => Some(n.to_string()),
            Cell::Text(s) => Some(s.trim().to_string()),
        }
    }

    /// Finite numeric value, accepting numeric text such as `" 14.05 "`.
    pub fn as_number(&self) -> Option<f64> {
        let value = match self {
            Cell::Number(n) => *n,
            Cell::Text(s) => s.trim().parse::<f64>().ok()?,
            Cell::Empty | Cell::Bool(_) => return None,
        };
        value.is_finite().then_some(value)
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Number(n)
    }
}

/// Cell at `index`, treating short rows as padded with empty cells
pub fn cell_at(row: &[Cell], index: usize) -> &Cell {
    row.get(index).unwrap_or(&Cell::Empty)
}
