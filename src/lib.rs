//! Nomogram calculator: validates a tabular nomogram definition, sums the
//! points of the selected options and interpolates survival probabilities
//! at 12, 36 and 60 months from a reference table.

pub mod config;
pub mod model;
pub mod output;
pub mod scoring;
pub mod source;
