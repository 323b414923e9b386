pub mod formatter;

pub use formatter::{
    format_debug_line, format_percent, format_points, format_scale, format_score_report,
    format_survival_table, format_tsv, format_variables, scale_width, should_use_colors,
    NO_ESTIMATE,
};
