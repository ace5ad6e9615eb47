pub mod formatter;
pub mod progress;

pub use formatter::{
    format_batch_summary, format_evaluation, format_simulated_case, format_stats_table,
};
pub use progress::batch_progress;
