pub mod formatter;

pub use formatter::{
    format_champion, format_comparison, format_insights, format_leaderboard, format_percent,
    format_points, format_probability_chart, format_simulation, format_tsv, probability_note,
    should_use_colors,
};
