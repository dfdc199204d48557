pub mod engine;
pub mod record;
pub mod table;
pub mod validation;
pub mod verdict;

pub use engine::{
    compare, feature_matrix, insights, pick_champion, rank, score, simulate, ScoredTable,
    ScoringPipeline,
};
pub use record::{to_display_percentage, DriverSeasonRecord, ScoredRecord};
pub use table::{load_table, read_table, SeasonTable};
pub use validation::{validate_schema, REQUIRED_COLUMNS};
pub use verdict::{head_to_head, HeadToHead, Outcome};
