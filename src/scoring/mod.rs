mod engine;

pub use engine::{calculate_breakdowns, calculate_scores, lindy_score, LindyBreakdown};
