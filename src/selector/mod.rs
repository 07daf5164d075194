pub mod engine;
pub mod scoring;

pub use engine::{select, RankedProblem, SelectOptions};
pub use scoring::{ScoreBreakdown, ScoringConfig};
