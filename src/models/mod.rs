pub mod difficulty;
pub mod problem;

pub use difficulty::Difficulty;
pub use problem::{CatalogEntry, Company, Problem, RatingBracket, SolvedStatus, Topic};
