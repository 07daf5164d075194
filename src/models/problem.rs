use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::difficulty::Difficulty;

/// Whether the user has solved the problem on the platform.
/// Stored in the catalog as the platform reports it: "ac" for solved,
/// "notac" for attempted, NULL for untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolvedStatus {
    Unsolved,
    Attempted,
    Solved,
}

impl SolvedStatus {
    pub fn from_db(value: Option<&str>) -> Self {
        match value {
            Some("ac") => SolvedStatus::Solved,
            Some("notac") => SolvedStatus::Attempted,
            _ => SolvedStatus::Unsolved,
        }
    }

    pub fn to_db(self) -> Option<&'static str> {
        match self {
            SolvedStatus::Solved => Some("ac"),
            SolvedStatus::Attempted => Some("notac"),
            SolvedStatus::Unsolved => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Problem {
    pub question_id: u32,
    pub frontend_id: String,
    pub title: String,
    pub slug: String,
    pub url: String,
    pub difficulty: Difficulty,
    pub acceptance_rate: f64,
    pub frequency: Option<f64>,
    pub likes: u32,
    pub dislikes: u32,
    pub rating: f64,
    pub paid_only: bool,
    pub status: SolvedStatus,
}

impl Problem {
    pub fn canonical_url(slug: &str) -> String {
        format!("https://leetcode.com/problems/{}/description/", slug)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Topic {
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    pub name: String,
    pub slug: String,
}

/// One catalog row ready for scoring: the problem plus its joined tags.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub problem: Problem,
    pub topics: Vec<String>,
    pub companies: Vec<String>,
}

/// Inclusive rating bracket, parsed from "1800-1900" style strings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingBracket {
    pub lo: f64,
    pub hi: f64,
}

impl RatingBracket {
    pub fn contains(&self, rating: f64) -> bool {
        rating >= self.lo && rating <= self.hi
    }
}

impl FromStr for RatingBracket {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lo, hi) = s
            .split_once('-')
            .ok_or_else(|| format!("expected LO-HI, got '{}'", s))?;
        let lo: f64 = lo
            .trim()
            .parse()
            .map_err(|_| format!("bad lower bound in '{}'", s))?;
        let hi: f64 = hi
            .trim()
            .parse()
            .map_err(|_| format!("bad upper bound in '{}'", s))?;
        if lo > hi {
            return Err(format!("bracket '{}' has lower bound above upper", s));
        }
        Ok(RatingBracket { lo, hi })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_roundtrips_db_values() {
        assert_eq!(SolvedStatus::from_db(Some("ac")), SolvedStatus::Solved);
        assert_eq!(SolvedStatus::from_db(Some("notac")), SolvedStatus::Attempted);
        assert_eq!(SolvedStatus::from_db(None), SolvedStatus::Unsolved);
        assert_eq!(SolvedStatus::Solved.to_db(), Some("ac"));
        assert_eq!(SolvedStatus::Unsolved.to_db(), None);
    }

    #[test]
    fn bracket_parses_and_rejects_inverted() {
        let b: RatingBracket = "1800-1900".parse().unwrap();
        assert!(b.contains(1800.0));
        assert!(b.contains(1900.0));
        assert!(!b.contains(1901.0));
        assert!("1900-1800".parse::<RatingBracket>().is_err());
        assert!("1900".parse::<RatingBracket>().is_err());
    }
}
