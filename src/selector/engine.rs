use std::cmp::Ordering;

use log::debug;

use crate::error::{Error, Result};
use crate::models::{CatalogEntry, RatingBracket};

use super::scoring::{score_problem, ScoreBreakdown, ScoringConfig};

#[derive(Debug, Clone)]
pub struct RankedProblem {
    pub question_id: u32,
    pub slug: String,
    pub title: String,
    pub breakdown: ScoreBreakdown,
}

#[derive(Debug, Clone, Default)]
pub struct SelectOptions {
    pub count: usize,
    pub exclude_solved: bool,
    pub bracket: Option<RatingBracket>,
}

/// Rank the catalog by quality score. Deterministic: running this twice
/// over the same catalog and config yields the same sequence.
pub fn select(
    catalog: &[CatalogEntry],
    config: &ScoringConfig,
    options: &SelectOptions,
) -> Result<Vec<RankedProblem>> {
    config.validate()?;

    if catalog.is_empty() {
        return Err(Error::DataUnavailable("catalog is empty".to_string()));
    }

    let mut ranked: Vec<RankedProblem> = catalog
        .iter()
        .filter(|entry| {
            if options.exclude_solved && entry.problem.status == crate::models::SolvedStatus::Solved
            {
                return false;
            }
            match options.bracket {
                Some(bracket) => bracket.contains(entry.problem.rating),
                None => true,
            }
        })
        .map(|entry| RankedProblem {
            question_id: entry.problem.question_id,
            slug: entry.problem.slug.clone(),
            title: entry.problem.title.clone(),
            breakdown: score_problem(entry, config),
        })
        .filter(|r| r.breakdown.total > config.min_quality)
        .collect();

    debug!(
        "{} of {} catalog entries cleared the quality threshold {}",
        ranked.len(),
        catalog.len(),
        config.min_quality
    );

    // Score descending, question id ascending on ties.
    ranked.sort_by(|a, b| {
        b.breakdown
            .total
            .partial_cmp(&a.breakdown.total)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.question_id.cmp(&b.question_id))
    });
    ranked.truncate(options.count);

    Ok(ranked)
}
