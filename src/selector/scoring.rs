use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::{CatalogEntry, Difficulty};

/// Importance class for a topic tag. The multiplier for each tier comes
/// from the scoring config; `Critical` must carry the largest multiplier
/// so that a purely-critical problem normalizes to the full topic weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopicTier {
    Critical,
    Advanced,
    Important,
    Medium,
    Low,
}

/// Static topic-name-to-tier table. Anything not listed falls back to
/// `Low`, the unclassified tier.
pub fn classify_topic(name: &str) -> TopicTier {
    match name {
        "Array" | "Hash Table" | "Graph" | "Dynamic Programming" | "Binary Search"
        | "Depth-First Search" | "Breadth-First Search" => TopicTier::Critical,
        "Design" | "Data Stream" | "Concurrency" | "Trie" | "Union Find" | "Segment Tree"
        | "Binary Indexed Tree" | "Heap (Priority Queue)" | "Tree" | "Binary Tree" => {
            TopicTier::Advanced
        }
        "Two Pointers" | "Sliding Window" | "Greedy" | "Stack" | "Queue" | "Linked List"
        | "Backtracking" | "Sorting" | "String" | "Binary Search Tree" | "Monotonic Stack"
        | "Monotonic Queue" | "Iterator" => TopicTier::Important,
        "Math" | "Bit Manipulation" | "Prefix Sum" | "Matrix" | "Simulation" | "Recursion" => {
            TopicTier::Medium
        }
        _ => TopicTier::Low,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AcceptanceBand {
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub weight_frequency: f64,
    pub weight_acceptance: f64,
    pub weight_like_ratio: f64,
    pub weight_topic: f64,
    pub weight_rating: f64,
    pub weight_company: f64,

    pub max_frequency: f64,
    pub missing_frequency_fraction: f64,
    pub max_like_ratio: f64,

    pub easy_band: AcceptanceBand,
    pub medium_band: AcceptanceBand,
    pub hard_band: AcceptanceBand,

    pub target_rating: f64,
    pub rating_scale: f64,

    pub easy_bonus: f64,
    pub medium_bonus: f64,
    pub hard_bonus: f64,

    pub tier_critical: f64,
    pub tier_advanced: f64,
    pub tier_important: f64,
    pub tier_medium: f64,
    pub tier_low: f64,

    pub target_companies: Vec<String>,
    pub premium_company: String,
    pub premium_bonus: f64,
    pub per_company_bonus: f64,
    pub company_cap: f64,

    pub min_quality: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weight_frequency: 20.0,
            weight_acceptance: 15.0,
            weight_like_ratio: 10.0,
            weight_topic: 15.0,
            weight_rating: 30.0,
            weight_company: 10.0,

            max_frequency: 80.0,
            missing_frequency_fraction: 0.375,
            max_like_ratio: 30.0,

            easy_band: AcceptanceBand { min: 50.0, max: 70.0 },
            medium_band: AcceptanceBand { min: 40.0, max: 60.0 },
            hard_band: AcceptanceBand { min: 30.0, max: 50.0 },

            target_rating: 2000.0,
            rating_scale: 200.0,

            easy_bonus: 0.0,
            medium_bonus: 0.0,
            hard_bonus: 0.0,

            tier_critical: 1.5,
            tier_advanced: 1.4,
            tier_important: 1.3,
            tier_medium: 1.1,
            tier_low: 1.0,

            target_companies: vec![
                "google".to_string(),
                "amazon".to_string(),
                "facebook".to_string(),
                "microsoft".to_string(),
                "apple".to_string(),
            ],
            premium_company: "google".to_string(),
            premium_bonus: 1.0,
            per_company_bonus: 2.0,
            company_cap: 10.0,

            min_quality: 50.0,
        }
    }
}

impl ScoringConfig {
    /// Load from a JSON file. Unknown fields are ignored, missing fields
    /// fall back to the defaults above.
    pub fn load(path: &std::path::Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: ScoringConfig = serde_json::from_str(&contents)?;
        Ok(config)
    }

    pub fn band(&self, difficulty: Difficulty) -> AcceptanceBand {
        match difficulty {
            Difficulty::Easy => self.easy_band,
            Difficulty::Medium => self.medium_band,
            Difficulty::Hard => self.hard_band,
        }
    }

    pub fn difficulty_bonus(&self, difficulty: Difficulty) -> f64 {
        match difficulty {
            Difficulty::Easy => self.easy_bonus,
            Difficulty::Medium => self.medium_bonus,
            Difficulty::Hard => self.hard_bonus,
        }
    }

    pub fn tier_multiplier(&self, tier: TopicTier) -> f64 {
        match tier {
            TopicTier::Critical => self.tier_critical,
            TopicTier::Advanced => self.tier_advanced,
            TopicTier::Important => self.tier_important,
            TopicTier::Medium => self.tier_medium,
            TopicTier::Low => self.tier_low,
        }
    }

    fn max_tier_multiplier(&self) -> f64 {
        [
            self.tier_critical,
            self.tier_advanced,
            self.tier_important,
            self.tier_medium,
            self.tier_low,
        ]
        .into_iter()
        .fold(f64::MIN, f64::max)
    }

    /// Reject configs that would make scoring meaningless. Must pass
    /// before any scoring happens.
    pub fn validate(&self) -> Result<()> {
        let weights = [
            ("weight_frequency", self.weight_frequency),
            ("weight_acceptance", self.weight_acceptance),
            ("weight_like_ratio", self.weight_like_ratio),
            ("weight_topic", self.weight_topic),
            ("weight_rating", self.weight_rating),
            ("weight_company", self.weight_company),
            ("easy_bonus", self.easy_bonus),
            ("medium_bonus", self.medium_bonus),
            ("hard_bonus", self.hard_bonus),
            ("premium_bonus", self.premium_bonus),
            ("per_company_bonus", self.per_company_bonus),
            ("company_cap", self.company_cap),
        ];
        for (name, value) in weights {
            if value < 0.0 {
                return Err(Error::InvalidConfig(format!("{} is negative", name)));
            }
        }

        for (name, band) in [
            ("easy_band", self.easy_band),
            ("medium_band", self.medium_band),
            ("hard_band", self.hard_band),
        ] {
            if band.min > band.max {
                return Err(Error::InvalidConfig(format!(
                    "{} has min {} above max {}",
                    name, band.min, band.max
                )));
            }
            if band.min < 0.0 || band.max > 100.0 {
                return Err(Error::InvalidConfig(format!(
                    "{} is outside [0, 100]",
                    name
                )));
            }
        }

        if self.rating_scale <= 0.0 {
            return Err(Error::InvalidConfig("rating_scale must be positive".into()));
        }
        if self.max_frequency <= 0.0 {
            return Err(Error::InvalidConfig("max_frequency must be positive".into()));
        }
        if self.max_like_ratio <= 0.0 {
            return Err(Error::InvalidConfig("max_like_ratio must be positive".into()));
        }

        Ok(())
    }
}

/// Per-component scores for one problem, each rounded to two decimals.
/// The rounding is part of the contract: totals feed the ranking and
/// ties must break the same way on every run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub frequency: f64,
    pub acceptance: f64,
    pub like_ratio: f64,
    pub topic: f64,
    pub rating: f64,
    pub difficulty_bonus: f64,
    pub company: f64,
    pub total: f64,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// The quality formula. Pure: same entry and config always give the same
/// breakdown, regardless of tag order.
pub fn score_problem(entry: &CatalogEntry, config: &ScoringConfig) -> ScoreBreakdown {
    let problem = &entry.problem;

    let frequency = round2(match problem.frequency {
        Some(freq) => freq.min(config.max_frequency) / config.max_frequency * config.weight_frequency,
        None => config.missing_frequency_fraction * config.weight_frequency,
    });

    let acceptance = round2(acceptance_score(
        problem.acceptance_rate,
        problem.difficulty,
        config,
    ));

    // Ratio is undefined when both counts are zero; score it as zero
    // rather than treating undislikeable-but-unliked problems as good.
    let ratio = if problem.dislikes > 0 {
        problem.likes as f64 / problem.dislikes as f64
    } else {
        problem.likes as f64
    };
    let like_ratio = round2(ratio.min(config.max_like_ratio) / config.max_like_ratio * config.weight_like_ratio);

    let topic = round2(topic_score(&entry.topics, config));

    let offset = problem.rating - config.target_rating;
    let rating = round2(
        config.weight_rating * (-(offset * offset) / (2.0 * config.rating_scale * config.rating_scale)).exp(),
    );

    let difficulty_bonus = round2(config.difficulty_bonus(problem.difficulty));

    let company = round2(company_score(&entry.companies, config));

    let total = round2(frequency + acceptance + like_ratio + topic + rating + difficulty_bonus + company);

    ScoreBreakdown {
        frequency,
        acceptance,
        like_ratio,
        topic,
        rating,
        difficulty_bonus,
        company,
        total,
    }
}

fn acceptance_score(rate: f64, difficulty: Difficulty, config: &ScoringConfig) -> f64 {
    let band = config.band(difficulty);
    let weight = config.weight_acceptance;

    if rate >= band.min && rate <= band.max {
        weight
    } else if rate < band.min {
        // band.min > 0 here, otherwise no rate can fall below it
        rate / band.min * weight
    } else {
        let ceiling = difficulty.acceptance_ceiling();
        ((ceiling - rate) / 20.0).clamp(0.0, 1.0) * weight
    }
}

fn topic_score(topics: &[String], config: &ScoringConfig) -> f64 {
    if topics.is_empty() {
        // Untagged problems get two thirds of the weight instead of
        // zero-scoring out of the candidate pool.
        return config.weight_topic * 2.0 / 3.0;
    }

    let sum: f64 = topics
        .iter()
        .map(|name| config.tier_multiplier(classify_topic(name)))
        .sum();
    let avg = sum / topics.len() as f64;
    avg / config.max_tier_multiplier() * config.weight_topic
}

fn company_score(companies: &[String], config: &ScoringConfig) -> f64 {
    if companies.is_empty() {
        return 0.0;
    }

    let names: Vec<String> = companies.iter().map(|c| c.to_lowercase()).collect();
    let premium = config.premium_company.to_lowercase();

    if !premium.is_empty() && names.iter().any(|c| c.contains(&premium)) {
        return config.weight_company * config.premium_bonus;
    }

    let recognized = names
        .iter()
        .filter(|c| {
            config
                .target_companies
                .iter()
                .any(|t| c.contains(&t.to_lowercase()))
        })
        .count();
    (recognized as f64 * config.per_company_bonus).min(config.company_cap)
}
