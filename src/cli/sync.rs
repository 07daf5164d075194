use std::path::Path;

use chrono::Local;
use log::warn;

use crate::api::ApiClient;
use crate::config;
use crate::db::CatalogStore;

pub fn handle_sync(json_file: Option<&Path>) {
    let mut user_config = config::load_config();

    let client = match ApiClient::new(&user_config.session, &user_config.csrf) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to build API client: {}", e);
            std::process::exit(1);
        }
    };

    match client.verify_auth() {
        Ok(username) => println!("Authenticated as: {}", username),
        Err(e) => {
            eprintln!("Authentication failed: {}", e);
            std::process::exit(1);
        }
    }

    println!("Fetching problem catalog...");
    let raw_problems = match client.fetch_problems() {
        Ok(p) if !p.is_empty() => p,
        Ok(_) => {
            eprintln!("No problems fetched, exiting.");
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Failed to fetch problems: {}", e);
            std::process::exit(1);
        }
    };
    println!("Fetched {} problems", raw_problems.len());

    if let Some(path) = json_file {
        match serde_json::to_string_pretty(&raw_problems) {
            Ok(contents) => {
                if let Err(e) = std::fs::write(path, contents) {
                    eprintln!("Failed to save snapshot to {}: {}", path.display(), e);
                } else {
                    println!("Saved raw snapshot to {}", path.display());
                }
            }
            Err(e) => eprintln!("Failed to serialize snapshot: {}", e),
        }
    }

    // Ratings live in a community-maintained table; problems missing
    // from it get a rating derived from their acceptance rate.
    let ratings = match client.fetch_rating_table() {
        Ok(table) => table,
        Err(e) => {
            warn!("rating table unavailable, deriving all ratings: {}", e);
            Default::default()
        }
    };

    let mut store = match CatalogStore::open(&user_config.db_path()) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to open database: {}", e);
            std::process::exit(1);
        }
    };

    let mut updated = 0usize;
    let mut skipped = 0usize;
    for raw in raw_problems {
        let rating = ratings
            .get(&raw.title_slug)
            .copied()
            .unwrap_or_else(|| fallback_rating(raw.ac_rate));

        let Some((problem, topics, companies)) = raw.into_catalog(rating) else {
            skipped += 1;
            continue;
        };

        match store.upsert_problem(&problem, &topics, &companies) {
            Ok(()) => updated += 1,
            Err(e) => {
                warn!("failed to store '{}': {}", problem.slug, e);
                skipped += 1;
            }
        }
    }

    user_config.last_synced = Some(Local::now().to_rfc3339());
    if let Err(e) = config::save_config(&user_config) {
        eprintln!("Failed to save config: {}", e);
    }

    if skipped == 0 {
        println!("Updated {} problems in the database", updated);
    } else {
        println!("Updated {} problems, {} skipped", updated, skipped);
    }
    if let Ok(count) = store.problem_count() {
        println!("Catalog now holds {} problems", count);
    }
}

/// Estimate a difficulty rating for problems the community table does
/// not cover: 6 points at <=10% acceptance down to 3 points at >=50%,
/// mapped onto the rating scale around 1600.
fn fallback_rating(acceptance_rate: f64) -> f64 {
    let points = if acceptance_rate <= 10.0 {
        6.0
    } else if acceptance_rate >= 50.0 {
        3.0
    } else {
        6.0 - ((acceptance_rate - 10.0) / 40.0) * 3.0
    };
    1600.0 + (points - 3.0) * 200.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_rating_interpolates_between_bounds() {
        assert_eq!(fallback_rating(5.0), 2200.0);
        assert_eq!(fallback_rating(10.0), 2200.0);
        assert_eq!(fallback_rating(30.0), 1900.0);
        assert_eq!(fallback_rating(50.0), 1600.0);
        assert_eq!(fallback_rating(90.0), 1600.0);
    }
}
