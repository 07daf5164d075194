use std::path::PathBuf;
use std::time::Duration;

use crate::api::ApiClient;
use crate::config;
use crate::db::CatalogStore;
use crate::display::display_ranked;
use crate::file;
use crate::models::RatingBracket;
use crate::publisher::{self, PublishError, PublishOutcome};
use crate::selector::{select, ScoringConfig, SelectOptions};

pub struct SelectArgs {
    pub count: usize,
    pub output: Option<PathBuf>,
    pub list_id: Option<String>,
    pub display: bool,
    pub scoring_config: Option<PathBuf>,
    pub bracket: Option<String>,
    pub include_solved: bool,
    pub delay: f64,
}

pub fn handle_select(args: SelectArgs) {
    let user_config = config::load_config();

    let scoring_path = args
        .scoring_config
        .or_else(|| user_config.scoring_config_path.clone());
    let scoring = match scoring_path {
        Some(path) => match ScoringConfig::load(&path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Failed to load scoring config from {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => ScoringConfig::default(),
    };

    let bracket: Option<RatingBracket> = match args.bracket.as_deref() {
        Some(raw) => match raw.parse() {
            Ok(b) => Some(b),
            Err(e) => {
                eprintln!("Invalid rating bracket: {}", e);
                std::process::exit(1);
            }
        },
        None => None,
    };

    let store = match CatalogStore::open(&user_config.db_path()) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to open database: {}", e);
            std::process::exit(1);
        }
    };
    let catalog = match store.load_catalog() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to read catalog: {}", e);
            std::process::exit(1);
        }
    };

    let options = SelectOptions {
        count: args.count,
        exclude_solved: !args.include_solved,
        bracket,
    };

    let ranked = match select(&catalog, &scoring, &options) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Selection failed: {}", e);
            std::process::exit(1);
        }
    };

    if ranked.is_empty() {
        println!("No problems cleared the quality threshold.");
        return;
    }

    if args.display || (args.output.is_none() && args.list_id.is_none()) {
        display_ranked(&ranked);
    }

    if let Some(path) = &args.output {
        match file::save_slugs(&ranked, path) {
            Ok(()) => println!("Saved {} problem slugs to {}", ranked.len(), path.display()),
            Err(e) => {
                eprintln!("Failed to save slugs: {}", e);
                std::process::exit(1);
            }
        }
    }

    if let Some(list_id) = &args.list_id {
        let slugs: Vec<String> = ranked.iter().map(|r| r.slug.clone()).collect();
        publish_slugs(&user_config, list_id, &slugs, args.delay);
    }
}

pub fn publish_slugs(user_config: &config::UserConfig, list_id: &str, slugs: &[String], delay: f64) {
    if !user_config.has_auth() {
        eprintln!("Authentication tokens not set; run `login` first.");
        std::process::exit(1);
    }

    let client = match ApiClient::new(&user_config.session, &user_config.csrf) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to build API client: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = client.verify_auth() {
        eprintln!("Authentication failed: {}", e);
        std::process::exit(1);
    }

    println!("Adding {} problems to list {}", slugs.len(), list_id);
    let report = publisher::publish(&client, list_id, slugs, Duration::from_secs_f64(delay));

    for item in &report.items {
        if let PublishOutcome::Failed(reason) = &item.outcome {
            println!("  {} failed: {}", item.slug, reason);
        }
    }

    match &report.aborted {
        None => println!(
            "Added {} of {} problems ({} failed)",
            report.added(),
            slugs.len(),
            report.failed()
        ),
        Some(PublishError::Auth(msg)) => {
            eprintln!(
                "Aborted after {} of {} items: authentication failed: {}",
                report.items.len(),
                slugs.len(),
                msg
            );
            std::process::exit(1);
        }
        Some(PublishError::ListNotFound(list)) => {
            eprintln!(
                "Aborted after {} of {} items: list '{}' not found",
                report.items.len(),
                slugs.len(),
                list
            );
            std::process::exit(1);
        }
        Some(PublishError::Item(msg)) => {
            eprintln!("Aborted: {}", msg);
            std::process::exit(1);
        }
    }
}
