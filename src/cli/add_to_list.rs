use std::path::Path;

use crate::config;
use crate::file;

use super::select_cmd::publish_slugs;

pub fn handle_add_to_list(list_id: &str, problems_file: &Path, delay: f64) {
    let user_config = config::load_config();

    let slugs = match file::load_slugs(problems_file) {
        Ok(s) if !s.is_empty() => s,
        Ok(_) => {
            eprintln!("No problems loaded from {}", problems_file.display());
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Failed to read {}: {}", problems_file.display(), e);
            std::process::exit(1);
        }
    };

    publish_slugs(&user_config, list_id, &slugs, delay);
}
