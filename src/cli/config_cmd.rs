use crate::config;

pub fn handle_config(show: bool, set: &[String]) {
    let mut user_config = config::load_config();

    if !set.is_empty() {
        // clap delivers --set pairs as a flat KEY VALUE sequence.
        for pair in set.chunks(2) {
            let [key, value] = pair else {
                eprintln!("--set requires a KEY and a VALUE");
                std::process::exit(1);
            };
            if let Err(e) = user_config.set_value(key, value) {
                eprintln!("{}", e);
                std::process::exit(1);
            }
            println!("Set {} = {}", key, value);
        }
        if let Err(e) = config::save_config(&user_config) {
            eprintln!("Failed to save config: {}", e);
            std::process::exit(1);
        }
    }

    if show || set.is_empty() {
        println!("Config file: {}", config::get_config_path().display());
        println!("  session:             {}", mask(&user_config.session));
        println!("  csrf:                {}", mask(&user_config.csrf));
        println!("  data_dir:            {}", user_config.data_dir().display());
        println!("  db_path:             {}", user_config.db_path().display());
        println!(
            "  scoring_config_path: {}",
            user_config
                .scoring_config_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "default".to_string())
        );
        println!(
            "  last_synced:         {}",
            user_config.last_synced.as_deref().unwrap_or("never")
        );
    }
}

fn mask(token: &str) -> String {
    if token.is_empty() {
        "not set".to_string()
    } else if token.len() <= 4 {
        "***".to_string()
    } else {
        format!("***{}", &token[token.len() - 4..])
    }
}
