use crate::api::ApiClient;
use crate::config;

pub fn handle_login(session: &str, csrf: &str) {
    let mut user_config = config::load_config();
    user_config.session = session.to_string();
    user_config.csrf = csrf.to_string();

    if let Err(e) = config::save_config(&user_config) {
        eprintln!("Failed to save config: {}", e);
        std::process::exit(1);
    }

    let client = match ApiClient::new(session, csrf) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to build API client: {}", e);
            std::process::exit(1);
        }
    };

    match client.verify_auth() {
        Ok(username) => println!("Login successful. Authenticated as: {}", username),
        Err(e) => {
            eprintln!("Login failed: {}", e);
            std::process::exit(1);
        }
    }
}
