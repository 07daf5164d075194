use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UserConfig {
    pub session: String,
    pub csrf: String,
    pub data_dir: Option<PathBuf>,
    pub db_path: Option<PathBuf>,
    pub scoring_config_path: Option<PathBuf>,
    pub last_synced: Option<String>,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            session: String::new(),
            csrf: String::new(),
            data_dir: None,
            db_path: None,
            scoring_config_path: None,
            last_synced: None,
        }
    }
}

impl UserConfig {
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("leetcode-tools")
        })
    }

    pub fn db_path(&self) -> PathBuf {
        self.db_path
            .clone()
            .unwrap_or_else(|| self.data_dir().join("leetcode.db"))
    }

    pub fn has_auth(&self) -> bool {
        !self.session.is_empty() && !self.csrf.is_empty()
    }

    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), String> {
        match key {
            "session" => self.session = value.to_string(),
            "csrf" => self.csrf = value.to_string(),
            "data_dir" => self.data_dir = Some(PathBuf::from(value)),
            "db_path" => self.db_path = Some(PathBuf::from(value)),
            "scoring_config_path" => self.scoring_config_path = Some(PathBuf::from(value)),
            other => return Err(format!("unknown config key '{}'", other)),
        }
        Ok(())
    }
}

pub fn get_config_path() -> PathBuf {
    let home = dirs::home_dir().expect("Could not determine home directory");
    home.join(".config").join("leetcode-tools").join("config.json")
}

pub fn load_config() -> UserConfig {
    load_config_from(&get_config_path())
}

pub fn load_config_from(path: &Path) -> UserConfig {
    if !path.exists() {
        return UserConfig::default();
    }

    match fs::read_to_string(path) {
        Ok(contents) => serde_json::from_str(&contents).unwrap_or_default(),
        Err(_) => UserConfig::default(),
    }
}

pub fn save_config(config: &UserConfig) -> Result<(), std::io::Error> {
    save_config_to(config, &get_config_path())
}

pub fn save_config_to(config: &UserConfig, path: &Path) -> Result<(), std::io::Error> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let contents = serde_json::to_string_pretty(config)?;
    fs::write(path, contents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let path = PathBuf::from("/nonexistent/leetcode-tools/config.json");
        let config = load_config_from(&path);
        assert!(config.session.is_empty());
        assert!(config.db_path.is_none());
        assert!(config.db_path().ends_with("leetcode.db"));
    }

    #[test]
    fn roundtrip_preserves_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = UserConfig::default();
        config.set_value("session", "abc123").unwrap();
        config.set_value("csrf", "tok").unwrap();
        config.set_value("db_path", "/tmp/problems.db").unwrap();
        save_config_to(&config, &path).unwrap();

        let loaded = load_config_from(&path);
        assert_eq!(loaded.session, "abc123");
        assert_eq!(loaded.csrf, "tok");
        assert_eq!(loaded.db_path(), PathBuf::from("/tmp/problems.db"));
    }

    #[test]
    fn unknown_keys_in_file_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"session": "s", "some_future_field": 42}"#).unwrap();

        let loaded = load_config_from(&path);
        assert_eq!(loaded.session, "s");
    }

    #[test]
    fn rejects_unknown_set_key() {
        let mut config = UserConfig::default();
        assert!(config.set_value("nope", "x").is_err());
    }
}
