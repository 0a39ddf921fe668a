//! # Profiles
//!
//! Named connections (endpoint URL + token) persisted as JSON in the platform config
//! directory, so `--profile shop` can replace repeating `--url` and `--token`.
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Serialize, Deserialize, Default, Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub profiles: Vec<Profile>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Profile {
    pub name: String,
    pub url: String,
    pub token: String,
}

impl AppConfig {
    pub fn profile(&self, name: &str) -> Option<&Profile> {
        self.profiles.iter().find(|profile| profile.name == name)
    }

    /// Adds `profile`, replacing a saved one with the same name.
    pub fn upsert(&mut self, profile: Profile) {
        match self.profiles.iter_mut().find(|p| p.name == profile.name) {
            Some(existing) => *existing = profile,
            None => self.profiles.push(profile),
        }
    }

    /// Returns whether a profile was removed.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.profiles.len();
        self.profiles.retain(|profile| profile.name != name);
        self.profiles.len() != before
    }
}

pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self> {
        let proj_dirs = ProjectDirs::from("com", "jtlrpc", "jtlrpc")
            .context("Could not determine config directory")?;
        let config_dir = proj_dirs.config_dir();
        fs::create_dir_all(config_dir)
            .with_context(|| format!("Could not create {}", config_dir.display()))?;

        Ok(Self::with_path(config_dir.join("profiles.json")))
    }

    pub fn with_path(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    pub fn load(&self) -> Result<AppConfig> {
        if !self.config_path.exists() {
            return Ok(AppConfig::default());
        }
        let content = fs::read_to_string(&self.config_path)?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("Malformed profiles file {}", self.config_path.display()))?;
        Ok(config)
    }

    pub fn save(&self, config: &AppConfig) -> Result<()> {
        let content = serde_json::to_string_pretty(config)?;
        fs::write(&self.config_path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(name: &str, url: &str) -> Profile {
        Profile {
            name: name.to_string(),
            url: url.to_string(),
            token: "t".to_string(),
        }
    }

    #[test]
    fn test_upsert_and_remove() {
        let mut config = AppConfig::default();
        config.upsert(profile("shop", "http://a/"));
        config.upsert(profile("staging", "http://b/"));
        config.upsert(profile("shop", "http://c/"));

        assert_eq!(config.profiles.len(), 2);
        assert_eq!(config.profile("shop").unwrap().url, "http://c/");

        assert!(config.remove("staging"));
        assert!(!config.remove("staging"));
        assert!(config.profile("staging").is_none());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ConfigManager::with_path(dir.path().join("profiles.json"));

        assert_eq!(manager.load().unwrap(), AppConfig::default());

        let mut config = AppConfig::default();
        config.upsert(profile("shop", "http://a/"));
        manager.save(&config).unwrap();

        assert_eq!(manager.load().unwrap(), config);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profiles.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(ConfigManager::with_path(path).load().is_err());
    }
}
