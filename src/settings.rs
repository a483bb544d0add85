use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Values from `config.toml` used as defaults beneath the command line
#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub bonsai: BonsaiSettings,
}

#[derive(Debug, Default, Deserialize, PartialEq)]
pub struct BonsaiSettings {
    pub life: Option<u32>,
    pub multiplier: Option<u32>,
    pub leaves: Option<Vec<String>>,
    pub colors: Option<String>,  // "dark leaf,dark wood,light leaf,light wood"
    pub base: Option<u8>,
    pub time_step: Option<f64>,
    pub time_wait: Option<f64>,
    pub message: Option<String>,
}

impl Settings {
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(content) => Self::parse(&content),
            Err(err) => {
                tracing::warn!(?path, %err, "could not read settings");
                Self::default()
            }
        }
    }

    pub fn parse(content: &str) -> Self {
        toml::from_str(content).unwrap_or_else(|err| {
            tracing::warn!(%err, "ignoring malformed settings");
            Self::default()
        })
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("termbonsai")
            .join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bonsai_table() {
        let settings = Settings::parse(
            r#"
            [bonsai]
            life = 64
            leaves = ["&", "*"]
            colors = "1,2,3,4"
            time_step = 0.01
            "#,
        );
        assert_eq!(settings.bonsai.life, Some(64));
        assert_eq!(settings.bonsai.leaves, Some(vec!["&".to_string(), "*".to_string()]));
        assert_eq!(settings.bonsai.colors.as_deref(), Some("1,2,3,4"));
        assert_eq!(settings.bonsai.multiplier, None);
    }

    #[test]
    fn malformed_file_falls_back() {
        let settings = Settings::parse("[bonsai\nlife = ");
        assert_eq!(settings.bonsai, BonsaiSettings::default());
    }

    #[test]
    fn missing_file_falls_back() {
        let settings = Settings::load_from(Path::new("/nonexistent/termbonsai/config.toml"));
        assert_eq!(settings.bonsai, BonsaiSettings::default());
    }
}
