use crate::prelude::*;
use cap_std::fs::Dir;
use std::time::Duration;
use tyria_api::{ClientConfig, Language};

pub const CONFIG_FILE_NAME: &str = "config.json";

/// `config.json` in the tyria data dir
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_key: Option<String>,
    pub language: Language,
    /// 0 disables the response cache
    pub cache_ttl_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            language: Language::En,
            cache_ttl_secs: 300,
        }
    }
}

/// values from cli flags or env variables. they win over the config file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub api_key: Option<String>,
    pub language: Option<Language>,
    pub no_cache: bool,
}

impl AppConfig {
    /// writes the default config first if the file doesn't exist yet
    pub fn load(dir: &Dir) -> Result<Self> {
        if !dir.exists(CONFIG_FILE_NAME) {
            info!("creating default {CONFIG_FILE_NAME}");
            Self::default().save(dir)?;
        }
        let config = serde_json::from_str(
            &dir.read_to_string(CONFIG_FILE_NAME)
                .into_diagnostic()
                .wrap_err("failed to read config file")?,
        )
        .into_diagnostic()
        .wrap_err("failed to deserialize config file")?;
        Ok(config)
    }

    pub fn save(&self, dir: &Dir) -> Result<()> {
        dir.write(
            CONFIG_FILE_NAME,
            serde_json::to_vec_pretty(self)
                .into_diagnostic()
                .wrap_err("failed to serialize config")?,
        )
        .into_diagnostic()
        .wrap_err("failed to write config file")
    }

    pub fn client_config(&self, overrides: &Overrides) -> ClientConfig {
        let api_key = overrides.api_key.clone().or_else(|| self.api_key.clone());
        let config = ClientConfig::new()
            .with_optional_api_key(api_key.filter(|key| !key.trim().is_empty()))
            .with_language(overrides.language.unwrap_or(self.language));
        if overrides.no_cache || self.cache_ttl_secs == 0 {
            config.without_cache()
        } else {
            config.with_cache_ttl(Duration::from_secs(self.cache_ttl_secs))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cap_std::ambient_authority;

    fn temp_dir() -> (tempfile::TempDir, Dir) {
        let tmp = tempfile::tempdir().unwrap();
        let dir = Dir::open_ambient_dir(tmp.path(), ambient_authority()).unwrap();
        (tmp, dir)
    }

    #[test]
    fn missing_file_is_created_with_defaults() {
        let (_tmp, dir) = temp_dir();
        let config = AppConfig::load(&dir).unwrap();
        assert_eq!(config, AppConfig::default());
        assert!(dir.exists(CONFIG_FILE_NAME));
    }

    #[test]
    fn partial_file_uses_defaults_for_the_rest() {
        let (_tmp, dir) = temp_dir();
        dir.write(CONFIG_FILE_NAME, r#"{"language": "fr"}"#).unwrap();
        let config = AppConfig::load(&dir).unwrap();
        assert_eq!(config.language, Language::Fr);
        assert_eq!(config.cache_ttl_secs, 300);
        assert_eq!(config.api_key, None);
    }

    #[test]
    fn broken_file_is_an_error() {
        let (_tmp, dir) = temp_dir();
        dir.write(CONFIG_FILE_NAME, "{").unwrap();
        assert!(AppConfig::load(&dir).is_err());
    }

    #[test]
    fn overrides_win_over_file() {
        let file = AppConfig {
            api_key: Some("from-file".to_string()),
            language: Language::De,
            cache_ttl_secs: 60,
        };
        let client = file.client_config(&Overrides::default());
        assert_eq!(client.api_key(), Some("from-file"));
        assert_eq!(client.language(), Language::De);
        assert_eq!(client.cache_ttl(), Some(Duration::from_secs(60)));

        let client = file.client_config(&Overrides {
            api_key: Some("from-flag".to_string()),
            language: Some(Language::Es),
            no_cache: true,
        });
        assert_eq!(client.api_key(), Some("from-flag"));
        assert_eq!(client.language(), Language::Es);
        assert_eq!(client.cache_ttl(), None);
    }

    #[test]
    fn blank_key_is_no_key() {
        let file = AppConfig {
            api_key: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(file.client_config(&Overrides::default()).api_key(), None);
    }
}
