use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use serde_yaml::Deserializer;

use crate::dates::MonthTable;
use crate::extractor::MediaPolicy;
use crate::pipeline::CrawlSettings;

const APP_NAME: &str = "xornal";
const CONFIG_FILE: &str = "config.yaml";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub base_url: String,
    #[serde(rename = "startUrls")]
    pub start_urls: Vec<StartUrl>,
    pub db_path: Option<PathBuf>,
    pub user_agent: Option<String>,
    pub months: Option<Vec<String>>,
    #[serde(default)]
    pub strict_media: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StartUrl {
    pub url: String,
}

pub struct EnsureOutcome {
    pub path: PathBuf,
    pub created: bool,
}

impl Config {
    pub fn ensure_user_config() -> Result<EnsureOutcome> {
        let xdg_dirs = xdg::BaseDirectories::with_prefix(APP_NAME);

        if let Some(path) = xdg_dirs.find_config_file(CONFIG_FILE) {
            return Ok(EnsureOutcome {
                path,
                created: false,
            });
        }

        let config_path = xdg_dirs
            .place_config_file(CONFIG_FILE)
            .context("Cannot create configuration directory")?;
        let mut config_file = File::create(&config_path)?;

        write!(
            &mut config_file,
            r#"# Xornal Vigo crawler config (YAML)

# Site root, used for the site title and description.
base_url: "https://www.xornalvigo.com"

# The first entry is the listing page article links are discovered from.
startUrls:
  - url: "https://www.xornalvigo.com/vigo/"

# Optional SQLite database. Omit it (or pass --no-db) to skip persistence.
db_path: "/path/to/xornal.sqlite3"

# Optional HTTP user agent.
# user_agent: "Mozilla/5.0 ..."

# Optional month abbreviations, January to December.
# months: [xan, feb, mar, apr, mai, xun, xul, ago, set, out, nov, dec]

# Fail an article when one of its figures has no image source.
strict_media: false
"#
        )?;

        Ok(EnsureOutcome {
            path: config_path,
            created: true,
        })
    }

    pub fn get_user_config() -> Result<Config> {
        let path = xdg::BaseDirectories::with_prefix(APP_NAME)
            .find_config_file(CONFIG_FILE)
            .ok_or_else(|| anyhow!("Could not read configuration file in config::get_user_config"))?;

        Self::load(&path)
    }

    pub fn load(path: &Path) -> Result<Config> {
        let raw = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_yaml_str(&raw, &path.display().to_string())
    }

    /// Parses YAML (or JSON) configuration; `origin` names the source in errors.
    pub fn from_yaml_str(raw: &str, origin: &str) -> Result<Config> {
        let deserialized = Deserializer::from_str(raw);
        let config: Config = serde_path_to_error::deserialize(deserialized)
            .map_err(|e| anyhow!("Invalid YAML in {} at `{}`: {}", origin, e.path(), e.inner()))?;

        if config.start_urls.is_empty() {
            return Err(anyhow!("`startUrls` in {} must list at least one url", origin));
        }

        Ok(config)
    }

    pub fn listing_url(&self) -> &str {
        // Non-empty, checked on load.
        &self.start_urls[0].url
    }

    pub fn crawl_settings(&self) -> Result<CrawlSettings> {
        let months = match &self.months {
            Some(codes) => MonthTable::from_codes(codes).context("Invalid `months` table")?,
            None => MonthTable::default(),
        };

        let media_policy = if self.strict_media {
            MediaPolicy::Strict
        } else {
            MediaPolicy::Lenient
        };

        Ok(CrawlSettings {
            base_url: self.base_url.clone(),
            listing_url: self.listing_url().to_string(),
            months,
            media_policy,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
base_url: "https://xornal.test"
startUrls:
  - url: "https://xornal.test/vigo/"
  - url: "https://xornal.test/other/"
"#;

    #[test]
    fn test_minimal_config() {
        let config = Config::from_yaml_str(MINIMAL, "test").unwrap();

        assert_eq!(config.listing_url(), "https://xornal.test/vigo/");
        assert!(config.db_path.is_none());
        assert!(!config.strict_media);

        let settings = config.crawl_settings().unwrap();
        assert_eq!(settings.base_url, "https://xornal.test");
        assert_eq!(settings.media_policy, MediaPolicy::Lenient);
        assert_eq!(settings.months.month_number("xan"), 1);
    }

    #[test]
    fn test_host_json_input_parses() {
        let raw = r#"{"base_url": "https://xornal.test", "startUrls": [{"url": "https://xornal.test/vigo/"}], "strict_media": true}"#;
        let settings = Config::from_yaml_str(raw, "INPUT.json").unwrap().crawl_settings().unwrap();

        assert_eq!(settings.listing_url, "https://xornal.test/vigo/");
        assert_eq!(settings.media_policy, MediaPolicy::Strict);
    }

    #[test]
    fn test_errors_name_the_offending_path() {
        let raw = "base_url: x\nstartUrls:\n  - link: y\n";
        let err = Config::from_yaml_str(raw, "test").unwrap_err().to_string();
        assert!(err.contains("startUrls"), "{err}");
        assert!(err.contains("url"), "{err}");
    }

    #[test]
    fn test_empty_start_urls_rejected() {
        assert!(Config::from_yaml_str("base_url: x\nstartUrls: []\n", "test").is_err());
    }

    #[test]
    fn test_custom_months() {
        let raw = format!("{MINIMAL}months: [ene, feb, mar, abr, may, jun, jul, ago, sep, oct, nov, dic]\n");
        let settings = Config::from_yaml_str(&raw, "test").unwrap().crawl_settings().unwrap();
        assert_eq!(settings.months.month_number("dic"), 12);

        let short = format!("{MINIMAL}months: [ene, feb]\n");
        assert!(Config::from_yaml_str(&short, "test").unwrap().crawl_settings().is_err());
    }
}
