use config::{Config, ConfigError, Environment, File as ConfigFile, Map};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const CONFIG_FILE_STEM: &str = "HotRadar";
pub const ENV_PREFIX: &str = "HOT_RADAR";

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub source: SourceConfig,
    pub scoring: ScoringWeights,
    pub report: ReportConfig,
    pub storage: StorageConfig,
}

/// Where and how the ranking listing is polled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub endpoint: String,
    pub pages: u32,
    pub page_size: u32,
    /// Pause between two page requests.
    pub page_delay_ms: u64,
    pub timeout_secs: u64,
    /// Session cookie for the remote API. Only ever injected from the
    /// environment or a config file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_token: Option<String>,
    pub user_agent: String,
    pub referer: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.bilibili.com/x/web-interface/popular".to_string(),
            pages: 4,
            page_size: 50,
            page_delay_ms: 1500,
            timeout_secs: 15,
            session_token: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            referer: "https://www.bilibili.com/v/popular/all/".to_string(),
        }
    }
}

/// Points awarded per unit of growth in each counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    pub view: u64,
    pub like: u64,
    pub danmaku: u64,
    pub reply: u64,
    pub favorite: u64,
    pub share: u64,
    pub coin: u64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            view: 1,
            like: 5,
            danmaku: 10,
            reply: 20,
            favorite: 30,
            share: 40,
            coin: 100,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub display_count: usize,
    pub html_path: PathBuf,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            display_count: 50,
            html_path: PathBuf::from("bilibili_hot_report.html"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub snapshot_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            snapshot_path: PathBuf::from("data").join("bilibili_popular_cache.json"),
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let source = &self.source;
        if source.endpoint.trim().is_empty() {
            return Err(ConfigError::Message("source.endpoint must not be empty".into()));
        }
        if source.pages == 0 {
            return Err(ConfigError::Message("source.pages must be at least 1".into()));
        }
        if !(1..=50).contains(&source.page_size) {
            return Err(ConfigError::Message(format!(
                "source.page_size must be between 1 and 50, got {}",
                source.page_size
            )));
        }
        if source.timeout_secs == 0 {
            return Err(ConfigError::Message("source.timeout_secs must be at least 1".into()));
        }
        if self.report.display_count == 0 {
            return Err(ConfigError::Message("report.display_count must be at least 1".into()));
        }
        Ok(())
    }

    /// Copy of the configuration that is safe to print.
    pub fn redacted(&self) -> AppConfig {
        let mut copy = self.clone();
        if copy.source.session_token.is_some() {
            copy.source.session_token = Some("***".to_string());
        }
        copy
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// Defaults, then `HotRadar.{toml,yaml,json}` if present, then `HOT_RADAR_*`
/// environment variables (`HOT_RADAR_SOURCE__PAGES=2`).
pub fn load_configuration() -> Result<AppConfig, ConfigError> {
    load_configuration_from(CONFIG_FILE_STEM, None)
}

/// Same layering as [`load_configuration`] with an explicit file stem and an
/// optional environment map used in place of the process environment.
pub fn load_configuration_from(
    file_stem: &str,
    env: Option<Map<String, String>>,
) -> Result<AppConfig, ConfigError> {
    let builder = Config::builder()
        .add_source(ConfigFile::with_name(file_stem).required(false))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .source(env),
        )
        .build()?;
    let config = builder.try_deserialize::<AppConfig>()?;
    config.validate()?;
    Ok(config)
}
