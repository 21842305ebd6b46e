use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};

use crate::activity::{DurationMode, EngineSettings, SourceKind, MAX_WINDOW_DAYS};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api_server: ServerConfig,
    pub auth: AuthConfig,
    pub youtube: YouTubeConfig,
    pub report: ReportConfig,
    pub frontend: FrontendConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    /// Every caller is anonymous and gets demo data
    None,
    /// `Authorization: Bearer <YouTube access token>`
    Bearer,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub mode: AuthMode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YouTubeConfig {
    pub api_base_url: String,
    /// Page size for listing calls, the API caps it at 50
    pub max_results: u32,
    pub request_timeout_secs: u64,
    pub details_cache_ttl_secs: u64,
    pub details_cache_max_entries: u64,
}

impl Default for YouTubeConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://www.googleapis.com/youtube/v3".to_string(),
            max_results: 50,
            request_timeout_secs: 10,
            details_cache_ttl_secs: 300,
            details_cache_max_entries: 10_000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    pub window_days: u32,
    /// Record count mixed reports are topped up to
    pub top_up_target: usize,
    pub duration_mode: DurationMode,
    pub sources: Vec<SourceKind>,
    pub lookup_concurrency: usize,
    #[serde(default)]
    pub synthetic_seed: Option<u64>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        let defaults = EngineSettings::default();
        Self {
            window_days: defaults.window_days,
            top_up_target: defaults.top_up_target,
            duration_mode: defaults.duration_mode,
            sources: defaults.sources,
            lookup_concurrency: defaults.lookup_concurrency,
            synthetic_seed: defaults.synthetic_seed,
        }
    }
}

impl ReportConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.window_days == 0 || self.window_days > MAX_WINDOW_DAYS {
            bail!("REPORT_WINDOW_DAYS must be between 1 and {MAX_WINDOW_DAYS}");
        }
        if self.top_up_target == 0 {
            bail!("REPORT_TOP_UP_TARGET must be at least 1");
        }
        Ok(())
    }

    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            window_days: self.window_days,
            top_up_target: self.top_up_target,
            duration_mode: self.duration_mode,
            sources: self.sources.clone(),
            lookup_concurrency: self.lookup_concurrency,
            synthetic_seed: self.synthetic_seed,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrontendConfig {
    /// Path to directory containing static frontend files
    /// If None, uses the embedded pages
    pub static_dir: Option<String>,
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(value) => value
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value '{value}'")),
        Err(_) => Ok(default),
    }
}

fn parse_sources(value: &str) -> anyhow::Result<Vec<SourceKind>> {
    let mut sources = Vec::new();
    for name in value.split(',').filter(|s| !s.trim().is_empty()) {
        let Some(kind) = SourceKind::parse(name) else {
            bail!("unknown report source '{}'. Supported: uploads, history, activities, search", name.trim());
        };
        if !sources.contains(&kind) {
            sources.push(kind);
        }
    }
    Ok(sources)
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let api_host = env_or("API_HOST", "127.0.0.1");
        let api_port = env_parse::<u16>("API_PORT", 3000)?;

        let auth_mode = match env_or("AUTH_MODE", "bearer").to_lowercase().as_str() {
            "none" => AuthMode::None,
            "bearer" => AuthMode::Bearer,
            other => {
                tracing::warn!(
                    "Unknown AUTH_MODE '{other}', falling back to 'bearer'. Supported values: none, bearer"
                );
                AuthMode::Bearer
            }
        };

        let youtube_defaults = YouTubeConfig::default();
        let youtube = YouTubeConfig {
            api_base_url: env_or("YOUTUBE_API_BASE_URL", &youtube_defaults.api_base_url),
            max_results: env_parse("YOUTUBE_MAX_RESULTS", youtube_defaults.max_results)?.clamp(1, 50),
            request_timeout_secs: env_parse("YOUTUBE_TIMEOUT_SECS", youtube_defaults.request_timeout_secs)?,
            details_cache_ttl_secs: env_parse(
                "YOUTUBE_DETAILS_CACHE_SECS",
                youtube_defaults.details_cache_ttl_secs,
            )?,
            details_cache_max_entries: env_parse(
                "YOUTUBE_DETAILS_CACHE_SIZE",
                youtube_defaults.details_cache_max_entries,
            )?,
        };

        let report_defaults = ReportConfig::default();
        let duration_mode = match std::env::var("REPORT_DURATION_MODE") {
            Ok(value) => DurationMode::parse(&value).with_context(|| {
                format!("REPORT_DURATION_MODE '{value}' is not one of rounded, truncated, fractional")
            })?,
            Err(_) => report_defaults.duration_mode,
        };
        let sources = match std::env::var("REPORT_SOURCES") {
            Ok(value) => parse_sources(&value)?,
            Err(_) => report_defaults.sources,
        };
        let synthetic_seed = match std::env::var("REPORT_SYNTHETIC_SEED") {
            Ok(value) => Some(
                value
                    .trim()
                    .parse::<u64>()
                    .with_context(|| format!("REPORT_SYNTHETIC_SEED has an invalid value '{value}'"))?,
            ),
            Err(_) => None,
        };

        let report = ReportConfig {
            window_days: env_parse("REPORT_WINDOW_DAYS", report_defaults.window_days)?,
            top_up_target: env_parse("REPORT_TOP_UP_TARGET", report_defaults.top_up_target)?,
            duration_mode,
            sources,
            lookup_concurrency: env_parse(
                "REPORT_LOOKUP_CONCURRENCY",
                report_defaults.lookup_concurrency,
            )?,
            synthetic_seed,
        };

        report.validate()?;

        let frontend_static_dir = std::env::var("FRONTEND_STATIC_DIR").ok();

        Ok(Config {
            api_server: ServerConfig {
                host: api_host,
                port: api_port,
            },
            auth: AuthConfig { mode: auth_mode },
            youtube,
            report,
            frontend: FrontendConfig {
                static_dir: frontend_static_dir,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sources() {
        let sources = parse_sources("uploads, history,uploads").unwrap();
        assert_eq!(sources, vec![SourceKind::Uploads, SourceKind::History]);

        assert!(parse_sources("").unwrap().is_empty());
        assert!(parse_sources("uploads,likes").is_err());
    }

    #[test]
    fn test_report_defaults_match_engine() {
        let settings = ReportConfig::default().engine_settings();
        assert_eq!(settings, EngineSettings::default());
        assert_eq!(settings.window_days, 30);
        assert_eq!(settings.top_up_target, 50);
    }

    #[test]
    fn test_report_window_limits() {
        let config = |window_days| ReportConfig {
            window_days,
            ..ReportConfig::default()
        };

        assert!(config(1).validate().is_ok());
        assert!(config(MAX_WINDOW_DAYS).validate().is_ok());
        assert!(config(0).validate().is_err());
        assert!(config(MAX_WINDOW_DAYS + 1).validate().is_err());
        assert!(config(200_000_000).validate().is_err());

        let no_target = ReportConfig {
            top_up_target: 0,
            ..ReportConfig::default()
        };
        assert!(no_target.validate().is_err());
    }
}
