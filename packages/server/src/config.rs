use anyhow::{Context, Result};
use admission::{AdmissionConfig, ApiCredential};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,

    // Collaborator credentials. A missing one leaves that check unconfigured.
    pub tavily: Option<ApiCredential>,
    pub godaddy: Option<ApiCredential>,
    pub opencorporates: Option<ApiCredential>,
    pub newsapi: Option<ApiCredential>,
    pub huggingface: Option<ApiCredential>,

    // Pipeline tuning overrides
    pub negative_press_threshold: Option<f32>,
    pub admission_concurrency: Option<usize>,
    pub callback_deadline_secs: Option<u64>,
    pub classify_interval_ms: Option<u64>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        // GoDaddy needs both halves of the key pair
        let godaddy = match (
            ApiCredential::from_env("GODADDY_API_KEY"),
            env::var("GODADDY_API_SECRET").ok().filter(|s| !s.trim().is_empty()),
        ) {
            (Some(key), Some(secret)) => Some(key.with_secret(secret)),
            (Some(_), None) => {
                tracing::warn!("GODADDY_API_KEY set without GODADDY_API_SECRET; registrar disabled");
                None
            }
            _ => None,
        };

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            tavily: ApiCredential::from_env("TAVILY_API_KEY"),
            godaddy,
            opencorporates: ApiCredential::from_env("OPENCORPORATES_API_TOKEN"),
            newsapi: ApiCredential::from_env("NEWSAPI_KEY"),
            huggingface: ApiCredential::from_env("HUGGINGFACE_API_TOKEN"),
            negative_press_threshold: parse_optional("NEGATIVE_PRESS_THRESHOLD")?,
            admission_concurrency: parse_optional("ADMISSION_CONCURRENCY")?,
            callback_deadline_secs: parse_optional("CALLBACK_DEADLINE_SECS")?,
            classify_interval_ms: parse_optional("CLASSIFY_INTERVAL_MS")?,
        })
    }

    /// Pipeline configuration with any environment overrides applied.
    pub fn admission_config(&self) -> Result<AdmissionConfig> {
        let mut config = AdmissionConfig::default();
        if let Some(threshold) = self.negative_press_threshold {
            config = config.with_negative_threshold(threshold);
        }
        if let Some(n) = self.admission_concurrency {
            config = config.with_max_concurrency(n);
        }
        if let Some(secs) = self.callback_deadline_secs {
            config = config.with_batch_deadline(Duration::from_secs(secs));
        }
        if let Some(ms) = self.classify_interval_ms {
            config = config.with_classify_interval(Duration::from_millis(ms));
        }
        config.validate().context("Invalid admission settings")?;
        Ok(config)
    }
}

fn parse_optional<T>(name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("{} must be a valid number", name)),
        _ => Ok(None),
    }
}
