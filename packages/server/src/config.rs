use std::env;
use std::time::Duration;

use anyhow::{Context, Result};
use dotenvy::dotenv;

use crate::domains::employers::ReconcileOptions;
use crate::kernel::{EnrichmentSchedule, RetryPolicy, GPT_4O};

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub jboard_api_url: String,
    pub jboard_api_key: String,
    pub openai_api_key: String,
    pub openai_model: String,
    pub openai_base_url: String,
    pub port: u16,
    pub enrich_schedule: String,
    pub page_size: u32,
    pub concurrency: usize,
    pub max_retries: u32,
    pub retry_base_delay: Duration,
    pub recent_window_hours: Option<i64>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from any key lookup (environment, map in tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| lookup(key).with_context(|| format!("{} must be set", key));
        let or_default = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let page_size: u32 = or_default("ENRICH_PAGE_SIZE", "15")
            .parse()
            .context("ENRICH_PAGE_SIZE must be a valid number")?;
        if page_size == 0 {
            anyhow::bail!("ENRICH_PAGE_SIZE must be positive");
        }

        Ok(Self {
            jboard_api_url: required("JBOARD_API_URL")?,
            jboard_api_key: required("JBOARD_API_KEY")?,
            openai_api_key: required("OPENAI_API_KEY")?,
            openai_model: or_default("OPENAI_MODEL", GPT_4O),
            openai_base_url: or_default("OPENAI_BASE_URL", "https://api.openai.com/v1"),
            port: or_default("PORT", "3000")
                .parse()
                .context("PORT must be a valid number")?,
            enrich_schedule: or_default("ENRICH_SCHEDULE", "0 5 14 * * *"),
            page_size,
            concurrency: or_default("ENRICH_CONCURRENCY", "1")
                .parse::<usize>()
                .context("ENRICH_CONCURRENCY must be a valid number")?
                .max(1),
            max_retries: or_default("ENRICH_MAX_RETRIES", "2")
                .parse()
                .context("ENRICH_MAX_RETRIES must be a valid number")?,
            retry_base_delay: Duration::from_millis(
                or_default("ENRICH_RETRY_BASE_MS", "500")
                    .parse()
                    .context("ENRICH_RETRY_BASE_MS must be a valid number")?,
            ),
            recent_window_hours: lookup("RECENT_WINDOW_HOURS")
                .map(|v| v.parse())
                .transpose()
                .context("RECENT_WINDOW_HOURS must be a valid number")?,
        })
    }

    pub fn reconcile_options(&self) -> ReconcileOptions {
        ReconcileOptions {
            concurrency: self.concurrency,
            retry: RetryPolicy::new(self.max_retries, self.retry_base_delay),
        }
    }

    pub fn schedule(&self) -> EnrichmentSchedule {
        EnrichmentSchedule {
            cron: self.enrich_schedule.clone(),
            page_size: self.page_size,
            recent_window: self.recent_window_hours.map(chrono::Duration::hours),
        }
    }
}
