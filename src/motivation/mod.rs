/// Daily motivation text
///
/// A generated tip is requested at most once per calendar day. Failed
/// attempts are retried with exponential backoff, and a fixed fallback text
/// is returned once the attempts run out so callers always get something to
/// show.

pub mod gemini;

pub use gemini::{GeminiClient, GeminiConfig};

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Shown when every attempt returned a response without text
pub const FALLBACK_NO_TEXT: &str = "Couldn't connect to the habit coach. Try again later.";

/// Shown when the last attempt failed outright
pub const FALLBACK_EXHAUSTED: &str = "Failed to get motivation after several retries.";

/// Errors from a single generation attempt
#[derive(Error, Debug)]
pub enum MotivationError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected HTTP status {0}")]
    Status(u16),

    #[error("Response contained no text")]
    MissingText,
}

/// Something that can turn a habit list into a short motivational text
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// One attempt, no retries
    async fn generate(&self, task_list: &str) -> Result<String, MotivationError>;
}

/// How often and how patiently to retry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    /// Delay before the second attempt; doubled for each later one
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Delay after the failed attempt with index `attempt` (0-based)
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(2u32.saturating_pow(attempt))
    }
}

/// Ask `generator` for a text, retrying failures
///
/// Never fails: exhaustion yields one of the fallback texts.
pub async fn generate_with_retry(
    generator: &dyn TextGenerator,
    task_list: &str,
    policy: RetryPolicy,
) -> String {
    let mut fallback = FALLBACK_NO_TEXT;

    for attempt in 0..policy.max_attempts {
        let err = match generator.generate(task_list).await {
            Ok(text) => return text,
            Err(err) => err,
        };
        warn!("Motivation attempt {} of {} failed: {}", attempt + 1, policy.max_attempts, err);

        // An empty answer is retried right away; only failed requests back off
        if matches!(err, MotivationError::MissingText) {
            fallback = FALLBACK_NO_TEXT;
            continue;
        }
        fallback = FALLBACK_EXHAUSTED;
        if attempt + 1 < policy.max_attempts {
            tokio::time::sleep(policy.backoff(attempt)).await;
        }
    }

    fallback.to_string()
}

/// Generated texts keyed by day and habit list
///
/// Only texts for the most recent day are kept.
#[derive(Debug, Default)]
pub struct MotivationCache {
    entries: HashMap<(NaiveDate, String), String>,
}

impl MotivationCache {
    pub fn get(&self, date: NaiveDate, task_list: &str) -> Option<&str> {
        self.entries.get(&(date, task_list.to_string())).map(String::as_str)
    }

    pub fn insert(&mut self, date: NaiveDate, task_list: &str, text: String) {
        self.entries.retain(|(cached_date, _), _| *cached_date >= date);
        self.entries.insert((date, task_list.to_string()), text);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Generator plus retry policy plus per-day cache
///
/// Produces the text only; storing it in the dashboard state is up to the
/// caller.
pub struct MotivationService {
    generator: Box<dyn TextGenerator>,
    policy: RetryPolicy,
    cache: Mutex<MotivationCache>,
}

impl MotivationService {
    pub fn new(generator: Box<dyn TextGenerator>, policy: RetryPolicy) -> Self {
        Self {
            generator,
            policy,
            cache: Mutex::new(MotivationCache::default()),
        }
    }

    /// Today's text for this habit list, generating it on first use
    pub async fn daily_motivation(&self, date: NaiveDate, task_list: &str) -> String {
        // Held across generation so concurrent callers wait for one request
        let mut cache = self.cache.lock().await;
        if let Some(text) = cache.get(date, task_list) {
            return text.to_string();
        }

        info!("Generating motivation for {}", date);
        let text = generate_with_retry(self.generator.as_ref(), task_list, self.policy).await;
        cache.insert(date, task_list, text.clone());
        text
    }
}
