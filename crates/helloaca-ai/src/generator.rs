//! Text-generation seam and bounded retry around it.

use std::time::Duration;

use async_trait::async_trait;
use helloaca_config::ProviderConfig;
use tracing::warn;

use crate::ProviderError;

/// Text produced by one generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub text: String,
    pub tokens_used: u32,
}

/// An external service that turns a prompt into a single block of text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<Completion, ProviderError>;
}

/// Retry budget for the outbound call. The default makes a single attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
    /// No single wait exceeds this, whatever the backoff or the provider asks for.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 0,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    pub fn from_config(config: &ProviderConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            base_delay: Duration::from_millis(config.retry_base_delay_ms),
            max_delay: Duration::from_millis(config.retry_max_delay_ms),
        }
    }

    /// Exponential backoff: `base * 2^retry`, with `retry` starting at 0,
    /// capped at `max_delay`.
    pub fn delay_for(&self, retry: u32) -> Duration {
        self.base_delay
            .saturating_mul(1u32 << retry.min(16))
            .min(self.max_delay)
    }
}

/// Call `generator` until it succeeds, fails permanently, or the policy runs out.
///
/// A provider `Retry-After` hint overrides the computed backoff, but is still
/// capped at `max_delay`.
pub async fn generate_with_retry(
    generator: &dyn TextGenerator,
    prompt: &str,
    policy: RetryPolicy,
) -> Result<Completion, ProviderError> {
    let mut retry = 0;
    loop {
        match generator.generate(prompt).await {
            Ok(completion) => return Ok(completion),
            Err(err) if err.is_retryable() && retry < policy.max_retries => {
                let delay = match &err {
                    ProviderError::RateLimited {
                        retry_after_secs: Some(secs),
                    } => Duration::from_secs(*secs).min(policy.max_delay),
                    _ => policy.delay_for(retry),
                };
                warn!(
                    error = %err,
                    attempt = retry + 1,
                    delay_ms = delay.as_millis() as u64,
                    "provider call failed, retrying"
                );
                tokio::time::sleep(delay).await;
                retry += 1;
            }
            Err(err) => return Err(err),
        }
    }
}
