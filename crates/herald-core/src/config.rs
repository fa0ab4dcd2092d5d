//! Pipeline configuration
//!
//! The pipeline does not read files; the embedding application builds a
//! [`PipelineConfig`] (directly, or by deserializing its own config file)
//! and hands it to the dispatcher builder.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("retry.max_attempts must be at least 1")]
    ZeroAttempts,

    #[error("retry.initial_backoff_ms ({initial}) exceeds retry.max_backoff_ms ({max})")]
    BackoffInverted { initial: u64, max: u64 },

    #[error("retry.attempt_timeout_ms must be positive")]
    ZeroTimeout,
}

/// Top-level pipeline configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub notifications: NotificationConfig,
}

impl PipelineConfig {
    pub fn with_delivery_mode(mut self, mode: DeliveryMode) -> Self {
        self.notifications.mode = mode;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.notifications.retry = retry;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.notifications.retry.validate()
    }
}

/// How post-commit notifications are executed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryMode {
    /// Dispatch waits for side effects before returning the response
    #[default]
    Inline,
    /// Side effects run on a spawned task; the response returns immediately
    Detached,
}

/// Notification delivery settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    pub mode: DeliveryMode,
    pub retry: RetryPolicy,
}

/// Bounded retry with exponential backoff; after the last attempt the
/// notification is dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
    /// Upper bound for a single send attempt
    pub attempt_timeout_ms: u64,
}

impl RetryPolicy {
    /// One attempt, no waiting
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_backoff(mut self, initial: Duration, max: Duration) -> Self {
        self.initial_backoff_ms = initial.as_millis() as u64;
        self.max_backoff_ms = max.as_millis() as u64;
        self
    }

    pub fn attempt_timeout(&self) -> Duration {
        Duration::from_millis(self.attempt_timeout_ms)
    }

    /// Delay before the attempt following `attempt` (1-based)
    pub fn backoff_after(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        let delay = self.initial_backoff_ms.saturating_mul(1u64 << exponent);
        Duration::from_millis(delay.min(self.max_backoff_ms))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_attempts == 0 {
            return Err(ConfigError::ZeroAttempts);
        }
        if self.initial_backoff_ms > self.max_backoff_ms {
            return Err(ConfigError::BackoffInverted {
                initial: self.initial_backoff_ms,
                max: self.max_backoff_ms,
            });
        }
        if self.attempt_timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff_ms: 50,
            max_backoff_ms: 1_000,
            attempt_timeout_ms: 5_000,
        }
    }
}
