//! Bounded retry with pluggable backoff.

use crate::clock::Sleeper;
use std::{fmt::Display, time::Duration};
use thiserror::Error;

/// Delay schedule between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    /// Retry immediately.
    None,
    /// Same delay after every failed attempt.
    Fixed(Duration),
    /// `base * 2^attempt` after failed attempt `attempt` (1-based).
    Exponential { base: Duration },
}

impl Backoff {
    /// Delay to wait after the given failed attempt (1-based).
    pub fn delay(&self, attempt: u32) -> Duration {
        match *self {
            Self::None => Duration::ZERO,
            Self::Fixed(delay) => delay,
            Self::Exponential { base } => base.saturating_mul(2u32.saturating_pow(attempt)),
        }
    }
}

/// How many times to try and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Zero is treated as one.
    pub max_attempts: u32,
    /// Delay schedule.
    pub backoff: Backoff,
}

impl RetryPolicy {
    /// Exponential backoff from a one second base.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            backoff: Backoff::Exponential {
                base: Duration::from_secs(1),
            },
        }
    }

    /// Replace the delay schedule.
    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3)
    }
}

/// Returned once every attempt has failed.
#[derive(Debug, Error)]
pub enum RetryError<E> {
    #[error("Failed after {attempts} attempts: {last}")]
    Exhausted { attempts: u32, last: E },
}

impl<E> RetryError<E> {
    /// The error of the final attempt.
    pub fn last(&self) -> &E {
        match self {
            Self::Exhausted { last, .. } => last,
        }
    }
}

/// Run `op` until it succeeds or the policy is exhausted.
///
/// `op` receives the 1-based attempt number. Attempts run sequentially;
/// the sleeper is awaited between attempts, never after the last one.
pub async fn retry<T, E, Z, F, Fut>(
    policy: &RetryPolicy,
    sleeper: &Z,
    label: &str,
    mut op: F,
) -> Result<T, RetryError<E>>
where
    E: Display,
    Z: Sleeper,
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let attempts = policy.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(e) => {
                tracing::warn!("attempt {attempt} failed for {label}: {e}");
                if attempt >= attempts {
                    return Err(RetryError::Exhausted { attempts, last: e });
                }
                sleeper.sleep(policy.backoff.delay(attempt)).await;
                attempt += 1;
            }
        }
    }
}
