//! Transport-level retry policy.
//!
//! Retries live here and nowhere else: the client above a transport reports
//! whatever error the transport finally returns.

use osm_api_core::{TransportError, TransportResult};
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Configuration for retry behavior.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retries after the first attempt.
    pub max_retries: u32,
    /// Wait strategy.
    pub wait: WaitStrategy,
    /// Which failures are retried.
    pub retry_on: RetryCondition,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::for_api()
    }
}

impl RetryConfig {
    /// Create a new default config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set max retries.
    pub fn max_retries(mut self, n: u32) -> Self {
        self.max_retries = n;
        self
    }

    /// Set the wait strategy.
    pub fn wait(mut self, strategy: WaitStrategy) -> Self {
        self.wait = strategy;
        self
    }

    /// Use exponential backoff.
    pub fn exponential(mut self, initial: Duration, max: Duration) -> Self {
        self.wait = WaitStrategy::ExponentialBackoff {
            initial,
            max,
            multiplier: 2.0,
        };
        self
    }

    /// Use fixed delay.
    pub fn fixed(mut self, delay: Duration) -> Self {
        self.wait = WaitStrategy::Fixed(delay);
        self
    }

    /// Set retry condition.
    pub fn retry_on(mut self, condition: RetryCondition) -> Self {
        self.retry_on = condition;
        self
    }

    /// Sensible defaults for the public API servers: three retries on rate
    /// limiting, server errors, timeouts and dropped connections.
    pub fn for_api() -> Self {
        Self {
            max_retries: 3,
            wait: WaitStrategy::ExponentialJitter {
                initial: Duration::from_millis(500),
                max: Duration::from_secs(30),
                multiplier: 2.0,
                jitter: 0.1,
            },
            retry_on: RetryCondition::new()
                .on_rate_limit()
                .on_server_errors()
                .on_timeout()
                .on_connection_errors(),
        }
    }

    /// Config that never retries.
    pub fn no_retry() -> Self {
        Self::for_api().max_retries(0)
    }
}

/// Strategy for waiting between retries.
#[derive(Debug, Clone)]
pub enum WaitStrategy {
    /// No waiting.
    None,
    /// Fixed delay.
    Fixed(Duration),
    /// Exponential backoff.
    ExponentialBackoff {
        /// Initial delay.
        initial: Duration,
        /// Maximum delay.
        max: Duration,
        /// Multiplier for each attempt.
        multiplier: f64,
    },
    /// Exponential backoff with jitter.
    ExponentialJitter {
        /// Initial delay.
        initial: Duration,
        /// Maximum delay.
        max: Duration,
        /// Multiplier for each attempt.
        multiplier: f64,
        /// Jitter factor (0.0 to 1.0).
        jitter: f64,
    },
}

impl WaitStrategy {
    /// Wait before the retry following `attempt` (1-indexed).
    ///
    /// A server-provided Retry-After takes precedence, capped at the
    /// strategy's maximum.
    pub fn calculate(&self, attempt: u32, retry_after: Option<Duration>) -> Duration {
        let computed = match self {
            WaitStrategy::None => Duration::ZERO,
            WaitStrategy::Fixed(d) => *d,
            WaitStrategy::ExponentialBackoff {
                initial,
                max,
                multiplier,
            } => {
                let delay = initial.as_secs_f64() * multiplier.powi(attempt as i32 - 1);
                Duration::from_secs_f64(delay.min(max.as_secs_f64()))
            }
            WaitStrategy::ExponentialJitter {
                initial,
                max,
                multiplier,
                jitter,
            } => {
                let base = initial.as_secs_f64() * multiplier.powi(attempt as i32 - 1);
                let jitter_amount = base * jitter * random_jitter();
                let delay = (base + jitter_amount).clamp(0.0, max.as_secs_f64());
                Duration::from_secs_f64(delay)
            }
        };

        match retry_after {
            Some(server) => server.min(self.max_wait().unwrap_or(server)),
            None => computed,
        }
    }

    fn max_wait(&self) -> Option<Duration> {
        match self {
            WaitStrategy::None => None,
            WaitStrategy::Fixed(d) => Some(*d),
            WaitStrategy::ExponentialBackoff { max, .. }
            | WaitStrategy::ExponentialJitter { max, .. } => Some(*max),
        }
    }
}

/// Condition for retrying.
#[derive(Debug, Clone, Default)]
pub struct RetryCondition {
    /// HTTP status codes to retry on.
    pub on_status_codes: Vec<u16>,
    /// Retry timeouts.
    pub on_timeout: bool,
    /// Retry connection failures.
    pub on_connection: bool,
}

impl RetryCondition {
    /// Create a condition that retries nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add status codes to retry on.
    pub fn on_status(mut self, codes: impl IntoIterator<Item = u16>) -> Self {
        self.on_status_codes.extend(codes);
        self
    }

    /// Retry on server errors (5xx).
    pub fn on_server_errors(mut self) -> Self {
        self.on_status_codes.extend(500..=599);
        self
    }

    /// Retry on rate limit (429).
    pub fn on_rate_limit(mut self) -> Self {
        self.on_status_codes.push(429);
        self
    }

    /// Retry on timeouts.
    pub fn on_timeout(mut self) -> Self {
        self.on_timeout = true;
        self
    }

    /// Retry when the connection fails.
    pub fn on_connection_errors(mut self) -> Self {
        self.on_connection = true;
        self
    }

    /// Check if an error should be retried.
    pub fn should_retry(&self, error: &TransportError) -> bool {
        match error {
            TransportError::Status { status, .. } => self.on_status_codes.contains(status),
            TransportError::Timeout => self.on_timeout,
            TransportError::Connection(_) => self.on_connection,
            TransportError::Other(_) => false,
        }
    }
}

/// Generate a random jitter factor between -1.0 and 1.0.
fn random_jitter() -> f64 {
    use rand::Rng;
    let mut rng = rand::thread_rng();
    rng.gen_range(-1.0..1.0)
}

/// Execute an operation with retries.
///
/// # Example
///
/// ```ignore
/// use osm_api_transport::{with_retry, RetryConfig};
///
/// let config = RetryConfig::for_api();
/// let body = with_retry(&config, || async { transport.request(&request).await }).await?;
/// ```
pub async fn with_retry<F, Fut, T>(config: &RetryConfig, operation: F) -> TransportResult<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = TransportResult<T>>,
{
    let max_attempts = config.max_retries.saturating_add(1);
    let mut attempt = 0;

    loop {
        attempt += 1;

        match operation().await {
            Ok(result) => return Ok(result),
            Err(error) => {
                if attempt >= max_attempts || !config.retry_on.should_retry(&error) {
                    if attempt > 1 {
                        warn!(
                            attempt,
                            error = %error,
                            "Retry exhausted or error not retryable"
                        );
                    }
                    return Err(error);
                }

                let wait = config.wait.calculate(attempt, error.retry_after());
                debug!(
                    attempt,
                    wait_ms = wait.as_millis() as u64,
                    error = %error,
                    "Waiting before retry"
                );
                sleep(wait).await;
            }
        }
    }
}
