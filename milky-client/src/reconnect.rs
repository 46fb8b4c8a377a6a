//! Reconnection policy for the event stream.
//!
//! Delays grow geometrically from `initial_delay` and are capped at
//! `max_delay`. A successful connection starts the schedule over.

use std::time::Duration;

/// Reconnection policy of [`MilkyClient::run`](crate::MilkyClient::run).
#[derive(Debug, Clone)]
pub struct ReconnectConfig {
    /// Whether reconnection is enabled.
    pub enabled: bool,
    /// Delay before the first retry.
    pub initial_delay: Duration,
    /// Upper bound of any delay.
    pub max_delay: Duration,
    /// Factor applied to the delay after each failed retry.
    pub backoff_multiplier: f64,
    /// Retries allowed after consecutive failures (0 = unlimited).
    pub max_attempts: usize,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            backoff_multiplier: 2.0,
            max_attempts: 0,
        }
    }
}

impl ReconnectConfig {
    /// Returns the delay before the given retry, counted from 1.
    #[must_use]
    pub fn delay_for(&self, retry: usize) -> Duration {
        let exponent = i32::try_from(retry.saturating_sub(1)).unwrap_or(i32::MAX);
        let secs = self.initial_delay.as_secs_f64() * self.backoff_multiplier.powi(exponent);
        if secs.is_finite() && secs < self.max_delay.as_secs_f64() {
            Duration::from_secs_f64(secs)
        } else {
            self.max_delay
        }
    }

    fn allows(&self, retry: usize) -> bool {
        self.enabled && (self.max_attempts == 0 || retry <= self.max_attempts)
    }
}

/// Consecutive connection failures of one `run` loop.
#[derive(Debug)]
pub(crate) struct Backoff {
    config: ReconnectConfig,
    failures: usize,
}

impl Backoff {
    pub(crate) fn new(config: ReconnectConfig) -> Self {
        Self {
            config,
            failures: 0,
        }
    }

    /// Records a failure and returns the delay before retrying, or `None`
    /// when the policy gives up.
    pub(crate) fn next_delay(&mut self) -> Option<Duration> {
        self.failures += 1;
        self.config
            .allows(self.failures)
            .then(|| self.config.delay_for(self.failures))
    }

    pub(crate) fn reset(&mut self) {
        self.failures = 0;
    }

    pub(crate) fn failures(&self) -> usize {
        self.failures
    }

    pub(crate) fn is_enabled(&self) -> bool {
        self.config.enabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_schedule() {
        let mut backoff = Backoff::new(ReconnectConfig::default());
        let delays: Vec<_> = (0..7).map(|_| backoff.next_delay().unwrap()).collect();
        assert_eq!(
            delays,
            [1, 2, 4, 8, 16, 30, 30].map(Duration::from_secs).to_vec()
        );
    }

    #[test]
    fn test_unlimited_by_default() {
        let mut backoff = Backoff::new(ReconnectConfig::default());
        for _ in 0..1000 {
            assert!(backoff.next_delay().is_some());
        }
        assert_eq!(backoff.failures(), 1000);
        assert_eq!(backoff.next_delay(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_max_attempts_counts_retries() {
        let config = ReconnectConfig {
            initial_delay: Duration::from_millis(100),
            max_attempts: 2,
            ..Default::default()
        };
        let mut backoff = Backoff::new(config);

        assert_eq!(backoff.next_delay(), Some(Duration::from_millis(100)));
        assert_eq!(backoff.next_delay(), Some(Duration::from_millis(200)));
        assert_eq!(backoff.next_delay(), None);
    }

    #[test]
    fn test_reset_restarts_schedule() {
        let mut backoff = Backoff::new(ReconnectConfig::default());
        backoff.next_delay();
        backoff.next_delay();
        assert_eq!(backoff.failures(), 2);

        backoff.reset();
        assert_eq!(backoff.failures(), 0);
        assert_eq!(backoff.next_delay(), Some(Duration::from_secs(1)));
    }

    #[test]
    fn test_disabled() {
        let config = ReconnectConfig {
            enabled: false,
            ..Default::default()
        };
        let mut backoff = Backoff::new(config);
        assert!(!backoff.is_enabled());
        assert_eq!(backoff.next_delay(), None);
    }

    #[test]
    fn test_custom_multiplier() {
        let config = ReconnectConfig {
            max_delay: Duration::from_secs(5),
            backoff_multiplier: 3.0,
            ..Default::default()
        };
        assert_eq!(config.delay_for(1), Duration::from_secs(1));
        assert_eq!(config.delay_for(2), Duration::from_secs(3));
        assert_eq!(config.delay_for(3), Duration::from_secs(5));
        assert_eq!(config.delay_for(usize::MAX), Duration::from_secs(5));
    }
}
