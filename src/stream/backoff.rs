use {std::time::Duration, thiserror::Error, tokio::time::sleep};

/// Delays between reconnect attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffPolicy {
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub max_retries: u32,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(5),
            max_delay: Duration::from_secs(60),
            max_retries: 10,
        }
    }
}

#[derive(Debug)]
pub struct ExponentialBackoff {
    policy: BackoffPolicy,
    current_attempt: u32,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Maximum retry attempts exceeded")]
pub struct MaxRetriesExceeded;

impl ExponentialBackoff {
    pub fn new(policy: BackoffPolicy) -> Self {
        Self {
            policy,
            current_attempt: 0,
        }
    }

    /// Delay before the next attempt, doubling up to the cap
    pub fn next_delay(&self) -> Duration {
        let factor = 2_u32.saturating_pow(self.current_attempt);
        self.policy
            .initial_delay
            .saturating_mul(factor)
            .min(self.policy.max_delay)
    }

    pub async fn sleep(&mut self) -> Result<(), MaxRetriesExceeded> {
        if self.current_attempt >= self.policy.max_retries {
            return Err(MaxRetriesExceeded);
        }

        let delay = self.next_delay();
        log::warn!(
            "⏳ Reconnect attempt {} of {} in {:?}",
            self.current_attempt + 1,
            self.policy.max_retries,
            delay
        );

        sleep(delay).await;
        self.current_attempt += 1;
        Ok(())
    }

    pub fn reset(&mut self) {
        self.current_attempt = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_delay_doubles_until_cap_then_gives_up() {
        let mut backoff = ExponentialBackoff::new(BackoffPolicy {
            initial_delay: Duration::from_secs(5),
            max_delay: Duration::from_secs(12),
            max_retries: 3,
        });

        assert_eq!(backoff.next_delay(), Duration::from_secs(5));
        backoff.sleep().await.unwrap();
        assert_eq!(backoff.next_delay(), Duration::from_secs(10));
        backoff.sleep().await.unwrap();
        assert_eq!(backoff.next_delay(), Duration::from_secs(12));
        backoff.sleep().await.unwrap();

        let error = backoff.sleep().await.unwrap_err();
        assert_eq!(error, MaxRetriesExceeded);
        assert_eq!(error.to_string(), "Maximum retry attempts exceeded");

        backoff.reset();
        assert_eq!(backoff.next_delay(), Duration::from_secs(5));
    }
}
