use log::{debug, warn};
use std::{fmt::Display, future::Future, time::Duration};

/// Doubling delay between retries of a failing job, capped at `max`.
#[derive(Debug, Clone)]
pub struct ExponentialBackoff {
    base: Duration,
    max: Duration,
    attempt: u32,
}

impl ExponentialBackoff {
    pub fn new(base: Duration, max: Duration) -> Self {
        Self {
            base,
            max,
            attempt: 0,
        }
    }

    pub fn next_delay(&mut self) -> Duration {
        let factor = 2u32.saturating_pow(self.attempt);
        self.attempt = self.attempt.saturating_add(1);

        self.base.saturating_mul(factor).min(self.max)
    }

    pub fn reset(&mut self) {
        self.attempt = 0;
    }
}

impl Default for ExponentialBackoff {
    fn default() -> Self {
        Self::new(Duration::from_secs(1), Duration::from_secs(300))
    }
}

/// What a supervised loop does when its job returns an error.
#[derive(Debug, Clone)]
pub enum FailurePolicy {
    /// Log a warning and retry after the next backoff delay.
    Retry(ExponentialBackoff),
    /// Log at debug level and wait for the next regular run.
    Ignore,
}

/// Run `job` forever: once immediately, then again after every `interval`.
///
/// Errors never end the loop, they are handled according to `policy`.
pub async fn supervise<F, Fut, E>(
    name: &str,
    interval: Duration,
    mut policy: FailurePolicy,
    mut job: F,
) where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<(), E>>,
    E: Display,
{
    loop {
        let delay = match job().await {
            Ok(()) => {
                if let FailurePolicy::Retry(backoff) = &mut policy {
                    backoff.reset();
                }

                interval
            }
            Err(why) => match &mut policy {
                FailurePolicy::Retry(backoff) => {
                    let delay = backoff.next_delay();
                    warn!("{name} failed, retrying in {}s: {why}", delay.as_secs());
                    delay
                }
                FailurePolicy::Ignore => {
                    debug!("{name} failed: {why}");
                    interval
                }
            },
        };

        tokio::time::sleep(delay).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    #[test]
    fn backoff_doubles_until_capped() {
        let mut backoff = ExponentialBackoff::new(Duration::from_secs(1), Duration::from_secs(10));

        let delays: Vec<u64> = (0..6).map(|_| backoff.next_delay().as_secs()).collect();
        assert_eq!(delays, vec![1, 2, 4, 8, 10, 10]);

        backoff.reset();
        assert_eq!(backoff.next_delay(), Duration::from_secs(1));
    }

    #[test]
    fn backoff_survives_many_attempts() {
        let mut backoff = ExponentialBackoff::default();
        for _ in 0..100 {
            assert!(backoff.next_delay() <= Duration::from_secs(300));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn retry_policy_backs_off_then_resumes_interval() {
        let calls = Arc::new(AtomicUsize::new(0));

        let counter = calls.clone();
        let handle = tokio::spawn(async move {
            supervise(
                "test job",
                Duration::from_secs(100),
                FailurePolicy::Retry(ExponentialBackoff::default()),
                move || {
                    let counter = counter.clone();
                    async move {
                        match counter.fetch_add(1, Ordering::SeqCst) {
                            0 | 1 => Err("storage unavailable"),
                            _ => Ok(()),
                        }
                    }
                },
            )
            .await
        });

        // Runs at t=0 (fail), t=1 (fail), t=3 (ok), then waits until t=103.
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert!(!handle.is_finished());

        handle.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn ignore_policy_keeps_fixed_interval() {
        let calls = Arc::new(AtomicUsize::new(0));

        let counter = calls.clone();
        let handle = tokio::spawn(async move {
            supervise(
                "heartbeat",
                Duration::from_secs(50),
                FailurePolicy::Ignore,
                move || {
                    let counter = counter.clone();
                    async move {
                        counter.fetch_add(1, Ordering::SeqCst);
                        Err::<(), _>("listing unreachable")
                    }
                },
            )
            .await
        });

        tokio::time::sleep(Duration::from_secs(120)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 3);

        handle.abort();
    }
}
