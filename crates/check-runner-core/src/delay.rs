//! Inter-attempt delay.

use std::time::Duration;

use async_trait::async_trait;

/// Waits between two probe attempts. Swapped for a recording fake in tests.
#[async_trait]
pub trait Delay: Send + Sync {
    async fn wait(&self, interval: Duration);
}

/// Sleeps on the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioDelay;

#[async_trait]
impl Delay for TokioDelay {
    async fn wait(&self, interval: Duration) {
        tokio::time::sleep(interval).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_tokio_delay_waits_for_interval() {
        let start = tokio::time::Instant::now();
        TokioDelay.wait(Duration::from_secs(10)).await;
        assert!(start.elapsed() >= Duration::from_secs(10));
    }

    #[tokio::test]
    async fn test_zero_interval_returns() {
        TokioDelay.wait(Duration::ZERO).await;
    }
}
