//! Rate Limit Cleanup Task
//!
//! Background task that periodically forgets clients whose rate-limit
//! window has closed, so the limiter does not grow with every address seen.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::api::RateLimiter;

/// Spawns a background task that periodically prunes closed rate-limit windows.
///
/// # Arguments
/// * `limiter` - Shared rate limiter
/// * `cleanup_interval_secs` - Interval in seconds between prune runs
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
pub fn spawn_rate_limit_cleanup_task(
    limiter: Arc<RateLimiter>,
    cleanup_interval_secs: u64,
) -> JoinHandle<()> {
    let interval = Duration::from_secs(cleanup_interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting rate limit cleanup task with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = limiter.prune_expired().await;

            if removed > 0 {
                info!("Rate limit cleanup: removed {} closed windows", removed);
            } else {
                debug!("Rate limit cleanup: no closed windows found");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ManualClock;

    #[tokio::test]
    async fn test_cleanup_task_prunes_closed_windows() {
        let clock = Arc::new(ManualClock::new(0));
        let limiter = Arc::new(RateLimiter::with_clock(10, 1, clock.clone()));

        limiter.check("203.0.113.1").await.unwrap();
        clock.advance(Duration::from_secs(2));

        let handle = spawn_rate_limit_cleanup_task(limiter.clone(), 1);

        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(limiter.tracked_clients().await, 0);

        handle.abort();
    }

    #[tokio::test]
    async fn test_cleanup_task_keeps_open_windows() {
        let clock = Arc::new(ManualClock::new(0));
        let limiter = Arc::new(RateLimiter::with_clock(10, 900, clock));

        limiter.check("203.0.113.1").await.unwrap();

        let handle = spawn_rate_limit_cleanup_task(limiter.clone(), 1);

        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(limiter.tracked_clients().await, 1);

        handle.abort();
    }

    #[tokio::test]
    async fn test_cleanup_task_can_be_aborted() {
        let limiter = Arc::new(RateLimiter::new(10, 60));

        let handle = spawn_rate_limit_cleanup_task(limiter, 1);

        handle.abort();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.is_finished(), "Task should be finished after abort");
    }
}
