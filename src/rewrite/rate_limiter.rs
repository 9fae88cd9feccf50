// Request pacing for the rewrite provider.
//
// Generation APIs meter requests per second. Each caller reserves the next
// free slot under the lock, releases the lock, then sleeps until its slot, so
// concurrent callers queue up in order instead of racing after a shared sleep.

use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::{Duration, Instant};

/// Spaces calls at least `1 / requests_per_second` apart.
#[derive(Clone)]
pub struct RateLimiter {
    next_slot: Arc<Mutex<Option<Instant>>>,
    spacing: Duration,
}

impl RateLimiter {
    /// A limiter allowing `requests_per_second` calls per second.
    /// Zero, negative, non-finite or vanishingly small rates disable pacing.
    pub fn new(requests_per_second: f64) -> Self {
        // Rates so small that the spacing overflows a Duration also disable pacing
        let spacing = if requests_per_second.is_finite() && requests_per_second > 0.0 {
            Duration::try_from_secs_f64(1.0 / requests_per_second).unwrap_or(Duration::ZERO)
        } else {
            Duration::ZERO
        };
        Self {
            next_slot: Arc::new(Mutex::new(None)),
            spacing,
        }
    }

    pub fn unlimited() -> Self {
        Self::new(0.0)
    }

    pub fn spacing(&self) -> Duration {
        self.spacing
    }

    /// Wait for this caller's slot.
    pub async fn acquire(&self) {
        if self.spacing.is_zero() {
            return;
        }

        let slot = {
            let mut next = self.next_slot.lock().await;
            let now = Instant::now();
            let slot = match *next {
                Some(reserved) if reserved > now => reserved,
                _ => now,
            };
            *next = Some(slot + self.spacing);
            slot
        };

        tokio::time::sleep_until(slot).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_first_call_is_immediate() {
        let limiter = RateLimiter::new(1.0);
        let start = Instant::now();
        limiter.acquire().await;
        assert!(start.elapsed() < Duration::from_millis(50));
    }

    #[tokio::test]
    async fn test_second_call_waits_for_spacing() {
        let limiter = RateLimiter::new(4.0); // 250ms apart
        limiter.acquire().await;
        let start = Instant::now();
        limiter.acquire().await;
        let elapsed = start.elapsed();
        assert!(
            elapsed >= Duration::from_millis(200),
            "Expected ~250ms delay, got {elapsed:?}"
        );
    }

    #[tokio::test]
    async fn test_unlimited_never_waits() {
        let limiter = RateLimiter::unlimited();
        assert!(limiter.spacing().is_zero());
        let start = Instant::now();
        for _ in 0..5 {
            limiter.acquire().await;
        }
        assert!(start.elapsed() < Duration::from_millis(50));
    }

    #[test]
    fn test_invalid_rates_disable_pacing() {
        assert!(RateLimiter::new(-2.0).spacing().is_zero());
        assert!(RateLimiter::new(f64::NAN).spacing().is_zero());
        assert_eq!(RateLimiter::new(2.0).spacing(), Duration::from_millis(500));
    }

    #[test]
    fn test_tiny_rate_does_not_overflow() {
        assert!(RateLimiter::new(1e-30).spacing().is_zero());
        assert!(RateLimiter::new(f64::MIN_POSITIVE).spacing().is_zero());
        // Slow but representable rates still pace
        assert_eq!(RateLimiter::new(0.5).spacing(), Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_callers_are_spaced_in_order() {
        let limiter = RateLimiter::new(10.0); // 100ms apart
        let spacing = limiter.spacing();
        let start = Instant::now();

        let handles: Vec<_> = (0..5)
            .map(|_| {
                let limiter = limiter.clone();
                tokio::spawn(async move {
                    limiter.acquire().await;
                    Instant::now()
                })
            })
            .collect();

        let mut released = Vec::new();
        for handle in handles {
            released.push(handle.await.unwrap());
        }
        released.sort();

        assert!(released[0] - start < spacing);
        for pair in released.windows(2) {
            assert!(
                pair[1] - pair[0] >= spacing,
                "callers released {:?} apart",
                pair[1] - pair[0]
            );
        }
        assert!(released[4] - start >= spacing * 4);
    }
}
