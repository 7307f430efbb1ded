use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

pub const CONCURRENCY_ENV: &str = "SEMCHUNK_CONCURRENCY";
pub const MAX_CONCURRENCY: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConcurrencySnapshot {
    pub limit: usize,
    pub in_flight: usize,
    pub peak: usize,
}

fn default_concurrency() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        .clamp(1, MAX_CONCURRENCY)
}

fn parse_concurrency(raw: Option<&str>, default_value: usize) -> usize {
    raw.map(str::trim)
        .filter(|v| !v.is_empty())
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(default_value)
        .clamp(1, MAX_CONCURRENCY)
}

/// Explicit setting wins, then the environment, then the CPU count
pub fn resolve_concurrency(configured: Option<usize>) -> usize {
    if let Some(value) = configured {
        return value.clamp(1, MAX_CONCURRENCY);
    }
    let raw = std::env::var(CONCURRENCY_ENV).ok();
    parse_concurrency(raw.as_deref(), default_concurrency())
}

/// Bounds how many files are chunked at once
#[derive(Debug, Clone)]
pub(crate) struct FileLimiter {
    semaphore: Arc<Semaphore>,
    limit: usize,
    in_flight: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
}

impl FileLimiter {
    pub(crate) fn new(limit: usize) -> Self {
        let limit = limit.clamp(1, MAX_CONCURRENCY);
        Self {
            semaphore: Arc::new(Semaphore::new(limit)),
            limit,
            in_flight: Arc::new(AtomicUsize::new(0)),
            peak: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub(crate) async fn acquire(&self) -> FilePermit {
        // The semaphore is never closed; acquire failures are not expected.
        let permit = self
            .semaphore
            .clone()
            .acquire_owned()
            .await
            .unwrap_or_else(|_| unreachable!("file concurrency semaphore closed"));
        let now = self.in_flight.fetch_add(1, Ordering::Relaxed) + 1;
        self.peak.fetch_max(now, Ordering::Relaxed);
        FilePermit {
            _permit: permit,
            in_flight: self.in_flight.clone(),
        }
    }

    pub(crate) fn snapshot(&self) -> ConcurrencySnapshot {
        ConcurrencySnapshot {
            limit: self.limit,
            in_flight: self.in_flight.load(Ordering::Relaxed),
            peak: self.peak.load(Ordering::Relaxed),
        }
    }
}

pub(crate) struct FilePermit {
    _permit: OwnedSemaphorePermit,
    in_flight: Arc<AtomicUsize>,
}

impl Drop for FilePermit {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_concurrency_defaults_and_clamps() {
        let default_value = default_concurrency();
        assert_eq!(parse_concurrency(None, default_value), default_value);
        assert_eq!(parse_concurrency(Some(""), default_value), default_value);
        assert_eq!(parse_concurrency(Some("   "), default_value), default_value);
        assert_eq!(parse_concurrency(Some("2"), default_value), 2);
        assert_eq!(parse_concurrency(Some("0"), default_value), 1);
        assert_eq!(
            parse_concurrency(Some("999"), default_value),
            MAX_CONCURRENCY
        );
        assert_eq!(parse_concurrency(Some("abc"), default_value), default_value);
        assert_eq!(parse_concurrency(Some(" 5 "), default_value), 5);
    }

    #[test]
    fn explicit_setting_is_clamped() {
        assert_eq!(resolve_concurrency(Some(0)), 1);
        assert_eq!(resolve_concurrency(Some(4)), 4);
        assert_eq!(resolve_concurrency(Some(1000)), MAX_CONCURRENCY);
    }

    #[tokio::test]
    async fn permits_track_in_flight_work() {
        let limiter = FileLimiter::new(2);
        let first = limiter.acquire().await;
        let second = limiter.acquire().await;
        assert_eq!(limiter.snapshot().in_flight, 2);

        drop(first);
        assert_eq!(limiter.snapshot().in_flight, 1);
        drop(second);

        let snapshot = limiter.snapshot();
        assert_eq!(snapshot.in_flight, 0);
        assert_eq!(snapshot.peak, 2);
        assert_eq!(snapshot.limit, 2);
    }
}
