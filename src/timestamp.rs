//! Strictly-increasing timestamp generation for cache entry versioning.

use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Low bits reserved for the per-millisecond counter.
const BIN_DIGITS: u32 = 12;

/// Lock-free monotonic counter.
///
/// Values are wall-clock milliseconds shifted left by [`BIN_DIGITS`] with
/// a sub-millisecond counter in the low bits, so successive calls are
/// strictly increasing even within the same millisecond, and values from
/// different processes still order coarsely by real time.
#[derive(Debug, Default)]
pub struct Timestamper {
    value: AtomicI64,
}

impl Timestamper {
    /// Create a new counter.
    pub fn new() -> Self {
        Timestamper {
            value: AtomicI64::new(0),
        }
    }

    /// Next timestamp, strictly greater than every value returned before.
    pub fn next(&self) -> i64 {
        loop {
            let base = now_millis() << BIN_DIGITS;
            let current = self.value.load(Ordering::SeqCst);
            let update = (current + 1).max(base);

            if self
                .value
                .compare_exchange(current, update, Ordering::SeqCst, Ordering::SeqCst)
                .is_ok()
            {
                return update;
            }
        }
    }
}

fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_timestamps_strictly_increase() {
        let timestamper = Timestamper::new();
        let mut previous = timestamper.next();

        for _ in 0..10_000 {
            let next = timestamper.next();
            assert!(next > previous);
            previous = next;
        }
    }

    #[test]
    fn test_timestamps_track_wall_clock() {
        let timestamper = Timestamper::new();
        let value = timestamper.next();
        assert!(value >> BIN_DIGITS >= now_millis() - 1000);
    }

    #[test]
    fn test_timestamps_unique_across_threads() {
        let timestamper = Arc::new(Timestamper::new());
        let mut handles = vec![];

        for _ in 0..8 {
            let timestamper = Arc::clone(&timestamper);
            handles.push(std::thread::spawn(move || {
                (0..1000).map(|_| timestamper.next()).collect::<Vec<_>>()
            }));
        }

        let mut all: Vec<i64> = handles
            .into_iter()
            .flat_map(|h| h.join().expect("Thread panicked"))
            .collect();
        let total = all.len();
        all.sort_unstable();
        all.dedup();
        assert_eq!(all.len(), total);
    }
}
