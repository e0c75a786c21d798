//! Fixed sampling policy.
//!
//! Within each tick, the first `first` entries with a given level and message
//! are written, then every `thereafter`-th one. Counters are bucketed by a hash
//! of the message, so unrelated messages can occasionally share a bucket.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use crate::engine::level::Level;

const BUCKETS: usize = 4096;
const SAMPLED_LEVELS: usize = (Level::FATAL.as_i8() - Level::DEBUG.as_i8() + 1) as usize;

#[derive(Default)]
struct Counter {
    resets_at: AtomicU64,
    count: AtomicU64,
}

impl Counter {
    fn incr_check_reset(&self, now: u64, tick: u64) -> u64 {
        let resets_at = self.resets_at.load(Ordering::Acquire);
        if resets_at > now {
            return self.count.fetch_add(1, Ordering::AcqRel) + 1;
        }

        self.count.store(1, Ordering::Release);
        let next = now + tick;
        if self
            .resets_at
            .compare_exchange(resets_at, next, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            // another thread reset this tick first
            return self.count.fetch_add(1, Ordering::AcqRel) + 1;
        }
        1
    }
}

pub struct Sampler {
    tick: u64,
    first: u64,
    thereafter: u64,
    epoch: Instant,
    counters: Box<[Counter]>,
}

impl Sampler {
    pub fn new(tick: Duration, first: u64, thereafter: u64) -> Self {
        let counters = (0..SAMPLED_LEVELS * BUCKETS)
            .map(|_| Counter::default())
            .collect();
        Self {
            tick: tick.as_nanos() as u64,
            first,
            thereafter,
            epoch: Instant::now(),
            counters,
        }
    }

    /// One second ticks, first 100, then every 100th.
    pub fn standard() -> Self {
        Self::new(Duration::from_secs(1), 100, 100)
    }

    /// Returns whether an entry should be written.
    pub fn sample(&self, level: Level, message: &str) -> bool {
        if level < Level::DEBUG || level > Level::FATAL {
            return true;
        }
        let level_idx = (level.as_i8() - Level::DEBUG.as_i8()) as usize;
        let idx = level_idx * BUCKETS + fnv32a(message) as usize % BUCKETS;

        // offset by one tick so the first reset always fires
        let now = self.epoch.elapsed().as_nanos() as u64 + self.tick;
        let n = self.counters[idx].incr_check_reset(now, self.tick);
        if n <= self.first {
            return true;
        }
        self.thereafter > 0 && (n - self.first) % self.thereafter == 0
    }
}

fn fnv32a(s: &str) -> u32 {
    const OFFSET: u32 = 2_166_136_261;
    const PRIME: u32 = 16_777_619;
    s.bytes()
        .fold(OFFSET, |hash, b| (hash ^ u32::from(b)).wrapping_mul(PRIME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_then_every_nth() {
        let sampler = Sampler::new(Duration::from_secs(3600), 3, 2);
        let written: Vec<bool> = (0..8).map(|_| sampler.sample(Level::INFO, "same")).collect();
        assert_eq!(
            written,
            vec![true, true, true, false, true, false, true, false]
        );
    }

    #[test]
    fn test_messages_and_levels_counted_separately() {
        let sampler = Sampler::new(Duration::from_secs(3600), 1, 0);
        assert!(sampler.sample(Level::INFO, "a"));
        assert!(!sampler.sample(Level::INFO, "a"));
        assert!(sampler.sample(Level::WARN, "a"));
        assert!(sampler.sample(Level::INFO, "b"));
    }

    #[test]
    fn test_verbosity_levels_not_sampled() {
        let sampler = Sampler::new(Duration::from_secs(3600), 1, 0);
        for _ in 0..5 {
            assert!(sampler.sample(Level::from_i8(-3), "chatty"));
        }
    }

    #[test]
    fn test_counter_resets_after_tick() {
        let sampler = Sampler::new(Duration::from_millis(20), 1, 0);
        assert!(sampler.sample(Level::ERROR, "x"));
        assert!(!sampler.sample(Level::ERROR, "x"));
        std::thread::sleep(Duration::from_millis(40));
        assert!(sampler.sample(Level::ERROR, "x"));
    }

    #[test]
    fn test_fnv32a_known_values() {
        assert_eq!(fnv32a(""), 0x811c9dc5);
        assert_eq!(fnv32a("a"), 0xe40c292c);
    }
}
