//! Random outcome sources
//!
//! Every fallible operation draws a success flag and a delay from an
//! [`OutcomeSource`]. [`Tasking`] bundles a source with the configured delay
//! bounds and is shared by every entity in a world.

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Result of a single draw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    /// Whether the attempt succeeds
    pub succeeded: bool,
    /// How long the attempt takes before resolving
    pub delay: Duration,
}

/// Supplies coin flips and bounded delays
///
/// Implementations must be safe to call from any number of concurrent
/// operations without handing out correlated or repeated draws.
pub trait OutcomeSource: std::fmt::Debug + Send + Sync {
    /// Draw a success flag and a delay in `[low_ms, high_ms)`
    ///
    /// When the range is empty the delay is exactly `low_ms`.
    fn sample(&self, low_ms: u64, high_ms: u64) -> Outcome;
}

/// Uniform outcomes from a mutex-guarded `StdRng`
#[derive(Debug)]
pub struct SeededOutcomeSource {
    rng: Mutex<StdRng>,
}

impl SeededOutcomeSource {
    /// Reproducible source
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Source seeded from OS entropy
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }
}

impl OutcomeSource for SeededOutcomeSource {
    fn sample(&self, low_ms: u64, high_ms: u64) -> Outcome {
        let mut rng = self.rng.lock();
        let delay_ms = if high_ms > low_ms {
            rng.gen_range(low_ms..high_ms)
        } else {
            low_ms
        };
        Outcome {
            succeeded: rng.gen::<bool>(),
            delay: Duration::from_millis(delay_ms),
        }
    }
}

/// Deterministic outcomes for tests
///
/// Replays the queued success flags in order; once the script runs out every
/// draw resolves to `fallback`. The delay is fixed and ignores the bounds.
#[derive(Debug)]
pub struct ScriptedOutcomeSource {
    script: Mutex<VecDeque<bool>>,
    fallback: bool,
    delay: Duration,
    samples: AtomicUsize,
}

impl ScriptedOutcomeSource {
    /// Replay `script`, then keep returning `fallback`
    pub fn new(script: impl IntoIterator<Item = bool>, fallback: bool) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            fallback,
            delay: Duration::ZERO,
            samples: AtomicUsize::new(0),
        }
    }

    /// Every draw resolves to `succeeded`
    #[must_use]
    pub fn always(succeeded: bool) -> Self {
        Self::new(std::iter::empty(), succeeded)
    }

    /// With a fixed delay for every draw
    #[inline]
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Number of draws taken so far
    #[inline]
    #[must_use]
    pub fn samples(&self) -> usize {
        self.samples.load(Ordering::SeqCst)
    }
}

impl OutcomeSource for ScriptedOutcomeSource {
    fn sample(&self, _low_ms: u64, _high_ms: u64) -> Outcome {
        self.samples.fetch_add(1, Ordering::SeqCst);
        let succeeded = self.script.lock().pop_front().unwrap_or(self.fallback);
        Outcome {
            succeeded,
            delay: self.delay,
        }
    }
}

/// Outcome source plus delay bounds, shared by every entity in a world
#[derive(Debug, Clone)]
pub struct Tasking {
    outcomes: Arc<dyn OutcomeSource>,
    shortest_task_ms: u64,
    longest_task_ms: u64,
}

impl Tasking {
    /// Draw from `outcomes` with delays in `[shortest_task_ms, longest_task_ms)`
    pub fn new(outcomes: Arc<dyn OutcomeSource>, shortest_task_ms: u64, longest_task_ms: u64) -> Self {
        Self {
            outcomes,
            shortest_task_ms,
            longest_task_ms,
        }
    }

    /// Zero-delay tasking
    pub fn instant(outcomes: Arc<dyn OutcomeSource>) -> Self {
        Self::new(outcomes, 0, 0)
    }

    /// Underlying source
    #[inline]
    #[must_use]
    pub fn outcomes(&self) -> &Arc<dyn OutcomeSource> {
        &self.outcomes
    }

    /// Configured delay bounds in milliseconds
    #[inline]
    #[must_use]
    pub fn bounds_ms(&self) -> (u64, u64) {
        (self.shortest_task_ms, self.longest_task_ms)
    }

    /// Draw once
    #[inline]
    #[must_use]
    pub fn sample(&self) -> Outcome {
        self.outcomes
            .sample(self.shortest_task_ms, self.longest_task_ms)
    }

    /// Wait out a drawn delay and report the coin flip
    pub async fn attempt(&self) -> bool {
        let outcome = self.sample();
        pause(outcome.delay).await;
        outcome.succeeded
    }

    /// Wait out a drawn delay; for operations that cannot fail
    pub async fn settle(&self) {
        pause(self.sample().delay).await;
    }
}

async fn pause(delay: Duration) {
    if delay.is_zero() {
        tokio::task::yield_now().await;
    } else {
        tokio::time::sleep(delay).await;
    }
}
