//! Shared counter
//!
//! A handle to one [Counter] that can be cloned and sent across threads. Every click locks the
//! counter for the whole read-modify-write.

use std::sync::{Arc, Mutex};

use tracing::trace;

use crate::{Counter, CounterError, OverflowPolicy};

type Result<T> = std::result::Result<T, CounterError>;

/// Thread-safe handle to a single counter
///
/// Clones refer to the same counter. Use [SharedCounter::new] for an independent one.
#[derive(Debug, Clone, Default)]
pub struct SharedCounter {
    inner: Arc<Mutex<Counter>>,
}

impl SharedCounter {
    pub fn new() -> Self {
        Self::with_policy(OverflowPolicy::default())
    }

    pub fn with_policy(policy: OverflowPolicy) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Counter::with_policy(policy))),
        }
    }

    /// Click once and return the new value
    pub fn increment(&self) -> Result<u64> {
        let mut counter = self.inner.lock().map_err(|_| CounterError::Poisoned)?;
        let clicks = counter.try_increment()?;
        trace!(handles = Arc::strong_count(&self.inner), "shared click");
        Ok(clicks)
    }

    pub fn clicks(&self) -> Result<u64> {
        self.inner
            .lock()
            .map(|counter| counter.clicks())
            .map_err(|_| CounterError::Poisoned)
    }
}
