//! Counter factory
//!
//! This module is responsible for the click counter itself. The main interface is [create], which
//! hands out a closure owning a fresh, private [Counter]. The struct form is public as well for
//! callers that want the checked operations or the current value.

use miette::Diagnostic;
use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::OverflowPolicy;

#[derive(Debug, Error, Diagnostic, PartialEq, Eq)]
pub enum CounterError {
    #[error("The counter cannot count past {clicks}")]
    #[diagnostic(help("Use the `saturate` or `wrap` overflow policy to keep clicking"))]
    Overflow { clicks: u64 },

    #[error("The shared counter was poisoned by a panicking thread")]
    #[diagnostic(help("The counter value is lost, create a new counter"))]
    Poisoned,
}

type Result<T> = std::result::Result<T, CounterError>;

/// Create a fresh increment function
///
/// Every call returns a closure with its own state starting at 0. The n-th call of the closure
/// returns n.
pub fn create() -> impl FnMut() -> u64 + Send {
    Counter::new().into_fn()
}

/// A privately owned click counter
///
/// The value can only be changed by clicking, there is no setter and no reset.
#[derive(Debug, Default)]
pub struct Counter {
    clicks: u64,
    policy: OverflowPolicy,
}

impl Counter {
    pub fn new() -> Self {
        Self::with_policy(OverflowPolicy::default())
    }

    pub fn with_policy(policy: OverflowPolicy) -> Self {
        debug!(%policy, "created counter");
        Self { clicks: 0, policy }
    }

    /// Click once and return the new value
    ///
    /// At `u64::MAX` the [OverflowPolicy::Checked] policy keeps the value, like
    /// [OverflowPolicy::Saturate] does. Use [Counter::try_increment] to observe the overflow.
    pub fn increment(&mut self) -> u64 {
        match self.try_increment() {
            Ok(clicks) => clicks,
            Err(err) => {
                warn!("{err}, keeping the value");
                self.clicks
            }
        }
    }

    /// Click once and return the new value, failing at the bound under [OverflowPolicy::Checked]
    pub fn try_increment(&mut self) -> Result<u64> {
        let next = self.policy.next(self.clicks).ok_or(CounterError::Overflow {
            clicks: self.clicks,
        })?;

        if next <= self.clicks {
            warn!(clicks = self.clicks, policy = %self.policy, "counter hit its bound");
        }

        self.clicks = next;
        trace!(clicks = self.clicks, "click");
        Ok(self.clicks)
    }

    pub fn clicks(&self) -> u64 {
        self.clicks
    }

    pub fn policy(&self) -> OverflowPolicy {
        self.policy
    }

    /// Move the counter into a closure that clicks it
    pub fn into_fn(mut self) -> impl FnMut() -> u64 + Send {
        move || self.increment()
    }

    #[cfg(test)]
    pub(crate) fn starting_at(clicks: u64, policy: OverflowPolicy) -> Self {
        Self { clicks, policy }
    }
}

/// Successive click values
///
/// Ends once the value cannot grow any more, except under [OverflowPolicy::Wrap].
impl Iterator for Counter {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        match self.policy {
            OverflowPolicy::Saturate if self.clicks == u64::MAX => None,
            _ => self.try_increment().ok(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_clicks() {
        let mut click = create();
        assert_eq!(click(), 1);
        assert_eq!(click(), 2);
        assert_eq!(click(), 3);
    }

    #[test]
    fn nth_click_returns_n() {
        let mut counter = Counter::new();
        for n in 1..=1000 {
            assert_eq!(counter.increment(), n);
            assert_eq!(counter.clicks(), n);
        }
    }

    #[test]
    fn independent_instances() {
        let mut c1 = create();
        let mut c2 = create();
        assert_eq!([c1(), c1(), c2()], [1, 2, 1]);
        assert_eq!(c2(), 2);
        assert_eq!(c1(), 3);
    }

    #[test]
    fn fresh_counter_is_zero() {
        let counter = Counter::new();
        assert_eq!(counter.clicks(), 0);
        assert_eq!(counter.policy(), OverflowPolicy::Saturate);
    }

    #[test]
    fn iterator_counts_from_one() {
        let values: Vec<u64> = Counter::new().take(5).collect();
        assert_eq!(values, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn saturate_at_bound() {
        let mut counter = Counter::starting_at(u64::MAX - 1, OverflowPolicy::Saturate);
        assert_eq!(counter.increment(), u64::MAX);
        assert_eq!(counter.increment(), u64::MAX);
        assert_eq!(counter.try_increment(), Ok(u64::MAX));
    }

    #[test]
    fn wrap_at_bound() {
        let mut counter = Counter::starting_at(u64::MAX, OverflowPolicy::Wrap);
        assert_eq!(counter.increment(), 0);
        assert_eq!(counter.increment(), 1);
    }

    #[test]
    fn checked_at_bound() {
        let mut counter = Counter::starting_at(u64::MAX, OverflowPolicy::Checked);
        assert_eq!(
            counter.try_increment(),
            Err(CounterError::Overflow { clicks: u64::MAX })
        );
        assert_eq!(counter.clicks(), u64::MAX);

        // the total form keeps the value
        assert_eq!(counter.increment(), u64::MAX);
    }

    #[test]
    fn iterator_ends_at_bound() {
        let saturating = Counter::starting_at(u64::MAX - 2, OverflowPolicy::Saturate);
        assert_eq!(saturating.collect::<Vec<_>>(), vec![u64::MAX - 1, u64::MAX]);

        let checked = Counter::starting_at(u64::MAX - 1, OverflowPolicy::Checked);
        assert_eq!(checked.collect::<Vec<_>>(), vec![u64::MAX]);

        let wrapping = Counter::starting_at(u64::MAX - 1, OverflowPolicy::Wrap);
        assert_eq!(wrapping.take(3).collect::<Vec<_>>(), vec![u64::MAX, 0, 1]);
    }
}
