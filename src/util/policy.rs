/// What a counter does when the next click would pass `u64::MAX`
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverflowPolicy {
    /// Stay at `u64::MAX`
    #[default]
    Saturate,

    /// Start over at 0
    Wrap,

    /// Refuse the click and report an error
    Checked,
}

impl OverflowPolicy {
    /// Apply the policy to `current + 1`
    ///
    /// Returns `None` only for [OverflowPolicy::Checked] at the bound.
    pub fn next(self, current: u64) -> Option<u64> {
        match self {
            OverflowPolicy::Saturate => Some(current.saturating_add(1)),
            OverflowPolicy::Wrap => Some(current.wrapping_add(1)),
            OverflowPolicy::Checked => current.checked_add(1),
        }
    }
}

impl std::fmt::Display for OverflowPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OverflowPolicy::Saturate => write!(f, "saturate"),
            OverflowPolicy::Wrap => write!(f, "wrap"),
            OverflowPolicy::Checked => write!(f, "checked"),
        }
    }
}
