//! Per-session interaction state.
//!
//! A [`Session`] is created once when the dashboard starts and handed to the
//! handlers that need it; nothing here is global.

/// Number of times the user pressed the counter button.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClickCounter {
    count: u64,
}

impl ClickCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one to the counter and return the new value.
    pub fn increment(&mut self) -> u64 {
        self.count += 1;
        self.count
    }

    pub fn value(&self) -> u64 {
        self.count
    }

    /// Status line shown under the dashboard.
    pub fn message(&self) -> String {
        format!("This page has run {} times.", self.count)
    }
}

/// State scoped to one user's run of the dashboard.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub counter: ClickCounter,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_starts_at_zero() {
        assert_eq!(ClickCounter::new().value(), 0);
    }

    #[test]
    fn test_counter_three_increments() {
        let mut counter = ClickCounter::new();
        counter.increment();
        counter.increment();
        assert_eq!(counter.increment(), 3);
        assert_eq!(counter.value(), 3);
        assert_eq!(counter.message(), "This page has run 3 times.");
    }

    #[test]
    fn test_new_session_resets_counter() {
        let mut first = Session::new();
        first.counter.increment();
        first.counter.increment();
        assert_eq!(first.counter.value(), 2);

        let second = Session::new();
        assert_eq!(second.counter.value(), 0);
    }
}
