use std::collections::HashSet;
use tracing::debug;
use super::types::Agent;

/// Agents already on duty since the last reset, within one run
#[derive(Debug, Default)]
pub struct AvailabilityPool {
    used: HashSet<Agent>,
}

impl AvailabilityPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Roster agents not used since the last reset, in roster order.
    /// When fewer than two would remain, the pool resets first and the whole roster is returned.
    pub fn available<'a>(&mut self, roster: &'a [Agent]) -> Vec<&'a Agent> {
        let remaining = roster.iter().filter(|a| !self.used.contains(*a)).count();
        if remaining < 2 {
            debug!(remaining, "availability pool exhausted, resetting");
            self.used.clear();
        }
        roster.iter().filter(|a| !self.used.contains(*a)).collect()
    }

    pub fn mark_used(&mut self, a: &str, b: &str) {
        self.used.insert(a.to_string());
        self.used.insert(b.to_string());
    }
}
