/// Outcome counts of dispatching one message.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DispatchReport {
    /// Transports that were members of the dispatching group(s).
    pub considered: usize,
    /// Transports whose combined mask matched and whose action ran.
    pub executed: usize,
    /// Executed transports whose action settled with `true`.
    pub delivered: usize,
    /// Executed transports whose action returned an error or panicked.
    pub failed: usize,
}

impl DispatchReport {
    /// Sums two reports.
    pub fn merge(self, other: Self) -> Self {
        Self {
            considered: self.considered + other.considered,
            executed: self.executed + other.executed,
            delivered: self.delivered + other.delivered,
            failed: self.failed + other.failed,
        }
    }
}
