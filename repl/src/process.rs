use std::fmt;

use memsim_core::OwnerId;

/// Issues process identifiers, starting at 1.
///
/// Each session owns its own counter so independent simulations never share ids.
#[derive(Debug, Clone)]
pub struct PidAllocator {
    /// `None` once every id has been issued
    next: Option<OwnerId>,
}

impl PidAllocator {
    pub fn new() -> Self {
        Self { next: Some(1) }
    }

    #[cfg(test)]
    pub(crate) fn starting_at(next: OwnerId) -> Self {
        Self { next: Some(next) }
    }

    /// Next unused id, or `None` when the id space is exhausted.
    pub fn next_pid(&mut self) -> Option<OwnerId> {
        let pid = self.next?;
        self.next = pid.checked_add(1);
        Some(pid)
    }
}

impl Default for PidAllocator {
    fn default() -> Self {
        Self::new()
    }
}

/// A simulated process holding one allocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Process {
    pub pid: OwnerId,
    pub size: usize,
    pub address: Option<usize>,
}

impl Process {
    pub fn new(pid: OwnerId, size: usize) -> Self {
        Self {
            pid,
            size,
            address: None,
        }
    }
}

impl fmt::Display for Process {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.address {
            Some(addr) => write!(
                f,
                "P{}({}u) -> Allocated at {} (Size: {})",
                self.pid, self.size, addr, self.size
            ),
            None => write!(f, "P{}({}u) -> Not Allocated", self.pid, self.size),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pids_are_monotonic_from_one() {
        let mut pids = PidAllocator::new();
        assert_eq!(pids.next_pid(), Some(1));
        assert_eq!(pids.next_pid(), Some(2));
        assert_eq!(pids.next_pid(), Some(3));
    }

    #[test]
    fn test_independent_allocators() {
        let mut a = PidAllocator::new();
        let mut b = PidAllocator::new();
        a.next_pid();
        a.next_pid();
        assert_eq!(b.next_pid(), Some(1));
    }

    #[test]
    fn test_last_pid_is_issued_once() {
        let mut pids = PidAllocator::starting_at(OwnerId::MAX);
        assert_eq!(pids.next_pid(), Some(OwnerId::MAX));
        assert_eq!(pids.next_pid(), None);
        assert_eq!(pids.next_pid(), None);
    }

    #[test]
    fn test_process_display() {
        let mut process = Process::new(3, 120);
        assert_eq!(process.to_string(), "P3(120u) -> Not Allocated");
        process.address = Some(40);
        assert_eq!(process.to_string(), "P3(120u) -> Allocated at 40 (Size: 120)");
    }
}
