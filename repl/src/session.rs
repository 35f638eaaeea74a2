//! One simulation run: the memory manager plus the bookkeeping the shell keeps around it.

use std::collections::BTreeMap;

use memsim_core::{AllocationStrategy, MemError, MemResult, MemoryManager, OwnerId};
use tracing::{debug, info, warn};

use crate::commands::Command;
use crate::process::{PidAllocator, Process};

/// Result of executing one command against a [`Session`].
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Allocated(Process),
    AllocationFailed {
        pid: OwnerId,
        size: usize,
        error: MemError,
    },
    Deallocated(OwnerId),
    DeallocationFailed {
        pid: OwnerId,
        error: MemError,
    },
    /// Every process identifier has already been issued
    PidsExhausted,
    StrategyChanged(AllocationStrategy),
    ShowMap,
    ShowHelp,
    Exit,
}

impl Outcome {
    /// Whether the memory map changed and is worth showing again.
    pub fn mutated(&self) -> bool {
        matches!(self, Outcome::Allocated(_) | Outcome::Deallocated(_))
    }
}

pub struct Session {
    manager: MemoryManager,
    pids: PidAllocator,
    processes: BTreeMap<OwnerId, Process>,
    strategy: AllocationStrategy,
}

impl Session {
    pub fn new(total_memory: usize, strategy: AllocationStrategy) -> MemResult<Self> {
        Ok(Self {
            manager: MemoryManager::new(total_memory)?,
            pids: PidAllocator::new(),
            processes: BTreeMap::new(),
            strategy,
        })
    }

    pub fn manager(&self) -> &MemoryManager {
        &self.manager
    }

    pub fn strategy(&self) -> AllocationStrategy {
        self.strategy
    }

    /// Live processes, ordered by pid
    pub fn processes(&self) -> impl Iterator<Item = &Process> {
        self.processes.values()
    }

    pub fn execute(&mut self, command: Command) -> Outcome {
        match command {
            Command::Allocate(size) => self.allocate(size),
            Command::Deallocate(pid) => self.deallocate(pid),
            Command::Strategy(strategy) => {
                info!(from = %self.strategy, to = %strategy, "Strategy changed");
                self.strategy = strategy;
                Outcome::StrategyChanged(strategy)
            }
            Command::Map => Outcome::ShowMap,
            Command::Help => Outcome::ShowHelp,
            Command::Quit => Outcome::Exit,
        }
    }

    fn allocate(&mut self, size: usize) -> Outcome {
        // Ids are consumed on issue, even if the allocation then fails
        let Some(pid) = self.pids.next_pid() else {
            warn!(size, "Allocation rejected: process identifiers exhausted");
            return Outcome::PidsExhausted;
        };
        let mut process = Process::new(pid, size);
        debug!(pid = process.pid, size, strategy = %self.strategy, "Attempting allocation");

        match self.manager.allocate(process.pid, size, self.strategy) {
            Ok(address) => {
                process.address = Some(address);
                self.processes.insert(process.pid, process.clone());
                Outcome::Allocated(process)
            }
            Err(error) => Outcome::AllocationFailed {
                pid: process.pid,
                size,
                error,
            },
        }
    }

    fn deallocate(&mut self, pid: OwnerId) -> Outcome {
        if !self.processes.contains_key(&pid) {
            return Outcome::DeallocationFailed {
                pid,
                error: MemError::UnknownOwner(pid),
            };
        }

        match self.manager.deallocate(pid) {
            Ok(()) => {
                self.processes.remove(&pid);
                Outcome::Deallocated(pid)
            }
            Err(error) => Outcome::DeallocationFailed { pid, error },
        }
    }
}
