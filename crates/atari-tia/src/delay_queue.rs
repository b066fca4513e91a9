//! Register writes that land a few colour clocks after the CPU makes them.

use emu_core::{Serializer, StateError};

/// Most writes that can be in flight at once. The CPU makes at most one
/// write per three colour clocks and the longest delay is two clocks.
const CAPACITY: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PendingWrite {
    pub register: u8,
    pub value: u8,
    remaining: u8,
}

/// Delayed TIA writes in the order they were made.
#[derive(Debug, Clone, Default)]
pub(crate) struct DelayQueue {
    entries: Vec<PendingWrite>,
}

impl DelayQueue {
    pub fn new() -> Self {
        Self {
            entries: Vec::with_capacity(CAPACITY),
        }
    }

    /// Queue a write that takes effect `delay` clocks from now.
    pub fn push(&mut self, register: u8, value: u8, delay: u8) {
        self.entries.push(PendingWrite {
            register,
            value,
            remaining: delay,
        });
    }

    /// Advance one clock and return the writes that are now due, oldest
    /// first.
    pub fn tick(&mut self) -> Vec<PendingWrite> {
        let mut due = Vec::new();
        self.entries.retain_mut(|entry| {
            if entry.remaining == 0 {
                due.push(*entry);
                false
            } else {
                entry.remaining -= 1;
                true
            }
        });
        due
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn save(&self, s: &mut Serializer) {
        s.put_u8(self.entries.len() as u8);
        for entry in &self.entries {
            s.put_u8(entry.register);
            s.put_u8(entry.value);
            s.put_u8(entry.remaining);
        }
    }

    pub fn load(&mut self, s: &mut Serializer) -> Result<(), StateError> {
        let count = s.get_u8()?;
        if usize::from(count) > CAPACITY {
            return Err(StateError::invalid("tia delay queue length", count));
        }
        let mut entries = Vec::with_capacity(CAPACITY);
        for _ in 0..count {
            let register = s.get_u8()?;
            let value = s.get_u8()?;
            let remaining = s.get_u8()?;
            if register > 0x3F || remaining > 2 {
                return Err(StateError::invalid("tia delayed write", register));
            }
            entries.push(PendingWrite {
                register,
                value,
                remaining,
            });
        }
        self.entries = entries;
        Ok(())
    }
}
