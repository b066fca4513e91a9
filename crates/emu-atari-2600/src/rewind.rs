//! Ring of recent save states.

use std::collections::VecDeque;

/// Save states captured every few frames, newest last.
///
/// Once full, each new state pushes out the oldest.
#[derive(Debug, Clone, Default)]
pub struct RewindBuffer {
    states: VecDeque<Vec<u8>>,
    depth: usize,
    interval: u32,
    countdown: u32,
}

impl RewindBuffer {
    /// Keep up to `depth` states, one every `interval` frames.
    #[must_use]
    pub fn new(depth: usize, interval: u32) -> Self {
        let interval = interval.max(1);
        Self {
            states: VecDeque::with_capacity(depth),
            depth,
            interval,
            countdown: interval,
        }
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.depth > 0
    }

    /// Count a finished frame. Returns true when a state should be captured.
    pub fn frame_finished(&mut self) -> bool {
        if !self.is_enabled() {
            return false;
        }
        self.countdown -= 1;
        if self.countdown == 0 {
            self.countdown = self.interval;
            true
        } else {
            false
        }
    }

    pub fn push(&mut self, state: Vec<u8>) {
        if !self.is_enabled() {
            return;
        }
        while self.states.len() >= self.depth {
            self.states.pop_front();
        }
        self.states.push_back(state);
    }

    /// Remove and return the newest state.
    pub fn pop(&mut self) -> Option<Vec<u8>> {
        self.countdown = self.interval;
        self.states.pop_back()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn clear(&mut self) {
        self.states.clear();
        self.countdown = self.interval;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_every_interval() {
        let mut rewind = RewindBuffer::new(4, 3);
        let due: Vec<bool> = (0..6).map(|_| rewind.frame_finished()).collect();
        assert_eq!(due, [false, false, true, false, false, true]);
    }

    #[test]
    fn oldest_state_falls_out() {
        let mut rewind = RewindBuffer::new(2, 1);
        rewind.push(vec![1]);
        rewind.push(vec![2]);
        rewind.push(vec![3]);
        assert_eq!(rewind.len(), 2);
        assert_eq!(rewind.pop(), Some(vec![3]));
        assert_eq!(rewind.pop(), Some(vec![2]));
        assert_eq!(rewind.pop(), None);
    }

    #[test]
    fn zero_depth_disables() {
        let mut rewind = RewindBuffer::new(0, 1);
        assert!(!rewind.frame_finished());
        rewind.push(vec![1]);
        assert!(rewind.is_empty());
    }
}
