use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Default cap on recorded snapshots per actor.
pub const MAX_HISTORY: usize = 1000;

/// Kinematic state captured on each recording tick.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Snapshot {
    pub x: f32,
    pub y: f32,
    pub velocity_x: f32,
}

impl Snapshot {
    pub fn new(x: f32, y: f32, velocity_x: f32) -> Self {
        Self { x, y, velocity_x }
    }
}

/// What a full history does with a new snapshot.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum OverflowPolicy {
    /// Refuse the write; early history survives and late movement is lost.
    #[default]
    KeepOldest,
    /// Evict the oldest snapshot so rewind depth stays constant.
    DropOldest,
}

/// Result of pushing into a [`History`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Push {
    Stored,
    /// Stored after evicting the oldest snapshot.
    Evicted,
    /// Dropped because the buffer is full.
    Refused,
}

/// Bounded stack of snapshots: pushed at the tail, popped from the tail.
///
/// `len() <= capacity()` always holds. What happens at the cap is decided by
/// the [`OverflowPolicy`]; the default keeps the oldest entries and refuses
/// the write.
#[derive(Clone, Debug)]
pub struct History {
    snapshots: VecDeque<Snapshot>,
    capacity: usize,
    policy: OverflowPolicy,
}

impl Default for History {
    fn default() -> Self {
        Self::new(MAX_HISTORY, OverflowPolicy::default())
    }
}

impl History {
    pub fn new(capacity: usize, policy: OverflowPolicy) -> Self {
        Self {
            snapshots: VecDeque::new(),
            capacity,
            policy,
        }
    }

    pub fn push(&mut self, snapshot: Snapshot) -> Push {
        if self.snapshots.len() < self.capacity {
            self.snapshots.push_back(snapshot);
            return Push::Stored;
        }
        match self.policy {
            OverflowPolicy::KeepOldest => Push::Refused,
            OverflowPolicy::DropOldest => {
                if self.snapshots.pop_front().is_none() {
                    // zero capacity: nothing to evict, nothing to store
                    return Push::Refused;
                }
                self.snapshots.push_back(snapshot);
                Push::Evicted
            }
        }
    }

    /// Remove and return the most recent snapshot.
    pub fn pop(&mut self) -> Option<Snapshot> {
        self.snapshots.pop_back()
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn policy(&self) -> OverflowPolicy {
        self.policy
    }
}
