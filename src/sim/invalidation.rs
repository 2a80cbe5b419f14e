use crate::animation::ease::progress;
use crate::foundation::core::Millis;
use crate::layout::geometry::NodeId;

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct InvalidationId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidationState {
    /// Signal travelling from the origin to the target node.
    Traveling,
    /// Expanding ring around the target.
    Pulsing,
    /// Target flag cleared.
    Done,
}

/// A cache-busting signal propagating from the origin to one edge or regional node.
#[derive(Clone, Debug, PartialEq)]
pub struct Invalidation {
    pub id: InvalidationId,
    pub target: NodeId,
    pub start: Millis,
    /// Travel duration; the pulse lasts `pulse`.
    pub duration: Millis,
    pub pulse: Millis,
    pub state: InvalidationState,
    pub entered_at: Millis,
}

impl Invalidation {
    pub fn new(
        id: InvalidationId,
        target: NodeId,
        now: Millis,
        duration: Millis,
        pulse: Millis,
    ) -> Self {
        Self {
            id,
            target,
            start: now,
            duration,
            pulse,
            state: InvalidationState::Traveling,
            entered_at: now,
        }
    }

    pub fn progress(&self, now: Millis) -> f64 {
        match self.state {
            InvalidationState::Traveling => progress(now, self.entered_at, self.duration),
            InvalidationState::Pulsing => progress(now, self.entered_at, self.pulse),
            InvalidationState::Done => 1.0,
        }
    }

    /// Advance by at most one transition; returns the state entered.
    ///
    /// Reaching `Done` means the caller must clear the target's cache flag.
    pub fn step(&mut self, now: Millis) -> Option<InvalidationState> {
        if self.state == InvalidationState::Done || self.progress(now) < 1.0 {
            return None;
        }
        self.state = match self.state {
            InvalidationState::Traveling => InvalidationState::Pulsing,
            InvalidationState::Pulsing | InvalidationState::Done => InvalidationState::Done,
        };
        self.entered_at = now;
        Some(self.state)
    }

    pub fn is_done(&self) -> bool {
        self.state == InvalidationState::Done
    }

    pub(crate) fn shift(&mut self, delta: Millis) {
        self.start += delta;
        self.entered_at += delta;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sim/invalidation.rs"]
mod tests;
