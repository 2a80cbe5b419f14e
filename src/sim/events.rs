use crate::foundation::core::{Canvas, Millis};
use crate::layout::geometry::NodeId;
use crate::sim::invalidation::{InvalidationId, InvalidationState};
use crate::sim::request::{RequestId, RequestState};

/// Observable simulation event, recorded in order and drained by the host.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SimEvent {
    RunStarted {
        at: Millis,
        run: u32,
        requests: usize,
    },
    RequestQueued {
        at: Millis,
        id: RequestId,
        user: usize,
        edge: usize,
    },
    RequestTransition {
        at: Millis,
        id: RequestId,
        user: usize,
        from: RequestState,
        to: RequestState,
    },
    CacheCommitted {
        at: Millis,
        node: NodeId,
        cached: bool,
    },
    CacheCleared {
        at: Millis,
    },
    InvalidationQueued {
        at: Millis,
        id: InvalidationId,
        target: NodeId,
    },
    InvalidationTransition {
        at: Millis,
        id: InvalidationId,
        target: NodeId,
        to: InvalidationState,
    },
    ReplayScheduled {
        at: Millis,
        due: Millis,
    },
    Relayout {
        at: Millis,
        canvas: Canvas,
    },
    Paused {
        at: Millis,
    },
    Resumed {
        at: Millis,
    },
    LoopStopped {
        at: Millis,
    },
    Destroyed {
        at: Millis,
    },
}
