use crate::animation::ease::progress;
use crate::config::model::AnimatorConfig;
use crate::foundation::core::Millis;
use crate::layout::geometry::Tier;

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct RequestId(pub u64);

/// Lifecycle of one simulated client fetch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestState {
    Pending,
    TravelingToEdge,
    TravelingToRegional,
    EdgeHitReturn,
    FetchingOrigin,
    RegionalHitReturn,
    StoringRegional,
    ReturningToEdgeFromRegional,
    StoringEdge,
    ReturningToUser,
    Done,
}

impl RequestState {
    /// Fixed duration of the stage. `Pending` and `Done` are untimed.
    pub fn duration(self, cfg: &AnimatorConfig) -> Millis {
        match self {
            Self::Pending | Self::Done => 0.0,
            Self::TravelingToEdge
            | Self::TravelingToRegional
            | Self::ReturningToEdgeFromRegional
            | Self::ReturningToUser => cfg.request_travel_ms,
            Self::EdgeHitReturn | Self::RegionalHitReturn => cfg.hit_travel_ms,
            Self::FetchingOrigin => cfg.fetch_from_origin_ms,
            Self::StoringRegional | Self::StoringEdge => cfg.cache_store_ms,
        }
    }

    pub fn is_terminal(self) -> bool {
        self == Self::Done
    }

    /// State entered when this (timed) stage completes.
    ///
    /// Decision points read the cache flag of the tier just reached: a warm tier always takes
    /// the hit-return branch.
    pub fn next(self, edge_cached: bool, regional_cached: bool) -> Self {
        match self {
            Self::Pending => Self::TravelingToEdge,
            Self::TravelingToEdge if edge_cached => Self::EdgeHitReturn,
            Self::TravelingToEdge => Self::TravelingToRegional,
            Self::TravelingToRegional if regional_cached => Self::RegionalHitReturn,
            Self::TravelingToRegional => Self::FetchingOrigin,
            Self::EdgeHitReturn => Self::Done,
            Self::FetchingOrigin => Self::StoringRegional,
            Self::RegionalHitReturn => Self::StoringEdge,
            Self::StoringRegional => Self::ReturningToEdgeFromRegional,
            Self::ReturningToEdgeFromRegional => Self::StoringEdge,
            Self::StoringEdge => Self::ReturningToUser,
            Self::ReturningToUser | Self::Done => Self::Done,
        }
    }
}

/// Cache write committed when a stage completes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreEffect {
    Regional(usize),
    Edge(usize),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    pub from: RequestState,
    pub to: RequestState,
    pub store: Option<StoreEffect>,
}

/// One simulated client fetch.
#[derive(Clone, Debug, PartialEq)]
pub struct Request {
    pub id: RequestId,
    pub user: usize,
    pub edge: usize,
    pub regional: usize,
    pub state: RequestState,
    pub entered_at: Millis,
    pub start_at: Millis,
    /// Sequential predecessor; this request stays pending until it is done.
    pub after: Option<RequestId>,
    /// Tier that served the response, known once the request turns around.
    pub served_by: Option<Tier>,
    pub run: u32,
}

impl Request {
    pub fn progress(&self, now: Millis, cfg: &AnimatorConfig) -> f64 {
        match self.state {
            RequestState::Pending => 0.0,
            RequestState::Done => 1.0,
            s => progress(now, self.entered_at, s.duration(cfg)),
        }
    }

    pub fn is_in_flight(&self) -> bool {
        !self.state.is_terminal()
    }

    /// Advance by at most one transition.
    pub fn step(
        &mut self,
        now: Millis,
        cfg: &AnimatorConfig,
        edge_cached: bool,
        regional_cached: bool,
        predecessor_done: bool,
    ) -> Option<Transition> {
        let from = self.state;
        match from {
            RequestState::Done => return None,
            RequestState::Pending => {
                if now < self.start_at || !predecessor_done {
                    return None;
                }
            }
            _ => {
                if self.progress(now, cfg) < 1.0 {
                    return None;
                }
            }
        }

        let to = from.next(edge_cached, regional_cached);
        let store = match from {
            RequestState::StoringRegional => Some(StoreEffect::Regional(self.regional)),
            RequestState::StoringEdge => Some(StoreEffect::Edge(self.edge)),
            _ => None,
        };
        match to {
            RequestState::EdgeHitReturn => self.served_by = Some(Tier::Edge),
            RequestState::RegionalHitReturn => self.served_by = Some(Tier::Regional),
            RequestState::FetchingOrigin => self.served_by = Some(Tier::Origin),
            _ => {}
        }
        self.state = to;
        self.entered_at = now;
        Some(Transition { from, to, store })
    }

    pub(crate) fn shift(&mut self, delta: Millis) {
        self.entered_at += delta;
        self.start_at += delta;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sim/request.rs"]
mod tests;
