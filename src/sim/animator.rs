use crate::config::model::AnimatorConfig;
use crate::foundation::core::{Canvas, Millis, Point};
use crate::foundation::error::CacheFlowResult;
use crate::layout::diagram::CacheView;
use crate::layout::geometry::{Layout, NodeId, Tier, compute_layout};
use crate::sim::events::SimEvent;
use crate::sim::host::{Command, Listener, click_point};
use crate::sim::invalidation::{Invalidation, InvalidationId, InvalidationState};
use crate::sim::request::{Request, RequestId, RequestState, StoreEffect};

/// Whether the host keeps scheduling frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopState {
    Running,
    /// Suspended by `pause`; in-flight entities are frozen.
    Paused,
    /// Nothing left to animate; a replay may be pending.
    Finished,
    Destroyed,
}

/// Continuation decision at the end of a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameDecision {
    /// Schedule another frame.
    Continue,
    /// Stop requesting frames until a command or timer resumes the loop.
    Stop,
}

/// Per-mount simulation of request and invalidation journeys across the
/// User -> Edge -> Regional -> Origin topology.
///
/// All mutable state lives here; the host drives it with [`Self::tick`] once per frame and
/// forwards listener input through [`Self::dispatch`] (or the individual operations).
#[derive(Debug)]
pub struct CacheFlowAnimator {
    cfg: AnimatorConfig,
    layout: Layout,
    edge_cached: Vec<bool>,
    regional_cached: Vec<bool>,
    requests: Vec<Request>,
    invalidations: Vec<Invalidation>,
    next_request: u64,
    next_invalidation: u64,
    run: u32,
    warmed_this_run: bool,
    /// Set by `clear_cache`: the current run no longer schedules a replay.
    run_cleared: bool,
    loop_state: LoopState,
    paused_at: Option<Millis>,
    last_frame_at: Millis,
    replay_at: Option<Millis>,
    pending_resize: Option<(Millis, Canvas)>,
    static_generation: u64,
    listeners: Vec<Listener>,
    events: Vec<SimEvent>,
}

impl CacheFlowAnimator {
    /// Lay out the diagram, seed the first run and start the loop.
    ///
    /// There is no guard against starting twice on the same host; pair every call with
    /// [`Self::destroy`].
    pub fn start(cfg: AnimatorConfig, canvas: Canvas, now: Millis) -> CacheFlowResult<Self> {
        cfg.validate()?;
        canvas.validate()?;
        let layout = compute_layout(canvas, &cfg);
        let mut this = Self {
            edge_cached: vec![false; cfg.edges_count],
            regional_cached: vec![false; cfg.regionals_count],
            layout,
            cfg,
            requests: Vec::new(),
            invalidations: Vec::new(),
            next_request: 0,
            next_invalidation: 0,
            run: 0,
            warmed_this_run: false,
            run_cleared: false,
            loop_state: LoopState::Running,
            paused_at: None,
            last_frame_at: now,
            replay_at: None,
            pending_resize: None,
            static_generation: 0,
            listeners: Listener::ALL.to_vec(),
            events: Vec::new(),
        };
        tracing::info!(width = canvas.width, height = canvas.height, "animator started");
        this.start_run(now);
        Ok(this)
    }

    /// Configuration the animator was started with.
    pub fn config(&self) -> &AnimatorConfig {
        &self.cfg
    }

    /// Current layout; replaced when a debounced resize fires.
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn loop_state(&self) -> LoopState {
        self.loop_state
    }

    /// Whether the host should keep scheduling frames.
    pub fn is_running(&self) -> bool {
        self.loop_state == LoopState::Running
    }

    /// Index of the current run, starting at 1.
    pub fn run(&self) -> u32 {
        self.run
    }

    /// Active requests in insertion order.
    pub fn requests(&self) -> &[Request] {
        &self.requests
    }

    /// Active invalidation signals.
    pub fn invalidations(&self) -> &[Invalidation] {
        &self.invalidations
    }

    /// Cache flag per edge.
    pub fn edge_cached(&self) -> &[bool] {
        &self.edge_cached
    }

    /// Cache flag per regional.
    pub fn regional_cached(&self) -> &[bool] {
        &self.regional_cached
    }

    /// Cache flag of `node`; users and the origin are never cached.
    pub fn is_cached(&self, node: NodeId) -> bool {
        match node.tier {
            Tier::Edge => self.edge_cached.get(node.index).copied().unwrap_or(false),
            Tier::Regional => self
                .regional_cached
                .get(node.index)
                .copied()
                .unwrap_or(false),
            Tier::User | Tier::Origin => false,
        }
    }

    /// Borrowed cache flags, as consumed by the static diagram.
    pub fn cache_view(&self) -> CacheView<'_> {
        CacheView {
            edges: &self.edge_cached,
            regionals: &self.regional_cached,
        }
    }

    /// Changes whenever the static buffer must be redrawn (layout or cache flags).
    pub fn static_generation(&self) -> u64 {
        self.static_generation
    }

    /// Clock reading of the last processed frame; the scene is sampled at this time.
    pub fn last_frame_at(&self) -> Millis {
        self.last_frame_at
    }

    /// Clock reading at which the pending auto-replay fires.
    pub fn replay_due(&self) -> Option<Millis> {
        self.replay_at
    }

    /// Clock reading at which the pending relayout fires.
    pub fn resize_due(&self) -> Option<Millis> {
        self.pending_resize.map(|(due, _)| due)
    }

    /// Host listeners currently attached; empty after `destroy`.
    pub fn listeners(&self) -> &[Listener] {
        &self.listeners
    }

    pub fn has_pending_timers(&self) -> bool {
        self.replay_at.is_some() || self.pending_resize.is_some()
    }

    /// Take every event recorded since the last drain, oldest first.
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    /// Route one host input; returns `false` when it was ignored (detached listener or no
    /// effect).
    pub fn dispatch(&mut self, cmd: &Command, now: Millis) -> bool {
        if !self.listeners.contains(&cmd.listener()) {
            tracing::debug!(?cmd, "listener detached, ignoring command");
            return false;
        }
        match cmd {
            Command::Play => self.play(now),
            Command::Pause => self.pause(now),
            Command::Toggle => self.toggle(now),
            Command::Restart => self.restart(now),
            Command::ClearCache => self.clear_cache(now),
            Command::Invalidate => return self.invalidate(now) > 0,
            Command::Click { .. } | Command::ClickUser { .. } => {
                return match click_point(cmd, self) {
                    Some(p) => self.click(p, now),
                    None => false,
                };
            }
            Command::Resize { width, height } => {
                return self.resize(
                    Canvas {
                        width: *width,
                        height: *height,
                    },
                    now,
                );
            }
        }
        true
    }

    /// One frame: fire due timers, advance requests then invalidations, drop finished
    /// entities and decide whether to keep going. All entities observe the same `now`.
    pub fn tick(&mut self, now: Millis) -> FrameDecision {
        self.poll_timers(now);
        if self.loop_state != LoopState::Running {
            return FrameDecision::Stop;
        }
        self.last_frame_at = now;

        self.advance_requests(now);
        self.advance_invalidations(now);
        self.requests.retain(Request::is_in_flight);
        self.invalidations.retain(|e| !e.is_done());

        if self.requests.is_empty() && self.invalidations.is_empty() {
            self.finish(now);
            return FrameDecision::Stop;
        }
        FrameDecision::Continue
    }

    /// Fire due timers (replay, debounced resize) without advancing entities.
    pub fn poll_timers(&mut self, now: Millis) {
        if self.loop_state == LoopState::Destroyed {
            return;
        }
        if let Some((due, canvas)) = self.pending_resize
            && now >= due
        {
            self.pending_resize = None;
            self.relayout(canvas, now);
        }
        if let Some(due) = self.replay_at
            && now >= due
        {
            self.replay_at = None;
            tracing::info!(at = now, "auto replay");
            self.start_run(now);
        }
    }

    /// Resume a paused or finished loop, shifting in-flight timestamps by the paused time.
    pub fn play(&mut self, now: Millis) {
        match self.loop_state {
            LoopState::Running | LoopState::Destroyed => return,
            LoopState::Paused => {
                if let Some(paused_at) = self.paused_at.take() {
                    let delta = (now - paused_at).max(0.0);
                    self.requests.iter_mut().for_each(|r| r.shift(delta));
                    self.invalidations.iter_mut().for_each(|e| e.shift(delta));
                }
            }
            LoopState::Finished => {}
        }
        self.loop_state = LoopState::Running;
        self.last_frame_at = now;
        self.events.push(SimEvent::Resumed { at: now });
        tracing::debug!(at = now, "loop resumed");
    }

    /// Freeze the loop and cancel any pending replay.
    pub fn pause(&mut self, now: Millis) {
        match self.loop_state {
            LoopState::Running | LoopState::Finished => {}
            LoopState::Paused | LoopState::Destroyed => return,
        }
        self.loop_state = LoopState::Paused;
        self.paused_at = Some(now);
        self.replay_at = None;
        self.events.push(SimEvent::Paused { at: now });
        tracing::debug!(at = now, "loop paused");
    }

    pub fn toggle(&mut self, now: Millis) {
        if self.is_running() {
            self.pause(now);
        } else {
            self.play(now);
        }
    }

    /// Reset the run counter and seed a fresh batch against the current cache flags.
    pub fn restart(&mut self, now: Millis) {
        if self.loop_state == LoopState::Destroyed {
            return;
        }
        self.play(now);
        self.run = 0;
        self.replay_at = None;
        self.requests.clear();
        self.start_run(now);
    }

    /// Mark every edge and regional cache cold. In-flight requests keep their progress and
    /// re-decide at their next decision point.
    pub fn clear_cache(&mut self, now: Millis) {
        if self.loop_state == LoopState::Destroyed {
            return;
        }
        self.edge_cached.iter_mut().for_each(|c| *c = false);
        self.regional_cached.iter_mut().for_each(|c| *c = false);
        self.replay_at = None;
        self.warmed_this_run = false;
        self.run_cleared = true;
        self.static_generation += 1;
        self.events.push(SimEvent::CacheCleared { at: now });
        tracing::debug!(at = now, "cache cleared");
    }

    /// Queue one invalidation per currently cached node; returns how many were queued.
    pub fn invalidate(&mut self, now: Millis) -> usize {
        if self.loop_state == LoopState::Destroyed {
            return 0;
        }
        let targets = self
            .edge_cached
            .iter()
            .enumerate()
            .filter(|(_, c)| **c)
            .map(|(i, _)| NodeId::new(Tier::Edge, i))
            .chain(
                self.regional_cached
                    .iter()
                    .enumerate()
                    .filter(|(_, c)| **c)
                    .map(|(i, _)| NodeId::new(Tier::Regional, i)),
            )
            .collect::<Vec<_>>();
        if targets.is_empty() {
            return 0;
        }

        if !self.is_running() {
            self.play(now);
        }
        for target in &targets {
            let id = InvalidationId(self.next_invalidation);
            self.next_invalidation += 1;
            self.invalidations.push(Invalidation::new(
                id,
                *target,
                now,
                self.cfg.invalidate_travel_ms,
                self.cfg.invalidate_pulse_ms,
            ));
            self.events.push(SimEvent::InvalidationQueued {
                at: now,
                id,
                target: *target,
            });
        }
        tracing::debug!(count = targets.len(), at = now, "invalidation queued");
        targets.len()
    }

    /// Queue an ad-hoc request for the user under `p`, at most one in flight per user.
    pub fn click(&mut self, p: Point, now: Millis) -> bool {
        if self.loop_state == LoopState::Destroyed {
            return false;
        }
        let Some(user) = self.layout.user_at(p) else {
            return false;
        };
        if self.requests.iter().any(|r| r.user == user && r.is_in_flight()) {
            tracing::debug!(user, "request already in flight, ignoring click");
            return false;
        }
        if !self.is_running() {
            self.play(now);
        }
        let id = self.push_request(user, now, None);
        self.events.push(SimEvent::RequestQueued {
            at: now,
            id,
            user,
            edge: self.layout.users[user].assigned_edge,
        });
        true
    }

    /// Schedule a relayout for `canvas` after the debounce delay; later calls replace it.
    pub fn resize(&mut self, canvas: Canvas, now: Millis) -> bool {
        if self.loop_state == LoopState::Destroyed {
            return false;
        }
        if let Err(err) = canvas.validate() {
            tracing::warn!(%err, "ignoring resize");
            return false;
        }
        self.pending_resize = Some((now + self.cfg.resize_debounce_ms, canvas));
        true
    }

    /// Stop the loop, drop pending timers and detach every listener.
    pub fn destroy(&mut self, now: Millis) {
        if self.loop_state == LoopState::Destroyed {
            return;
        }
        self.loop_state = LoopState::Destroyed;
        self.replay_at = None;
        self.pending_resize = None;
        self.paused_at = None;
        self.listeners.clear();
        self.events.push(SimEvent::Destroyed { at: now });
        tracing::info!(at = now, "animator destroyed");
    }

    fn start_run(&mut self, now: Millis) {
        self.run += 1;
        self.warmed_this_run = false;
        self.run_cleared = false;
        self.loop_state = LoopState::Running;
        self.paused_at = None;
        self.last_frame_at = now;

        let mut prev = None;
        let mut seeded = 0;
        for user in 0..self.layout.users.len() {
            // Same one-in-flight rule as clicks.
            if self.requests.iter().any(|r| r.user == user && r.is_in_flight()) {
                continue;
            }
            let (start_at, after) = if self.cfg.sequential {
                (now, prev)
            } else {
                (now + user as f64 * self.cfg.user_stagger_ms, None)
            };
            prev = Some(self.push_request(user, start_at, after));
            seeded += 1;
        }
        self.events.push(SimEvent::RunStarted {
            at: now,
            run: self.run,
            requests: seeded,
        });
        tracing::info!(run = self.run, at = now, "run started");
    }

    fn push_request(
        &mut self,
        user: usize,
        start_at: Millis,
        after: Option<RequestId>,
    ) -> RequestId {
        let id = RequestId(self.next_request);
        self.next_request += 1;
        let edge = self.layout.users[user].assigned_edge;
        self.requests.push(Request {
            id,
            user,
            edge,
            regional: self.layout.edge_regional[edge],
            state: RequestState::Pending,
            entered_at: start_at,
            start_at,
            after,
            served_by: None,
            run: self.run,
        });
        id
    }

    fn advance_requests(&mut self, now: Millis) {
        for i in 0..self.requests.len() {
            let predecessor_done = match self.requests[i].after {
                None => true,
                Some(id) => self
                    .requests
                    .iter()
                    .find(|r| r.id == id)
                    .is_none_or(|r| !r.is_in_flight()),
            };
            let req = &mut self.requests[i];
            let edge_cached = self.edge_cached[req.edge];
            let regional_cached = self.regional_cached[req.regional];
            let step = req.step(now, &self.cfg, edge_cached, regional_cached, predecessor_done);
            let Some(t) = step else {
                continue;
            };
            let (id, user) = (req.id, req.user);
            tracing::debug!(id = id.0, user, from = ?t.from, to = ?t.to, at = now, "request");
            self.events.push(SimEvent::RequestTransition {
                at: now,
                id,
                user,
                from: t.from,
                to: t.to,
            });
            let stored = match t.store {
                Some(StoreEffect::Regional(r)) => Some(NodeId::new(Tier::Regional, r)),
                Some(StoreEffect::Edge(e)) => Some(NodeId::new(Tier::Edge, e)),
                None => None,
            };
            if let Some(node) = stored {
                self.commit_cache(node, true, now);
            }
        }
    }

    fn advance_invalidations(&mut self, now: Millis) {
        for i in 0..self.invalidations.len() {
            let ev = &mut self.invalidations[i];
            let Some(state) = ev.step(now) else {
                continue;
            };
            let (id, target) = (ev.id, ev.target);
            tracing::debug!(id = id.0, ?target, to = ?state, at = now, "invalidation");
            self.events.push(SimEvent::InvalidationTransition {
                at: now,
                id,
                target,
                to: state,
            });
            if state == InvalidationState::Done {
                self.commit_cache(target, false, now);
            }
        }
    }

    fn commit_cache(&mut self, node: NodeId, cached: bool, now: Millis) {
        let slot = match node.tier {
            Tier::Edge => self.edge_cached.get_mut(node.index),
            Tier::Regional => self.regional_cached.get_mut(node.index),
            Tier::User | Tier::Origin => None,
        };
        let Some(slot) = slot else {
            return;
        };
        if *slot == cached {
            return;
        }
        *slot = cached;
        if cached {
            self.warmed_this_run = true;
        }
        self.static_generation += 1;
        self.events.push(SimEvent::CacheCommitted {
            at: now,
            node,
            cached,
        });
        tracing::debug!(?node, cached, at = now, "cache committed");
    }

    fn finish(&mut self, now: Millis) {
        self.loop_state = LoopState::Finished;
        self.events.push(SimEvent::LoopStopped { at: now });
        let replay_eligible = self.run == 1 && self.warmed_this_run && !self.run_cleared;
        if replay_eligible && self.replay_at.is_none() {
            let due = now + self.cfg.gap_ms;
            self.replay_at = Some(due);
            self.warmed_this_run = false;
            self.events.push(SimEvent::ReplayScheduled { at: now, due });
            tracing::info!(at = now, due, "replay scheduled");
        }
    }

    fn relayout(&mut self, canvas: Canvas, now: Millis) {
        self.layout = compute_layout(canvas, &self.cfg);
        self.static_generation += 1;
        self.events.push(SimEvent::Relayout { at: now, canvas });
        tracing::debug!(width = canvas.width, height = canvas.height, "relayout");
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sim/animator.rs"]
mod tests;
