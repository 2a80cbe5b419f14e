use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{Canvas, FrameIndex, Millis};
use crate::foundation::error::{CacheFlowError, CacheFlowResult};
use crate::layout::diagram::CacheView;
use crate::layout::geometry::compute_layout;
use crate::render::backend::{BackendKind, FrameRGBA, RenderBackend, create_backend};
use crate::session::scenario::{Scenario, ScheduledCommand};
use crate::sim::animator::FrameDecision;
use crate::sim::events::SimEvent;
use crate::sim::host::{Mounted, mount};

/// One simulation event, tagged with the frame during which it happened.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct TraceRecord {
    pub frame: u64,
    #[serde(flatten)]
    pub event: SimEvent,
}

/// Summary of a range render.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub frames: u64,
    /// Frames during which the animation loop was running.
    pub active_frames: u64,
    pub events: u64,
}

/// Offline host: plays a [`Scenario`] frame by frame.
///
/// Each frame first applies the commands due at or before its clock reading, then advances the
/// animator once, then renders.
pub struct Player {
    scenario: Scenario,
    mounted: Mounted,
    renderer: Box<dyn RenderBackend>,
    events: Vec<ScheduledCommand>,
    next_event: usize,
    clock: Option<Millis>,
    trace: Vec<TraceRecord>,
    fallback_frame: Option<FrameRGBA>,
}

impl Player {
    /// Validate the scenario and mount the animator at clock 0.
    pub fn new(scenario: Scenario) -> CacheFlowResult<Self> {
        Self::with_backend(scenario, BackendKind::Cpu)
    }

    pub fn with_backend(scenario: Scenario, backend: BackendKind) -> CacheFlowResult<Self> {
        scenario.validate()?;
        let mounted = mount(scenario.config.clone(), scenario.host_surface(), 0.0)?;
        tracing::info!(outcome = mounted.kind(), frames = scenario.frame_count(), "mounted");
        Ok(Self {
            events: scenario.sorted_events(),
            scenario,
            mounted,
            renderer: create_backend(backend),
            next_event: 0,
            clock: None,
            trace: Vec::new(),
            fallback_frame: None,
        })
    }

    pub fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    pub fn mounted(&self) -> &Mounted {
        &self.mounted
    }

    pub fn frame_count(&self) -> u64 {
        self.scenario.frame_count()
    }

    /// Clock reading of the most recent advance, if any.
    pub fn clock(&self) -> Option<Millis> {
        self.clock
    }

    pub fn trace(&self) -> &[TraceRecord] {
        &self.trace
    }

    /// Advance the host clock to `now` and process one frame.
    ///
    /// Returns whether the animation loop asked for another frame.
    pub fn advance_to(&mut self, frame: FrameIndex, now: Millis) -> CacheFlowResult<bool> {
        if let Some(prev) = self.clock
            && now < prev
        {
            return Err(CacheFlowError::validation(format!(
                "clock went backwards: {now} < {prev}"
            )));
        }
        self.clock = Some(now);

        let Some(anim) = self.mounted.get_mut() else {
            return Ok(false);
        };
        while let Some(ev) = self.events.get(self.next_event)
            && ev.at_ms <= now
        {
            anim.poll_timers(ev.at_ms);
            let applied = anim.dispatch(&ev.command, ev.at_ms);
            tracing::debug!(at = ev.at_ms, command = ?ev.command, applied, "scenario command");
            self.next_event += 1;
        }
        let decision = anim.tick(now);
        self.trace.extend(
            anim.drain_events()
                .into_iter()
                .map(|event| TraceRecord { frame: frame.0, event }),
        );
        Ok(decision == FrameDecision::Continue)
    }

    /// Advance to frame `idx` of the scenario clock.
    pub fn step(&mut self, idx: FrameIndex) -> CacheFlowResult<bool> {
        self.advance_to(idx, self.scenario.fps.frame_to_ms(idx))
    }

    /// Render the current state.
    pub fn render_current(&mut self) -> CacheFlowResult<FrameRGBA> {
        if let Mounted::Animated(anim) = &self.mounted {
            return self.renderer.render_frame(anim);
        }
        match self.mounted {
            Mounted::Fallback => self.fallback(),
            _ => Err(CacheFlowError::render(
                "nothing mounted: canvas or drawing context unavailable",
            )),
        }
    }

    /// Play every frame up to `at_ms`, then render the state at exactly `at_ms`.
    pub fn render_at(&mut self, at_ms: Millis) -> CacheFlowResult<FrameRGBA> {
        if !at_ms.is_finite() || at_ms < 0.0 {
            return Err(CacheFlowError::validation("at-ms must be a non-negative number"));
        }
        let last = self.scenario.fps.ms_to_frames_floor(at_ms);
        for i in 0..=last {
            let idx = FrameIndex(i);
            let t = self.scenario.fps.frame_to_ms(idx);
            if t > at_ms {
                break;
            }
            self.step(idx)?;
        }
        if self.clock != Some(at_ms) {
            self.advance_to(FrameIndex(last), at_ms)?;
        }
        self.render_current()
    }

    /// Play and render every frame of the scenario into `sink`.
    ///
    /// The output keeps the scenario canvas size: after a `resize` command the relaid-out
    /// frames are scaled to fit it.
    #[tracing::instrument(level = "info", skip_all, fields(frames = self.frame_count()))]
    pub fn render_to(&mut self, sink: &mut dyn FrameSink) -> CacheFlowResult<RenderStats> {
        let bg = self
            .scenario
            .config
            .colors
            .background
            .to_rgba8_premul()
            .to_straight();
        let Canvas { width, height } = self.scenario.canvas;
        sink.begin(SinkConfig {
            width,
            height,
            fps: self.scenario.fps,
            bg_rgba: [bg[0], bg[1], bg[2], 255],
        })?;

        let mut stats = RenderStats::default();
        let traced_before = self.trace.len();
        for i in 0..self.frame_count() {
            let idx = FrameIndex(i);
            if self.step(idx)? {
                stats.active_frames += 1;
            }
            let frame = self.render_current()?.fit_into(width, height)?;
            sink.push_frame(idx, &frame)?;
            stats.frames += 1;
        }
        sink.end()?;
        stats.events = (self.trace.len() - traced_before) as u64;
        Ok(stats)
    }

    /// Play every frame without rendering and return the full event trace.
    pub fn run_trace(&mut self) -> CacheFlowResult<Vec<TraceRecord>> {
        for i in 0..self.frame_count() {
            self.step(FrameIndex(i))?;
        }
        Ok(std::mem::take(&mut self.trace))
    }

    /// The static diagram with every cache cold, as shown when motion is disabled.
    pub fn fallback(&mut self) -> CacheFlowResult<FrameRGBA> {
        if let Some(frame) = &self.fallback_frame {
            return Ok(frame.clone());
        }
        let cfg = &self.scenario.config;
        let layout = compute_layout(self.scenario.canvas, cfg);
        let edges = vec![false; cfg.edges_count];
        let regionals = vec![false; cfg.regionals_count];
        let frame = self.renderer.render_static(
            &layout,
            CacheView {
                edges: &edges,
                regionals: &regionals,
            },
            &cfg.colors,
        )?;
        self.fallback_frame = Some(frame.clone());
        Ok(frame)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/player.rs"]
mod tests;
