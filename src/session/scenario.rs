use crate::config::model::AnimatorConfig;
use crate::foundation::core::{Canvas, Fps, Millis};
use crate::foundation::error::{CacheFlowError, CacheFlowResult};
use crate::sim::host::{Command, HostSurface};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Longest scenario accepted, in milliseconds.
const MAX_DURATION_MS: Millis = 10.0 * 60.0 * 1000.0;

/// A scripted host session: canvas, clock rate, configuration and timed commands.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Scenario {
    pub canvas: Canvas,
    #[serde(default = "default_fps")]
    pub fps: Fps,
    pub duration_ms: Millis,
    #[serde(default)]
    pub config: AnimatorConfig,
    #[serde(default)]
    pub host: ScenarioHost,
    /// Commands in any order; they are applied sorted by time, ties in file order.
    #[serde(default)]
    pub events: Vec<ScheduledCommand>,
}

/// Host capabilities simulated by a scenario.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct ScenarioHost {
    pub reduced_motion: bool,
    pub context_available: bool,
    pub canvas_present: bool,
}

impl Default for ScenarioHost {
    fn default() -> Self {
        Self {
            reduced_motion: false,
            context_available: true,
            canvas_present: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ScheduledCommand {
    pub at_ms: Millis,
    pub command: Command,
}

fn default_fps() -> Fps {
    Fps { num: 30, den: 1 }
}

impl Scenario {
    /// Parse and validate a scenario from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> CacheFlowResult<Self> {
        let scenario: Self = serde_json::from_reader(r)
            .map_err(|e| CacheFlowError::serde(format!("parse scenario JSON: {e}")))?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Parse and validate a scenario from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> CacheFlowResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            CacheFlowError::validation(format!("open scenario JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    pub fn validate(&self) -> CacheFlowResult<()> {
        self.canvas.validate()?;
        Fps::new(self.fps.num, self.fps.den)?;
        if !self.duration_ms.is_finite() || self.duration_ms <= 0.0 {
            return Err(CacheFlowError::validation("durationMs must be > 0"));
        }
        if self.duration_ms > MAX_DURATION_MS {
            return Err(CacheFlowError::validation(format!(
                "durationMs must be <= {MAX_DURATION_MS}"
            )));
        }
        for (i, ev) in self.events.iter().enumerate() {
            if !ev.at_ms.is_finite() || ev.at_ms < 0.0 {
                return Err(CacheFlowError::validation(format!(
                    "events[{i}].atMs must be a finite, non-negative number"
                )));
            }
        }
        self.config.validate()
    }

    /// Number of frames presented: one every frame interval starting at 0 ms.
    pub fn frame_count(&self) -> u64 {
        self.fps.ms_to_frames_floor(self.duration_ms).max(1)
    }

    /// What the simulated host offers at mount time.
    pub fn host_surface(&self) -> HostSurface {
        HostSurface {
            canvas: self.host.canvas_present.then_some(self.canvas),
            context_available: self.host.context_available,
            reduced_motion: self.host.reduced_motion,
        }
    }

    /// Events sorted by time; the sort is stable so ties keep file order.
    pub fn sorted_events(&self) -> Vec<ScheduledCommand> {
        let mut events = self.events.clone();
        events.sort_by(|a, b| a.at_ms.total_cmp(&b.at_ms));
        events
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/scenario.rs"]
mod tests;
