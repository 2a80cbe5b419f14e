use crate::config::model::AnimatorConfig;
use crate::foundation::core::{Canvas, Millis, Point};
use crate::foundation::error::CacheFlowResult;
use crate::sim::animator::CacheFlowAnimator;

/// Host input the animator reacts to; one variant per listener body.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Command {
    Play,
    Pause,
    /// The play/pause button.
    Toggle,
    Restart,
    ClearCache,
    Invalidate,
    /// Pointer click in canvas coordinates.
    Click { x: f64, y: f64 },
    /// Click on the centre of user `user`.
    ClickUser { user: usize },
    Resize { width: u32, height: u32 },
}

impl Command {
    pub(crate) fn listener(&self) -> Listener {
        match self {
            Self::Play | Self::Pause | Self::Toggle | Self::Restart => Listener::PlayPause,
            Self::ClearCache => Listener::ClearCache,
            Self::Invalidate => Listener::Invalidate,
            Self::Click { .. } | Self::ClickUser { .. } => Listener::Click,
            Self::Resize { .. } => Listener::Resize,
        }
    }
}

/// Host listener registered by `start` and detached by `destroy`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Listener {
    PlayPause,
    ClearCache,
    Invalidate,
    Click,
    Resize,
    ReducedMotion,
}

impl Listener {
    pub(crate) const ALL: [Listener; 6] = [
        Listener::PlayPause,
        Listener::ClearCache,
        Listener::Invalidate,
        Listener::Click,
        Listener::Resize,
        Listener::ReducedMotion,
    ];
}

/// What the host offers at mount time.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HostSurface {
    /// Canvas element size, `None` when the element is missing.
    pub canvas: Option<Canvas>,
    /// Whether a 2D drawing context could be acquired.
    pub context_available: bool,
    /// User prefers reduced motion.
    pub reduced_motion: bool,
}

impl Default for HostSurface {
    fn default() -> Self {
        Self {
            canvas: None,
            context_available: true,
            reduced_motion: false,
        }
    }
}

impl HostSurface {
    pub fn with_canvas(canvas: Canvas) -> Self {
        Self {
            canvas: Some(canvas),
            ..Self::default()
        }
    }
}

/// Outcome of mounting the animator on a host.
#[derive(Debug)]
pub enum Mounted {
    Animated(Box<CacheFlowAnimator>),
    /// Reduced motion: the host keeps showing its static fallback.
    Fallback,
    /// Canvas or drawing context unavailable; nothing was created.
    Absent,
}

impl Mounted {
    pub fn animator(self) -> Option<CacheFlowAnimator> {
        match self {
            Self::Animated(a) => Some(*a),
            Self::Fallback | Self::Absent => None,
        }
    }

    pub fn get(&self) -> Option<&CacheFlowAnimator> {
        match self {
            Self::Animated(a) => Some(&**a),
            Self::Fallback | Self::Absent => None,
        }
    }

    pub fn get_mut(&mut self) -> Option<&mut CacheFlowAnimator> {
        match self {
            Self::Animated(a) => Some(&mut **a),
            Self::Fallback | Self::Absent => None,
        }
    }

    /// Short name of the outcome, for logs and traces.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Animated(_) => "animated",
            Self::Fallback => "fallback",
            Self::Absent => "absent",
        }
    }
}

/// Start the animator on `host`.
///
/// Host shortcomings never surface as errors; only an invalid configuration does.
pub fn mount(cfg: AnimatorConfig, host: HostSurface, now: Millis) -> CacheFlowResult<Mounted> {
    cfg.validate()?;
    if host.reduced_motion {
        tracing::info!("reduced motion preferred, keeping static fallback");
        return Ok(Mounted::Fallback);
    }
    let Some(canvas) = host.canvas.filter(|_| host.context_available) else {
        tracing::debug!("canvas or drawing context unavailable, not mounting");
        return Ok(Mounted::Absent);
    };
    if canvas.validate().is_err() {
        tracing::debug!(?canvas, "unusable canvas size, not mounting");
        return Ok(Mounted::Absent);
    }
    let animator = CacheFlowAnimator::start(cfg, canvas, now)?;
    Ok(Mounted::Animated(Box::new(animator)))
}

pub(crate) fn click_point(cmd: &Command, animator: &CacheFlowAnimator) -> Option<Point> {
    match *cmd {
        Command::Click { x, y } => Some(Point::new(x, y)),
        Command::ClickUser { user } => animator.layout().users.get(user).map(|u| u.node.center),
        _ => None,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sim/host.rs"]
mod tests;
