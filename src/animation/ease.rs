/// Easing curve applied to normalized stage progress before sampling a connector.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Ease {
    Linear,
    OutQuad,
    #[default]
    InOutQuad,
    OutCubic,
    InOutCubic,
}

impl Ease {
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::OutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Self::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(2) / 2.0)
                }
            }
            Self::OutCubic => 1.0 - (1.0 - t).powi(3),
            Self::InOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(3) / 2.0)
                }
            }
        }
    }
}

/// Normalized progress of a stage: `(now - entered_at) / duration`, clamped to `[0, 1]`.
///
/// A zero or negative duration completes immediately.
pub fn progress(now: f64, entered_at: f64, duration: f64) -> f64 {
    if duration <= 0.0 {
        return 1.0;
    }
    ((now - entered_at) / duration).clamp(0.0, 1.0)
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
