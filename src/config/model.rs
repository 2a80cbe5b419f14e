use crate::animation::ease::Ease;
use crate::config::color::Color;
use crate::foundation::core::Millis;
use crate::foundation::error::{CacheFlowError, CacheFlowResult};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

const MAX_USERS: usize = 32;
const MAX_CACHE_NODES: usize = 16;

/// Static animator configuration, read once at construction.
///
/// JSON keys are camelCase (`usersCount`, `userEdgeMap`, `requestTravelMs`, ...). Every field has
/// a default, so `{}` is a valid configuration.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct AnimatorConfig {
    pub users_count: usize,
    pub edges_count: usize,
    pub regionals_count: usize,
    /// Static user -> edge assignment. Entries are clamped into `[0, edges_count)`; users beyond
    /// the end of the map fall back to `user % edges_count`.
    pub user_edge_map: Vec<usize>,
    /// Each request in a run waits for its predecessor to finish.
    pub sequential: bool,
    pub user_stagger_ms: Millis,
    pub request_travel_ms: Millis,
    pub fetch_from_origin_ms: Millis,
    pub cache_store_ms: Millis,
    pub hit_travel_ms: Millis,
    pub gap_ms: Millis,
    pub invalidate_travel_ms: Millis,
    pub invalidate_pulse_ms: Millis,
    pub resize_debounce_ms: Millis,
    pub dot_radius: f64,
    pub ease: Ease,
    pub colors: Palette,
}

impl Default for AnimatorConfig {
    fn default() -> Self {
        Self {
            users_count: 4,
            edges_count: 3,
            regionals_count: 2,
            user_edge_map: vec![0, 1, 2, 2],
            sequential: true,
            user_stagger_ms: 350.0,
            request_travel_ms: 900.0,
            fetch_from_origin_ms: 1200.0,
            cache_store_ms: 450.0,
            hit_travel_ms: 650.0,
            gap_ms: 1600.0,
            invalidate_travel_ms: 800.0,
            invalidate_pulse_ms: 600.0,
            resize_debounce_ms: 150.0,
            dot_radius: 6.0,
            ease: Ease::InOutQuad,
            colors: Palette::default(),
        }
    }
}

impl AnimatorConfig {
    /// Parse a configuration from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> CacheFlowResult<Self> {
        let cfg: Self = serde_json::from_reader(r)
            .map_err(|e| CacheFlowError::serde(format!("parse animator config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse a configuration from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> CacheFlowResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            CacheFlowError::validation(format!("open config JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    pub fn validate(&self) -> CacheFlowResult<()> {
        if self.users_count == 0 || self.users_count > MAX_USERS {
            return Err(CacheFlowError::validation(format!(
                "usersCount must be in 1..={MAX_USERS}"
            )));
        }
        for (name, n) in [
            ("edgesCount", self.edges_count),
            ("regionalsCount", self.regionals_count),
        ] {
            if n == 0 || n > MAX_CACHE_NODES {
                return Err(CacheFlowError::validation(format!(
                    "{name} must be in 1..={MAX_CACHE_NODES}"
                )));
            }
        }
        for (name, ms) in [
            ("userStaggerMs", self.user_stagger_ms),
            ("requestTravelMs", self.request_travel_ms),
            ("fetchFromOriginMs", self.fetch_from_origin_ms),
            ("cacheStoreMs", self.cache_store_ms),
            ("hitTravelMs", self.hit_travel_ms),
            ("gapMs", self.gap_ms),
            ("invalidateTravelMs", self.invalidate_travel_ms),
            ("invalidatePulseMs", self.invalidate_pulse_ms),
            ("resizeDebounceMs", self.resize_debounce_ms),
        ] {
            if !ms.is_finite() || ms < 0.0 {
                return Err(CacheFlowError::validation(format!(
                    "{name} must be a finite, non-negative number of milliseconds"
                )));
            }
        }
        if !self.dot_radius.is_finite() || self.dot_radius <= 0.0 {
            return Err(CacheFlowError::validation("dotRadius must be > 0"));
        }
        Ok(())
    }

    /// Edge a user's requests always go to.
    pub fn assigned_edge(&self, user: usize) -> usize {
        let edges = self.edges_count.max(1);
        let raw = self
            .user_edge_map
            .get(user)
            .copied()
            .unwrap_or(user % edges);
        raw.min(edges - 1)
    }

    /// Regional tier an edge forwards misses to.
    pub fn regional_for_edge(&self, edge: usize) -> usize {
        let edges = self.edges_count.max(1);
        let regionals = self.regionals_count.max(1);
        (edge.min(edges - 1) * regionals / edges).min(regionals - 1)
    }
}

/// Colour palette for the diagram and the moving elements.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct Palette {
    pub background: Color,
    pub node: Color,
    pub node_stroke: Color,
    pub origin: Color,
    pub text: Color,
    pub connector: Color,
    pub cached: Color,
    pub uncached: Color,
    pub request: Color,
    pub hit: Color,
    pub store: Color,
    pub invalidate: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Color::from_rgb8(0x0f, 0x17, 0x2a),
            node: Color::from_rgb8(0x1e, 0x29, 0x3b),
            node_stroke: Color::from_rgb8(0x47, 0x55, 0x69),
            origin: Color::from_rgb8(0x33, 0x41, 0x55),
            text: Color::from_rgb8(0xe2, 0xe8, 0xf0),
            connector: Color::from_rgb8(0x64, 0x74, 0x8b),
            cached: Color::from_rgb8(0x22, 0xc5, 0x5e),
            uncached: Color::from_rgb8(0x47, 0x55, 0x69),
            request: Color::from_rgb8(0x38, 0xbd, 0xf8),
            hit: Color::from_rgb8(0x4a, 0xde, 0x80),
            store: Color::from_rgb8(0xfa, 0xcc, 0x15),
            invalidate: Color::from_rgb8(0xf8, 0x71, 0x71),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/model.rs"]
mod tests;
