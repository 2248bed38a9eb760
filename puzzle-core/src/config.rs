use serde::{Deserialize, Serialize};

use crate::geometry::Size;

/// Default grid when the caller does not pick one.
pub const DEFAULT_ROWS: u32 = 8;
pub const DEFAULT_COLS: u32 = 8;
/// Total solve time (ms).
pub const DEFAULT_TOTAL_DURATION_MS: f64 = 20_000.0;
/// Scatter rotation bound (degrees, either direction).
pub const DEFAULT_MAX_ROTATION_DEG: f64 = 45.0;
/// Fallback display box when no viewport is known (px).
pub const DEFAULT_MAX_WIDTH: f64 = 1280.0;
pub const DEFAULT_MAX_HEIGHT: f64 = 720.0;
/// Share of the viewport the puzzle may occupy when no box is given.
pub const VIEWPORT_WIDTH_FRACTION: f64 = 0.9;
pub const VIEWPORT_HEIGHT_FRACTION: f64 = 0.8;

const MS_PER_MINUTE: f64 = 60_000.0;

/// Immutable run configuration. Every field has a default so partial JSON
/// documents deserialize.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PuzzleConfig {
    pub rows: u32,
    pub cols: u32,
    pub total_duration_ms: f64,
    pub max_rotation_deg: f64,
    pub max_width: f64,
    pub max_height: f64,
}

impl Default for PuzzleConfig {
    fn default() -> Self {
        PuzzleConfig {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            total_duration_ms: DEFAULT_TOTAL_DURATION_MS,
            max_rotation_deg: DEFAULT_MAX_ROTATION_DEG,
            max_width: DEFAULT_MAX_WIDTH,
            max_height: DEFAULT_MAX_HEIGHT,
        }
    }
}

impl PuzzleConfig {
    pub fn piece_count(&self) -> usize {
        self.rows as usize * self.cols as usize
    }

    pub fn max_box(&self) -> Size {
        Size::new(self.max_width, self.max_height)
    }
}

/// Host-supplied options; anything left out is filled in by
/// [`PuzzleOptions::resolve`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PuzzleOptions {
    pub rows: Option<u32>,
    pub cols: Option<u32>,
    #[serde(alias = "total_duration_ms", alias = "totalDuration")]
    pub total_duration_ms: Option<f64>,
    pub minutes: Option<f64>,
    #[serde(alias = "max_rotation_deg", alias = "maxRotation")]
    pub max_rotation_deg: Option<f64>,
    #[serde(alias = "max_width")]
    pub max_width: Option<f64>,
    #[serde(alias = "max_height")]
    pub max_height: Option<f64>,
}

impl PuzzleOptions {
    /// Fill gaps with defaults. The display box falls back to a fraction of
    /// `viewport` when one is known. An explicit millisecond duration wins
    /// over `minutes`.
    pub fn resolve(&self, viewport: Option<Size>) -> PuzzleConfig {
        let defaults = PuzzleConfig::default();
        let (fallback_w, fallback_h) = match viewport {
            Some(v) => (
                v.width * VIEWPORT_WIDTH_FRACTION,
                v.height * VIEWPORT_HEIGHT_FRACTION,
            ),
            None => (defaults.max_width, defaults.max_height),
        };
        let total_duration_ms = self
            .total_duration_ms
            .or(self.minutes.map(|m| m * MS_PER_MINUTE))
            .filter(|d| d.is_finite() && *d > 0.0)
            .unwrap_or(defaults.total_duration_ms);
        PuzzleConfig {
            rows: self.rows.unwrap_or(defaults.rows).max(1),
            cols: self.cols.unwrap_or(defaults.cols).max(1),
            total_duration_ms,
            max_rotation_deg: self
                .max_rotation_deg
                .map(f64::abs)
                .unwrap_or(defaults.max_rotation_deg),
            max_width: self.max_width.unwrap_or(fallback_w),
            max_height: self.max_height.unwrap_or(fallback_h),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_options_resolve_to_defaults() {
        let cfg = PuzzleOptions::default().resolve(None);
        assert_eq!(cfg, PuzzleConfig::default());
        assert_eq!(cfg.piece_count(), 64);
    }

    #[test]
    fn viewport_sets_display_box() {
        let cfg = PuzzleOptions::default().resolve(Some(Size::new(1000.0, 500.0)));
        assert_eq!(cfg.max_width, 900.0);
        assert_eq!(cfg.max_height, 400.0);
    }

    #[test]
    fn minutes_convert_and_millis_win() {
        let opts = PuzzleOptions {
            minutes: Some(2.5),
            ..Default::default()
        };
        assert_eq!(opts.resolve(None).total_duration_ms, 150_000.0);

        let opts = PuzzleOptions {
            minutes: Some(2.5),
            total_duration_ms: Some(4000.0),
            ..Default::default()
        };
        assert_eq!(opts.resolve(None).total_duration_ms, 4000.0);
    }

    #[test]
    fn zero_grid_is_clamped() {
        let opts = PuzzleOptions {
            rows: Some(0),
            cols: Some(0),
            ..Default::default()
        };
        let cfg = opts.resolve(None);
        assert_eq!((cfg.rows, cfg.cols), (1, 1));
    }

    #[test]
    fn camel_case_json_is_accepted() {
        let opts: PuzzleOptions =
            serde_json::from_str(r#"{"rows":3,"totalDuration":9000,"maxRotation":-30}"#)
                .unwrap();
        let cfg = opts.resolve(None);
        assert_eq!(cfg.rows, 3);
        assert_eq!(cfg.cols, DEFAULT_COLS);
        assert_eq!(cfg.total_duration_ms, 9000.0);
        assert_eq!(cfg.max_rotation_deg, 30.0);
    }

    #[test]
    fn partial_config_json_keeps_defaults() {
        let cfg: PuzzleConfig = serde_json::from_str(r#"{"rows":2,"cols":3}"#).unwrap();
        assert_eq!(cfg.rows, 2);
        assert_eq!(cfg.total_duration_ms, DEFAULT_TOTAL_DURATION_MS);
    }
}
