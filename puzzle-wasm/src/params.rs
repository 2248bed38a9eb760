use puzzle_core::PuzzleOptions;

use crate::utils::get_query_param;

/// What the page URL asks for.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PageParams {
    pub theme: String,
    /// Direct image URL; skips the catalog when present.
    pub image: Option<String>,
    pub options: PuzzleOptions,
}

fn number<T: std::str::FromStr>(search: &str, key: &str) -> Option<T> {
    get_query_param(search, key).and_then(|v| v.trim().parse().ok())
}

impl PageParams {
    /// Read `theme`, `image`, `minutes`, `duration` (ms), `rows`, `cols` and
    /// `rotation` from a `location.search` string. Unparseable numbers are
    /// ignored.
    pub fn from_query(search: &str) -> Self {
        PageParams {
            theme: get_query_param(search, "theme").unwrap_or_default(),
            image: get_query_param(search, "image").filter(|s| !s.trim().is_empty()),
            options: PuzzleOptions {
                rows: number(search, "rows"),
                cols: number(search, "cols"),
                total_duration_ms: number(search, "duration"),
                minutes: number(search, "minutes"),
                max_rotation_deg: number(search, "rotation"),
                ..PuzzleOptions::default()
            },
        }
    }
}
