/// Terminal failures surfaced to whoever builds a puzzle. Nothing here is
/// retried internally.
#[derive(Debug, thiserror::Error)]
pub enum PuzzleError {
    #[error("render surface unavailable: {0}")]
    RenderSurfaceUnavailable(String),
    #[error("image resource unavailable: {0}")]
    ImageResourceUnavailable(String),
    #[error("image catalog unreadable: {0}")]
    Catalog(String),
}

impl From<serde_json::Error> for PuzzleError {
    fn from(e: serde_json::Error) -> Self {
        PuzzleError::Catalog(e.to_string())
    }
}
