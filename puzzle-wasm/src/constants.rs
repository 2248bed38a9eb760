//! Page-level constants shared by the bootstrap and the surface.

/// Element the page bootstrap fills when it is present.
pub const AUTO_CONTAINER_ID: &str = "puzzle";
/// Catalog of themed images, relative to the asset base URL.
pub const CATALOG_PATH: &str = "images.json";
/// CSS hooks; styling itself lives in the host page.
pub const CANVAS_CLASS: &str = "puzzle-canvas";
pub const COUNTDOWN_CLASS: &str = "puzzle-countdown";
