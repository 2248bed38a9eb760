//! Piece scheduling and animation for a timed picture reveal: an image is cut
//! into a grid, scattered, and put back one piece at a time over a fixed
//! total duration.

pub mod catalog;
pub mod config;
pub mod countdown;
pub mod easing;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod piece;
pub mod raster;
pub mod scale;
pub mod schedule;
pub mod shuffle;
pub mod slicer;
pub mod surface;

pub use catalog::{CatalogImage, ImageCatalog};
pub use config::{PuzzleConfig, PuzzleOptions};
pub use countdown::format_remaining;
pub use engine::{ActivePiece, Engine, Frame, FrameStatus, Phase};
pub use error::PuzzleError;
pub use geometry::{Placement, Point, Rect, Size};
pub use piece::Piece;
pub use raster::PixmapSurface;
pub use schedule::SolvingSchedule;
pub use surface::Surface;
