use crate::error::PuzzleError;
use crate::geometry::{Placement, Rect, Size};

/// A drawable area the engine owns for the length of one run, together with
/// the bitmap type it can cut out of a source image.
pub trait Surface {
    /// Decoded source image as the host loaded it.
    type Image;
    /// Independently owned sub-image of one grid cell.
    type Bitmap;

    fn image_size(&self, image: &Self::Image) -> Size;

    /// Set the drawable area to the scaled puzzle extent.
    fn resize(&mut self, size: Size) -> Result<(), PuzzleError>;

    /// Resample the unscaled `source` rectangle of `image` into a fresh bitmap
    /// of `size` pixels.
    fn cut(
        &mut self,
        image: &Self::Image,
        source: Rect,
        size: Size,
    ) -> Result<Self::Bitmap, PuzzleError>;

    fn clear(&mut self);

    /// Draw `bitmap` stretched to `placement.size`. A non-zero rotation turns
    /// it about the placement's center.
    fn draw(&mut self, bitmap: &Self::Bitmap, placement: Placement);

    /// Let go of the drawable area. Nothing is drawn afterwards.
    fn release(&mut self);
}
