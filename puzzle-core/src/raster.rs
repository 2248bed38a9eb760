use tiny_skia::{Color, FilterQuality, Pixmap, PixmapPaint, Transform};

use crate::error::PuzzleError;
use crate::geometry::{Placement, Rect, Size};
use crate::surface::Surface;

/// Software render surface backed by a tiny-skia pixmap. Pieces are
/// separate pixmaps cut from the source.
pub struct PixmapSurface {
    pixmap: Option<Pixmap>,
    background: Color,
}

impl Default for PixmapSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl PixmapSurface {
    pub fn new() -> Self {
        PixmapSurface {
            pixmap: None,
            background: Color::TRANSPARENT,
        }
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }

    /// Current frame, if the surface has been sized and not released.
    pub fn pixmap(&self) -> Option<&Pixmap> {
        self.pixmap.as_ref()
    }

    pub fn is_released(&self) -> bool {
        self.pixmap.is_none()
    }
}

fn paint() -> PixmapPaint {
    PixmapPaint {
        quality: FilterQuality::Bilinear,
        ..PixmapPaint::default()
    }
}

fn alloc(size: Size) -> Result<Pixmap, PuzzleError> {
    let (w, h) = size.to_pixels();
    Pixmap::new(w, h).ok_or_else(|| {
        PuzzleError::RenderSurfaceUnavailable(format!("cannot allocate {w}x{h} pixmap"))
    })
}

impl Surface for PixmapSurface {
    type Image = Pixmap;
    type Bitmap = Pixmap;

    fn image_size(&self, image: &Pixmap) -> Size {
        Size::new(image.width() as f64, image.height() as f64)
    }

    fn resize(&mut self, size: Size) -> Result<(), PuzzleError> {
        self.pixmap = Some(alloc(size)?);
        Ok(())
    }

    fn cut(&mut self, image: &Pixmap, source: Rect, size: Size) -> Result<Pixmap, PuzzleError> {
        let mut bitmap = alloc(size)?;
        let sx = bitmap.width() as f32 / source.width as f32;
        let sy = bitmap.height() as f32 / source.height as f32;
        let transform =
            Transform::from_scale(sx, sy).pre_translate(-source.x as f32, -source.y as f32);
        bitmap.draw_pixmap(0, 0, image.as_ref(), &paint(), transform, None);
        Ok(bitmap)
    }

    fn clear(&mut self) {
        let background = self.background;
        if let Some(pixmap) = self.pixmap.as_mut() {
            pixmap.fill(background);
        }
    }

    fn draw(&mut self, bitmap: &Pixmap, placement: Placement) {
        let Some(target) = self.pixmap.as_mut() else {
            return;
        };
        let sx = (placement.size.width / bitmap.width() as f64) as f32;
        let sy = (placement.size.height / bitmap.height() as f64) as f32;
        let transform = if placement.is_rotated() {
            let c = placement.center();
            Transform::from_translate(c.x as f32, c.y as f32)
                .pre_rotate(placement.rotation as f32)
                .pre_translate(
                    -(placement.size.width / 2.0) as f32,
                    -(placement.size.height / 2.0) as f32,
                )
                .pre_scale(sx, sy)
        } else {
            Transform::from_translate(placement.origin.x as f32, placement.origin.y as f32)
                .pre_scale(sx, sy)
        };
        target.draw_pixmap(0, 0, bitmap.as_ref(), &paint(), transform, None);
    }

    fn release(&mut self) {
        self.pixmap = None;
    }
}

/// Decode a PNG into a pixmap usable as a puzzle source.
pub fn decode_png(bytes: &[u8]) -> Result<Pixmap, PuzzleError> {
    Pixmap::decode_png(bytes).map_err(|e| PuzzleError::ImageResourceUnavailable(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use tiny_skia::Paint;

    fn solid(w: u32, h: u32, rgb: (u8, u8, u8)) -> Pixmap {
        let mut p = Pixmap::new(w, h).unwrap();
        p.fill(Color::from_rgba8(rgb.0, rgb.1, rgb.2, 255));
        p
    }

    #[test]
    fn cut_copies_the_source_cell() {
        let mut image = solid(8, 8, (0, 0, 255));
        let mut paint = Paint::default();
        paint.set_color_rgba8(255, 0, 0, 255);
        let rect = tiny_skia::Rect::from_xywh(4.0, 0.0, 4.0, 4.0).unwrap();
        image.fill_rect(rect, &paint, Transform::identity(), None);

        let mut surface = PixmapSurface::new();
        let cell = surface
            .cut(&image, Rect::new(4.0, 0.0, 4.0, 4.0), Size::new(4.0, 4.0))
            .unwrap();
        assert_eq!(cell.width(), 4);
        let px = cell.pixel(1, 1).unwrap();
        assert!(px.red() > 200 && px.blue() < 50);
    }

    #[test]
    fn unrotated_draw_lands_at_origin() {
        let mut surface = PixmapSurface::new();
        surface.resize(Size::new(10.0, 10.0)).unwrap();
        surface.clear();
        let bitmap = solid(2, 2, (0, 255, 0));
        surface.draw(
            &bitmap,
            Placement::at_rest(Point { x: 6.0, y: 2.0 }, Size::new(2.0, 2.0)),
        );
        let frame = surface.pixmap().unwrap();
        assert!(frame.pixel(6, 2).unwrap().green() > 200);
        assert!(frame.pixel(7, 3).unwrap().green() > 200);
        assert_eq!(frame.pixel(5, 2).unwrap().alpha(), 0);
    }

    #[test]
    fn release_drops_the_frame() {
        let mut surface = PixmapSurface::new();
        surface.resize(Size::new(4.0, 4.0)).unwrap();
        surface.release();
        assert!(surface.is_released());
        surface.clear();
        surface.draw(
            &solid(1, 1, (1, 2, 3)),
            Placement::at_rest(Point::default(), Size::new(1.0, 1.0)),
        );
        assert!(surface.pixmap().is_none());
    }

    #[test]
    fn garbage_bytes_are_an_image_error() {
        let err = decode_png(b"not a png").unwrap_err();
        assert!(matches!(err, PuzzleError::ImageResourceUnavailable(_)));
    }
}
