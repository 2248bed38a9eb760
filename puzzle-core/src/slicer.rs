use crate::error::PuzzleError;
use crate::geometry::{Point, Rect, Size};
use crate::piece::Piece;
use crate::surface::Surface;

/// Geometry of one grid cell before any pixels are touched.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridCell {
    pub row: u32,
    pub col: u32,
    /// Cell rectangle in the unscaled source image.
    pub source: Rect,
    /// Cell rectangle in the solved, scaled layout.
    pub home: Rect,
}

/// Row-major cells of a `rows`×`cols` grid over `image` scaled by `scale`.
/// The enumeration order is the piece index space used everywhere else.
pub fn grid_cells(image: Size, scale: f64, rows: u32, cols: u32) -> Vec<GridCell> {
    let src_w = image.width / cols as f64;
    let src_h = image.height / rows as f64;
    let dst_w = src_w * scale;
    let dst_h = src_h * scale;
    let mut cells = Vec::with_capacity(rows as usize * cols as usize);
    for row in 0..rows {
        for col in 0..cols {
            cells.push(GridCell {
                row,
                col,
                source: Rect::new(col as f64 * src_w, row as f64 * src_h, src_w, src_h),
                home: Rect::new(col as f64 * dst_w, row as f64 * dst_h, dst_w, dst_h),
            });
        }
    }
    cells
}

/// Cut every cell out of `image` into its own bitmap.
pub fn slice_pieces<S: Surface>(
    surface: &mut S,
    image: &S::Image,
    cells: &[GridCell],
) -> Result<Vec<Piece<S::Bitmap>>, PuzzleError> {
    cells
        .iter()
        .map(|cell| {
            let bitmap = surface.cut(image, cell.source, cell.home.size())?;
            Ok(Piece::new(
                cell.row,
                cell.col,
                Point {
                    x: cell.home.x,
                    y: cell.home.y,
                },
                cell.home.size(),
                bitmap,
            ))
        })
        .collect()
}
