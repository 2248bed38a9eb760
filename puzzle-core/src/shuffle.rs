use rand::Rng;

use crate::geometry::{Point, Size};
use crate::piece::Piece;

/// How far past each canvas edge a scattered piece may start, as a share of
/// the canvas extent.
pub const SCATTER_MARGIN: f64 = 0.25;

/// Give every piece an independent random position and rotation. Positions
/// come from the canvas grown by [`SCATTER_MARGIN`] on every side, so pieces
/// may start partly or fully off-screen.
pub fn scatter<B, R: Rng + ?Sized>(
    pieces: &mut [Piece<B>],
    canvas: Size,
    max_rotation: f64,
    rng: &mut R,
) {
    let max_rotation = max_rotation.abs();
    let x_range = -SCATTER_MARGIN * canvas.width..(1.0 + SCATTER_MARGIN) * canvas.width;
    let y_range = -SCATTER_MARGIN * canvas.height..(1.0 + SCATTER_MARGIN) * canvas.height;
    for piece in pieces.iter_mut() {
        piece.position = Point {
            x: rng.gen_range(x_range.clone()),
            y: rng.gen_range(y_range.clone()),
        };
        piece.rotation = rng.gen_range(-max_rotation..=max_rotation);
    }
}
