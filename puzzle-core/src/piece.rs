use crate::easing::lerp;
use crate::geometry::{Placement, Point, Size};

/// One rectangular cell of the sliced image.
///
/// While unsolved the piece sits at its scattered transform; once `solved`
/// is set it is always drawn at `home` with no rotation, whatever the stored
/// position says.
#[derive(Clone, Debug)]
pub struct Piece<B> {
    pub row: u32,
    pub col: u32,
    home: Point,
    pub position: Point,
    size: Size,
    /// Degrees.
    pub rotation: f64,
    solved: bool,
    bitmap: B,
}

impl<B> Piece<B> {
    pub fn new(row: u32, col: u32, home: Point, size: Size, bitmap: B) -> Self {
        Piece {
            row,
            col,
            home,
            position: home,
            size,
            rotation: 0.0,
            solved: false,
            bitmap,
        }
    }

    pub fn home(&self) -> Point {
        self.home
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn bitmap(&self) -> &B {
        &self.bitmap
    }

    pub fn is_solved(&self) -> bool {
        self.solved
    }

    /// Latch the piece at home. There is no way back.
    pub fn solve(&mut self) {
        self.solved = true;
        self.position = self.home;
        self.rotation = 0.0;
    }

    /// Transform used by the general draw pass.
    pub fn placement(&self) -> Placement {
        if self.solved {
            Placement::at_rest(self.home, self.size)
        } else {
            Placement {
                origin: self.position,
                size: self.size,
                rotation: self.rotation,
            }
        }
    }

    /// Transform `t` of the way from the scattered pose to home. The stored
    /// pose is left alone.
    pub fn placement_toward_home(&self, t: f64) -> Placement {
        if self.solved {
            return Placement::at_rest(self.home, self.size);
        }
        Placement {
            origin: Point {
                x: lerp(self.position.x, self.home.x, t),
                y: lerp(self.position.y, self.home.y, t),
            },
            size: self.size,
            rotation: lerp(self.rotation, 0.0, t),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scattered() -> Piece<()> {
        let mut p = Piece::new(0, 1, Point { x: 100.0, y: 0.0 }, Size::new(50.0, 40.0), ());
        p.position = Point { x: -100.0, y: 200.0 };
        p.rotation = 30.0;
        p
    }

    #[test]
    fn halfway_placement_is_midpoint() {
        let p = scattered();
        let mid = p.placement_toward_home(0.5);
        assert_eq!(mid.origin, Point { x: 0.0, y: 100.0 });
        assert_eq!(mid.rotation, 15.0);
        assert_eq!(p.placement_toward_home(1.0).origin, p.home());
        assert_eq!(p.placement_toward_home(0.0), p.placement());
    }

    #[test]
    fn solved_piece_ignores_stored_pose() {
        let mut p = scattered();
        p.solve();
        p.position = Point { x: 999.0, y: 999.0 };
        p.rotation = 12.0;
        assert!(p.is_solved());
        assert_eq!(p.placement(), Placement::at_rest(p.home(), p.size()));
        assert_eq!(p.placement_toward_home(0.3).rotation, 0.0);
    }
}
