use serde::{Deserialize, Serialize};

/// Basic two dimensional point in canvas pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl From<(f64, f64)> for Point {
    fn from(v: (f64, f64)) -> Self {
        Point { x: v.0, y: v.1 }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Size { width, height }
    }

    pub fn scaled(self, factor: f64) -> Self {
        Size {
            width: self.width * factor,
            height: self.height * factor,
        }
    }

    /// Whole-pixel extent used when allocating backing stores.
    pub fn to_pixels(self) -> (u32, u32) {
        (
            self.width.round().max(1.0) as u32,
            self.height.round().max(1.0) as u32,
        )
    }
}

/// Axis-aligned rectangle given by its top-left corner and extent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Rect {
            x,
            y,
            width,
            height,
        }
    }

    pub fn origin(&self) -> Point {
        Point {
            x: self.x,
            y: self.y,
        }
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Area shared with `other`; zero for rectangles that only touch.
    pub fn overlap_area(&self, other: &Rect) -> f64 {
        let w = self.right().min(other.right()) - self.x.max(other.x);
        let h = self.bottom().min(other.bottom()) - self.y.max(other.y);
        if w <= 0.0 || h <= 0.0 { 0.0 } else { w * h }
    }
}

/// Where and how a bitmap lands on the render surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    pub origin: Point,
    pub size: Size,
    /// Degrees, applied about the placement's own center.
    pub rotation: f64,
}

impl Placement {
    pub fn at_rest(origin: Point, size: Size) -> Self {
        Placement {
            origin,
            size,
            rotation: 0.0,
        }
    }

    pub fn center(&self) -> Point {
        Point {
            x: self.origin.x + self.size.width / 2.0,
            y: self.origin.y + self.size.height / 2.0,
        }
    }

    pub fn is_rotated(&self) -> bool {
        self.rotation != 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touching_rects_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert_eq!(a.overlap_area(&b), 0.0);
        let c = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert_eq!(a.overlap_area(&c), 25.0);
    }

    #[test]
    fn placement_center_is_mid_rect() {
        let p = Placement::at_rest(Point { x: 10.0, y: 20.0 }, Size::new(30.0, 40.0));
        assert_eq!(p.center(), Point { x: 25.0, y: 40.0 });
        assert!(!p.is_rotated());
    }
}
