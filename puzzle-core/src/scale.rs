use crate::geometry::Size;

/// Uniform factor that fits `image` inside `max_box` without enlarging it.
///
/// Zero-sized images are the caller's problem.
pub fn scale_factor(image: Size, max_box: Size) -> f64 {
    (max_box.width / image.width)
        .min(max_box.height / image.height)
        .min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn never_upscales() {
        assert_eq!(scale_factor(Size::new(100.0, 50.0), Size::new(1000.0, 1000.0)), 1.0);
    }

    #[test]
    fn tighter_axis_wins() {
        let s = scale_factor(Size::new(2000.0, 1000.0), Size::new(1000.0, 800.0));
        assert_eq!(s, 0.5);
        let s = scale_factor(Size::new(1000.0, 2000.0), Size::new(1000.0, 800.0));
        assert_eq!(s, 0.4);
    }

    #[test]
    fn scaled_image_stays_inside_box() {
        let boxes = [(640.0, 480.0), (300.0, 900.0), (1920.0, 1080.0), (33.0, 17.0)];
        let images = [(4000.0, 3000.0), (123.0, 4567.0), (800.0, 800.0), (16.0, 9.0)];
        for (bw, bh) in boxes {
            for (iw, ih) in images {
                let s = scale_factor(Size::new(iw, ih), Size::new(bw, bh));
                assert!(s > 0.0 && s <= 1.0);
                assert!(iw * s <= bw + 1e-9);
                assert!(ih * s <= bh + 1e-9);
            }
        }
    }
}
