use macroquad::math::{Rect, Vec2};

/// Strict axis-aligned overlap: boxes that only touch do not collide.
pub fn overlaps(a: &Rect, b: &Rect) -> bool {
    a.x < b.x + b.w && a.x + a.w > b.x && a.y < b.y + b.h && a.y + a.h > b.y
}

pub fn in_circle(point: Vec2, center: Vec2, radius: f32) -> bool {
    (point - center).length_squared() <= radius * radius
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touching_boxes_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(overlaps(&a, &Rect::new(5.0, 5.0, 10.0, 10.0)));
        assert!(!overlaps(&a, &Rect::new(10.0, 0.0, 10.0, 10.0)));
        assert!(!overlaps(&a, &Rect::new(0.0, -10.0, 10.0, 10.0)));
        assert!(overlaps(&a, &Rect::new(2.0, 2.0, 1.0, 1.0)));
    }

    #[test]
    fn circle_contains_its_border() {
        let c = Vec2::new(20.0, 20.0);
        assert!(in_circle(Vec2::new(20.0, 0.0), c, 20.0));
        assert!(!in_circle(Vec2::new(0.0, 0.0), c, 20.0));
    }
}
