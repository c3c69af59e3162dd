use macroquad::{
    camera::{set_camera, set_default_camera, Camera2D},
    input::mouse_position,
    math::{Rect, Vec2},
    miniquad::window::screen_size,
};

/// Fixed logical drawing area scaled to fit the window.
///
/// Game rules work in playfield units; only this type knows about pixels.
#[derive(Clone, Copy, Debug)]
pub struct Playfield {
    bounds: Rect,
}

impl Playfield {
    pub fn new(bounds: Rect) -> Self {
        Self { bounds }
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Pixels per playfield unit.
    pub fn scale(&self, viewport: Vec2) -> f32 {
        (viewport / self.bounds.size()).min_element()
    }

    pub fn camera(&self, viewport: Vec2) -> Camera2D {
        Camera2D {
            zoom: 2.0 * viewport.recip() * self.scale(viewport),
            target: self.bounds.center(),
            ..Default::default()
        }
    }

    /// Sets the camera for this frame and returns the mouse in playfield units.
    pub fn begin(&self) -> Vec2 {
        let camera = self.camera(Vec2::from(screen_size()));
        set_camera(&camera);
        camera.screen_to_world(Vec2::from(mouse_position()))
    }

    pub fn end(&self) {
        // Workaround to reset viewport
        set_camera(&Camera2D::default());

        set_default_camera();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn scale_fits_shortest_side() {
        let field = Playfield::new(Rect::new(0.0, 0.0, 800.0, 600.0));
        assert_abs_diff_eq!(field.scale(Vec2::new(1600.0, 600.0)), 1.0);
        assert_abs_diff_eq!(field.scale(Vec2::new(1600.0, 1200.0)), 2.0);
    }

    #[test]
    fn camera_maps_window_center_to_field_center() {
        let field = Playfield::new(Rect::new(0.0, -60.0, 800.0, 660.0));
        let camera = field.camera(Vec2::new(1280.0, 720.0));
        assert_eq!(camera.target, Vec2::new(400.0, 270.0));
    }
}
