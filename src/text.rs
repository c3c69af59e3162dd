use macroquad::{
    color::Color,
    text::{camera_font_scale, draw_text_ex, measure_text, TextDimensions, TextParams},
};

/// A line of text in the built-in font, sized in camera units.
#[derive(Clone, Debug)]
pub struct Text {
    pub value: String,
    pub size: f32,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

impl Text {
    pub fn new(value: impl Into<String>, size: f32) -> Self {
        Self {
            value: value.into(),
            size,
        }
    }

    pub fn measure(&self) -> TextDimensions {
        let (font_size, font_scale, font_aspect) = camera_font_scale(self.size);
        let mut dims = measure_text(&self.value, None, font_size, font_scale);
        dims.width *= font_aspect;
        dims
    }

    /// `y` is the baseline.
    pub fn draw(&self, x: f32, y: f32, align: TextAlign, color: Color) {
        let (font_size, font_scale, font_scale_aspect) = camera_font_scale(self.size);
        let shift = match align {
            TextAlign::Left => 0.0,
            TextAlign::Center => 0.5,
            TextAlign::Right => 1.0,
        };
        let x = if shift > 0.0 {
            x - shift * self.measure().width
        } else {
            x
        };
        draw_text_ex(
            &self.value,
            x,
            y,
            TextParams {
                font_size,
                font_scale,
                font_scale_aspect,
                color,
                ..Default::default()
            },
        );
    }
}

pub fn draw_text_aligned(value: &str, x: f32, y: f32, align: TextAlign, size: f32, color: Color) {
    Text::new(value, size).draw(x, y, align, color);
}

/// Draws `value` with its visual center at (`x`, `y`).
pub fn draw_text_centered(value: &str, x: f32, y: f32, size: f32, color: Color) {
    let text = Text::new(value, size);
    let dims = text.measure();
    text.draw(
        x,
        y - dims.height / 2.0 + dims.offset_y,
        TextAlign::Center,
        color,
    );
}
