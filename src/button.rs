use crate::text::draw_text_centered;
use macroquad::{
    color::{self, Color},
    input::{is_mouse_button_down, is_mouse_button_pressed, MouseButton},
    math::{Rect, Vec2},
    shapes::{draw_rectangle, draw_rectangle_lines},
};

#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Debug)]
pub enum ButtonState {
    #[default]
    Up,
    Hover,
    Down,
    Disabled,
}

impl ButtonState {
    pub fn of(rect: Rect, mouse: Vec2, enabled: bool, mouse_down: bool) -> Self {
        if !enabled {
            ButtonState::Disabled
        } else if !rect.contains(mouse) {
            ButtonState::Up
        } else if mouse_down {
            ButtonState::Down
        } else {
            ButtonState::Hover
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct ButtonStyle {
    pub text_color: Color,
    pub fill_color: Color,
    pub border_color: Color,
    pub border_width: f32,
    pub text_size: f32,
}

impl Default for ButtonStyle {
    fn default() -> Self {
        Self {
            text_color: color::WHITE,
            fill_color: color::DARKGRAY,
            border_color: color::GRAY,
            border_width: 2.0,
            text_size: 24.0,
        }
    }
}

impl ButtonStyle {
    pub fn filled(fill_color: Color) -> Self {
        Self {
            fill_color,
            ..Default::default()
        }
    }

    fn fill_for(&self, state: ButtonState) -> Color {
        let Color { r, g, b, a } = self.fill_color;
        match state {
            ButtonState::Up => self.fill_color,
            ButtonState::Hover => Color::new(
                (r * 1.2).min(1.0),
                (g * 1.2).min(1.0),
                (b * 1.2).min(1.0),
                a,
            ),
            ButtonState::Down => Color::new(r * 0.8, g * 0.8, b * 0.8, a),
            ButtonState::Disabled => Color::new(r * 0.6, g * 0.6, b * 0.6, a),
        }
    }
}

/// Immediate-mode button: draws itself and reports a click in one call.
#[derive(Clone, Debug)]
pub struct Button<'a> {
    rect: Rect,
    label: &'a str,
    style: ButtonStyle,
    enabled: bool,
}

impl<'a> Button<'a> {
    pub fn new(rect: Rect, label: &'a str) -> Self {
        Self {
            rect,
            label,
            style: ButtonStyle::default(),
            enabled: true,
        }
    }

    pub fn style(mut self, style: ButtonStyle) -> Self {
        self.style = style;
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// `mouse` must be in the same coordinates as the button rect.
    pub fn ui(&self, mouse: Vec2) -> bool {
        let state = ButtonState::of(
            self.rect,
            mouse,
            self.enabled,
            is_mouse_button_down(MouseButton::Left),
        );
        let rect = self.rect;
        draw_rectangle(rect.x, rect.y, rect.w, rect.h, self.style.fill_for(state));
        if !self.label.is_empty() {
            draw_text_centered(
                self.label,
                rect.center().x,
                rect.center().y,
                self.style.text_size,
                self.style.text_color,
            );
        }
        draw_rectangle_lines(
            rect.x,
            rect.y,
            rect.w,
            rect.h,
            self.style.border_width,
            self.style.border_color,
        );

        state != ButtonState::Disabled
            && state != ButtonState::Up
            && is_mouse_button_pressed(MouseButton::Left)
    }
}
