//! Camera state over the infinite project canvas.
//!
//! Pure view state: panning and zooming never touch any element or page.

use serde::{Deserialize, Serialize};

const MIN_SCALE: f32 = 0.1;
const MAX_SCALE: f32 = 4.0;

/// Pan offset (screen pixels) and zoom scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub scale: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            scale: 1.0,
        }
    }
}

impl Viewport {
    /// Screen coordinates → canvas coordinates.
    pub fn to_canvas(&self, screen_x: f32, screen_y: f32) -> (f32, f32) {
        ((screen_x - self.x) / self.scale, (screen_y - self.y) / self.scale)
    }

    /// Pan by a screen-pixel delta. Unbounded.
    pub fn pan_by(&mut self, dx: f32, dy: f32) {
        self.x += dx;
        self.y += dy;
    }

    pub fn set_scale(&mut self, scale: f32) {
        self.scale = scale.clamp(MIN_SCALE, MAX_SCALE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_canvas_inverts_pan_and_zoom() {
        let viewport = Viewport {
            x: 100.0,
            y: 50.0,
            scale: 2.0,
        };
        assert_eq!(viewport.to_canvas(300.0, 250.0), (100.0, 100.0));
    }

    #[test]
    fn test_scale_is_clamped() {
        let mut viewport = Viewport::default();
        viewport.set_scale(100.0);
        assert_eq!(viewport.scale, 4.0);
        viewport.set_scale(0.0);
        assert_eq!(viewport.scale, 0.1);
    }
}
