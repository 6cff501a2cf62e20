//! # Gesture geometry
//!
//! Pure functions and state types for the pointer-driven gestures.
//!
//! Gesture boundaries are explicit: the session calls
//! `EditSession::begin_*` / `pointer_up` / `pointer_cancel` rather than
//! inferring them from raw event sequencing, so a lost pointer-up can
//! never leave the machine stuck mid-gesture.

use draftboard_document::{Rect, MIN_HEIGHT, MIN_WIDTH};
use serde::{Deserialize, Serialize};

/// Corner handles used for resizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeHandle {
    Nw,
    Ne,
    Sw,
    Se,
}

/// The interaction state machine. Exactly one variant is active at a
/// time; entering a new gesture from anything but `Idle` first finishes
/// the previous one.
#[derive(Debug, Clone, PartialEq)]
pub enum Gesture {
    Idle,
    Dragging {
        element_id: String,
        origin: Rect,
        pointer_start: (f32, f32),
    },
    /// Repositioning a page frame on the infinite canvas.
    DraggingFrame {
        page_id: String,
        origin: (f32, f32),
        pointer_start: (f32, f32),
    },
    Resizing {
        element_id: String,
        handle: ResizeHandle,
        origin: Rect,
        pointer_start: (f32, f32),
    },
    EditingText {
        element_id: String,
        buffer: String,
    },
    Panning {
        pointer_start: (f32, f32),
        viewport_origin: (f32, f32),
    },
}

impl Gesture {
    pub fn is_idle(&self) -> bool {
        matches!(self, Gesture::Idle)
    }
}

/// Position for a dragged element: origin plus the canvas-space delta,
/// clamped so the element stays fully inside the page frame.
pub fn dragged_position(origin: &Rect, dx: f32, dy: f32, frame: (f32, f32)) -> (f32, f32) {
    let x = (origin.x + dx).clamp(0.0, (frame.0 - origin.width).max(0.0));
    let y = (origin.y + dy).clamp(0.0, (frame.1 - origin.height).max(0.0));
    (x, y)
}

/// Rect for a resize in progress. Each handle controls which of
/// x/y/width/height move; a west or north handle adjusts the anchor
/// coordinate as well so the opposite edge stays fixed. Sizes are clamped
/// to `[MIN, frame bound]` before the anchor is recomputed, which rules
/// out inverted or negative rects.
pub fn resized_rect(origin: &Rect, handle: ResizeHandle, dx: f32, dy: f32, frame: (f32, f32)) -> Rect {
    let right = origin.x + origin.width;
    let bottom = origin.y + origin.height;

    let (x, width) = match handle {
        ResizeHandle::Nw | ResizeHandle::Sw => {
            let width = (origin.width - dx).clamp(MIN_WIDTH, right.max(MIN_WIDTH));
            (right - width, width)
        }
        ResizeHandle::Ne | ResizeHandle::Se => {
            let max = (frame.0 - origin.x).max(MIN_WIDTH);
            let width = (origin.width + dx).clamp(MIN_WIDTH, max);
            (origin.x, width)
        }
    };

    let (y, height) = match handle {
        ResizeHandle::Nw | ResizeHandle::Ne => {
            let height = (origin.height - dy).clamp(MIN_HEIGHT, bottom.max(MIN_HEIGHT));
            (bottom - height, height)
        }
        ResizeHandle::Sw | ResizeHandle::Se => {
            let max = (frame.1 - origin.y).max(MIN_HEIGHT);
            let height = (origin.height + dy).clamp(MIN_HEIGHT, max);
            (origin.y, height)
        }
    };

    Rect::new(x, y, width, height)
}
