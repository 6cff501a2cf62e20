//! # Draftboard Editor
//!
//! Workspace editing core: history, gestures, and the edit session.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ raw pointer/keyboard input                  │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ session: gesture machine + selection        │
//! │  - transient updates during a gesture       │
//! │  - one commit per finished gesture          │
//! │  - defensive recovery after every commit    │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ history: snapshot undo/redo                 │
//! │ broadcast: committed pages → observers      │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **One gesture, one undo step**: transient updates replace the
//!    present state; the commit happens at the gesture boundary
//! 2. **Explicit gesture boundaries**: begin/commit/cancel are calls,
//!    not inferences from event ordering
//! 3. **Local state is authoritative**: observers catch up; they never
//!    roll the session back
//! 4. **No stuck states**: every gesture has a terminal cleanup path

mod errors;
mod gesture;
mod history;
mod session;
mod viewport;

pub use errors::EditorError;
pub use gesture::{dragged_position, resized_rect, Gesture, ResizeHandle};
pub use history::History;
pub use session::{EditEvent, EditSession, KeyCommand};
pub use viewport::Viewport;

// Re-export the document types session callers always need.
pub use draftboard_document::{Document, Element, Mutation, Page, Project};
