//! # Draftboard Document
//!
//! Core document model for Draftboard editing.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ model: Project / Page / Element entities    │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ document: lookup, cascade, cycle checks     │
//! │ mutations: validated semantic operations    │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ geometry: relative → absolute rects,        │
//! │           hit-testing over draft overlays   │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Ids, not pointers**: `parent_id` is a non-owning back-reference. A
//!    Page owns its Elements as a flat list; the parent graph exists only
//!    for geometry and hit-testing and tolerates dangling references.
//! 2. **Mutations are validated**: every operation checks structural
//!    constraints before touching the document.
//! 3. **Snapshots are cheap to take**: the whole document is `Clone` +
//!    `PartialEq` so history can work over full-state snapshots.
//! 4. **Repair over rejection**: partially broken documents are repaired
//!    or tolerated, never refused.

mod document;
mod geometry;
mod id;
mod model;
mod mutations;
mod repair;

pub use document::{clone_subtree_with_new_ids, Document};
pub use geometry::{absolute_rect, authoritative_rect, hit_test, DraftRects, Rect};
pub use id::{element_id, page_id, project_id};
pub use model::{
    Element, ElementType, Page, Platform, Project, Style, MIN_HEIGHT, MIN_WIDTH, PASTE_OFFSET,
};
pub use mutations::{Mutation, MutationError};
pub use repair::ensure_text_shadow_children;
