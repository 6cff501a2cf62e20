//! # Edit Session
//!
//! One user's live editing state: the document history, camera, active
//! project/page, selection, clipboard, and the pointer-driven gesture
//! machine.
//!
//! All mutation runs synchronously through this type, so the in-memory
//! document is only ever touched from one logical thread. Committed page
//! changes fan out to subscribers (the synchronization layer) over
//! channels: input, mutate, commit, broadcast.
//!
//! ## Gesture discipline
//!
//! - `begin_*` snapshots the pre-gesture document
//! - pointer-move applies transient mutations (`set_present`) and mirrors
//!   the in-flight rect into the draft side table
//! - pointer-up restores the snapshot and commits the final state, so a
//!   whole gesture is exactly one undo step
//! - pointer-cancel restores the snapshot and discards everything

use crate::errors::EditorError;
use crate::gesture::{dragged_position, resized_rect, Gesture, ResizeHandle};
use crate::history::History;
use crate::viewport::Viewport;
use draftboard_document::{
    clone_subtree_with_new_ids, hit_test, Document, DraftRects, Element, Mutation, MutationError,
    Page, Rect, PASTE_OFFSET,
};
use tokio::sync::mpsc;

/// Keyboard surface within the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    Copy,
    Paste,
    Delete,
    Backspace,
    Escape,
}

/// Event broadcast to observers after a committed change.
#[derive(Debug, Clone)]
pub enum EditEvent {
    /// A page's committed state changed; carries the full page.
    PageCommitted { page: Page },
}

pub struct EditSession {
    history: History<Document>,
    viewport: Viewport,

    active_project_id: Option<String>,
    active_page_id: Option<String>,
    selection: Option<String>,
    context_menu_open: bool,

    gesture: Gesture,
    /// Committed state captured at gesture start, restored on cancel.
    gesture_base: Option<Document>,
    drafts: DraftRects,

    clipboard: Option<Vec<Element>>,

    subscribers: Vec<mpsc::UnboundedSender<EditEvent>>,
}

impl EditSession {
    /// Create a session over a freshly loaded document. Runs the repair
    /// pass and activates the first project/page.
    pub fn new(mut document: Document) -> Self {
        document.repair();
        let mut session = Self::from_parts(document, None, None, Viewport::default());
        session.reconcile();
        session
    }

    /// Restore a session from persisted parts (e.g. a local snapshot).
    pub fn from_parts(
        document: Document,
        active_project_id: Option<String>,
        active_page_id: Option<String>,
        viewport: Viewport,
    ) -> Self {
        let mut session = Self {
            history: History::new(document),
            viewport,
            active_project_id,
            active_page_id,
            selection: None,
            context_menu_open: false,
            gesture: Gesture::Idle,
            gesture_base: None,
            drafts: DraftRects::new(),
            clipboard: None,
            subscribers: Vec::new(),
        };
        session.reconcile();
        session
    }

    // ---- accessors -------------------------------------------------------

    pub fn document(&self) -> &Document {
        self.history.present()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    pub fn drafts(&self) -> &DraftRects {
        &self.drafts
    }

    pub fn selection(&self) -> Option<&str> {
        self.selection.as_deref()
    }

    pub fn active_project_id(&self) -> Option<&str> {
        self.active_project_id.as_deref()
    }

    pub fn active_page_id(&self) -> Option<&str> {
        self.active_page_id.as_deref()
    }

    pub fn active_page(&self) -> Option<&Page> {
        let id = self.active_page_id.as_deref()?;
        self.document().find_page(id)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn context_menu_open(&self) -> bool {
        self.context_menu_open
    }

    /// Subscribe to committed-change events. Closed receivers are pruned
    /// on the next broadcast.
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<EditEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.push(tx);
        rx
    }

    // ---- committed / transient plumbing ----------------------------------

    /// Apply one mutation as a single undo step and broadcast the pages
    /// it changed.
    pub fn apply_committed(&mut self, mutation: Mutation) -> Result<(), EditorError> {
        let before = self.history.present().clone();
        let mut next = before.clone();
        mutation.apply(&mut next)?;
        self.history.commit(next);
        self.reconcile();
        self.broadcast_changed_pages(&before);
        Ok(())
    }

    /// Apply one mutation without creating an undo step.
    fn apply_transient(&mut self, mutation: Mutation) -> Result<(), EditorError> {
        let mut next = self.history.present().clone();
        mutation.apply(&mut next)?;
        self.history.set_present(next);
        Ok(())
    }

    pub fn undo(&mut self) -> bool {
        self.finish_gesture();
        let before = self.history.present().clone();
        let undone = self.history.undo();
        if undone {
            self.reconcile();
            self.broadcast_changed_pages(&before);
        }
        undone
    }

    pub fn redo(&mut self) -> bool {
        self.finish_gesture();
        let before = self.history.present().clone();
        let redone = self.history.redo();
        if redone {
            self.reconcile();
            self.broadcast_changed_pages(&before);
        }
        redone
    }

    // ---- navigation ------------------------------------------------------

    /// Switch the active page. Clears selection; any gesture finishes
    /// first.
    pub fn set_active_page(&mut self, page_id: &str) {
        self.finish_gesture();
        if self.document().find_page(page_id).is_some() {
            self.active_page_id = Some(page_id.to_string());
            self.selection = None;
            self.reconcile();
        }
    }

    pub fn set_active_project(&mut self, project_id: &str) {
        self.finish_gesture();
        if self.document().find_project(project_id).is_some() {
            let first_page = self
                .document()
                .project_pages(project_id)
                .next()
                .map(|p| p.id.clone());
            self.active_project_id = Some(project_id.to_string());
            self.active_page_id = first_page;
            self.selection = None;
            self.reconcile();
        }
    }

    pub fn select(&mut self, element_id: Option<&str>) {
        self.selection = element_id.map(str::to_string);
        self.reconcile();
    }

    pub fn open_context_menu(&mut self) {
        self.context_menu_open = true;
    }

    // ---- pointer surface -------------------------------------------------

    /// Pointer-down in screen coordinates. Hit-testing precedence:
    /// element > page frame > empty canvas (pan).
    pub fn pointer_down(&mut self, sx: f32, sy: f32) {
        self.finish_gesture();

        let (cx, cy) = self.viewport.to_canvas(sx, sy);
        let Some(hit) = self.hit_page(cx, cy) else {
            self.selection = None;
            self.gesture = Gesture::Panning {
                pointer_start: (sx, sy),
                viewport_origin: (self.viewport.x, self.viewport.y),
            };
            return;
        };

        if hit.page_id != self.active_page_id.as_deref().unwrap_or_default() {
            self.active_page_id = Some(hit.page_id.clone());
            self.selection = None;
        }

        let page = match self.document().find_page(&hit.page_id) {
            Some(page) => page,
            None => return,
        };
        match hit_test(page, cx - page.canvas_x, cy - page.canvas_y, &self.drafts) {
            Some(el) => {
                let element_id = el.id.clone();
                let origin = el.rect();
                self.selection = Some(element_id.clone());
                self.gesture_base = Some(self.history.present().clone());
                self.gesture = Gesture::Dragging {
                    element_id,
                    origin,
                    pointer_start: (sx, sy),
                };
            }
            None => {
                // Empty space inside the frame: reposition the frame.
                let page_id = page.id.clone();
                let origin = (page.canvas_x, page.canvas_y);
                self.selection = None;
                self.gesture_base = Some(self.history.present().clone());
                self.gesture = Gesture::DraggingFrame {
                    page_id,
                    origin,
                    pointer_start: (sx, sy),
                };
            }
        }
    }

    /// Begin a corner resize. The shell calls this when pointer-down
    /// lands on a selection handle instead of the element body.
    pub fn begin_resize(&mut self, element_id: &str, handle: ResizeHandle, sx: f32, sy: f32) {
        self.finish_gesture();
        let Some(origin) = self
            .active_page()
            .and_then(|p| p.find_element(element_id))
            .filter(|e| e.is_selectable())
            .map(|e| e.rect())
        else {
            return;
        };

        self.selection = Some(element_id.to_string());
        self.gesture_base = Some(self.history.present().clone());
        self.gesture = Gesture::Resizing {
            element_id: element_id.to_string(),
            handle,
            origin,
            pointer_start: (sx, sy),
        };
    }

    pub fn pointer_move(&mut self, sx: f32, sy: f32) {
        match self.gesture.clone() {
            Gesture::Dragging {
                element_id,
                origin,
                pointer_start,
            } => {
                let dx = (sx - pointer_start.0) / self.viewport.scale;
                let dy = (sy - pointer_start.1) / self.viewport.scale;

                let Some(page_id) = self.active_page_id.clone() else {
                    return;
                };
                let (x, y) = dragged_position(&origin, dx, dy, self.frame_size());
                let applied = self.apply_transient(Mutation::MoveElement {
                    page_id,
                    element_id: element_id.clone(),
                    x,
                    y,
                });
                if applied.is_ok() {
                    self.drafts
                        .set(element_id, Rect::new(x, y, origin.width, origin.height));
                }
            }

            Gesture::DraggingFrame {
                page_id,
                origin,
                pointer_start,
            } => {
                // Frame moves are unbounded on the infinite canvas.
                let dx = (sx - pointer_start.0) / self.viewport.scale;
                let dy = (sy - pointer_start.1) / self.viewport.scale;
                let _ = self.apply_transient(Mutation::MovePageFrame {
                    page_id,
                    canvas_x: origin.0 + dx,
                    canvas_y: origin.1 + dy,
                });
            }

            Gesture::Resizing {
                element_id,
                handle,
                origin,
                pointer_start,
            } => {
                let dx = (sx - pointer_start.0) / self.viewport.scale;
                let dy = (sy - pointer_start.1) / self.viewport.scale;
                let rect = resized_rect(&origin, handle, dx, dy, self.frame_size());

                let Some(page_id) = self.active_page_id.clone() else {
                    return;
                };
                let applied = self.apply_transient(Mutation::ResizeElement {
                    page_id,
                    element_id: element_id.clone(),
                    rect,
                });
                if applied.is_ok() {
                    self.drafts.set(element_id, rect);
                }
            }

            Gesture::Panning {
                pointer_start,
                viewport_origin,
            } => {
                self.viewport.x = viewport_origin.0 + (sx - pointer_start.0);
                self.viewport.y = viewport_origin.1 + (sy - pointer_start.1);
            }

            Gesture::EditingText { .. } | Gesture::Idle => {}
        }
    }

    pub fn pointer_up(&mut self, _sx: f32, _sy: f32) {
        match std::mem::replace(&mut self.gesture, Gesture::Idle) {
            Gesture::Dragging { .. } | Gesture::DraggingFrame { .. } | Gesture::Resizing { .. } => {
                self.commit_gesture();
            }
            Gesture::Panning { .. } => {}
            editing @ Gesture::EditingText { .. } => {
                // Text editing is not pointer-owned; keep it running.
                self.gesture = editing;
            }
            Gesture::Idle => {}
        }
    }

    /// Terminal cleanup for an orphaned pointer sequence (focus loss,
    /// pointercancel). Reverts to the pre-gesture committed state.
    pub fn pointer_cancel(&mut self) {
        match self.gesture {
            Gesture::Dragging { .. }
            | Gesture::DraggingFrame { .. }
            | Gesture::Resizing { .. }
            | Gesture::Panning { .. } => {
                if let Some(base) = self.gesture_base.take() {
                    self.history.set_present(base);
                }
                self.drafts.clear();
                self.gesture = Gesture::Idle;
                self.reconcile();
            }
            Gesture::EditingText { .. } | Gesture::Idle => {}
        }
    }

    /// Double-click enters inline text editing on text-family elements.
    pub fn double_click(&mut self, sx: f32, sy: f32) {
        self.finish_gesture();

        let (cx, cy) = self.viewport.to_canvas(sx, sy);
        let Some(page) = self.active_page() else {
            return;
        };
        let hit = hit_test(page, cx - page.canvas_x, cy - page.canvas_y, &self.drafts)
            .filter(|el| el.element_type.is_text())
            .map(|el| {
                let buffer = el.content.clone().unwrap_or_else(|| el.label.clone());
                (el.id.clone(), buffer)
            });
        let Some((element_id, buffer)) = hit else {
            return;
        };

        self.selection = Some(element_id.clone());
        self.gesture = Gesture::EditingText { element_id, buffer };
    }

    /// Replace the scratch buffer of the active text edit. Keystrokes
    /// never touch history.
    pub fn text_input(&mut self, text: &str) {
        if let Gesture::EditingText { buffer, .. } = &mut self.gesture {
            *buffer = text.to_string();
        }
    }

    /// Blur commits the buffered content as one history step.
    pub fn blur(&mut self) {
        self.finish_text_edit();
    }

    // ---- keyboard surface ------------------------------------------------

    /// Handle a canvas-level keyboard command. Returns true if consumed.
    pub fn key(&mut self, command: KeyCommand) -> bool {
        match command {
            KeyCommand::Escape => {
                // Escape is consumed by the text edit (or the context
                // menu) and must never fall through to delete.
                if matches!(self.gesture, Gesture::EditingText { .. }) {
                    self.finish_text_edit();
                    return true;
                }
                if self.context_menu_open {
                    self.context_menu_open = false;
                    return true;
                }
                false
            }

            KeyCommand::Delete | KeyCommand::Backspace => {
                if !self.gesture.is_idle() {
                    return false;
                }
                let (Some(page_id), Some(element_id)) =
                    (self.active_page_id.clone(), self.selection.clone())
                else {
                    return false;
                };
                self.apply_committed(Mutation::RemoveElement {
                    page_id,
                    element_id,
                })
                .is_ok()
            }

            KeyCommand::Copy => self.copy_selection(),
            KeyCommand::Paste => self.paste(),
        }
    }

    /// Snapshot the selected element's subtree into the clipboard.
    pub fn copy_selection(&mut self) -> bool {
        let (Some(page), Some(element_id)) = (self.active_page(), self.selection.clone()) else {
            return false;
        };
        let ids = page.subtree_ids(&element_id);
        let subtree: Vec<Element> = page
            .elements
            .iter()
            .filter(|e| ids.contains(&e.id))
            .cloned()
            .collect();
        if subtree.is_empty() {
            return false;
        }
        self.clipboard = Some(subtree);
        true
    }

    /// Paste the clipboard as fresh elements at a fixed offset, clamped
    /// to frame bounds. One undo step regardless of subtree size.
    pub fn paste(&mut self) -> bool {
        let Some(snapshot) = self.clipboard.clone() else {
            return false;
        };
        let Some(page_id) = self.active_page_id.clone() else {
            return false;
        };

        let frame = self.frame_size();
        let mut copies = clone_subtree_with_new_ids(&snapshot);
        // The root is the copy whose parent fell outside the subtree,
        // not necessarily the first in document order.
        let mut pasted_root = None;
        if let Some(root) = copies.iter_mut().find(|e| e.parent_id.is_none()) {
            root.x = (root.x + PASTE_OFFSET).clamp(0.0, (frame.0 - root.width).max(0.0));
            root.y = (root.y + PASTE_OFFSET).clamp(0.0, (frame.1 - root.height).max(0.0));
            pasted_root = Some(root.id.clone());
        }

        let before = self.history.present().clone();
        let mut next = before.clone();
        for element in copies {
            let inserted = Mutation::InsertElement {
                page_id: page_id.clone(),
                element,
            }
            .apply(&mut next);
            if inserted.is_err() {
                return false;
            }
        }
        self.history.commit(next);
        self.selection = pasted_root;
        self.reconcile();
        self.broadcast_changed_pages(&before);
        true
    }

    // ---- generation ------------------------------------------------------

    /// Merge a generated layout into a page as a single atomic commit:
    /// replace-all elements (repaired) plus the generation metadata.
    pub fn apply_generated_layout(
        &mut self,
        page_id: &str,
        elements: Vec<Element>,
        prompt: String,
        explanation: String,
        mvp_prompt: String,
        json_outline: String,
    ) -> Result<(), EditorError> {
        let before = self.history.present().clone();
        let mut next = before.clone();

        Mutation::ReplaceElements {
            page_id: page_id.to_string(),
            elements,
        }
        .apply(&mut next)?;
        Mutation::SetPageDetails {
            page_id: page_id.to_string(),
            prompt: Some(prompt),
            explanation: Some(explanation),
            mvp_prompt: Some(mvp_prompt),
            json_outline: Some(json_outline),
        }
        .apply(&mut next)?;

        self.history.commit(next);
        self.reconcile();
        self.broadcast_changed_pages(&before);
        Ok(())
    }

    // ---- internals -------------------------------------------------------

    fn frame_size(&self) -> (f32, f32) {
        self.active_page_id
            .as_deref()
            .and_then(|id| self.document().page_project(id))
            .map(|p| p.platform)
            .unwrap_or_default()
            .frame_size()
    }

    /// Topmost page frame of the active project containing a canvas
    /// point.
    fn hit_page(&self, cx: f32, cy: f32) -> Option<PageHit> {
        let project_id = self.active_project_id.as_deref()?;
        let project = self.document().find_project(project_id)?;
        let (fw, fh) = project.platform.frame_size();

        self.document()
            .project_pages(project_id)
            .filter(|page| {
                cx >= page.canvas_x
                    && cx <= page.canvas_x + fw
                    && cy >= page.canvas_y
                    && cy <= page.canvas_y + fh
            })
            .last()
            .map(|page| PageHit {
                page_id: page.id.clone(),
            })
    }

    /// Finish whatever is active so a new gesture can start from Idle.
    /// Text edits commit their buffer; pointer gestures commit their
    /// current state.
    fn finish_gesture(&mut self) {
        match self.gesture {
            Gesture::EditingText { .. } => self.finish_text_edit(),
            Gesture::Dragging { .. } | Gesture::DraggingFrame { .. } | Gesture::Resizing { .. } => {
                self.gesture = Gesture::Idle;
                self.commit_gesture();
            }
            Gesture::Panning { .. } => self.gesture = Gesture::Idle,
            Gesture::Idle => {}
        }
    }

    /// Turn the transient gesture state into exactly one undo step.
    fn commit_gesture(&mut self) {
        self.drafts.clear();
        let Some(base) = self.gesture_base.take() else {
            return;
        };
        let final_state = self.history.present().clone();
        let before = base.clone();
        self.history.set_present(base);
        self.history.commit(final_state);
        self.reconcile();
        self.broadcast_changed_pages(&before);
    }

    fn finish_text_edit(&mut self) {
        let Gesture::EditingText { element_id, buffer } =
            std::mem::replace(&mut self.gesture, Gesture::Idle)
        else {
            return;
        };
        let Some(page_id) = self.active_page_id.clone() else {
            return;
        };

        let result = self.apply_committed(Mutation::SetContent {
            page_id,
            element_id,
            content: buffer,
        });
        // The element may have vanished under the edit; dropping the
        // buffer is the defensive recovery.
        if let Err(EditorError::Mutation(MutationError::ElementNotFound(id))) = result {
            tracing::debug!(element = %id, "text edit target disappeared, buffer dropped");
        }
    }

    /// Defensive recovery after any committed change: active project and
    /// page fall back to the first remaining sibling, and a selection
    /// referencing a removed element is cleared.
    fn reconcile(&mut self) {
        let doc = self.history.present();

        let project_ok = self
            .active_project_id
            .as_deref()
            .is_some_and(|id| doc.find_project(id).is_some());
        if !project_ok {
            self.active_project_id = doc.projects.first().map(|p| p.id.clone());
        }

        let active_project = self.active_project_id.clone();
        let page_ok = self.active_page_id.as_deref().is_some_and(|id| {
            doc.find_page(id)
                .is_some_and(|p| Some(&p.project_id) == active_project.as_ref())
        });
        if !page_ok {
            self.active_page_id = active_project
                .as_deref()
                .and_then(|pid| doc.project_pages(pid).next())
                .map(|p| p.id.clone());
        }

        let selection_ok = match (self.selection.as_deref(), self.active_page_id.as_deref()) {
            (Some(sel), Some(page_id)) => doc
                .find_page(page_id)
                .is_some_and(|p| p.find_element(sel).is_some()),
            (Some(_), None) => false,
            (None, _) => true,
        };
        if !selection_ok {
            self.selection = None;
        }
    }

    /// Broadcast every page whose committed state differs from `before`.
    fn broadcast_changed_pages(&mut self, before: &Document) {
        let changed: Vec<Page> = self
            .history
            .present()
            .pages
            .iter()
            .filter(|page| before.find_page(&page.id) != Some(page))
            .cloned()
            .collect();

        for page in changed {
            let event = EditEvent::PageCommitted { page };
            self.subscribers
                .retain(|tx| tx.send(event.clone()).is_ok());
        }
    }
}

struct PageHit {
    page_id: String,
}
