//! # Document Mutations
//!
//! High-level semantic operations on a Draftboard document.
//!
//! ## Design Principles
//!
//! 1. **Intent-preserving**: each mutation represents a semantic edit
//! 2. **Validated**: all mutations check structural constraints first
//! 3. **Minimal**: no redundant or overly generic operations
//!
//! ## Mutation Semantics
//!
//! ### RemoveElement
//! - Removes the element and all its descendants
//! - Dangling `parent_id` references left by outside corruption are
//!   tolerated by the geometry layer, never produced here
//!
//! ### ReparentElement
//! - Fails if the new parent is missing (does not create orphans)
//! - Fails if it would create a cycle
//!
//! ### ReplaceElements
//! - Atomic replace-all used by layout generation
//! - Runs the text-shadow-child repair pass on the result

use crate::document::{clone_subtree_with_new_ids, Document};
use crate::geometry::Rect;
use crate::model::{
    Element, Page, Platform, Project, Style, MIN_HEIGHT, MIN_WIDTH, PASTE_OFFSET,
};
use crate::repair::ensure_text_shadow_children;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Semantic mutations (intent-preserving operations)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Mutation {
    /// Add a project to the workspace
    AddProject { project: Project },

    /// Remove a project, cascading deletion of its pages
    RemoveProject { project_id: String },

    RenameProject {
        project_id: String,
        name: String,
    },

    SetPlatform {
        project_id: String,
        platform: Platform,
    },

    /// Add a page to an existing project
    AddPage { page: Page },

    RemovePage { page_id: String },

    RenamePage {
        page_id: String,
        name: String,
    },

    /// Move a page frame on the infinite canvas
    MovePageFrame {
        page_id: String,
        canvas_x: f32,
        canvas_y: f32,
    },

    /// Insert a single element into a page
    InsertElement {
        page_id: String,
        element: Element,
    },

    /// Remove an element and all its descendants
    RemoveElement {
        page_id: String,
        element_id: String,
    },

    /// Deep-ish copy with fresh ids and a fixed positional offset
    DuplicateElement {
        page_id: String,
        element_id: String,
    },

    /// Set an element's parent-relative position
    MoveElement {
        page_id: String,
        element_id: String,
        x: f32,
        y: f32,
    },

    /// Set an element's full rect; sizes are clamped to the minimums
    ResizeElement {
        page_id: String,
        element_id: String,
        rect: Rect,
    },

    /// Atomic replacement of an element's text content
    SetContent {
        page_id: String,
        element_id: String,
        content: String,
    },

    SetLabel {
        page_id: String,
        element_id: String,
        label: String,
    },

    /// Replace the element's style bag
    SetStyle {
        page_id: String,
        element_id: String,
        style: Style,
    },

    /// Re-anchor an element under a new parent (or the page root)
    ReparentElement {
        page_id: String,
        element_id: String,
        new_parent_id: Option<String>,
    },

    /// Atomic replace-all of a page's elements (layout generation)
    ReplaceElements {
        page_id: String,
        elements: Vec<Element>,
    },

    /// Update a page's generation metadata; `None` fields are untouched
    SetPageDetails {
        page_id: String,
        prompt: Option<String>,
        explanation: Option<String>,
        mvp_prompt: Option<String>,
        json_outline: Option<String>,
    },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("Project not found: {0}")]
    ProjectNotFound(String),

    #[error("Page not found: {0}")]
    PageNotFound(String),

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Parent not found: {0}")]
    ParentNotFound(String),

    #[error("Would create cycle")]
    CycleDetected,
}

impl Mutation {
    /// Apply mutation to the document with validation
    pub fn apply(&self, doc: &mut Document) -> Result<(), MutationError> {
        self.validate(doc)?;

        match self {
            Mutation::AddProject { project } => {
                doc.projects.push(project.clone());
                Ok(())
            }

            Mutation::RemoveProject { project_id } => {
                doc.remove_project(project_id);
                Ok(())
            }

            Mutation::RenameProject { project_id, name } => {
                doc.find_project_mut(project_id)
                    .ok_or_else(|| MutationError::ProjectNotFound(project_id.clone()))?
                    .name = name.clone();
                Ok(())
            }

            Mutation::SetPlatform {
                project_id,
                platform,
            } => {
                doc.find_project_mut(project_id)
                    .ok_or_else(|| MutationError::ProjectNotFound(project_id.clone()))?
                    .platform = *platform;
                Ok(())
            }

            Mutation::AddPage { page } => {
                doc.pages.push(page.clone());
                Ok(())
            }

            Mutation::RemovePage { page_id } => {
                doc.remove_page(page_id);
                Ok(())
            }

            Mutation::RenamePage { page_id, name } => {
                Self::page_mut(doc, page_id)?.name = name.clone();
                Ok(())
            }

            Mutation::MovePageFrame {
                page_id,
                canvas_x,
                canvas_y,
            } => {
                let page = Self::page_mut(doc, page_id)?;
                page.canvas_x = *canvas_x;
                page.canvas_y = *canvas_y;
                Ok(())
            }

            Mutation::InsertElement { page_id, element } => {
                Self::page_mut(doc, page_id)?.elements.push(element.clone());
                Ok(())
            }

            Mutation::RemoveElement {
                page_id,
                element_id,
            } => Self::apply_remove_element(doc, page_id, element_id),

            Mutation::DuplicateElement {
                page_id,
                element_id,
            } => Self::apply_duplicate(doc, page_id, element_id),

            Mutation::MoveElement {
                page_id,
                element_id,
                x,
                y,
            } => {
                let el = Self::element_mut(doc, page_id, element_id)?;
                el.x = *x;
                el.y = *y;
                Ok(())
            }

            Mutation::ResizeElement {
                page_id,
                element_id,
                rect,
            } => {
                let mut clamped = *rect;
                clamped.width = clamped.width.max(MIN_WIDTH);
                clamped.height = clamped.height.max(MIN_HEIGHT);
                Self::element_mut(doc, page_id, element_id)?.set_rect(clamped);
                Ok(())
            }

            Mutation::SetContent {
                page_id,
                element_id,
                content,
            } => {
                Self::element_mut(doc, page_id, element_id)?.content = Some(content.clone());
                Ok(())
            }

            Mutation::SetLabel {
                page_id,
                element_id,
                label,
            } => {
                Self::element_mut(doc, page_id, element_id)?.label = label.clone();
                Ok(())
            }

            Mutation::SetStyle {
                page_id,
                element_id,
                style,
            } => {
                Self::element_mut(doc, page_id, element_id)?.style = style.clone();
                Ok(())
            }

            Mutation::ReparentElement {
                page_id,
                element_id,
                new_parent_id,
            } => {
                Self::element_mut(doc, page_id, element_id)?.parent_id = new_parent_id.clone();
                Ok(())
            }

            Mutation::ReplaceElements { page_id, elements } => {
                let page = Self::page_mut(doc, page_id)?;
                page.elements = elements.clone();
                ensure_text_shadow_children(&mut page.elements);
                Ok(())
            }

            Mutation::SetPageDetails {
                page_id,
                prompt,
                explanation,
                mvp_prompt,
                json_outline,
            } => {
                let page = Self::page_mut(doc, page_id)?;
                if let Some(prompt) = prompt {
                    page.prompt = prompt.clone();
                }
                if let Some(explanation) = explanation {
                    page.explanation = explanation.clone();
                }
                if let Some(mvp_prompt) = mvp_prompt {
                    page.mvp_prompt = mvp_prompt.clone();
                }
                if let Some(json_outline) = json_outline {
                    page.json_outline = json_outline.clone();
                }
                Ok(())
            }
        }
    }

    fn apply_remove_element(
        doc: &mut Document,
        page_id: &str,
        element_id: &str,
    ) -> Result<(), MutationError> {
        let page = Self::page_mut(doc, page_id)?;
        let doomed = page.subtree_ids(element_id);
        page.elements.retain(|e| !doomed.contains(&e.id));
        Ok(())
    }

    fn apply_duplicate(
        doc: &mut Document,
        page_id: &str,
        element_id: &str,
    ) -> Result<(), MutationError> {
        let frame = doc
            .page_project(page_id)
            .map(|p| p.platform)
            .unwrap_or_default()
            .frame_size();

        let page = Self::page_mut(doc, page_id)?;
        let subtree_ids = page.subtree_ids(element_id);
        let subtree: Vec<Element> = page
            .elements
            .iter()
            .filter(|e| subtree_ids.contains(&e.id))
            .cloned()
            .collect();

        let mut copies = clone_subtree_with_new_ids(&subtree);
        // The root is the copy whose parent fell outside the subtree,
        // not necessarily the first in document order.
        if let Some(root) = copies.iter_mut().find(|e| e.parent_id.is_none()) {
            root.x = (root.x + PASTE_OFFSET).clamp(0.0, (frame.0 - root.width).max(0.0));
            root.y = (root.y + PASTE_OFFSET).clamp(0.0, (frame.1 - root.height).max(0.0));
        }
        page.elements.append(&mut copies);
        Ok(())
    }

    fn page_mut<'a>(doc: &'a mut Document, page_id: &str) -> Result<&'a mut Page, MutationError> {
        doc.find_page_mut(page_id)
            .ok_or_else(|| MutationError::PageNotFound(page_id.to_string()))
    }

    fn element_mut<'a>(
        doc: &'a mut Document,
        page_id: &str,
        element_id: &str,
    ) -> Result<&'a mut Element, MutationError> {
        Self::page_mut(doc, page_id)?
            .find_element_mut(element_id)
            .ok_or_else(|| MutationError::ElementNotFound(element_id.to_string()))
    }

    /// Validate without applying
    pub fn validate(&self, doc: &Document) -> Result<(), MutationError> {
        match self {
            Mutation::AddProject { .. } => Ok(()),

            Mutation::RemoveProject { project_id }
            | Mutation::RenameProject { project_id, .. }
            | Mutation::SetPlatform { project_id, .. } => {
                doc.find_project(project_id)
                    .ok_or_else(|| MutationError::ProjectNotFound(project_id.clone()))?;
                Ok(())
            }

            Mutation::AddPage { page } => {
                doc.find_project(&page.project_id)
                    .ok_or_else(|| MutationError::ProjectNotFound(page.project_id.clone()))?;
                Ok(())
            }

            Mutation::RemovePage { page_id }
            | Mutation::RenamePage { page_id, .. }
            | Mutation::MovePageFrame { page_id, .. }
            | Mutation::ReplaceElements { page_id, .. }
            | Mutation::SetPageDetails { page_id, .. } => {
                Self::require_page(doc, page_id)
            }

            Mutation::InsertElement { page_id, element } => {
                let page = doc
                    .find_page(page_id)
                    .ok_or_else(|| MutationError::PageNotFound(page_id.clone()))?;
                if let Some(pid) = element.parent_id.as_deref() {
                    page.find_element(pid)
                        .ok_or_else(|| MutationError::ParentNotFound(pid.to_string()))?;
                }
                Ok(())
            }

            Mutation::RemoveElement {
                page_id,
                element_id,
            }
            | Mutation::DuplicateElement {
                page_id,
                element_id,
            }
            | Mutation::MoveElement {
                page_id,
                element_id,
                ..
            }
            | Mutation::ResizeElement {
                page_id,
                element_id,
                ..
            }
            | Mutation::SetContent {
                page_id,
                element_id,
                ..
            }
            | Mutation::SetLabel {
                page_id,
                element_id,
                ..
            }
            | Mutation::SetStyle {
                page_id,
                element_id,
                ..
            } => Self::require_element(doc, page_id, element_id),

            Mutation::ReparentElement {
                page_id,
                element_id,
                new_parent_id,
            } => {
                let page = doc
                    .find_page(page_id)
                    .ok_or_else(|| MutationError::PageNotFound(page_id.clone()))?;
                page.find_element(element_id)
                    .ok_or_else(|| MutationError::ElementNotFound(element_id.clone()))?;
                if let Some(parent_id) = new_parent_id.as_deref() {
                    page.find_element(parent_id)
                        .ok_or_else(|| MutationError::ParentNotFound(parent_id.to_string()))?;
                    if doc.would_create_cycle(page_id, element_id, parent_id) {
                        return Err(MutationError::CycleDetected);
                    }
                }
                Ok(())
            }
        }
    }

    fn require_page(doc: &Document, page_id: &str) -> Result<(), MutationError> {
        doc.find_page(page_id)
            .ok_or_else(|| MutationError::PageNotFound(page_id.to_string()))?;
        Ok(())
    }

    fn require_element(
        doc: &Document,
        page_id: &str,
        element_id: &str,
    ) -> Result<(), MutationError> {
        doc.find_page(page_id)
            .ok_or_else(|| MutationError::PageNotFound(page_id.to_string()))?
            .find_element(element_id)
            .ok_or_else(|| MutationError::ElementNotFound(element_id.to_string()))?;
        Ok(())
    }
}
