//! # Geometry Engine
//!
//! Resolves parent-relative element positions to page-local absolute
//! rects, and hit-tests pointer positions against them.
//!
//! ## Dual-source lookup
//!
//! During an active drag or resize, the in-flight rect lives in a
//! [`DraftRects`] side table rather than the committed document. Every
//! resolution consults the draft first and falls back to the committed
//! position, so a gesture preview moves smoothly without committing
//! history on every pixel.
//!
//! ## Failure mode
//!
//! A dangling or cyclic `parent_id` silently truncates the walk (treated
//! as reaching the root) rather than raising. Partially-loaded or
//! corrupted documents still resolve to something drawable.

use crate::model::{Element, Page};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Axis-aligned rectangle in page-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px <= self.x + self.width && py >= self.y && py <= self.y + self.height
    }
}

/// Side table of in-flight (uncommitted) rects keyed by element id.
///
/// Populated by the interaction layer during drag/resize, cleared when
/// the gesture commits or cancels.
#[derive(Debug, Clone, Default)]
pub struct DraftRects {
    rects: HashMap<String, Rect>,
}

impl DraftRects {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, element_id: &str) -> Option<Rect> {
        self.rects.get(element_id).copied()
    }

    pub fn set(&mut self, element_id: impl Into<String>, rect: Rect) {
        self.rects.insert(element_id.into(), rect);
    }

    pub fn remove(&mut self, element_id: &str) {
        self.rects.remove(element_id);
    }

    pub fn clear(&mut self) {
        self.rects.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }
}

/// Whichever rect is authoritative at call time: the draft if one is in
/// flight, the committed position otherwise.
pub fn authoritative_rect(element: &Element, drafts: &DraftRects) -> Rect {
    drafts.get(&element.id).unwrap_or_else(|| element.rect())
}

/// Resolve an element's absolute rect (page-local) by walking its parent
/// chain and accumulating each parent's own authoritative offset.
///
/// Terminates in O(depth); a visited set guards against malformed cyclic
/// parent graphs, and an unresolved parent truncates the walk.
pub fn absolute_rect(element: &Element, page: &Page, drafts: &DraftRects) -> Rect {
    let by_id: HashMap<&str, &Element> =
        page.elements.iter().map(|e| (e.id.as_str(), e)).collect();

    let mut rect = authoritative_rect(element, drafts);
    let mut seen: HashSet<&str> = HashSet::new();
    seen.insert(element.id.as_str());

    let mut parent_id = element.parent_id.as_deref();
    while let Some(pid) = parent_id {
        if !seen.insert(pid) {
            break;
        }
        match by_id.get(pid) {
            Some(parent) => {
                let parent_rect = authoritative_rect(parent, drafts);
                rect.x += parent_rect.x;
                rect.y += parent_rect.y;
                parent_id = parent.parent_id.as_deref();
            }
            // Dangling reference: treat as having reached the root.
            None => break,
        }
    }

    rect
}

/// Topmost selectable element containing the page-local point, if any.
///
/// Later elements in the page list paint on top, so the scan runs back to
/// front. Ghost elements are skipped.
pub fn hit_test<'a>(page: &'a Page, px: f32, py: f32, drafts: &DraftRects) -> Option<&'a Element> {
    page.elements
        .iter()
        .rev()
        .filter(|e| e.is_selectable())
        .find(|e| absolute_rect(e, page, drafts).contains(px, py))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ElementType, Page};

    fn page_with(elements: Vec<Element>) -> Page {
        let mut page = Page::new("Test", "proj-1");
        page.elements = elements;
        page
    }

    #[test]
    fn test_root_element_absolute_rect_is_its_own() {
        let el = Element::new(ElementType::Hero, "Hero", Rect::new(40.0, 40.0, 200.0, 100.0));
        let page = page_with(vec![el.clone()]);

        let abs = absolute_rect(&el, &page, &DraftRects::new());
        assert_eq!(abs, el.rect());
    }

    #[test]
    fn test_nested_rects_compose_through_five_levels() {
        let mut elements: Vec<Element> = Vec::new();
        let mut parent_id: Option<String> = None;
        for depth in 0..5 {
            let mut el = Element::new(
                ElementType::Container,
                format!("level-{depth}"),
                Rect::new(10.0, 20.0, 500.0, 500.0),
            );
            el.parent_id = parent_id.clone();
            parent_id = Some(el.id.clone());
            elements.push(el);
        }
        let leaf = elements.last().unwrap().clone();
        let page = page_with(elements);

        let abs = absolute_rect(&leaf, &page, &DraftRects::new());
        assert_eq!(abs.x, 50.0);
        assert_eq!(abs.y, 100.0);
        assert_eq!(abs.width, 500.0);
    }

    #[test]
    fn test_dangling_parent_truncates_walk() {
        let mut el = Element::new(ElementType::Card, "Card", Rect::new(5.0, 5.0, 50.0, 50.0));
        el.parent_id = Some("el-missing".to_string());
        let page = page_with(vec![el.clone()]);

        let abs = absolute_rect(&el, &page, &DraftRects::new());
        assert_eq!(abs, el.rect());
    }

    #[test]
    fn test_cyclic_parents_terminate() {
        let mut a = Element::new(ElementType::Container, "A", Rect::new(1.0, 0.0, 10.0, 10.0));
        let mut b = Element::new(ElementType::Container, "B", Rect::new(2.0, 0.0, 10.0, 10.0));
        a.parent_id = Some(b.id.clone());
        b.parent_id = Some(a.id.clone());
        let page = page_with(vec![a.clone(), b]);

        // Walk must stop once an id repeats; it never hangs.
        let abs = absolute_rect(&a, &page, &DraftRects::new());
        assert!(abs.x.is_finite());
    }

    #[test]
    fn test_draft_rect_overrides_committed_position() {
        let parent = Element::new(ElementType::Section, "S", Rect::new(100.0, 100.0, 400.0, 400.0));
        let mut child = Element::new(ElementType::Text, "T", Rect::new(10.0, 10.0, 80.0, 20.0));
        child.parent_id = Some(parent.id.clone());

        let mut drafts = DraftRects::new();
        drafts.set(parent.id.clone(), Rect::new(300.0, 300.0, 400.0, 400.0));

        let page = page_with(vec![parent, child.clone()]);
        let abs = absolute_rect(&child, &page, &drafts);
        assert_eq!((abs.x, abs.y), (310.0, 310.0));
    }

    #[test]
    fn test_hit_test_prefers_topmost_and_skips_ghosts() {
        let below = Element::new(ElementType::Card, "Below", Rect::new(0.0, 0.0, 100.0, 100.0));
        let above = Element::new(ElementType::Card, "Above", Rect::new(0.0, 0.0, 100.0, 100.0));
        let mut ghost = Element::new(
            ElementType::Background,
            "Ghost",
            Rect::new(0.0, 0.0, 100.0, 100.0),
        );
        ghost.is_ghost = true;

        let above_id = above.id.clone();
        let page = page_with(vec![below, above, ghost]);

        let hit = hit_test(&page, 50.0, 50.0, &DraftRects::new()).unwrap();
        assert_eq!(hit.id, above_id);
        assert!(hit_test(&page, 500.0, 500.0, &DraftRects::new()).is_none());
    }
}
