//! Text-shadow-child repair pass.
//!
//! Renderers always draw a container's caption through a text-family
//! child. Any container element that carries a non-empty label or content
//! but has no text-family child gets one synthesized here, so renderers
//! never need special-case fallback text.
//!
//! The pass runs whenever elements are loaded or bulk-replaced (e.g. after
//! layout generation) and is a fixed point: running it twice produces no
//! further changes.

use crate::geometry::Rect;
use crate::model::{Element, ElementType, MIN_WIDTH};

const SHADOW_INSET: f32 = 12.0;
const SHADOW_HEIGHT: f32 = 24.0;

/// Synthesize a text-family child for every container element that needs
/// one. Returns the number of children added.
pub fn ensure_text_shadow_children(elements: &mut Vec<Element>) -> usize {
    let mut additions: Vec<Element> = Vec::new();

    for el in elements.iter() {
        if !el.element_type.is_container() {
            continue;
        }
        let Some(text) = el.display_text() else {
            continue;
        };
        let has_text_child = elements
            .iter()
            .any(|c| c.parent_id.as_deref() == Some(el.id.as_str()) && c.element_type.is_text());
        if has_text_child {
            continue;
        }

        let width = (el.width - 2.0 * SHADOW_INSET).max(MIN_WIDTH);
        let mut shadow = Element::new(
            ElementType::Text,
            el.label.clone(),
            Rect::new(SHADOW_INSET, SHADOW_INSET, width, SHADOW_HEIGHT),
        );
        shadow.parent_id = Some(el.id.clone());
        shadow.content = Some(text.to_string());
        additions.push(shadow);
    }

    let added = additions.len();
    elements.append(&mut additions);
    added
}
