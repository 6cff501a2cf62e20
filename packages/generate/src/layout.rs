//! Shared section-to-element layout.
//!
//! Both the heuristic generator and backend responses end up as an
//! ordered list of section types; this module turns that list into a
//! vertical stack of full-width container elements sized for the
//! target platform, each with a synthesized text child.

use draftboard_document::{
    ensure_text_shadow_children, Element, ElementType, Platform, Rect,
};

const SECTION_GAP: f32 = 0.0;

/// Preset height for a generated section, tuned per section role.
pub fn section_height(section: ElementType) -> f32 {
    match section {
        ElementType::Navbar => 72.0,
        ElementType::Hero => 320.0,
        ElementType::Features => 280.0,
        ElementType::Pricing => 300.0,
        ElementType::Form => 260.0,
        ElementType::Cta => 160.0,
        ElementType::Footer => 120.0,
        _ => 200.0,
    }
}

fn section_label(section: ElementType) -> String {
    let name = section.to_string();
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => name,
    }
}

/// Stack sections top to bottom at full frame width, then run the
/// text-shadow repair pass so every section carries its caption child.
pub fn stack_sections(sections: &[ElementType], platform: Platform) -> Vec<Element> {
    let (frame_width, _) = platform.frame_size();
    let mut elements: Vec<Element> = Vec::with_capacity(sections.len() * 2);
    let mut y = 0.0;

    for &section in sections {
        let height = section_height(section);
        let element = Element::new(
            section,
            section_label(section),
            Rect::new(0.0, y, frame_width, height),
        );
        y += height + SECTION_GAP;
        elements.push(element);
    }

    ensure_text_shadow_children(&mut elements);
    elements
}

/// Compact JSON outline of the generated sections, stored on the page
/// for later re-generation context.
pub fn outline_json(sections: &[ElementType]) -> String {
    let names: Vec<String> = sections.iter().map(|s| s.to_string()).collect();
    serde_json::json!({ "sections": names }).to_string()
}
