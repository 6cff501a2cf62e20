//! Local deterministic fallback generator.
//!
//! Maps prompt keywords onto a canonical ordered set of section types
//! with preset sizes. Always succeeds, so the adapter can fall back here
//! for any backend failure.

use crate::contract::GenerateRequest;
use crate::layout::{outline_json, stack_sections};
use crate::GeneratedLayout;
use draftboard_document::{ElementType, Platform};

/// Canonical section order. Keyword-selected sections always appear in
/// this order regardless of where the keyword sat in the prompt.
const CANONICAL_ORDER: [ElementType; 7] = [
    ElementType::Navbar,
    ElementType::Hero,
    ElementType::Features,
    ElementType::Pricing,
    ElementType::Form,
    ElementType::Cta,
    ElementType::Footer,
];

fn wants(prompt: &str, section: ElementType) -> bool {
    let keywords: &[&str] = match section {
        // Every page gets the basic skeleton.
        ElementType::Navbar | ElementType::Hero | ElementType::Footer => return true,
        ElementType::Features => &["feature", "benefit", "service"],
        ElementType::Pricing => &["pricing", "price", "plan", "tier"],
        ElementType::Form => &["form", "contact", "signup", "sign up", "subscribe"],
        ElementType::Cta => &["cta", "call to action", "get started", "convert"],
        _ => return false,
    };
    keywords.iter().any(|k| prompt.contains(k))
}

/// Pick sections for a prompt, in canonical order.
pub fn sections_for_prompt(prompt: &str) -> Vec<ElementType> {
    let prompt = prompt.to_lowercase();
    CANONICAL_ORDER
        .into_iter()
        .filter(|section| wants(&prompt, *section))
        .collect()
}

pub fn generate(request: &GenerateRequest, platform: Platform) -> GeneratedLayout {
    let sections = sections_for_prompt(&request.prompt);
    let elements = stack_sections(&sections, platform);

    GeneratedLayout {
        explanation: format!(
            "Laid out {} sections from the prompt keywords.",
            sections.len()
        ),
        mvp_prompt: format!("Build an MVP of: {}", request.prompt.trim()),
        json_outline: outline_json(&sections),
        elements,
    }
}
