//! Core entities: Project, Page, Element.
//!
//! All wire-facing types serialize as camelCase JSON so payloads match the
//! persistence and generation boundaries.

use crate::geometry::Rect;
use crate::id;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Minimum element width enforced at every resize boundary.
pub const MIN_WIDTH: f32 = 20.0;

/// Minimum element height enforced at every resize boundary.
pub const MIN_HEIGHT: f32 = 20.0;

/// Fixed positional offset applied to pasted/duplicated elements.
pub const PASTE_OFFSET: f32 = 16.0;

/// Target platform for a project. Determines the page frame size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    #[default]
    Web,
    Mobile,
}

impl Platform {
    /// Page frame size `(width, height)` for this platform.
    pub fn frame_size(&self) -> (f32, f32) {
        match self {
            Platform::Web => (1200.0, 800.0),
            Platform::Mobile => (390.0, 844.0),
        }
    }
}

/// A project owns zero or more pages by reference (`page.project_id`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    pub platform: Platform,
}

impl Project {
    pub fn new(name: impl Into<String>, platform: Platform) -> Self {
        Self {
            id: id::project_id(),
            name: name.into(),
            platform,
        }
    }
}

/// A page is a frame on the infinite project canvas, placed at
/// `(canvas_x, canvas_y)`. Pages never nest and never transform each
/// other's coordinates. A page owns its elements exclusively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: String,
    pub name: String,
    pub project_id: String,
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub elements: Vec<Element>,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub mvp_prompt: String,
    #[serde(default)]
    pub json_outline: String,
    #[serde(default)]
    pub canvas_x: f32,
    #[serde(default)]
    pub canvas_y: f32,
}

impl Page {
    pub fn new(name: impl Into<String>, project_id: impl Into<String>) -> Self {
        Self {
            id: id::page_id(),
            name: name.into(),
            project_id: project_id.into(),
            prompt: String::new(),
            elements: Vec::new(),
            explanation: String::new(),
            mvp_prompt: String::new(),
            json_outline: String::new(),
            canvas_x: 0.0,
            canvas_y: 0.0,
        }
    }

    pub fn find_element(&self, element_id: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == element_id)
    }

    pub fn find_element_mut(&mut self, element_id: &str) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| e.id == element_id)
    }

    /// Ids of `element_id` plus all of its transitive children. A
    /// corrupted cyclic parent graph terminates the walk instead of
    /// looping.
    pub fn subtree_ids(&self, element_id: &str) -> Vec<String> {
        let mut seen: HashSet<&str> = HashSet::new();
        seen.insert(element_id);
        let mut ids = vec![element_id.to_string()];
        let mut cursor = 0;
        while cursor < ids.len() {
            let current = ids[cursor].clone();
            for el in &self.elements {
                if el.parent_id.as_deref() == Some(current.as_str())
                    && seen.insert(el.id.as_str())
                {
                    ids.push(el.id.clone());
                }
            }
            cursor += 1;
        }
        ids
    }
}

/// Element kind. Seventeen variants in two families: container-like kinds
/// can hold children; text-like kinds render their `content` directly.
/// The families differ only in default sizing and renderer branching, so
/// a flat enum plus the shared `Element` struct is enough.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    Navbar,
    Hero,
    Features,
    Pricing,
    Form,
    Cta,
    Footer,
    Section,
    Container,
    Card,
    Image,
    Background,
    Text,
    Heading,
    Paragraph,
    Button,
    Input,
}

impl ElementType {
    /// Text-family kinds render `content` directly.
    pub fn is_text(&self) -> bool {
        matches!(
            self,
            ElementType::Text
                | ElementType::Heading
                | ElementType::Paragraph
                | ElementType::Button
                | ElementType::Input
        )
    }

    /// Container-family kinds may hold children.
    pub fn is_container(&self) -> bool {
        !self.is_text()
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ElementType::Navbar => "navbar",
            ElementType::Hero => "hero",
            ElementType::Features => "features",
            ElementType::Pricing => "pricing",
            ElementType::Form => "form",
            ElementType::Cta => "cta",
            ElementType::Footer => "footer",
            ElementType::Section => "section",
            ElementType::Container => "container",
            ElementType::Card => "card",
            ElementType::Image => "image",
            ElementType::Background => "background",
            ElementType::Text => "text",
            ElementType::Heading => "heading",
            ElementType::Paragraph => "paragraph",
            ElementType::Button => "button",
            ElementType::Input => "input",
        };
        f.write_str(name)
    }
}

impl FromStr for ElementType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "navbar" => Ok(ElementType::Navbar),
            "hero" => Ok(ElementType::Hero),
            "features" => Ok(ElementType::Features),
            "pricing" => Ok(ElementType::Pricing),
            "form" => Ok(ElementType::Form),
            "cta" => Ok(ElementType::Cta),
            "footer" => Ok(ElementType::Footer),
            "section" => Ok(ElementType::Section),
            "container" => Ok(ElementType::Container),
            "card" => Ok(ElementType::Card),
            "image" => Ok(ElementType::Image),
            "background" => Ok(ElementType::Background),
            "text" => Ok(ElementType::Text),
            "heading" => Ok(ElementType::Heading),
            "paragraph" => Ok(ElementType::Paragraph),
            "button" => Ok(ElementType::Button),
            "input" => Ok(ElementType::Input),
            _ => Err(()),
        }
    }
}

/// Flat optional-field style bag. Unset fields fall back to renderer
/// defaults; the model never interprets them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Style {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_align: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i32>,
}

/// A positioned, styled node within a page.
///
/// `(x, y)` are relative to `parent_id` if set, otherwise to the page
/// frame's top-left corner. Never absolute screen coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    pub id: String,
    #[serde(rename = "type")]
    pub element_type: ElementType,
    #[serde(default)]
    pub label: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Non-owning back-reference to another element on the same page.
    /// Used only for geometry and hit-testing; may dangle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default)]
    pub style: Style,
    /// Ghosts are layout references (e.g. a background layer) excluded
    /// from hit-testing and selection.
    #[serde(default)]
    pub is_ghost: bool,
}

impl Element {
    pub fn new(element_type: ElementType, label: impl Into<String>, rect: Rect) -> Self {
        Self {
            id: id::element_id(),
            element_type,
            label: label.into(),
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
            parent_id: None,
            content: None,
            style: Style::default(),
            is_ghost: false,
        }
    }

    /// The element's own (parent-relative) rect.
    pub fn rect(&self) -> Rect {
        Rect {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
        }
    }

    pub fn set_rect(&mut self, rect: Rect) {
        self.x = rect.x;
        self.y = rect.y;
        self.width = rect.width;
        self.height = rect.height;
    }

    pub fn is_selectable(&self) -> bool {
        !self.is_ghost
    }

    /// The renderable text for this element: `content` if non-empty,
    /// otherwise the label.
    pub fn display_text(&self) -> Option<&str> {
        match self.content.as_deref() {
            Some(c) if !c.is_empty() => Some(c),
            _ if !self.label.is_empty() => Some(&self.label),
            _ => None,
        }
    }
}
