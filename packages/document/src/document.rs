//! Editable document: all projects and pages of a workspace.
//!
//! The document is the unit of history snapshotting, so it stays `Clone`
//! and `PartialEq`. Lookup helpers tolerate missing ids by returning
//! `Option`; the mutation layer decides what missing means.

use crate::model::{Element, Page, Project};
use crate::repair::ensure_text_shadow_children;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub projects: Vec<Project>,
    pub pages: Vec<Page>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn find_project(&self, project_id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == project_id)
    }

    pub fn find_project_mut(&mut self, project_id: &str) -> Option<&mut Project> {
        self.projects.iter_mut().find(|p| p.id == project_id)
    }

    pub fn find_page(&self, page_id: &str) -> Option<&Page> {
        self.pages.iter().find(|p| p.id == page_id)
    }

    pub fn find_page_mut(&mut self, page_id: &str) -> Option<&mut Page> {
        self.pages.iter_mut().find(|p| p.id == page_id)
    }

    /// Pages owned by a project, in document order.
    pub fn project_pages<'a>(&'a self, project_id: &str) -> impl Iterator<Item = &'a Page> + 'a {
        let project_id = project_id.to_owned();
        self.pages.iter().filter(move |p| p.project_id == project_id)
    }

    /// Project that owns the page, resolved through `page.project_id`.
    pub fn page_project(&self, page_id: &str) -> Option<&Project> {
        let page = self.find_page(page_id)?;
        self.find_project(&page.project_id)
    }

    /// Remove a project and cascade-delete its pages.
    pub fn remove_project(&mut self, project_id: &str) {
        self.projects.retain(|p| p.id != project_id);
        self.pages.retain(|p| p.project_id != project_id);
    }

    pub fn remove_page(&mut self, page_id: &str) {
        self.pages.retain(|p| p.id != page_id);
    }

    /// Would making `new_parent_id` the parent of `element_id` produce a
    /// cycle? Walks up from the candidate parent with a visited guard.
    pub fn would_create_cycle(&self, page_id: &str, element_id: &str, new_parent_id: &str) -> bool {
        let Some(page) = self.find_page(page_id) else {
            return false;
        };
        if element_id == new_parent_id {
            return true;
        }

        let mut seen: HashSet<&str> = HashSet::new();
        let mut cursor = Some(new_parent_id);
        while let Some(current) = cursor {
            if current == element_id {
                return true;
            }
            if !seen.insert(current) {
                return false;
            }
            cursor = page
                .find_element(current)
                .and_then(|e| e.parent_id.as_deref());
        }
        false
    }

    /// Run the text-shadow-child repair pass over every page. Called on
    /// load; bulk element replacement repairs its own page.
    pub fn repair(&mut self) -> usize {
        self.pages
            .iter_mut()
            .map(|p| ensure_text_shadow_children(&mut p.elements))
            .sum()
    }
}

/// Deep-ish copy of a subtree snapshot: every element gets a fresh id and
/// internal `parent_id` references are remapped. References pointing
/// outside the snapshot are dropped so the copy roots itself.
pub fn clone_subtree_with_new_ids(subtree: &[Element]) -> Vec<Element> {
    let ids: HashSet<&str> = subtree.iter().map(|e| e.id.as_str()).collect();
    let remapped: Vec<(String, String)> = subtree
        .iter()
        .map(|e| (e.id.clone(), crate::id::element_id()))
        .collect();

    subtree
        .iter()
        .zip(remapped.iter())
        .map(|(el, (_, new_id))| {
            let mut copy = el.clone();
            copy.id = new_id.clone();
            copy.parent_id = el.parent_id.as_deref().and_then(|pid| {
                if ids.contains(pid) {
                    remapped
                        .iter()
                        .find(|(old, _)| old == pid)
                        .map(|(_, new)| new.clone())
                } else {
                    None
                }
            });
            copy
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::model::{ElementType, Platform};

    fn doc_with_page() -> (Document, String, String) {
        let mut doc = Document::new();
        let project = Project::new("Site", Platform::Web);
        let page = Page::new("Home", project.id.clone());
        let (project_id, page_id) = (project.id.clone(), page.id.clone());
        doc.projects.push(project);
        doc.pages.push(page);
        (doc, project_id, page_id)
    }

    #[test]
    fn test_remove_project_cascades_pages() {
        let (mut doc, project_id, _) = doc_with_page();
        doc.pages.push(Page::new("Pricing", project_id.clone()));

        doc.remove_project(&project_id);
        assert!(doc.projects.is_empty());
        assert!(doc.pages.is_empty());
    }

    #[test]
    fn test_cycle_detection() {
        let (mut doc, _, page_id) = doc_with_page();
        let a = Element::new(ElementType::Section, "A", Rect::new(0.0, 0.0, 100.0, 100.0));
        let mut b = Element::new(ElementType::Card, "B", Rect::new(0.0, 0.0, 50.0, 50.0));
        b.parent_id = Some(a.id.clone());
        let (a_id, b_id) = (a.id.clone(), b.id.clone());
        doc.find_page_mut(&page_id).unwrap().elements = vec![a, b];

        assert!(doc.would_create_cycle(&page_id, &a_id, &b_id));
        assert!(doc.would_create_cycle(&page_id, &a_id, &a_id));
        assert!(!doc.would_create_cycle(&page_id, &b_id, &a_id));
    }

    #[test]
    fn test_clone_subtree_remaps_internal_parents() {
        let root = Element::new(ElementType::Card, "Card", Rect::new(0.0, 0.0, 100.0, 100.0));
        let mut child = Element::new(ElementType::Text, "Text", Rect::new(4.0, 4.0, 60.0, 20.0));
        child.parent_id = Some(root.id.clone());

        let copies = clone_subtree_with_new_ids(&[root.clone(), child.clone()]);
        assert_eq!(copies.len(), 2);
        assert_ne!(copies[0].id, root.id);
        assert_eq!(copies[1].parent_id.as_deref(), Some(copies[0].id.as_str()));
    }

    #[test]
    fn test_clone_subtree_drops_external_parent() {
        let mut child = Element::new(ElementType::Text, "Text", Rect::new(0.0, 0.0, 60.0, 20.0));
        child.parent_id = Some("el-outside".to_string());

        let copies = clone_subtree_with_new_ids(&[child]);
        assert!(copies[0].parent_id.is_none());
    }
}
