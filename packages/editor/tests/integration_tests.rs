//! Integration tests for the edit session: lifecycle, history, clipboard,
//! defensive recovery, and observer broadcast.

use draftboard_document::{
    Document, Element, ElementType, Mutation, Page, Platform, Project, Rect,
};
use draftboard_editor::{EditEvent, EditSession, KeyCommand};

fn seeded_document() -> (Document, String, String) {
    let mut doc = Document::new();
    let project = Project::new("Site", Platform::Web);
    let page = Page::new("Home", project.id.clone());
    let (project_id, page_id) = (project.id.clone(), page.id.clone());
    doc.projects.push(project);
    doc.pages.push(page);
    (doc, project_id, page_id)
}

fn add_element(session: &mut EditSession, page_id: &str, element: Element) {
    session
        .apply_committed(Mutation::InsertElement {
            page_id: page_id.to_string(),
            element,
        })
        .unwrap();
}

#[test]
fn test_new_session_activates_first_project_and_page() {
    let (doc, project_id, page_id) = seeded_document();
    let session = EditSession::new(doc);

    assert_eq!(session.active_project_id(), Some(project_id.as_str()));
    assert_eq!(session.active_page_id(), Some(page_id.as_str()));
    assert!(session.selection().is_none());
}

#[test]
fn test_switching_project_activates_its_first_page() {
    let (mut doc, _, page_id) = seeded_document();
    let other = Project::new("Blog", Platform::Mobile);
    let other_page = Page::new("Posts", other.id.clone());
    let (other_id, other_page_id) = (other.id.clone(), other_page.id.clone());
    doc.projects.push(other);
    doc.pages.push(other_page);

    let mut session = EditSession::new(doc);
    let el = Element::new(ElementType::Card, "Card", Rect::new(0.0, 0.0, 100.0, 100.0));
    let el_id = el.id.clone();
    add_element(&mut session, &page_id, el);
    session.select(Some(&el_id));

    session.set_active_project(&other_id);

    assert_eq!(session.active_project_id(), Some(other_id.as_str()));
    assert_eq!(session.active_page_id(), Some(other_page_id.as_str()));
    assert!(session.selection().is_none());
}

#[test]
fn test_load_runs_repair_pass() {
    let (mut doc, _, page_id) = seeded_document();
    let hero = Element::new(ElementType::Hero, "Hero", Rect::new(0.0, 0.0, 1200.0, 360.0));
    doc.find_page_mut(&page_id).unwrap().elements.push(hero);

    let session = EditSession::new(doc);
    let page = session.document().find_page(&page_id).unwrap();

    assert_eq!(page.elements.len(), 2);
    assert!(page.elements[1].element_type.is_text());
    assert_eq!(page.elements[1].content.as_deref(), Some("Hero"));
}

#[test]
fn test_committed_mutation_broadcasts_full_page() {
    let (doc, _, page_id) = seeded_document();
    let mut session = EditSession::new(doc);
    let mut events = session.subscribe();

    add_element(
        &mut session,
        &page_id,
        Element::new(ElementType::Card, "Card", Rect::new(10.0, 10.0, 100.0, 100.0)),
    );

    let EditEvent::PageCommitted { page } = events.try_recv().unwrap();
    assert_eq!(page.id, page_id);
    assert_eq!(page.elements.len(), 1);
    assert!(events.try_recv().is_err());
}

#[test]
fn test_undo_redo_restore_exact_states() {
    let (doc, _, page_id) = seeded_document();
    let mut session = EditSession::new(doc);

    let el = Element::new(ElementType::Card, "Card", Rect::new(10.0, 10.0, 100.0, 100.0));
    let el_id = el.id.clone();
    add_element(&mut session, &page_id, el);

    session
        .apply_committed(Mutation::SetContent {
            page_id: page_id.clone(),
            element_id: el_id.clone(),
            content: "v1".to_string(),
        })
        .unwrap();

    assert!(session.undo());
    let page = session.document().find_page(&page_id).unwrap();
    assert_eq!(page.find_element(&el_id).unwrap().content, None);

    assert!(session.redo());
    let page = session.document().find_page(&page_id).unwrap();
    assert_eq!(
        page.find_element(&el_id).unwrap().content.as_deref(),
        Some("v1")
    );
}

#[test]
fn test_deleting_active_page_falls_back_to_sibling() {
    let (mut doc, project_id, first_page_id) = seeded_document();
    let second = Page::new("Pricing", project_id.clone());
    let second_id = second.id.clone();
    doc.pages.push(second);

    let mut session = EditSession::new(doc);
    assert_eq!(session.active_page_id(), Some(first_page_id.as_str()));

    session
        .apply_committed(Mutation::RemovePage {
            page_id: first_page_id,
        })
        .unwrap();

    assert_eq!(session.active_page_id(), Some(second_id.as_str()));
}

#[test]
fn test_selection_cleared_when_element_removed() {
    let (doc, _, page_id) = seeded_document();
    let mut session = EditSession::new(doc);

    let el = Element::new(ElementType::Card, "Card", Rect::new(0.0, 0.0, 100.0, 100.0));
    let el_id = el.id.clone();
    add_element(&mut session, &page_id, el);
    session.select(Some(&el_id));
    assert_eq!(session.selection(), Some(el_id.as_str()));

    session
        .apply_committed(Mutation::RemoveElement {
            page_id,
            element_id: el_id,
        })
        .unwrap();
    assert!(session.selection().is_none());
}

#[test]
fn test_switching_page_clears_selection() {
    let (mut doc, project_id, page_id) = seeded_document();
    let second = Page::new("Pricing", project_id.clone());
    let second_id = second.id.clone();
    doc.pages.push(second);

    let mut session = EditSession::new(doc);
    let el = Element::new(ElementType::Card, "Card", Rect::new(0.0, 0.0, 100.0, 100.0));
    let el_id = el.id.clone();
    add_element(&mut session, &page_id, el);
    session.select(Some(&el_id));

    session.set_active_page(&second_id);
    assert!(session.selection().is_none());
    assert_eq!(session.active_page_id(), Some(second_id.as_str()));
}

#[test]
fn test_copy_paste_creates_offset_copy_with_fresh_ids() {
    let (doc, _, page_id) = seeded_document();
    let mut session = EditSession::new(doc);

    let el = Element::new(ElementType::Card, "Card", Rect::new(100.0, 100.0, 200.0, 100.0));
    let el_id = el.id.clone();
    add_element(&mut session, &page_id, el);
    session.select(Some(&el_id));

    assert!(session.key(KeyCommand::Copy));
    assert!(session.key(KeyCommand::Paste));

    let page = session.document().find_page(&page_id).unwrap();
    assert_eq!(page.elements.len(), 2);
    let copy = &page.elements[1];
    assert_ne!(copy.id, el_id);
    assert_eq!((copy.x, copy.y), (116.0, 116.0));

    // Paste was one undo step.
    assert!(session.undo());
    assert_eq!(
        session.document().find_page(&page_id).unwrap().elements.len(),
        1
    );
}

#[test]
fn test_paste_survives_source_deletion() {
    let (doc, _, page_id) = seeded_document();
    let mut session = EditSession::new(doc);

    let el = Element::new(ElementType::Card, "Card", Rect::new(0.0, 0.0, 100.0, 100.0));
    let el_id = el.id.clone();
    add_element(&mut session, &page_id, el);
    session.select(Some(&el_id));
    session.key(KeyCommand::Copy);
    session.key(KeyCommand::Delete);

    assert!(session.key(KeyCommand::Paste));
    let page = session.document().find_page(&page_id).unwrap();
    assert_eq!(page.elements.len(), 1);
    assert_ne!(page.elements[0].id, el_id);
}

#[test]
fn test_delete_requires_selection() {
    let (doc, _, _) = seeded_document();
    let mut session = EditSession::new(doc);
    assert!(!session.key(KeyCommand::Delete));
}

#[test]
fn test_generated_layout_is_one_atomic_commit() {
    let (doc, _, page_id) = seeded_document();
    let mut session = EditSession::new(doc);

    let elements = vec![
        Element::new(ElementType::Navbar, "Navbar", Rect::new(0.0, 0.0, 1200.0, 72.0)),
        Element::new(ElementType::Hero, "Hero", Rect::new(0.0, 88.0, 1200.0, 320.0)),
    ];
    session
        .apply_generated_layout(
            &page_id,
            elements,
            "landing page".to_string(),
            "Two sections".to_string(),
            "Build a landing page".to_string(),
            "[\"navbar\",\"hero\"]".to_string(),
        )
        .unwrap();

    let page = session.document().find_page(&page_id).unwrap();
    // Two sections plus their text shadow children.
    assert_eq!(page.elements.len(), 4);
    assert_eq!(page.prompt, "landing page");
    assert_eq!(page.explanation, "Two sections");

    assert!(session.undo());
    let page = session.document().find_page(&page_id).unwrap();
    assert!(page.elements.is_empty());
    assert_eq!(page.prompt, "");
}

#[test]
fn test_cascade_project_delete_falls_back_cleanly() {
    let (doc, project_id, _) = seeded_document();
    let mut session = EditSession::new(doc);

    session
        .apply_committed(Mutation::RemoveProject { project_id })
        .unwrap();

    assert!(session.active_project_id().is_none());
    assert!(session.active_page_id().is_none());
    assert!(session.selection().is_none());
}
