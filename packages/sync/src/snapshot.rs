//! Local snapshot blob.
//!
//! When no remote persistence is configured, the whole workspace is kept
//! as a single serialized blob: projects with their pages inline, the
//! active ids, and the camera. Read once at startup, written
//! opportunistically.

use crate::errors::SyncError;
use draftboard_document::{Document, Page, Platform, Project};
use draftboard_editor::{EditSession, Viewport};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalSnapshot {
    pub projects: Vec<SnapshotProject>,
    pub active_project_id: Option<String>,
    pub active_page_id: Option<String>,
    pub platform: Platform,
    pub viewport: Viewport,
}

/// A project with its pages nested inline, the way the blob stores them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotProject {
    #[serde(flatten)]
    pub project: Project,
    pub pages: Vec<Page>,
}

impl LocalSnapshot {
    /// Capture the session's current state.
    pub fn capture(session: &EditSession) -> Self {
        let doc = session.document();
        let platform = session
            .active_project_id()
            .and_then(|id| doc.find_project(id))
            .map(|p| p.platform)
            .unwrap_or_default();

        Self {
            projects: doc
                .projects
                .iter()
                .map(|project| SnapshotProject {
                    project: project.clone(),
                    pages: doc.project_pages(&project.id).cloned().collect(),
                })
                .collect(),
            active_project_id: session.active_project_id().map(str::to_string),
            active_page_id: session.active_page_id().map(str::to_string),
            platform,
            viewport: session.viewport(),
        }
    }

    /// Rebuild a session from the blob. Runs the repair pass, and the
    /// session falls back to first siblings for any stale active ids.
    pub fn restore(self) -> EditSession {
        let mut document = Document::new();
        for entry in self.projects {
            document.projects.push(entry.project);
            document.pages.extend(entry.pages);
        }
        document.repair();

        EditSession::from_parts(
            document,
            self.active_project_id,
            self.active_page_id,
            self.viewport,
        )
    }

    /// Read the blob if one exists.
    pub fn load(path: &Path) -> Result<Option<Self>, SyncError> {
        if !path.exists() {
            return Ok(None);
        }
        let raw = std::fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&raw)?))
    }

    pub fn save(&self, path: &Path) -> Result<(), SyncError> {
        let raw = serde_json::to_string_pretty(self)?;
        std::fs::write(path, raw)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use draftboard_document::{Element, ElementType, Rect};

    fn seeded_session() -> EditSession {
        let mut doc = Document::new();
        let project = Project::new("Site", Platform::Mobile);
        let mut page = Page::new("Home", project.id.clone());
        page.elements.push(Element::new(
            ElementType::Heading,
            "Title",
            Rect::new(10.0, 10.0, 200.0, 40.0),
        ));
        doc.projects.push(project);
        doc.pages.push(page);
        EditSession::new(doc)
    }

    #[test]
    fn test_capture_restore_round_trip() {
        let session = seeded_session();
        let snapshot = LocalSnapshot::capture(&session);
        assert_eq!(snapshot.platform, Platform::Mobile);

        let restored = snapshot.restore();
        assert_eq!(restored.document(), session.document());
        assert_eq!(restored.active_page_id(), session.active_page_id());
        assert_eq!(restored.viewport(), session.viewport());
    }

    #[test]
    fn test_blob_shape_is_camel_case_with_nested_pages() {
        let session = seeded_session();
        let snapshot = LocalSnapshot::capture(&session);
        let json = serde_json::to_value(&snapshot).unwrap();

        assert_eq!(json["platform"], "mobile");
        assert!(json["activeProjectId"].is_string());
        assert_eq!(json["viewport"]["scale"], 1.0);
        let project = &json["projects"][0];
        assert!(project["id"].is_string());
        assert_eq!(project["pages"][0]["name"], "Home");
    }

    #[test]
    fn test_load_missing_file_is_none() {
        let path = std::env::temp_dir().join("draftboard-snapshot-missing.json");
        assert!(LocalSnapshot::load(&path).unwrap().is_none());
    }

    #[test]
    fn test_save_then_load() {
        let session = seeded_session();
        let snapshot = LocalSnapshot::capture(&session);
        let path = std::env::temp_dir().join(format!(
            "draftboard-snapshot-{}.json",
            std::process::id()
        ));

        snapshot.save(&path).unwrap();
        let loaded = LocalSnapshot::load(&path).unwrap().unwrap();
        assert_eq!(loaded, snapshot);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_restore_with_stale_active_ids_falls_back() {
        let session = seeded_session();
        let mut snapshot = LocalSnapshot::capture(&session);
        snapshot.active_page_id = Some("page-gone".to_string());

        let restored = snapshot.restore();
        assert_eq!(restored.active_page_id(), session.active_page_id());
    }
}
