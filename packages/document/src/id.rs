//! Prefixed id generation for document entities.
//!
//! Ids are opaque strings. The prefix is purely for debuggability; nothing
//! in the model parses it back out.

use uuid::Uuid;

fn prefixed(prefix: &str) -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!("{}-{}", prefix, &id[..12])
}

/// Fresh element id (`el-…`)
pub fn element_id() -> String {
    prefixed("el")
}

/// Fresh page id (`page-…`)
pub fn page_id() -> String {
    prefixed("page")
}

/// Fresh project id (`proj-…`)
pub fn project_id() -> String {
    prefixed("proj")
}
