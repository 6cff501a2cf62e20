//! # Draftboard Sync
//!
//! Synchronization layer: observes committed page mutations and keeps a
//! persistence backend eventually up to date without ever blocking the
//! editing session.
//!
//! ## Contract
//!
//! - Per-page debounce (~400ms): rapid consecutive edits to one page
//!   produce at most one outbound write per quiet period
//! - Pages are independent; no global serialization of writes
//! - Best-effort: failures surface as dismissible notices, are never
//!   retried here, and never roll back local state
//! - With no remote store configured, the whole workspace persists as a
//!   single local snapshot blob

mod debounce;
mod errors;
mod snapshot;
mod store;

pub use debounce::{spawn_observer, PageSyncer, SyncNotice, DEBOUNCE_DELAY};
pub use errors::SyncError;
pub use snapshot::{LocalSnapshot, SnapshotProject};
pub use store::{PageMetadata, PagePatch, PageStore, StoreError};
