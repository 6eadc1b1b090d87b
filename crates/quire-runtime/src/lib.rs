// crates/quire-runtime/src/lib.rs
//! Editing on top of `quire-core`: the conflict-aware edit protocol, the
//! session that owns a document's registry and elements, and snapshot
//! import/export.

pub mod config;
pub mod edit;
pub mod error;
pub mod session;
pub mod snapshot;

pub use config::SessionConfig;
pub use edit::{
    unlink_all, ConfirmationProvider, ConflictDescriptor, ConflictMode, EditOutcome, EditProtocol,
    FixedAnswer,
};
pub use error::RuntimeError;
pub use session::EditorSession;
pub use snapshot::{import_json, import_snapshot, ImportSummary, SnapshotMetadata, StyleSnapshot};

pub type Result<T> = std::result::Result<T, RuntimeError>;
