// crates/quire-runtime/src/config.rs

use crate::ConflictMode;

/// Settings for an [`EditorSession`](crate::EditorSession).
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Mode used by `EditorSession::edit_default`.
    pub default_conflict_mode: ConflictMode,
    /// Seed the predefined styles when the session creates its registry.
    pub seed_predefined: bool,
    /// Log a warning when a style is deleted while elements still reference it.
    pub warn_on_dangling_delete: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_conflict_mode: ConflictMode::Interactive,
            seed_predefined: true,
            warn_on_dangling_delete: true,
        }
    }
}

impl SessionConfig {
    pub fn with_conflict_mode(mut self, mode: ConflictMode) -> Self {
        self.default_conflict_mode = mode;
        self
    }

    /// A session starting from an empty registry.
    pub fn without_predefined(mut self) -> Self {
        self.seed_predefined = false;
        self
    }
}
