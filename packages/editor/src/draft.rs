//! # Page Draft
//!
//! The editable page owned by a session. A draft is either:
//! - **Memory-backed**: scratch pages and tests
//! - **File-backed**: persisted as a JSON page file
//!
//! ## Lifecycle
//!
//! ```text
//! Load → Edit → Reflow → Save
//!   ↓      ↓       ↓       ↓
//! File  Mutations Mobile  File
//! ```
//!
//! Every successful change bumps `version`. Failed mutations leave both the
//! page and the version untouched.

use crate::storage::{read_page, write_page};
use crate::{EditorError, Mutation, MutationResult, PositionPatch};
use brickwork_layout::{
    adjust_mobile_layout, Breakpoint, Brick, BrickId, Page, ReflowConfig,
};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug)]
pub struct PageDraft {
    /// Current version number (increments on each change)
    pub version: u64,

    page: Page,

    storage: DraftStorage,
}

/// Storage backend for a draft
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftStorage {
    Memory,

    File {
        path: PathBuf,
        dirty: bool,
        /// Unix millis of the last save or load
        saved_at: Option<i64>,
    },
}

impl PageDraft {
    /// Memory-backed draft
    pub fn from_page(page: Page) -> Self {
        Self {
            version: 0,
            page,
            storage: DraftStorage::Memory,
        }
    }

    /// Load a draft from a page file
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, EditorError> {
        let path = path.into();
        let file = read_page(&path)?;

        Ok(Self {
            version: 0,
            page: file.page,
            storage: DraftStorage::File {
                path,
                dirty: false,
                saved_at: file.saved_at,
            },
        })
    }

    /// File-backed draft for a file that does not exist yet
    pub fn create(path: impl Into<PathBuf>, page: Page) -> Self {
        Self {
            version: 0,
            page,
            storage: DraftStorage::File {
                path: path.into(),
                dirty: true,
                saved_at: None,
            },
        }
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn bricks(&self) -> &[Brick] {
        &self.page.bricks
    }

    pub fn storage(&self) -> &DraftStorage {
        &self.storage
    }

    pub fn get_brick(&self, id: &BrickId) -> Option<&Brick> {
        self.page.get(id)
    }

    /// Apply a single mutation, without post effects or history
    pub fn apply(&mut self, mutation: &Mutation) -> Result<MutationResult, EditorError> {
        mutation.apply(&mut self.page)?;
        Ok(MutationResult {
            version: self.touch(),
            secondary: Vec::new(),
        })
    }

    pub fn add_brick(
        &mut self,
        brick: Brick,
        parent: Option<BrickId>,
    ) -> Result<MutationResult, EditorError> {
        self.apply(&Mutation::AddBrick { brick, parent })
    }

    pub fn update_brick_position(
        &mut self,
        brick_id: BrickId,
        breakpoint: Breakpoint,
        patch: PositionPatch,
    ) -> Result<MutationResult, EditorError> {
        self.apply(&Mutation::UpdateBrickPosition {
            brick_id,
            breakpoint,
            patch,
        })
    }

    pub fn remove_brick(&mut self, brick_id: BrickId) -> Result<MutationResult, EditorError> {
        self.apply(&Mutation::RemoveBrick { brick_id })
    }

    /// Recompute every mobile position from the desktop layout. Returns the
    /// number of bricks whose mobile position changed.
    pub fn adjust_mobile_layout(&mut self, config: &ReflowConfig) -> usize {
        let reflowed = adjust_mobile_layout(&self.page.bricks, config);
        let changed = reflowed
            .iter()
            .zip(&self.page.bricks)
            .filter(|(new, old)| new.position(Breakpoint::Mobile) != old.position(Breakpoint::Mobile))
            .count();

        if changed > 0 {
            self.page.bricks = reflowed;
            self.touch();
        }
        debug!(changed, "Draft reflowed");
        changed
    }

    /// Check if the draft has unsaved changes
    pub fn is_dirty(&self) -> bool {
        match &self.storage {
            DraftStorage::File { dirty, .. } => *dirty,
            DraftStorage::Memory => false,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match &self.storage {
            DraftStorage::File { path, .. } => Some(path),
            DraftStorage::Memory => None,
        }
    }

    pub fn saved_at(&self) -> Option<i64> {
        match &self.storage {
            DraftStorage::File { saved_at, .. } => *saved_at,
            DraftStorage::Memory => None,
        }
    }

    /// Save the draft to disk (if file-backed)
    pub fn save(&mut self) -> Result<(), EditorError> {
        match &mut self.storage {
            DraftStorage::File {
                path,
                dirty,
                saved_at,
            } => {
                *saved_at = Some(write_page(path, &self.page)?);
                *dirty = false;
                Ok(())
            }
            DraftStorage::Memory => Err(EditorError::NotFileBacked),
        }
    }

    /// Save to `path` and keep the draft file-backed from now on
    pub fn save_as(&mut self, path: impl Into<PathBuf>) -> Result<(), EditorError> {
        self.storage = DraftStorage::File {
            path: path.into(),
            dirty: true,
            saved_at: None,
        };
        self.save()
    }

    pub(crate) fn page_mut(&mut self) -> &mut Page {
        &mut self.page
    }

    /// Record a change made through `page_mut`; returns the new version
    pub(crate) fn touch(&mut self) -> u64 {
        self.version += 1;
        if let DraftStorage::File { dirty, .. } = &mut self.storage {
            *dirty = true;
        }
        self.version
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brickwork_layout::{BrickType, Position};

    fn text(id: &str, x: u32, y: u32) -> Brick {
        Brick::new(id, BrickType::Text).with_position(Breakpoint::Desktop, Position::new(x, y, 6, 2))
    }

    #[test]
    fn test_create_memory_draft() {
        let draft = PageDraft::from_page(Page::new(vec![text("a", 0, 0)]));
        assert_eq!(draft.version, 0);
        assert!(!draft.is_dirty());
        assert!(draft.get_brick(&"a".into()).is_some());
        assert_eq!(draft.path(), None);
    }

    #[test]
    fn test_version_increments_on_success_only() {
        let mut draft = PageDraft::from_page(Page::default());

        draft.add_brick(text("a", 0, 0), None).unwrap();
        assert_eq!(draft.version, 1);

        // Overlaps "a"
        assert!(draft.add_brick(text("b", 3, 1), None).is_err());
        assert_eq!(draft.version, 1);
        assert_eq!(draft.bricks().len(), 1);
    }

    #[test]
    fn test_add_brick_into_container() {
        let mut draft = PageDraft::from_page(Page::new(vec![Brick::new("box", BrickType::Container)
            .with_position(Breakpoint::Desktop, Position::new(0, 0, 12, 4))]));

        draft.add_brick(text("a", 0, 0), Some("box".into())).unwrap();
        let a = draft.get_brick(&"a".into()).unwrap();
        assert_eq!(a.parent(Breakpoint::Desktop), Some(&"box".into()));
    }

    #[test]
    fn test_adjust_mobile_layout_reports_changes() {
        let mut draft = PageDraft::from_page(Page::new(vec![text("a", 0, 0), text("b", 6, 0)]));

        assert_eq!(draft.adjust_mobile_layout(&ReflowConfig::default()), 2);
        assert_eq!(draft.version, 1);

        // Already in sync
        assert_eq!(draft.adjust_mobile_layout(&ReflowConfig::default()), 0);
        assert_eq!(draft.version, 1);

        let b = draft.get_brick(&"b".into()).unwrap();
        assert_eq!(b.position(Breakpoint::Mobile).unwrap().y, 2);
    }

    #[test]
    fn test_memory_draft_cannot_save() {
        let mut draft = PageDraft::from_page(Page::default());
        assert!(matches!(draft.save(), Err(EditorError::NotFileBacked)));
    }

    #[test]
    fn test_file_draft_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.json");

        let mut draft = PageDraft::create(&path, Page::new(vec![text("a", 0, 0)]));
        assert!(draft.is_dirty());

        draft.save().unwrap();
        assert!(!draft.is_dirty());
        assert!(draft.saved_at().is_some());

        let reloaded = PageDraft::load(&path).unwrap();
        assert_eq!(reloaded.page(), draft.page());
        assert_eq!(reloaded.saved_at(), draft.saved_at());
    }
}
