//! JSON page files on disk.
//!
//! A page file is the page document plus save metadata. Plain
//! `{ "bricks": [...] }` documents load as well.

use crate::EditorError;
use brickwork_layout::Page;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageFile {
    /// Unix time in milliseconds of the last save
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<i64>,

    #[serde(flatten)]
    pub page: Page,
}

impl PageFile {
    pub fn new(page: Page) -> Self {
        Self {
            saved_at: None,
            page,
        }
    }
}

/// Read a page file
pub fn read_page(path: &Path) -> Result<PageFile, EditorError> {
    let source = fs::read_to_string(path)?;
    let file: PageFile = serde_json::from_str(&source)?;
    debug!(path = %path.display(), bricks = file.page.bricks.len(), "Page loaded");
    Ok(file)
}

/// Write a page file, stamping it with the current time
pub fn write_page(path: &Path, page: &Page) -> Result<i64, EditorError> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }

    let saved_at = chrono::Utc::now().timestamp_millis();
    let file = PageFile {
        saved_at: Some(saved_at),
        page: page.clone(),
    };
    fs::write(path, serde_json::to_string_pretty(&file)?)?;

    info!(path = %path.display(), bricks = page.bricks.len(), "Page saved");
    Ok(saved_at)
}

#[cfg(test)]
mod tests {
    use super::*;
    use brickwork_layout::{Breakpoint, Brick, BrickType, Position};

    #[test]
    fn test_plain_page_document_loads() {
        let file: PageFile = serde_json::from_str(
            r#"{ "bricks": [{ "id": "a", "type": "text", "position": { "desktop": { "x": 0, "y": 0, "w": 2, "h": 1 } } }] }"#,
        )
        .unwrap();

        assert_eq!(file.saved_at, None);
        assert_eq!(file.page.bricks.len(), 1);
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pages").join("home.json");
        let page = Page::new(vec![Brick::new("a", BrickType::Button)
            .with_position(Breakpoint::Desktop, Position::new(1, 1, 2, 1))]);

        let saved_at = write_page(&path, &page).unwrap();
        let file = read_page(&path).unwrap();

        assert_eq!(file.saved_at, Some(saved_at));
        assert_eq!(file.page, page);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_page(&dir.path().join("missing.json"));
        assert!(matches!(result, Err(EditorError::Io(_))));
    }
}
