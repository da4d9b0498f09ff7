use crate::document::ActiveDocument;
use async_trait::async_trait;
use std::cell::RefCell;
use std::path::{Path, PathBuf};

/// A file on disk standing in for the editor's focused document.
///
/// There is no unsaved buffer, so saving only confirms the file is there.
#[derive(Debug, Default)]
pub struct FileDocument {
    path: RefCell<Option<PathBuf>>,
}

impl FileDocument {
    pub fn new(path: Option<&Path>) -> Self {
        let doc = Self::default();
        doc.focus(path);
        doc
    }

    /// Switch the active document. Relative paths resolve against the current directory.
    pub fn focus(&self, path: Option<&Path>) {
        self.path.replace(path.map(absolute));
    }
}

fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match std::env::current_dir() {
        Ok(cwd) => cwd.join(path),
        Err(_) => path.to_path_buf(),
    }
}

#[async_trait(?Send)]
impl ActiveDocument for FileDocument {
    fn active_path(&self) -> Option<PathBuf> {
        self.path.borrow().clone()
    }

    async fn save(&self) -> bool {
        let Some(path) = self.active_path() else {
            return false;
        };
        match tokio::fs::metadata(&path).await {
            Ok(meta) => meta.is_file(),
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "active document is not on disk");
                false
            }
        }
    }
}
