use async_trait::async_trait;
use std::path::PathBuf;

/// The document the user is looking at.
///
/// Saving is asynchronous in every editor worth supporting, and it is the one
/// place a dispatch waits. The trait is `?Send`: hosts drive it from their own
/// single-threaded event loop.
#[async_trait(?Send)]
pub trait ActiveDocument {
    /// Path of the focused file, if any.
    fn active_path(&self) -> Option<PathBuf>;

    /// Persist pending edits. `false` means the save did not happen.
    async fn save(&self) -> bool;
}
