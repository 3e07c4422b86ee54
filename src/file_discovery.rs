use std::path::{Path, PathBuf};

use tokio::fs;

use crate::error::{Result, SetupError};

/// Recursive file discovery over the batch directory.
///
/// Matching is a case-insensitive *substring* test against the file
/// extension: suffix "epub" matches `book.EPUB` and also `archive.epubx`.
/// This mirrors the behavior batch operators rely on for sidecar variants of
/// the container extension.
#[derive(Debug, Clone)]
pub struct FileDiscovery {
    /// Uppercased extension substring to match
    suffix: String,
}

impl FileDiscovery {
    pub fn new(suffix: &str) -> Self {
        Self {
            suffix: suffix.to_uppercase(),
        }
    }

    /// Walk the full subtree under `root` and return every matching file,
    /// sorted so that a rerun over unchanged input produces identical logs.
    /// Directories themselves are never yielded.
    pub async fn discover(&self, root: &Path) -> Result<Vec<PathBuf>> {
        if !fs::metadata(root).await.map(|m| m.is_dir()).unwrap_or(false) {
            return Err(SetupError::MissingBatchDir {
                path: root.to_path_buf(),
            });
        }

        let mut files = Vec::new();
        self.walk(root, &mut files).await?;
        files.sort();
        Ok(files)
    }

    fn walk<'a>(
        &'a self,
        dir: &'a Path,
        files: &'a mut Vec<PathBuf>,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<()>> + 'a>> {
        Box::pin(async move {
            let mut read_dir = fs::read_dir(dir).await?;

            while let Some(entry) = read_dir.next_entry().await? {
                let path = entry.path();
                let file_type = entry.file_type().await?;

                if file_type.is_dir() {
                    if let Err(e) = self.walk(&path, files).await {
                        // An unreadable subdirectory must not sink the scan.
                        eprintln!("Warning: skipping {}: {}", path.display(), e);
                    }
                } else if file_type.is_file() && self.matches(&path) {
                    files.push(path);
                }
            }

            Ok(())
        })
    }

    /// Case-insensitive substring match against the file's extension.
    pub fn matches(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_uppercase().contains(&self.suffix))
            .unwrap_or(false)
    }
}
