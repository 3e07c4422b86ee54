//! The two persistent run logs.
//!
//! `status.csv` holds one `<absolutePath>,<pass|fail>` line per file and
//! `details.txt` holds one multi-line block per file. Both are truncated
//! when a run starts and append-only afterwards; a record, once written, is
//! never revisited. Each append is flushed so a long batch that dies
//! mid-run keeps every record logged so far.

use std::path::{Path, PathBuf};

use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;

use crate::error::{Result, SetupError};
use crate::orchestrator::StatusRecord;

/// OS-native line separator used in both logs
pub const LINE_SEP: &str = if cfg!(windows) { "\r\n" } else { "\n" };

/// Summary log file name under the output directory
pub const STATUS_LOG: &str = "status.csv";

/// Details log file name under the output directory
pub const DETAILS_LOG: &str = "details.txt";

/// Open handles to the summary and details logs.
pub struct RunLogs {
    status_path: PathBuf,
    details_path: PathBuf,
    status: File,
    details: File,
}

impl RunLogs {
    /// Create (truncating) both logs under `out_dir`. Failure here is fatal:
    /// a batch that cannot persist records must not start.
    pub async fn create(out_dir: &Path) -> Result<Self> {
        let status_path = out_dir.join(STATUS_LOG);
        let details_path = out_dir.join(DETAILS_LOG);
        let status = open_truncated(&status_path).await?;
        let details = open_truncated(&details_path).await?;

        Ok(Self {
            status_path,
            details_path,
            status,
            details,
        })
    }

    /// Append one record: a summary line and a details block.
    pub async fn append(&mut self, record: &StatusRecord) -> Result<()> {
        let line = format!(
            "{},{}{}",
            record.path.display(),
            record.disposition.as_str(),
            LINE_SEP
        );
        write_all(&mut self.status, &self.status_path, line.as_bytes()).await?;
        write_all(&mut self.details, &self.details_path, record.details.as_bytes()).await?;
        Ok(())
    }

    pub fn status_path(&self) -> &Path {
        &self.status_path
    }

    pub fn details_path(&self) -> &Path {
        &self.details_path
    }
}

async fn open_truncated(path: &Path) -> Result<File> {
    OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
        .await
        .map_err(|source| SetupError::LogWrite {
            path: path.to_path_buf(),
            source,
        })
}

async fn write_all(file: &mut File, path: &Path, bytes: &[u8]) -> Result<()> {
    let result = async {
        file.write_all(bytes).await?;
        file.flush().await
    }
    .await;

    result.map_err(|source| SetupError::LogWrite {
        path: path.to_path_buf(),
        source,
    })
}
