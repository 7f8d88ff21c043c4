// src/store.rs
use crate::types::PersistedRecord;
use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::warn;

/// File-backed record of confirmed candidates, one `<address> <delay>ms` per line.
///
/// Appends from concurrent tasks each open, write one short line, sync and
/// close, so no task ever holds the file across an await point.
#[derive(Debug, Clone)]
pub struct ResultStore {
    path: PathBuf,
}

impl ResultStore {
    /// Open the store, creating an empty file if it does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        ensure_file(&path)?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every well-formed record, in file order. Bad lines are skipped.
    pub fn read_records(&self) -> Result<Vec<PersistedRecord>> {
        let text = fs::read_to_string(&self.path)
            .with_context(|| format!("read result file {}", self.path.display()))?;
        let mut out = Vec::new();
        for line in text.lines().filter(|l| !l.trim().is_empty()) {
            match line.parse::<PersistedRecord>() {
                Ok(r) => out.push(r),
                Err(e) => warn!(file = %self.path.display(), "{}", e),
            }
        }
        Ok(out)
    }

    pub fn truncate(&self) -> Result<()> {
        File::create(&self.path)
            .with_context(|| format!("truncate file {}", self.path.display()))?;
        Ok(())
    }

    /// Append one record and sync it to disk before returning.
    ///
    /// The open/write/sync run on tokio's blocking pool so probe tasks sharing
    /// the worker keep getting polled while the disk catches up.
    pub async fn append(&self, record: &PersistedRecord) -> Result<()> {
        let mut f = tokio::fs::OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)
            .await
            .with_context(|| format!("open file {}", self.path.display()))?;
        // single write so concurrent appenders never split a line
        f.write_all(format!("{}\n", record).as_bytes())
            .await
            .with_context(|| format!("append ip to file {}", self.path.display()))?;
        f.flush().await?;
        f.sync_data()
            .await
            .with_context(|| format!("sync file {}", self.path.display()))?;
        Ok(())
    }

    /// Replace the whole file with `contents`.
    pub fn overwrite(&self, contents: &str) -> Result<()> {
        write_text_file(&self.path, contents)
    }
}

/// Create `path` if missing. Existing content is left alone.
pub fn ensure_file(path: &Path) -> Result<()> {
    if !path.exists() {
        File::create(path).with_context(|| format!("create file {}", path.display()))?;
    }
    Ok(())
}

/// Truncate-then-write.
pub fn write_text_file(path: &Path, contents: &str) -> Result<()> {
    let mut f = File::create(path).with_context(|| format!("truncate file {}", path.display()))?;
    f.write_all(contents.as_bytes())
        .with_context(|| format!("write ip to file {}", path.display()))?;
    f.flush()?;
    Ok(())
}

/// Write JSON via a temp file and rename so readers never see a partial report.
pub fn write_json_file_atomic(path: &Path, value: &serde_json::Value) -> Result<()> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    let f = File::create(&tmp).with_context(|| format!("create {}", tmp.display()))?;
    let mut w = std::io::BufWriter::new(f);
    serde_json::to_writer_pretty(&mut w, value)?;
    w.flush()?;
    fs::rename(&tmp, path).with_context(|| format!("rename to {}", path.display()))?;
    Ok(())
}
