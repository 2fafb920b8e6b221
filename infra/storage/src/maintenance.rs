use crate::error::StorageError;
use crate::security::RECORD_EXT;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tracing::{error, info, warn};
use walkdir::{DirEntry, WalkDir};

/// Marker embedded in in-flight temp file names: `<key>.rec.regtmp.<n>`.
pub(crate) const TMP_MARKER: &str = ".regtmp.";

pub(crate) async fn purge_tmp(root: &Path) {
    let root = root.to_path_buf();
    let now = SystemTime::now();
    let threshold = Duration::from_secs(300);

    match tokio::task::spawn_blocking(move || remove_stale(&root, now, threshold)).await {
        Ok((removed, failed)) if removed > 0 || failed > 0 => {
            info!(removed, failed, "Cleaned up temporary files");
        },
        Err(e) => {
            error!(error = %e, "Temp file cleanup task panicked");
        },
        _ => {},
    }
}

/// Committed record files of one table directory as `(key, path)`, ordered by key.
pub(crate) async fn list_records(dir: PathBuf) -> Result<Vec<(String, PathBuf)>, StorageError> {
    tokio::task::spawn_blocking(move || collect_records(&dir))
        .await
        .map_err(|e| StorageError::Internal {
            message: e.to_string().into(),
            context: Some("Table scan task failed".into()),
        })
}

fn collect_records(dir: &Path) -> Vec<(String, PathBuf)> {
    if !dir.is_dir() {
        return Vec::new();
    }

    let mut records: Vec<(String, PathBuf)> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "Skipping unreadable table entry");
                None
            },
        })
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| {
            let path = entry.into_path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(RECORD_EXT) {
                return None;
            }
            let key = path.file_stem()?.to_str()?.to_owned();
            Some((key, path))
        })
        .collect();

    records.sort_unstable_by(|a, b| a.0.cmp(&b.0));
    records
}

fn remove_stale(root: &Path, now: SystemTime, threshold: Duration) -> (usize, usize) {
    let mut removed = 0;
    let mut failed = 0;

    WalkDir::new(root)
        .contents_first(true)
        .into_iter()
        .flatten()
        .filter(|e| e.path() != root)
        .for_each(|entry| {
            let path = entry.path();

            if entry.file_type().is_file() {
                if is_tmp(&entry) && is_stale(&entry, now, threshold) {
                    match std::fs::remove_file(path) {
                        Ok(()) => removed += 1,
                        Err(e) => {
                            warn!(path = %path.display(), error = %e, "Failed to remove temp file");
                            failed += 1;
                        },
                    }
                }
            } else if entry.file_type().is_dir() {
                // Only succeeds for directories left empty by deletes.
                let _ = std::fs::remove_dir(path);
            }
        });

    (removed, failed)
}

fn is_tmp(entry: &DirEntry) -> bool {
    entry.file_name().to_str().is_some_and(|name| name.contains(TMP_MARKER))
}

fn is_stale(entry: &DirEntry, now: SystemTime, threshold: Duration) -> bool {
    std::fs::metadata(entry.path())
        .ok()
        .and_then(|m| m.modified().ok())
        .and_then(|modified| now.duration_since(modified).ok())
        .is_none_or(|age| age > threshold)
}
