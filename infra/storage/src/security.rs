use crate::error::StorageError;
use crate::namespace::TableName;
use std::path::{Path, PathBuf};

/// Extension of committed record files.
pub(crate) const RECORD_EXT: &str = "rec";
pub(crate) const MAX_KEY_LEN: usize = 128;

/// Keys become file names, so only `[A-Za-z0-9_-]` is accepted and the first byte may not be `-`.
pub(crate) fn validate_key(key: &str) -> Result<(), StorageError> {
    if key.is_empty() || key.len() > MAX_KEY_LEN {
        return Err(StorageError::InvalidKey {
            message: key.to_owned().into(),
            context: Some(format!("Key length must be 1..={MAX_KEY_LEN}").into()),
        });
    }

    if key.starts_with('-') || !key.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
    {
        return Err(StorageError::InvalidKey {
            message: key.to_owned().into(),
            context: Some("Key contains illegal characters".into()),
        });
    }

    Ok(())
}

pub(crate) fn is_valid_key(key: &str) -> bool {
    validate_key(key).is_ok()
}

/// Physical location of a record: `<root>/<table>/<k0k1>/<k2k3>/<key>.rec`.
///
/// Keys shorter than four bytes skip the shard directories.
pub(crate) fn record_path(root: &Path, table: TableName, key: &str) -> Result<PathBuf, StorageError> {
    validate_key(key)?;

    let mut path = root.join(table.as_str());
    if let (Some(shard1), Some(shard2)) = (key.get(0..2), key.get(2..4)) {
        path.push(shard1);
        path.push(shard2);
    }
    path.push(format!("{key}.{RECORD_EXT}"));

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> TableName {
        TableName::try_from("courses").unwrap()
    }

    #[test]
    fn shards_by_key_prefix() {
        let path = record_path(Path::new("/data"), table(), "C001").unwrap();
        assert_eq!(path, Path::new("/data/courses/C0/01/C001.rec"));

        let short = record_path(Path::new("/data"), table(), "C1").unwrap();
        assert_eq!(short, Path::new("/data/courses/C1.rec"));
    }

    #[test]
    fn rejects_traversal_and_separators() {
        for bad in ["", "..", "../x", "a/b", "a\\b", "-flag", "name.rec", "naïve"] {
            assert!(record_path(Path::new("/data"), table(), bad).is_err(), "{bad:?}");
        }
        assert!(!is_valid_key(&"x".repeat(MAX_KEY_LEN + 1)));
        assert!(is_valid_key("S_001-b"));
    }
}
