use crate::error::StorageError;
use registrar_domain::Record;
use std::fmt;

/// Validated table name; doubles as the table's directory under the store root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct TableName(&'static str);

impl TableName {
    pub(crate) fn of<R: Record>() -> Result<Self, StorageError> {
        Self::try_from(R::TABLE)
    }

    pub(crate) const fn as_str(self) -> &'static str {
        self.0
    }
}

impl TryFrom<&'static str> for TableName {
    type Error = StorageError;

    fn try_from(value: &'static str) -> Result<Self, StorageError> {
        if value.is_empty() {
            return Err(StorageError::InvalidKey {
                message: "EMPTY".into(),
                context: Some("Table name cannot be empty".into()),
            });
        }

        if !value.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_') {
            return Err(StorageError::InvalidKey {
                message: value.into(),
                context: Some("Table name contains illegal characters".into()),
            });
        }

        Ok(Self(value))
    }
}

impl AsRef<str> for TableName {
    fn as_ref(&self) -> &str {
        self.0
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_lowercase_snake_names() {
        assert_eq!(TableName::try_from("registrations").unwrap().as_str(), "registrations");
        assert!(TableName::try_from("audit_log2").is_ok());
    }

    #[test]
    fn rejects_paths_and_mixed_case() {
        for bad in ["", "../etc", "Students", "a/b", "with space"] {
            let err = TableName::try_from(bad).unwrap_err();
            assert_eq!(err.kind(), "InvalidKey", "{bad:?}");
        }
    }
}
