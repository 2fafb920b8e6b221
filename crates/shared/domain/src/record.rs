use serde::Serialize;
use serde::de::DeserializeOwned;

/// A persistable domain record.
///
/// Each record lives in its own table, is addressed by a unique id, and publishes the
/// secondary index entries the stores maintain for it. `index_entries` must be a pure
/// function of the record so stores can re-index on replace.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Table (namespace) name. Lowercase ASCII, digits and underscores only.
    const TABLE: &'static str;

    fn id(&self) -> &str;

    /// `(index name, value)` pairs, see [`crate::index`].
    fn index_entries(&self) -> Vec<(&'static str, String)>;
}
