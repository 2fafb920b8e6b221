use fxhash::FxHashMap;
use std::collections::BTreeSet;

/// Secondary indexes of one table.
///
/// Keeps the entries each id was indexed under so a replace or delete can retract
/// them without decoding the previous record.
#[derive(Debug, Default)]
pub(crate) struct TableIndex {
    by_id: FxHashMap<String, Vec<(&'static str, String)>>,
    by_value: FxHashMap<&'static str, FxHashMap<String, BTreeSet<String>>>,
}

impl TableIndex {
    pub(crate) fn upsert(&mut self, id: &str, entries: Vec<(&'static str, String)>) {
        self.remove(id);
        for (index, value) in &entries {
            self.by_value
                .entry(index)
                .or_default()
                .entry(value.clone())
                .or_default()
                .insert(id.to_owned());
        }
        self.by_id.insert(id.to_owned(), entries);
    }

    pub(crate) fn remove(&mut self, id: &str) {
        let Some(entries) = self.by_id.remove(id) else {
            return;
        };
        for (index, value) in entries {
            let Some(values) = self.by_value.get_mut(index) else { continue };
            if let Some(ids) = values.get_mut(&value) {
                ids.remove(id);
                if ids.is_empty() {
                    values.remove(&value);
                }
            }
        }
    }

    /// Ids indexed under `index = value`, ascending.
    pub(crate) fn lookup(&self, index: &str, value: &str) -> Vec<String> {
        self.by_value
            .get(index)
            .and_then(|values| values.get(value))
            .map(|ids| ids.iter().cloned().collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replace_retracts_stale_entries() {
        let mut idx = TableIndex::default();
        idx.upsert("C1", vec![("course-by-code", "CS101".to_owned())]);
        idx.upsert("C2", vec![("course-by-code", "CS101".to_owned())]);
        assert_eq!(idx.lookup("course-by-code", "CS101"), vec!["C1", "C2"]);

        idx.upsert("C1", vec![("course-by-code", "CS102".to_owned())]);
        assert_eq!(idx.lookup("course-by-code", "CS101"), vec!["C2"]);
        assert_eq!(idx.lookup("course-by-code", "CS102"), vec!["C1"]);

        idx.remove("C2");
        assert!(idx.lookup("course-by-code", "CS101").is_empty());
        assert!(idx.lookup("unknown-index", "x").is_empty());
    }
}
