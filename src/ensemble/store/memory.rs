use super::{Document, DocumentStore, Result};
use crate::error::StoreError;
use crate::id::Id;
use std::collections::{BTreeMap, HashMap};

/// In-memory document store for testing.
///
/// Documents are held as `serde_json::Value` so the store stays untyped, the
/// same way the file backend holds them on disk. Collections iterate in id
/// order, which keeps test assertions deterministic.
#[derive(Default)]
pub struct InMemoryStore {
    collections: HashMap<String, BTreeMap<String, serde_json::Value>>,
    simulate_write_error: bool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable write-error simulation for testing error handling.
    pub fn set_simulate_write_error(&mut self, simulate: bool) {
        self.simulate_write_error = simulate;
    }

    /// Number of documents currently in `collection`.
    pub fn len(&self, collection: &str) -> usize {
        self.collections.get(collection).map_or(0, BTreeMap::len)
    }

    pub fn is_empty(&self, collection: &str) -> bool {
        self.len(collection) == 0
    }

    fn check_writable(&self) -> Result<()> {
        if self.simulate_write_error {
            return Err(StoreError::Backend("Simulated write error".to_string()));
        }
        Ok(())
    }
}

impl DocumentStore for InMemoryStore {
    fn insert<D: Document>(&mut self, collection: &str, doc: &D) -> Result<()> {
        self.check_writable()?;
        let docs = self.collections.entry(collection.to_string()).or_default();
        let key = doc.id().to_string();
        if docs.contains_key(&key) {
            return Err(StoreError::DuplicateId(key, collection.to_string()));
        }
        docs.insert(key, serde_json::to_value(doc)?);
        Ok(())
    }

    fn get<D: Document>(&self, collection: &str, id: &Id) -> Result<Option<D>> {
        match self
            .collections
            .get(collection)
            .and_then(|docs| docs.get(id.as_str()))
        {
            Some(value) => Ok(Some(serde_json::from_value(value.clone())?)),
            None => Ok(None),
        }
    }

    fn find_one<D: Document>(
        &self,
        collection: &str,
        filter: impl Fn(&D) -> bool,
    ) -> Result<Option<D>> {
        let Some(docs) = self.collections.get(collection) else {
            return Ok(None);
        };
        for value in docs.values() {
            let doc: D = serde_json::from_value(value.clone())?;
            if filter(&doc) {
                return Ok(Some(doc));
            }
        }
        Ok(None)
    }

    fn find_all<D: Document>(
        &self,
        collection: &str,
        filter: impl Fn(&D) -> bool,
    ) -> Result<Vec<D>> {
        let Some(docs) = self.collections.get(collection) else {
            return Ok(Vec::new());
        };
        let mut matched = Vec::new();
        for value in docs.values() {
            let doc: D = serde_json::from_value(value.clone())?;
            if filter(&doc) {
                matched.push(doc);
            }
        }
        Ok(matched)
    }

    fn replace<D: Document>(&mut self, collection: &str, doc: &D) -> Result<bool> {
        self.check_writable()?;
        let Some(docs) = self.collections.get_mut(collection) else {
            return Ok(false);
        };
        let key = doc.id().to_string();
        if !docs.contains_key(&key) {
            return Ok(false);
        }
        docs.insert(key, serde_json::to_value(doc)?);
        Ok(true)
    }

    fn remove(&mut self, collection: &str, id: &Id) -> Result<bool> {
        self.check_writable()?;
        Ok(self
            .collections
            .get_mut(collection)
            .is_some_and(|docs| docs.remove(id.as_str()).is_some()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::UserRecord;

    fn user(name: &str) -> UserRecord {
        UserRecord {
            id: Id::fresh(),
            username: name.to_string(),
            password: "pw".to_string(),
        }
    }

    #[test]
    fn insert_then_get() {
        let mut store = InMemoryStore::new();
        let doc = user("ada");
        store.insert("users", &doc).unwrap();

        let fetched: UserRecord = store.get("users", &doc.id).unwrap().unwrap();
        assert_eq!(fetched.username, "ada");
    }

    #[test]
    fn insert_rejects_duplicate_id() {
        let mut store = InMemoryStore::new();
        let doc = user("ada");
        store.insert("users", &doc).unwrap();

        let err = store.insert("users", &doc).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateId(_, _)));
    }

    #[test]
    fn find_one_matches_by_field() {
        let mut store = InMemoryStore::new();
        store.insert("users", &user("ada")).unwrap();
        store.insert("users", &user("brin")).unwrap();

        let found: Option<UserRecord> = store
            .find_one("users", |u: &UserRecord| u.username == "brin")
            .unwrap();
        assert_eq!(found.unwrap().username, "brin");

        let missing: Option<UserRecord> = store
            .find_one("users", |u: &UserRecord| u.username == "carol")
            .unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn replace_returns_false_for_unknown_doc() {
        let mut store = InMemoryStore::new();
        assert!(!store.replace("users", &user("ada")).unwrap());
    }

    #[test]
    fn remove_reports_presence() {
        let mut store = InMemoryStore::new();
        let doc = user("ada");
        store.insert("users", &doc).unwrap();

        assert!(store.remove("users", &doc.id).unwrap());
        assert!(!store.remove("users", &doc.id).unwrap());
    }
}
