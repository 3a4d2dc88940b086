use super::{Document, DocumentStore, Result};
use crate::id::Id;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::StoreError;

/// File-based document store.
///
/// Each collection is persisted as `<collection>.json` under the store root,
/// holding a map of document id to document body. Collections are loaded and
/// rewritten whole; at this crate's scale (dozens of documents per
/// collection) that is simpler than an incremental format and keeps the files
/// hand-inspectable.
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn collection_path(&self, collection: &str) -> PathBuf {
        self.root.join(format!("{}.json", collection))
    }

    fn ensure_root(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(StoreError::Io)?;
        }
        Ok(())
    }

    fn load(&self, collection: &str) -> Result<HashMap<String, serde_json::Value>> {
        let path = self.collection_path(collection);
        if !path.exists() {
            return Ok(HashMap::new());
        }
        let content = fs::read_to_string(path).map_err(StoreError::Io)?;
        let docs = serde_json::from_str(&content).map_err(StoreError::Serialization)?;
        Ok(docs)
    }

    fn save(&self, collection: &str, docs: &HashMap<String, serde_json::Value>) -> Result<()> {
        self.ensure_root()?;
        let content = serde_json::to_string_pretty(docs).map_err(StoreError::Serialization)?;
        fs::write(self.collection_path(collection), content).map_err(StoreError::Io)?;
        Ok(())
    }
}

impl DocumentStore for FileStore {
    fn insert<D: Document>(&mut self, collection: &str, doc: &D) -> Result<()> {
        let mut docs = self.load(collection)?;
        let key = doc.id().to_string();
        if docs.contains_key(&key) {
            return Err(StoreError::DuplicateId(key, collection.to_string()));
        }
        docs.insert(key, serde_json::to_value(doc)?);
        self.save(collection, &docs)
    }

    fn get<D: Document>(&self, collection: &str, id: &Id) -> Result<Option<D>> {
        let docs = self.load(collection)?;
        match docs.get(id.as_str()) {
            Some(value) => Ok(Some(serde_json::from_value(value.clone())?)),
            None => Ok(None),
        }
    }

    fn find_one<D: Document>(
        &self,
        collection: &str,
        filter: impl Fn(&D) -> bool,
    ) -> Result<Option<D>> {
        for value in self.load(collection)?.into_values() {
            let doc: D = serde_json::from_value(value)?;
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
        let mut matched = Vec::new();
        for value in self.load(collection)?.into_values() {
            let doc: D = serde_json::from_value(value)?;
            if filter(&doc) {
                matched.push(doc);
            }
        }
        Ok(matched)
    }

    fn replace<D: Document>(&mut self, collection: &str, doc: &D) -> Result<bool> {
        let mut docs = self.load(collection)?;
        let key = doc.id().to_string();
        if !docs.contains_key(&key) {
            return Ok(false);
        }
        docs.insert(key, serde_json::to_value(doc)?);
        self.save(collection, &docs)?;
        Ok(true)
    }

    fn remove(&mut self, collection: &str, id: &Id) -> Result<bool> {
        let mut docs = self.load(collection)?;
        if docs.remove(id.as_str()).is_none() {
            return Ok(false);
        }
        self.save(collection, &docs)?;
        Ok(true)
    }
}
