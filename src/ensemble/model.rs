use crate::id::Id;
use crate::store::Document;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A resource opened for commenting. Created by `Comments::register`,
/// mutated as comments come and go, never auto-deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceEntry {
    pub id: Id,
    /// Comment ids in insertion order.
    pub comments: Vec<Id>,
}

impl ResourceEntry {
    pub fn new(id: Id) -> Self {
        Self {
            id,
            comments: Vec::new(),
        }
    }
}

impl Document for ResourceEntry {
    fn id(&self) -> &Id {
        &self.id
    }
}

/// A single comment. Lives until explicitly removed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentEntry {
    pub id: Id,
    pub text: String,
    pub commenter: Id,
    pub date: DateTime<Utc>,
}

impl Document for CommentEntry {
    fn id(&self) -> &Id {
        &self.id
    }
}

/// A tag registry for one resource. Deleting a registry frees its resource
/// for re-registration under a new registry id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registry {
    pub id: Id,
    pub resource: Id,
    pub description: String,
    /// No duplicates; add/remove fail loudly rather than silently no-op.
    pub tags: Vec<String>,
}

impl Registry {
    pub fn new(resource: Id, description: String) -> Self {
        Self {
            id: Id::fresh(),
            resource,
            description,
            tags: Vec::new(),
        }
    }
}

impl Document for Registry {
    fn id(&self) -> &Id {
        &self.id
    }
}

/// Metadata for a confirmed upload.
///
/// The `id` is always the one embedded in the storage key at request time;
/// confirmation never mints a fresh id. That is what binds the two phases of
/// the upload flow without server-held session state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileRecord {
    pub id: Id,
    pub title: String,
    pub owner: Id,
    /// Permanent public retrieval URL.
    pub url: String,
    /// Full object key in the storage bucket.
    pub storage_key: String,
    /// The file name as supplied by the uploader, e.g. "demo.mp3".
    pub file_name: String,
}

impl Document for FileRecord {
    fn id(&self) -> &Id {
        &self.id
    }
}

/// A credential record. Username is unique; login/delete/change-password
/// match on the exact (username, password) pair, never by id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: Id,
    pub username: String,
    // Stored as given. Exact-match semantics, no hashing; see DESIGN.md.
    pub password: String,
}

impl Document for UserRecord {
    fn id(&self) -> &Id {
        &self.id
    }
}
