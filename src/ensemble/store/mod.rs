//! # Storage Layer
//!
//! This module defines the document-store abstraction every concept is built
//! on. The [`DocumentStore`] trait models a small document database: named
//! collections of serde documents, each keyed by a unique [`Id`].
//!
//! ## Design Rationale
//!
//! Storage is abstracted behind a trait to:
//! - Enable **testing** with `InMemoryStore` (no filesystem needed)
//! - Allow **future backends** (an actual database) without touching concepts
//! - Keep concept logic **decoupled** from persistence details
//!
//! Each concept receives its store at construction — there is no ambient or
//! global database handle anywhere in the crate.
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: file-based storage, one JSON file per collection
//!   (`<collection>.json` holding an id → document map)
//! - [`memory::InMemoryStore`]: in-memory storage for fast, isolated tests
//!
//! ## Consistency
//!
//! `insert` rejects a duplicate document id at the storage layer. Field-level
//! uniqueness (a username, a registered resource) is enforced by the concepts'
//! precondition checks, which are serialized behind `&mut self` — two racing
//! registrations cannot interleave on one store handle.

use crate::error::StoreError;
use crate::id::Id;
use serde::de::DeserializeOwned;
use serde::Serialize;

pub mod fs;
pub mod memory;

pub type Result<T> = std::result::Result<T, StoreError>;

/// A persistable document: serde-serializable and self-identifying.
pub trait Document: Serialize + DeserializeOwned {
    fn id(&self) -> &Id;
}

/// Abstract interface for document storage.
///
/// Collections are addressed by name and spring into existence on first
/// write; reading a collection that was never written yields no documents.
pub trait DocumentStore {
    /// Insert a new document. Fails with [`StoreError::DuplicateId`] if a
    /// document with the same id is already present.
    fn insert<D: Document>(&mut self, collection: &str, doc: &D) -> Result<()>;

    /// Fetch a document by id.
    fn get<D: Document>(&self, collection: &str, id: &Id) -> Result<Option<D>>;

    /// Fetch the first document matching `filter`.
    fn find_one<D: Document>(
        &self,
        collection: &str,
        filter: impl Fn(&D) -> bool,
    ) -> Result<Option<D>>;

    /// Fetch every document matching `filter`.
    fn find_all<D: Document>(
        &self,
        collection: &str,
        filter: impl Fn(&D) -> bool,
    ) -> Result<Vec<D>>;

    /// Overwrite an existing document in place. Returns `false` if no
    /// document with that id exists (nothing written).
    fn replace<D: Document>(&mut self, collection: &str, doc: &D) -> Result<bool>;

    /// Delete a document by id. Returns `false` if it was not present.
    fn remove(&mut self, collection: &str, id: &Id) -> Result<bool>;
}
