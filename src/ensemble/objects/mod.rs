//! # Object Storage Port
//!
//! The [`ObjectStore`] trait is the crate's view of a blob-storage service:
//! issue time-limited signed URLs for one object, check whether an object
//! exists, delete it, and build its permanent public URL. The actual upload
//! and download traffic never passes through this crate — clients talk to the
//! storage service directly using the signed URLs.
//!
//! Like the document store, the port is injected at construction. The only
//! in-tree implementation is [`memory::MemoryBucket`], which the upload tests
//! drive; a production implementation wraps a cloud bucket client.

use crate::error::ObjectStoreError;
use std::time::Duration;

pub mod memory;

pub type Result<T> = std::result::Result<T, ObjectStoreError>;

/// Whether a signed URL grants download or upload access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    Read,
    Write,
}

/// Abstract interface to an object-storage bucket.
///
/// All calls are fallible, time-bounded remote calls. No retry is attempted
/// at this layer.
pub trait ObjectStore {
    /// Issue a signed URL granting `mode` access to `key` for `ttl`.
    fn signed_url(&self, key: &str, mode: AccessMode, ttl: Duration) -> Result<String>;

    /// Whether an object currently exists at `key`.
    fn exists(&self, key: &str) -> Result<bool>;

    /// Delete the object at `key`. Fails with
    /// [`ObjectStoreError::NoSuchObject`] if there is none.
    fn delete(&mut self, key: &str) -> Result<()>;

    /// Permanent, unauthenticated retrieval URL for `key`.
    fn public_url(&self, key: &str) -> String;
}
