use super::{AccessMode, ObjectStore, Result};
use crate::error::ObjectStoreError;
use chrono::{Duration as ChronoDuration, Utc};
use std::collections::HashSet;
use std::time::Duration;

/// In-memory bucket for testing the upload flow.
///
/// Tracks object keys only (no bodies). [`MemoryBucket::put`] stands in for
/// the client performing the actual upload against a signed URL. Signed URLs
/// are fabricated deterministically so tests can assert on their shape.
pub struct MemoryBucket {
    bucket: String,
    objects: HashSet<String>,
    simulate_unavailable: bool,
}

impl MemoryBucket {
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            objects: HashSet::new(),
            simulate_unavailable: false,
        }
    }

    /// Simulate the storage service being unreachable; every call fails.
    pub fn set_simulate_unavailable(&mut self, unavailable: bool) {
        self.simulate_unavailable = unavailable;
    }

    /// Simulate a client completing an upload to `key`.
    pub fn put(&mut self, key: &str) {
        self.objects.insert(key.to_string());
    }

    pub fn contains(&self, key: &str) -> bool {
        self.objects.contains(key)
    }

    fn check_available(&self) -> Result<()> {
        if self.simulate_unavailable {
            return Err(ObjectStoreError::Backend(
                "Storage service unavailable".to_string(),
            ));
        }
        Ok(())
    }
}

impl ObjectStore for MemoryBucket {
    fn signed_url(&self, key: &str, mode: AccessMode, ttl: Duration) -> Result<String> {
        self.check_available()?;
        let action = match mode {
            AccessMode::Read => "read",
            AccessMode::Write => "write",
        };
        let expires = Utc::now()
            + ChronoDuration::from_std(ttl)
                .map_err(|e| ObjectStoreError::Backend(e.to_string()))?;
        Ok(format!(
            "https://storage.test/{}/{}?action={}&expires={}",
            self.bucket,
            key,
            action,
            expires.timestamp(),
        ))
    }

    fn exists(&self, key: &str) -> Result<bool> {
        self.check_available()?;
        Ok(self.objects.contains(key))
    }

    fn delete(&mut self, key: &str) -> Result<()> {
        self.check_available()?;
        if !self.objects.remove(key) {
            return Err(ObjectStoreError::NoSuchObject(key.to_string()));
        }
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!("https://storage.test/{}/{}", self.bucket, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exists_tracks_put_and_delete() {
        let mut bucket = MemoryBucket::new("demo");
        assert!(!bucket.exists("a/b").unwrap());

        bucket.put("a/b");
        assert!(bucket.exists("a/b").unwrap());

        bucket.delete("a/b").unwrap();
        assert!(!bucket.exists("a/b").unwrap());
    }

    #[test]
    fn delete_of_missing_object_fails() {
        let mut bucket = MemoryBucket::new("demo");
        let err = bucket.delete("nope").unwrap_err();
        assert!(matches!(err, ObjectStoreError::NoSuchObject(_)));
    }

    #[test]
    fn signed_url_carries_mode_and_key() {
        let bucket = MemoryBucket::new("demo");
        let url = bucket
            .signed_url("a/b", AccessMode::Write, Duration::from_secs(900))
            .unwrap();
        assert!(url.contains("demo/a/b"));
        assert!(url.contains("action=write"));
    }
}
