//! Comment registry: a resource holds an ordered list of comments.

use crate::error::{OpError, OpResult};
use crate::id::Id;
use crate::model::{CommentEntry, ResourceEntry};
use crate::store::DocumentStore;
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

const RESOURCES: &str = "comment.resources";
const COMMENTS: &str = "comment.comments";

/// Comments on registered resources.
///
/// Two collections: one entry per registered resource carrying its comment
/// ids in insertion order, and one entry per comment. A comment id listed by
/// a resource always has a matching entry until removal; removal deletes the
/// back-reference and the entry together.
pub struct Comments<S: DocumentStore> {
    store: S,
}

impl<S: DocumentStore> Comments<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Open a resource for commenting.
    ///
    /// Fails with `AlreadyExists` if the resource is already registered.
    pub fn register(&mut self, resource: &Id) -> OpResult<()> {
        if self.store.get::<ResourceEntry>(RESOURCES, resource)?.is_some() {
            return Err(OpError::AlreadyExists(format!(
                "Resource '{}' is already registered.",
                resource
            )));
        }
        self.store
            .insert(RESOURCES, &ResourceEntry::new(resource.clone()))?;
        debug!(%resource, "resource registered for comments");
        Ok(())
    }

    /// Add a comment to a registered resource, returning the new comment id.
    ///
    /// Duplicate content is permitted and always yields a fresh, distinct id.
    pub fn add_comment(
        &mut self,
        resource: &Id,
        commenter: &Id,
        text: impl Into<String>,
        date: DateTime<Utc>,
    ) -> OpResult<Id> {
        let Some(mut entry) = self.store.get::<ResourceEntry>(RESOURCES, resource)? else {
            return Err(OpError::NotFound(format!(
                "Resource '{}' is not registered.",
                resource
            )));
        };

        let comment = CommentEntry {
            id: Id::fresh(),
            text: text.into(),
            commenter: commenter.clone(),
            date,
        };
        self.store.insert(COMMENTS, &comment)?;

        entry.comments.push(comment.id.clone());
        self.store.replace(RESOURCES, &entry)?;

        debug!(%resource, comment = %comment.id, "comment added");
        Ok(comment.id)
    }

    /// Remove a comment and its back-reference.
    ///
    /// If no resource currently lists the comment (the resource entry was
    /// removed out of band), the entry is deleted anyway — an orphan is a
    /// tolerated inconsistency, not an error.
    pub fn remove_comment(&mut self, comment: &Id) -> OpResult<()> {
        if self.store.get::<CommentEntry>(COMMENTS, comment)?.is_none() {
            return Err(OpError::NotFound(format!(
                "Comment '{}' does not exist.",
                comment
            )));
        }

        let holder = self
            .store
            .find_one(RESOURCES, |r: &ResourceEntry| r.comments.contains(comment))?;
        match holder {
            Some(mut entry) => {
                entry.comments.retain(|c| c != comment);
                self.store.replace(RESOURCES, &entry)?;
            }
            None => {
                warn!(%comment, "removing orphaned comment with no owning resource");
            }
        }

        self.store.remove(COMMENTS, comment)?;
        debug!(%comment, "comment removed");
        Ok(())
    }

    /// The comments on a resource, in insertion order.
    pub fn comments_for(&self, resource: &Id) -> OpResult<Vec<CommentEntry>> {
        let Some(entry) = self.store.get::<ResourceEntry>(RESOURCES, resource)? else {
            return Err(OpError::NotFound(format!(
                "Resource '{}' is not registered.",
                resource
            )));
        };
        let mut comments = Vec::with_capacity(entry.comments.len());
        for id in &entry.comments {
            if let Some(comment) = self.store.get::<CommentEntry>(COMMENTS, id)? {
                comments.push(comment);
            }
        }
        Ok(comments)
    }

    #[cfg(test)]
    fn resource_entry(&self, resource: &Id) -> Option<ResourceEntry> {
        self.store.get(RESOURCES, resource).unwrap()
    }
}
