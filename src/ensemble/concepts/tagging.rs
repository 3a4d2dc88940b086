//! Tag registry: free-form tags attached to registered resources.

use crate::completion::TextCompletion;
use crate::error::{OpError, OpResult};
use crate::id::Id;
use crate::model::Registry;
use crate::store::DocumentStore;
use tracing::debug;

const REGISTRIES: &str = "tagging.registries";

/// Tagged resource registries.
///
/// One registry per live resource. A resource can only be registered once at
/// a time, but deleting its registry frees it for re-registration under a new
/// registry id with an empty tag set.
pub struct Tagging<S: DocumentStore> {
    store: S,
}

impl<S: DocumentStore> Tagging<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Register a resource for tagging, returning the new registry id.
    pub fn register_resource(
        &mut self,
        resource: &Id,
        description: impl Into<String>,
    ) -> OpResult<Id> {
        let taken = self
            .store
            .find_one(REGISTRIES, |r: &Registry| &r.resource == resource)?;
        if taken.is_some() {
            return Err(OpError::AlreadyExists(format!(
                "Resource {} is already registered.",
                resource
            )));
        }

        let registry = Registry::new(resource.clone(), description.into());
        let id = registry.id.clone();
        self.store.insert(REGISTRIES, &registry)?;
        debug!(%resource, registry = %id, "resource registered for tagging");
        Ok(id)
    }

    /// Attach a tag. Duplicate adds fail loudly rather than no-op.
    pub fn add_tag(&mut self, registry: &Id, tag: &str) -> OpResult<()> {
        let mut entry = self.require(registry)?;
        if entry.tags.iter().any(|t| t == tag) {
            return Err(OpError::AlreadyExists(format!(
                "Tag \"{}\" already exists for registry {}.",
                tag, registry
            )));
        }
        entry.tags.push(tag.to_string());
        self.store.replace(REGISTRIES, &entry)?;
        debug!(%registry, tag, "tag added");
        Ok(())
    }

    /// Detach a tag. Removing an absent tag fails loudly rather than no-op.
    pub fn remove_tag(&mut self, registry: &Id, tag: &str) -> OpResult<()> {
        let mut entry = self.require(registry)?;
        let before = entry.tags.len();
        entry.tags.retain(|t| t != tag);
        if entry.tags.len() == before {
            return Err(OpError::NotFound(format!(
                "Tag \"{}\" not found for registry {}.",
                tag, registry
            )));
        }
        self.store.replace(REGISTRIES, &entry)?;
        debug!(%registry, tag, "tag removed");
        Ok(())
    }

    /// Delete a registry entirely, freeing its resource.
    pub fn delete_registry(&mut self, registry: &Id) -> OpResult<()> {
        if !self.store.remove(REGISTRIES, registry)? {
            return Err(OpError::NotFound(format!(
                "Registry {} not found.",
                registry
            )));
        }
        debug!(%registry, "registry deleted");
        Ok(())
    }

    /// Ask the text-completion collaborator for tag suggestions based on the
    /// registry's description and current tags.
    ///
    /// The reply is parsed as a comma-separated list; suggestions are
    /// trimmed, lowercased, deduplicated, and filtered against tags already
    /// present. They are returned to the caller, never auto-applied.
    pub fn suggest_tags(&self, registry: &Id, llm: &impl TextCompletion) -> OpResult<Vec<String>> {
        let entry = self.require(registry)?;

        let prompt = format!(
            "Suggest up to five short descriptive tags for a piece of music.\n\
             Description: {}\n\
             Existing tags: {}\n\
             Reply with a comma-separated list of tags only.",
            entry.description,
            if entry.tags.is_empty() {
                "(none)".to_string()
            } else {
                entry.tags.join(", ")
            },
        );
        let reply = llm.complete(&prompt)?;

        let mut suggestions: Vec<String> = Vec::new();
        for candidate in reply.split(',') {
            let tag = candidate.trim().to_lowercase();
            if tag.is_empty() || entry.tags.iter().any(|t| t == &tag) {
                continue;
            }
            if !suggestions.contains(&tag) {
                suggestions.push(tag);
            }
        }
        Ok(suggestions)
    }

    /// The registry for a resource, if any.
    pub fn registry_for(&self, resource: &Id) -> OpResult<Option<Registry>> {
        Ok(self
            .store
            .find_one(REGISTRIES, |r: &Registry| &r.resource == resource)?)
    }

    fn require(&self, registry: &Id) -> OpResult<Registry> {
        self.store
            .get::<Registry>(REGISTRIES, registry)?
            .ok_or_else(|| OpError::NotFound(format!("Registry {} not found.", registry)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::CannedCompletion;
    use crate::store::memory::InMemoryStore;

    fn concept() -> Tagging<InMemoryStore> {
        Tagging::new(InMemoryStore::new())
    }

    #[test]
    fn register_add_remove_tags() {
        let mut tagging = concept();
        let resource = Id::from("track-1");
        let registry = tagging
            .register_resource(&resource, "A powerful orchestral piece with heavy brass.")
            .unwrap();

        tagging.add_tag(&registry, "orchestral").unwrap();
        tagging.add_tag(&registry, "epic").unwrap();
        tagging.add_tag(&registry, "brass").unwrap();
        tagging.remove_tag(&registry, "epic").unwrap();

        let entry = tagging.registry_for(&resource).unwrap().unwrap();
        assert_eq!(entry.tags, vec!["orchestral", "brass"]);
    }

    #[test]
    fn duplicate_resource_registration_fails() {
        let mut tagging = concept();
        let resource = Id::from("track-1");
        tagging.register_resource(&resource, "first").unwrap();

        let err = tagging
            .register_resource(&resource, "second")
            .unwrap_err();
        assert!(matches!(err, OpError::AlreadyExists(_)));
    }

    #[test]
    fn duplicate_tag_add_fails_and_leaves_tags_unchanged() {
        let mut tagging = concept();
        let registry = tagging
            .register_resource(&Id::from("track-1"), "desc")
            .unwrap();
        tagging.add_tag(&registry, "pop").unwrap();

        let err = tagging.add_tag(&registry, "pop").unwrap_err();
        assert!(matches!(err, OpError::AlreadyExists(_)));

        let entry = tagging.require(&registry).unwrap();
        assert_eq!(entry.tags, vec!["pop"]);
    }

    #[test]
    fn tag_operations_on_unknown_registry_fail() {
        let mut tagging = concept();
        let ghost = Id::from("ghost");
        assert!(matches!(
            tagging.add_tag(&ghost, "x").unwrap_err(),
            OpError::NotFound(_)
        ));
        assert!(matches!(
            tagging.remove_tag(&ghost, "x").unwrap_err(),
            OpError::NotFound(_)
        ));
        assert!(matches!(
            tagging.delete_registry(&ghost).unwrap_err(),
            OpError::NotFound(_)
        ));
    }

    #[test]
    fn removing_absent_tag_fails() {
        let mut tagging = concept();
        let registry = tagging
            .register_resource(&Id::from("track-1"), "desc")
            .unwrap();
        tagging.add_tag(&registry, "upbeat").unwrap();

        let err = tagging.remove_tag(&registry, "sad").unwrap_err();
        assert!(matches!(err, OpError::NotFound(_)));
        assert_eq!(tagging.require(&registry).unwrap().tags, vec!["upbeat"]);
    }

    #[test]
    fn delete_frees_resource_for_fresh_registration() {
        let mut tagging = concept();
        let resource = Id::from("track-1");
        let first = tagging.register_resource(&resource, "old").unwrap();
        tagging.add_tag(&first, "old-tag").unwrap();

        tagging.delete_registry(&first).unwrap();
        assert!(matches!(
            tagging.delete_registry(&first).unwrap_err(),
            OpError::NotFound(_)
        ));

        let second = tagging.register_resource(&resource, "new").unwrap();
        assert_ne!(first, second);

        let entry = tagging.registry_for(&resource).unwrap().unwrap();
        assert_eq!(entry.id, second);
        assert_eq!(entry.description, "new");
        assert!(entry.tags.is_empty());
    }

    #[test]
    fn suggest_tags_parses_and_filters_reply() {
        let mut tagging = concept();
        let registry = tagging
            .register_resource(&Id::from("track-1"), "slow piano ballad")
            .unwrap();
        tagging.add_tag(&registry, "piano").unwrap();

        let llm = CannedCompletion::replies("Piano, ballad , mellow, ballad,");
        let suggestions = tagging.suggest_tags(&registry, &llm).unwrap();
        assert_eq!(suggestions, vec!["ballad", "mellow"]);
    }

    #[test]
    fn suggest_tags_surfaces_collaborator_failure() {
        let mut tagging = concept();
        let registry = tagging
            .register_resource(&Id::from("track-1"), "desc")
            .unwrap();

        let llm = CannedCompletion::fails("quota exceeded");
        let err = tagging.suggest_tags(&registry, &llm).unwrap_err();
        assert!(matches!(err, OpError::External(_)));
    }
}
