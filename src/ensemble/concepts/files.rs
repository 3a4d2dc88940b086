//! Two-phase file upload: request a write capability, confirm after upload.
//!
//! Phase one issues a signed upload URL addressed to a storage key that
//! embeds the owner, a freshly minted file id, and the file name. Nothing is
//! persisted; the key is the only state and the client holds it. Phase two
//! presents the key back, and the embedded fields are cross-checked against
//! the caller's claims before a [`FileRecord`] is committed under the
//! embedded id.

use crate::error::{OpError, OpResult};
use crate::id::Id;
use crate::key::ObjectKey;
use crate::model::FileRecord;
use crate::objects::{AccessMode, ObjectStore};
use crate::store::DocumentStore;
use std::time::Duration;
use tracing::{debug, warn};

const FILES: &str = "fileurl.files";

/// How long issued signed URLs stay valid.
pub const SIGNED_URL_TTL: Duration = Duration::from_secs(15 * 60);

/// The result of a successful upload request.
#[derive(Debug, Clone)]
pub struct UploadTicket {
    /// Short-lived, write-capable signed URL the client uploads to.
    pub upload_url: String,
    /// The storage key the client must present at confirmation.
    pub storage_key: String,
}

/// Uploaded-file metadata guarded by the two-phase protocol.
pub struct FileUrls<S: DocumentStore, O: ObjectStore> {
    store: S,
    objects: O,
}

impl<S: DocumentStore, O: ObjectStore> FileUrls<S, O> {
    pub fn new(store: S, objects: O) -> Self {
        Self { store, objects }
    }

    /// Phase one: issue an upload capability for (file_name, owner).
    ///
    /// Fails if the name is blank or a confirmed file with this name already
    /// exists for this owner. No record is persisted here.
    pub fn request_upload(&self, file_name: &str, owner: &Id) -> OpResult<UploadTicket> {
        if file_name.trim().is_empty() {
            return Err(OpError::InvalidInput("File name cannot be empty.".into()));
        }

        let existing = self.store.find_one(FILES, |f: &FileRecord| {
            f.file_name == file_name && &f.owner == owner
        })?;
        if let Some(file) = existing {
            return Err(OpError::AlreadyExists(format!(
                "A file named '{}' has already been uploaded by owner '{}' (file id: {}).",
                file_name, owner, file.id
            )));
        }

        let key = ObjectKey::new(owner.clone(), Id::fresh(), file_name);
        let storage_key = key.encode();
        let upload_url = self
            .objects
            .signed_url(&storage_key, AccessMode::Write, SIGNED_URL_TTL)?;

        debug!(%owner, %storage_key, "upload requested");
        Ok(UploadTicket {
            upload_url,
            storage_key,
        })
    }

    /// Phase two: validate the presented key and commit the file record.
    ///
    /// The record's id is the one embedded in the key at request time; it is
    /// never minted here. Repeat confirmation of the same key fails with
    /// `AlreadyExists` and changes nothing.
    pub fn confirm_upload(
        &mut self,
        file_name: &str,
        title: &str,
        storage_key: &str,
        owner: &Id,
    ) -> OpResult<Id> {
        if file_name.trim().is_empty() {
            return Err(OpError::InvalidInput("File name cannot be empty.".into()));
        }
        if title.trim().is_empty() {
            return Err(OpError::InvalidInput("Title cannot be empty.".into()));
        }
        if storage_key.trim().is_empty() {
            return Err(OpError::InvalidInput("Storage key cannot be empty.".into()));
        }

        let key = ObjectKey::parse(storage_key)
            .map_err(|err| OpError::InvalidInput(err.to_string()))?;

        if &key.owner != owner {
            return Err(OpError::IntegrityMismatch(format!(
                "Mismatched owner: provided '{}' does not match owner '{}' in the storage key.",
                owner, key.owner
            )));
        }
        if key.file_name != file_name {
            return Err(OpError::IntegrityMismatch(format!(
                "Mismatched file name: provided '{}' does not match '{}' in the storage key.",
                file_name, key.file_name
            )));
        }

        if !self.objects.exists(storage_key)? {
            return Err(OpError::NotFound(format!(
                "No object at storage key '{}'; the upload never completed.",
                storage_key
            )));
        }

        if self.store.get::<FileRecord>(FILES, &key.file)?.is_some() {
            return Err(OpError::AlreadyExists(format!(
                "File record '{}' already exists; this upload has already been confirmed.",
                key.file
            )));
        }

        let record = FileRecord {
            id: key.file.clone(),
            title: title.to_string(),
            owner: owner.clone(),
            url: self.objects.public_url(storage_key),
            storage_key: storage_key.to_string(),
            file_name: file_name.to_string(),
        };
        self.store.insert(FILES, &record)?;

        debug!(file = %record.id, %owner, "upload confirmed");
        Ok(record.id)
    }

    /// Delete a file the caller owns: storage object first, then metadata.
    ///
    /// If the storage deletion fails the record is deliberately left intact
    /// and the failure reported — manual reconciliation beats a silently
    /// orphaned object.
    pub fn delete_file(&mut self, file: &Id, user: &Id) -> OpResult<()> {
        let Some(record) = self.store.get::<FileRecord>(FILES, file)? else {
            return Err(OpError::NotFound(format!("File '{}' not found.", file)));
        };
        if &record.owner != user {
            return Err(OpError::PermissionDenied(format!(
                "User '{}' is not allowed to delete file '{}' (owner is '{}').",
                user, file, record.owner
            )));
        }

        if let Err(err) = self.objects.delete(&record.storage_key) {
            warn!(%file, key = %record.storage_key, %err, "storage delete failed; metadata kept");
            return Err(OpError::External(format!(
                "Failed to delete storage object for file '{}': {}. The metadata record was kept.",
                file, err
            )));
        }

        self.store.remove(FILES, file)?;
        debug!(%file, "file deleted");
        Ok(())
    }

    /// Short-lived read URL for an existing object.
    pub fn view_url(&self, storage_key: &str) -> OpResult<String> {
        if !self.objects.exists(storage_key)? {
            return Err(OpError::NotFound(format!(
                "No object at storage key '{}'.",
                storage_key
            )));
        }
        Ok(self
            .objects
            .signed_url(storage_key, AccessMode::Read, SIGNED_URL_TTL)?)
    }

    /// All confirmed files owned by `user`.
    pub fn files_by_owner(&self, user: &Id) -> OpResult<Vec<FileRecord>> {
        Ok(self
            .store
            .find_all(FILES, |f: &FileRecord| &f.owner == user)?)
    }

    /// A single file record, if confirmed.
    pub fn file(&self, id: &Id) -> OpResult<Option<FileRecord>> {
        Ok(self.store.get(FILES, id)?)
    }

    /// A confirmed file's title.
    pub fn file_title(&self, id: &Id) -> OpResult<String> {
        match self.store.get::<FileRecord>(FILES, id)? {
            Some(record) => Ok(record.title),
            None => Err(OpError::NotFound("File not found.".into())),
        }
    }

    /// The injected storage collaborator.
    pub fn objects_mut(&mut self) -> &mut O {
        &mut self.objects
    }
}
