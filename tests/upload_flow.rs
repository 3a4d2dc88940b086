//! End-to-end exercise of the two-phase upload protocol against the file
//! backend: request a ticket, simulate the client upload, confirm, view,
//! delete.

use ensemble::concepts::files::FileUrls;
use ensemble::error::OpError;
use ensemble::id::Id;
use ensemble::key::ObjectKey;
use ensemble::objects::memory::MemoryBucket;
use ensemble::store::fs::FileStore;
use tempfile::TempDir;

fn concept(dir: &TempDir) -> FileUrls<FileStore, MemoryBucket> {
    FileUrls::new(
        FileStore::new(dir.path().to_path_buf()),
        MemoryBucket::new("tracks"),
    )
}

#[test]
fn full_upload_lifecycle() {
    let dir = TempDir::new().unwrap();
    let mut files = concept(&dir);
    let owner = Id::from("ada");

    // Phase one: a ticket, nothing persisted yet.
    let ticket = files.request_upload("live set.mp3", &owner).unwrap();
    assert!(ticket.upload_url.contains("action=write"));
    assert!(files.files_by_owner(&owner).unwrap().is_empty());

    // The key embeds owner and encoded file name.
    let key = ObjectKey::parse(&ticket.storage_key).unwrap();
    assert_eq!(key.owner, owner);
    assert_eq!(key.file_name, "live set.mp3");

    // Confirming before the client uploads fails.
    let err = files
        .confirm_upload("live set.mp3", "Live Set", &ticket.storage_key, &owner)
        .unwrap_err();
    assert!(matches!(err, OpError::NotFound(_)));

    // The client uploads, then confirms.
    files.objects_mut().put(&ticket.storage_key);
    let id = files
        .confirm_upload("live set.mp3", "Live Set", &ticket.storage_key, &owner)
        .unwrap();
    assert_eq!(id, key.file);

    // Metadata is persisted in the store on disk.
    let record = files.file(&id).unwrap().unwrap();
    assert_eq!(record.title, "Live Set");
    assert_eq!(record.url, format!("https://storage.test/tracks/{}", ticket.storage_key));

    // Read access goes through a fresh signed URL.
    let view = files.view_url(&ticket.storage_key).unwrap();
    assert!(view.contains("action=read"));

    // Double confirmation is refused.
    let err = files
        .confirm_upload("live set.mp3", "Live Set", &ticket.storage_key, &owner)
        .unwrap_err();
    assert!(matches!(err, OpError::AlreadyExists(_)));

    // Deleting removes object and record; the view URL goes stale.
    files.delete_file(&id, &owner).unwrap();
    assert!(files.file(&id).unwrap().is_none());
    assert!(matches!(
        files.view_url(&ticket.storage_key).unwrap_err(),
        OpError::NotFound(_)
    ));
}

#[test]
fn a_presented_key_must_belong_to_the_caller() {
    let dir = TempDir::new().unwrap();
    let mut files = concept(&dir);
    let owner = Id::from("ada");

    let ticket = files.request_upload("demo.flac", &owner).unwrap();
    files.objects_mut().put(&ticket.storage_key);

    let err = files
        .confirm_upload("demo.flac", "Demo", &ticket.storage_key, &Id::from("mallory"))
        .unwrap_err();
    assert!(matches!(err, OpError::IntegrityMismatch(_)));
    assert!(files.files_by_owner(&owner).unwrap().is_empty());
}
