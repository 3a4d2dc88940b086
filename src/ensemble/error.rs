use thiserror::Error;

/// Infrastructure failures of a storage backend.
///
/// These are distinct from [`OpError`]: a `StoreError` means the store itself
/// misbehaved (I/O, corrupt data), not that a precondition failed.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Document '{0}' already exists in collection '{1}'")]
    DuplicateId(String, String),

    #[error("Store error: {0}")]
    Backend(String),
}

/// Failure of the object-storage collaborator.
#[derive(Error, Debug)]
pub enum ObjectStoreError {
    #[error("No object at key '{0}'")]
    NoSuchObject(String),

    #[error("Object storage error: {0}")]
    Backend(String),
}

/// Failure of the text-completion collaborator.
#[derive(Error, Debug)]
pub enum CompletionError {
    #[error("Completion error: {0}")]
    Backend(String),
}

/// The error half of every concept operation result.
///
/// Expected precondition failures are data, not panics: every operation
/// returns `Result<Payload, OpError>` and callers pattern-match. The variants
/// are categories; the payload is the human-readable message describing which
/// entity failed and why.
#[derive(Error, Debug)]
pub enum OpError {
    /// A uniqueness precondition failed (duplicate registration, tag,
    /// username, or double confirmation).
    #[error("{0}")]
    AlreadyExists(String),

    /// The entity the operation targets does not exist, or the credentials
    /// match no record.
    #[error("{0}")]
    NotFound(String),

    /// Structurally invalid input: empty required field, malformed key.
    #[error("{0}")]
    InvalidInput(String),

    /// The caller is not allowed to act on this entity.
    #[error("{0}")]
    PermissionDenied(String),

    /// Caller-supplied data disagrees with data embedded in a capability.
    #[error("{0}")]
    IntegrityMismatch(String),

    /// A collaborator (document store, object storage, text completion)
    /// failed; the underlying message is passed through.
    #[error("{0}")]
    External(String),
}

impl From<StoreError> for OpError {
    fn from(err: StoreError) -> Self {
        OpError::External(err.to_string())
    }
}

impl From<ObjectStoreError> for OpError {
    fn from(err: ObjectStoreError) -> Self {
        OpError::External(err.to_string())
    }
}

impl From<CompletionError> for OpError {
    fn from(err: CompletionError) -> Self {
        OpError::External(err.to_string())
    }
}

pub type OpResult<T> = std::result::Result<T, OpError>;
