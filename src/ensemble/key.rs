//! Storage-key codec for the two-phase upload flow.
//!
//! A storage key packs the owner, the future file id, and the file name into
//! one bucket path: `files/<owner>/<file>/<encoded-file-name>`. The key is
//! issued at request time, held entirely by the client, and presented back at
//! confirmation — parsing it out again is the integrity check that binds the
//! two phases without server-held session state.
//!
//! Keys arrive from external callers, so [`ObjectKey::parse`] validates the
//! shape before destructuring and never assumes well-formed input.

use crate::id::Id;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use thiserror::Error;

/// Leading path segment of every upload key.
pub const KEY_PREFIX: &str = "files";

// Everything outside the URI "component" unreserved set gets escaped, so the
// encoded file name can never contain a path separator.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

#[derive(Error, Debug, PartialEq, Eq)]
pub enum KeyError {
    #[error("Invalid storage key '{0}': expected 'files/<owner>/<file>/<name>'")]
    MalformedKey(String),

    #[error("Invalid storage key '{0}': file name is not valid percent-encoded UTF-8")]
    BadEncoding(String),
}

/// The structured content of a storage key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectKey {
    pub owner: Id,
    pub file: Id,
    pub file_name: String,
}

impl ObjectKey {
    pub fn new(owner: Id, file: Id, file_name: impl Into<String>) -> Self {
        Self {
            owner,
            file,
            file_name: file_name.into(),
        }
    }

    /// Render the key as a bucket path.
    pub fn encode(&self) -> String {
        let encoded_name = utf8_percent_encode(&self.file_name, COMPONENT);
        format!(
            "{}/{}/{}/{}",
            KEY_PREFIX, self.owner, self.file, encoded_name
        )
    }

    /// Parse a caller-supplied key, validating its shape.
    ///
    /// Trailing segments beyond the fourth are rejoined before decoding, so a
    /// key whose name segment somehow carries a literal slash still parses
    /// rather than silently truncating.
    pub fn parse(raw: &str) -> Result<Self, KeyError> {
        let parts: Vec<&str> = raw.split('/').collect();
        if parts.len() < 4 || parts[0] != KEY_PREFIX {
            return Err(KeyError::MalformedKey(raw.to_string()));
        }
        let (owner, file) = (parts[1], parts[2]);
        let encoded_name = parts[3..].join("/");
        if owner.is_empty() || file.is_empty() || encoded_name.is_empty() {
            return Err(KeyError::MalformedKey(raw.to_string()));
        }
        let file_name = percent_decode_str(&encoded_name)
            .decode_utf8()
            .map_err(|_| KeyError::BadEncoding(raw.to_string()))?
            .into_owned();
        Ok(Self {
            owner: Id::from(owner),
            file: Id::from(file),
            file_name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_escapes_file_name() {
        let key = ObjectKey::new(Id::from("u1"), Id::from("f1"), "my song.mp3");
        assert_eq!(key.encode(), "files/u1/f1/my%20song.mp3");
    }

    #[test]
    fn round_trip_preserves_fields() {
        let key = ObjectKey::new(Id::from("u1"), Id::from("f1"), "a/b & c.flac");
        let parsed = ObjectKey::parse(&key.encode()).unwrap();
        assert_eq!(parsed, key);
    }

    #[test]
    fn rejects_wrong_prefix() {
        let err = ObjectKey::parse("uploads/u1/f1/a.txt").unwrap_err();
        assert!(matches!(err, KeyError::MalformedKey(_)));
    }

    #[test]
    fn rejects_missing_segments() {
        assert!(ObjectKey::parse("files/u1/f1").is_err());
        assert!(ObjectKey::parse("files///a.txt").is_err());
        assert!(ObjectKey::parse("").is_err());
    }

    #[test]
    fn rejects_undecodable_name() {
        let err = ObjectKey::parse("files/u1/f1/%FF%FE").unwrap_err();
        assert!(matches!(err, KeyError::BadEncoding(_)));
    }
}
