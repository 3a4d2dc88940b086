//! Credential store: username/password records with exact-match lookup.
//!
//! Passwords are stored and compared as given. That preserves the
//! exact-match semantics this concept is specified with; hardening (salted
//! hashing) is deliberately out of scope here and tracked in DESIGN.md.

use crate::error::{OpError, OpResult};
use crate::id::Id;
use crate::model::UserRecord;
use crate::store::DocumentStore;
use tracing::debug;

const USERS: &str = "auth.users";

// One message for every credential failure: never reveal which field was wrong.
const INVALID_CREDENTIALS: &str = "Invalid username or password.";

pub struct Credentials<S: DocumentStore> {
    store: S,
}

impl<S: DocumentStore> Credentials<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Create an account, returning the new user id.
    pub fn register(&mut self, username: &str, password: &str) -> OpResult<Id> {
        if username.trim().is_empty() {
            return Err(OpError::InvalidInput("Username cannot be empty.".into()));
        }
        if password.is_empty() {
            return Err(OpError::InvalidInput("Password cannot be empty.".into()));
        }

        let taken = self
            .store
            .find_one(USERS, |u: &UserRecord| u.username == username)?;
        if taken.is_some() {
            return Err(OpError::AlreadyExists(
                "A user with this username already exists.".into(),
            ));
        }

        let user = UserRecord {
            id: Id::fresh(),
            username: username.to_string(),
            password: password.to_string(),
        };
        self.store.insert(USERS, &user)?;
        debug!(user = %user.id, "user registered");
        Ok(user.id)
    }

    /// Return the id of the user matching both fields exactly.
    pub fn login(&self, username: &str, password: &str) -> OpResult<Id> {
        let user = self.find_match(username, password)?;
        Ok(user.id)
    }

    /// Delete the account matching both fields exactly.
    pub fn delete_user(&mut self, username: &str, password: &str) -> OpResult<()> {
        let user = self.find_match(username, password)?;
        self.store.remove(USERS, &user.id)?;
        debug!(user = %user.id, "user deleted");
        Ok(())
    }

    /// Replace the password of the user matching (username, old_password).
    pub fn change_password(
        &mut self,
        username: &str,
        old_password: &str,
        new_password: &str,
    ) -> OpResult<()> {
        if new_password.is_empty() {
            return Err(OpError::InvalidInput("Password cannot be empty.".into()));
        }
        let mut user = self.find_match(username, old_password)?;
        user.password = new_password.to_string();
        self.store.replace(USERS, &user)?;
        debug!(user = %user.id, "password changed");
        Ok(())
    }

    fn find_match(&self, username: &str, password: &str) -> OpResult<UserRecord> {
        self.store
            .find_one(USERS, |u: &UserRecord| {
                u.username == username && u.password == password
            })?
            .ok_or_else(|| OpError::NotFound(INVALID_CREDENTIALS.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::InMemoryStore;

    fn concept() -> Credentials<InMemoryStore> {
        Credentials::new(InMemoryStore::new())
    }

    #[test]
    fn login_returns_the_id_minted_at_registration() {
        let mut auth = concept();
        let id = auth.register("ada", "hunter2").unwrap();

        assert_eq!(auth.login("ada", "hunter2").unwrap(), id);
    }

    #[test]
    fn login_rejects_any_other_password() {
        let mut auth = concept();
        auth.register("ada", "hunter2").unwrap();

        let err = auth.login("ada", "hunter3").unwrap_err();
        assert!(matches!(err, OpError::NotFound(_)));
        assert_eq!(err.to_string(), "Invalid username or password.");
    }

    #[test]
    fn duplicate_username_is_rejected() {
        let mut auth = concept();
        auth.register("ada", "one").unwrap();

        let err = auth.register("ada", "two").unwrap_err();
        assert!(matches!(err, OpError::AlreadyExists(_)));
    }

    #[test]
    fn blank_fields_are_rejected() {
        let mut auth = concept();
        assert!(matches!(
            auth.register(" ", "pw").unwrap_err(),
            OpError::InvalidInput(_)
        ));
        assert!(matches!(
            auth.register("ada", "").unwrap_err(),
            OpError::InvalidInput(_)
        ));
    }

    #[test]
    fn delete_requires_exact_credentials() {
        let mut auth = concept();
        auth.register("ada", "hunter2").unwrap();

        assert!(matches!(
            auth.delete_user("ada", "wrong").unwrap_err(),
            OpError::NotFound(_)
        ));
        auth.delete_user("ada", "hunter2").unwrap();
        assert!(auth.login("ada", "hunter2").is_err());
    }

    #[test]
    fn change_password_swaps_the_matching_record_in_place() {
        let mut auth = concept();
        let id = auth.register("ada", "old").unwrap();

        assert!(matches!(
            auth.change_password("ada", "bogus", "new").unwrap_err(),
            OpError::NotFound(_)
        ));

        auth.change_password("ada", "old", "new").unwrap();
        assert!(auth.login("ada", "old").is_err());
        assert_eq!(auth.login("ada", "new").unwrap(), id);
    }

    #[test]
    fn deleted_username_can_be_reused() {
        let mut auth = concept();
        let first = auth.register("ada", "pw").unwrap();
        auth.delete_user("ada", "pw").unwrap();

        let second = auth.register("ada", "pw").unwrap();
        assert_ne!(first, second);
    }
}
