use crate::error::{Result, ShelfmarkError};
use crate::models::{Credential, Session};
use crate::storage::{read_list, write_list, SlotStore, SESSION_SLOT, USERS_SLOT};

/// Gate access via the locally stored credential table.
///
/// Credentials live in the `"users"` slot and are compared as plaintext,
/// matching the upstream behavior. The session marker lives in the
/// `"session"` slot so a sign-in survives process restarts; session state
/// is binary — a marker is present (authenticated) or absent (anonymous).
pub struct CredentialGate<'a, S: SlotStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: SlotStore + ?Sized> CredentialGate<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Register a new user and sign them in. Fails with `UsernameTaken`
    /// when a credential with the same username already exists
    /// (case-sensitive exact match). There is no update or delete path
    /// for credentials.
    pub fn register(&self, username: &str, password: &str) -> Result<Session> {
        let mut users: Vec<Credential> = read_list(self.store, USERS_SLOT)?;
        if users.iter().any(|u| u.username == username) {
            return Err(ShelfmarkError::UsernameTaken(username.to_string()));
        }

        users.push(Credential {
            username: username.to_string(),
            password: password.to_string(),
        });
        write_list(self.store, USERS_SLOT, &users)?;
        self.open_session(username)
    }

    /// Sign in. Succeeds iff a stored credential matches both fields
    /// exactly. No lockout, no rate limiting.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<Session> {
        let users: Vec<Credential> = read_list(self.store, USERS_SLOT)?;
        let found = users
            .iter()
            .any(|u| u.username == username && u.password == password);

        if found {
            self.open_session(username)
        } else {
            Err(ShelfmarkError::InvalidCredentials)
        }
    }

    /// Clear the session marker. Idempotent.
    pub fn logout(&self) -> Result<()> {
        self.store.remove(SESSION_SLOT)
    }

    /// The persisted session, if any. A corrupt marker is logged and
    /// treated as anonymous.
    pub fn current(&self) -> Result<Option<Session>> {
        match self.store.get(SESSION_SLOT)? {
            None => Ok(None),
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(session) => Ok(Some(session)),
                Err(e) => {
                    tracing::warn!(error = %e, "corrupt session marker, treating as anonymous");
                    Ok(None)
                }
            },
        }
    }

    fn open_session(&self, username: &str) -> Result<Session> {
        let session = Session::new(username);
        self.store.set(SESSION_SLOT, &serde_json::to_string(&session)?)?;
        Ok(session)
    }
}
