use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered username/password pair, persisted in the `"users"` slot.
/// Stored and compared as plaintext, matching the upstream behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub username: String,
    pub password: String,
}

/// The signed-in user, persisted in the `"session"` slot so a session
/// survives process restarts. Absent slot means anonymous.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub username: String,
    pub started_at: DateTime<Utc>,
}

impl Session {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            started_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_json_roundtrip() {
        let cred = Credential {
            username: "reader".to_string(),
            password: "hunter2".to_string(),
        };
        let json = serde_json::to_string(&cred).unwrap();
        let restored: Credential = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, cred);
    }

    #[test]
    fn test_session_carries_username() {
        let session = Session::new("reader");
        assert_eq!(session.username, "reader");
    }
}
