use dashmap::DashMap;
use rand::Rng;
use serde::Serialize;

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "flatfinder_session";

const TOKEN_LEN: usize = 48;

/// Snapshot of the authenticated user, taken at login and cached for the
/// lifetime of the session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionUser {
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: String,
}

impl SessionUser {
    pub fn is_landlord(&self) -> bool {
        self.role == crate::models::ROLE_LANDLORD
    }
}

/// In-process session store keyed by opaque token.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: DashMap<String, SessionUser>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session for `user` and return its token.
    pub fn put(&self, user: SessionUser) -> String {
        let token = generate_token();
        self.sessions.insert(token.clone(), user);
        token
    }

    pub fn get(&self, token: &str) -> Option<SessionUser> {
        self.sessions.get(token).map(|entry| entry.clone())
    }

    pub fn delete(&self, token: &str) {
        self.sessions.remove(token);
    }

    /// Drop every session belonging to the given user (account deletion).
    pub fn delete_for_user(&self, user_id: &str) {
        self.sessions.retain(|_, user| user.id != user_id);
    }
}

fn generate_token() -> String {
    rand::thread_rng()
        .sample_iter(&rand::distributions::Alphanumeric)
        .take(TOKEN_LEN)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user(id: &str) -> SessionUser {
        SessionUser {
            id: id.to_string(),
            username: format!("user-{id}"),
            email: format!("user-{id}@example.com"),
            role: "tenant".to_string(),
        }
    }

    #[test]
    fn test_put_get_delete() {
        let store = SessionStore::new();
        let token = store.put(sample_user("1"));

        let cached = store.get(&token).expect("session should exist");
        assert_eq!(cached.id, "1");

        store.delete(&token);
        assert!(store.get(&token).is_none());
    }

    #[test]
    fn test_tokens_are_unique_and_opaque() {
        let store = SessionStore::new();
        let a = store.put(sample_user("1"));
        let b = store.put(sample_user("1"));
        assert_ne!(a, b);
        assert_eq!(a.len(), TOKEN_LEN);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_delete_for_user_purges_all_sessions() {
        let store = SessionStore::new();
        let a = store.put(sample_user("1"));
        let b = store.put(sample_user("1"));
        let other = store.put(sample_user("2"));

        store.delete_for_user("1");

        assert!(store.get(&a).is_none());
        assert!(store.get(&b).is_none());
        assert!(store.get(&other).is_some());
    }
}
