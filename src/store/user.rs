//! User record and request payloads.

use serde::{Deserialize, Serialize};

/// A user record as stored and returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub role: String,
}

impl User {
    pub fn new(id: u64, name: &str, email: &str, role: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            email: email.to_string(),
            role: role.to_string(),
        }
    }
}

/// Payload for `POST /users`.
///
/// `name` and `email` are optional at the type level so that a missing field
/// surfaces as a presence-check failure rather than a deserialization error.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CreateUser {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
}

/// Payload for `PUT /users/{id}`. Absent or empty fields keep their old value.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
}

/// Role assigned when a create payload carries none.
pub const DEFAULT_ROLE: &str = "User";

/// Records present in a freshly seeded store.
pub fn default_users() -> Vec<User> {
    vec![
        User::new(1, "Alice Johnson", "alice@company.com", "Developer"),
        User::new(2, "Bob Smith", "bob@company.com", "DevOps Engineer"),
        User::new(3, "Charlie Brown", "charlie@company.com", "Manager"),
    ]
}

/// Keep a field only when it carries a non-empty value.
pub(crate) fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
