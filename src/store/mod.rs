//! In-memory user store.
//!
//! # Data Flow
//! ```text
//! HTTP handler
//!     → UserStore (RwLock<Vec<User>>)
//!     → linear scan by id
//!     → cloned User returned to caller
//! ```
//!
//! # Design Decisions
//! - Records live only in process memory; a restart resets the store
//! - One lock guards the whole collection; id assignment happens under it
//! - Insertion order is preserved for listing
//! - New ids are `max(id) + 1`, so deleting the highest id frees it for reuse

pub mod user;

use std::collections::HashSet;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use thiserror::Error;

pub use user::{default_users, CreateUser, UpdateUser, User, DEFAULT_ROLE};

use user::present;

/// Outcome of a store operation that did not succeed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("user {0} not found")]
    NotFound(u64),
    #[error("name and email are required")]
    MissingRequiredFields,
}

/// Process-wide collection of user records.
#[derive(Debug, Default)]
pub struct UserStore {
    users: RwLock<Vec<User>>,
}

impl UserStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding the default users.
    pub fn seeded() -> Self {
        Self::with_users(default_users())
    }

    /// Create a store holding `users`. Only the first record for each id
    /// is kept.
    pub fn with_users(mut users: Vec<User>) -> Self {
        let mut seen = HashSet::new();
        users.retain(|user| seen.insert(user.id));
        Self {
            users: RwLock::new(users),
        }
    }

    // Poisoning is ignored: every mutation below is a single push, remove
    // or field assignment, so the Vec is never left half-written.
    fn read(&self) -> RwLockReadGuard<'_, Vec<User>> {
        self.users.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<User>> {
        self.users.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of every record in insertion order.
    pub fn list(&self) -> Vec<User> {
        self.read().clone()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn get(&self, id: u64) -> Option<User> {
        self.read().iter().find(|u| u.id == id).cloned()
    }

    /// Insert a new record after checking that name and email are present.
    ///
    /// Returns the record and the store size right after the insert.
    pub fn create(&self, payload: CreateUser) -> Result<(User, usize), StoreError> {
        let (name, email) = match (present(payload.name), present(payload.email)) {
            (Some(name), Some(email)) => (name, email),
            _ => return Err(StoreError::MissingRequiredFields),
        };
        let role = present(payload.role).unwrap_or_else(|| DEFAULT_ROLE.to_string());

        let mut users = self.write();
        let id = users.iter().map(|u| u.id).max().unwrap_or(0) + 1;
        let user = User { id, name, email, role };
        users.push(user.clone());
        Ok((user, users.len()))
    }

    /// Overwrite the non-empty fields of `payload` onto record `id`.
    pub fn update(&self, id: u64, payload: UpdateUser) -> Result<User, StoreError> {
        let mut users = self.write();
        let user = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(StoreError::NotFound(id))?;

        if let Some(name) = present(payload.name) {
            user.name = name;
        }
        if let Some(email) = present(payload.email) {
            user.email = email;
        }
        if let Some(role) = present(payload.role) {
            user.role = role;
        }
        Ok(user.clone())
    }

    /// Remove record `id`, returning it and the store size right after.
    pub fn delete(&self, id: u64) -> Result<(User, usize), StoreError> {
        let mut users = self.write();
        let index = users
            .iter()
            .position(|u| u.id == id)
            .ok_or(StoreError::NotFound(id))?;
        let removed = users.remove(index);
        Ok((removed, users.len()))
    }
}
