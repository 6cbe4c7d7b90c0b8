//! Author directory entry.

use crate::domain::UserId;
use serde::{Deserialize, Serialize};

/// A movement author, as the ledger resolves it.
///
/// Only the display identity lives here; credentials, roles, and sessions
/// are outside the engine boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
}

impl User {
    /// Create a new User.
    pub fn new(id: UserId, name: String) -> Self {
        Self { id, name }
    }
}
