//! User account models

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A user account, as exposed by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
}

/// A user together with its password hash. Never serialized.
#[derive(Debug, Clone)]
pub struct UserAccount {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
}

impl UserAccount {
    pub fn user(&self) -> User {
        User {
            id: self.id,
            username: self.username.clone(),
        }
    }
}

/// Registration input
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewUser {
    #[validate(length(min = 1, max = 50))]
    pub username: String,
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}
