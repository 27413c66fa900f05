use chrono::NaiveDateTime;
use sqlx::FromRow;

use crate::id::UserId;

/// An actor. Accounts are owned by the identity system, this
/// layer only reads them.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct User {
    pub id: UserId,
    pub created: NaiveDateTime,
    /// Unique handle of the user.
    pub name: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}

impl From<User> for quire_api_types::user::Author {
    fn from(value: User) -> Self {
        Self {
            id: value.id.0,
            name: value.name,
            display_name: value.display_name,
            avatar_url: value.avatar_url,
        }
    }
}
