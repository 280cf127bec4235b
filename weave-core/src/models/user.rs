use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A member of the network. Immutable within one analytics pass; owned by
/// the storage collaborator. `point_balance` is the wallet balance joined
/// in at load time so scoring never goes back to storage per user.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub display_name: String,
    pub email: String,
    pub title: Option<String>,
    pub company: Option<String>,
    pub verified: bool,
    pub point_balance: i64,
    pub created_at: DateTime<Utc>,
}
