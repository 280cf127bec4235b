//! Storage collaborator boundary.
//!
//! The analytics engine never reaches into storage implicitly: every
//! caller hands it a [`Storage`] implementation, which makes the engine
//! testable against deterministic fixture data ([`MemoryStorage`]) and
//! keeps all I/O at the snapshot-build and badge-write boundaries.

mod memory;
mod postgres;

pub use memory::MemoryStorage;
pub use postgres::PgStorage;

use crate::error::WeaveError;
use crate::models::{Badge, BadgeType, Connection, Introduction, User};
use async_trait::async_trait;

/// Read surface consumed by the engine, plus the badge writes used by the
/// synchronizer. The engine treats everything else about storage as
/// opaque.
#[async_trait]
pub trait Storage: Send + Sync {
    /// All users, with wallet balances already joined in.
    async fn list_users(&self) -> Result<Vec<User>, WeaveError>;

    /// All directed connection edges, in insertion order.
    async fn list_connections(&self) -> Result<Vec<Connection>, WeaveError>;

    /// All introductions. One batched call replaces the original
    /// per-introducer round-trip when scoring a whole leaderboard.
    async fn list_introductions(&self) -> Result<Vec<Introduction>, WeaveError>;

    /// Introductions brokered by one user.
    async fn introductions_by_introducer(
        &self,
        user_id: i64,
    ) -> Result<Vec<Introduction>, WeaveError>;

    /// Badges held by one user.
    async fn list_badges(&self, user_id: i64) -> Result<Vec<Badge>, WeaveError>;

    /// Every badge in the system.
    async fn list_all_badges(&self) -> Result<Vec<Badge>, WeaveError>;

    /// Current wallet balance for one user; 0 if no wallet exists.
    async fn point_balance(&self, user_id: i64) -> Result<i64, WeaveError>;

    /// Grant a badge. Granting an already-held badge is a no-op.
    async fn grant_badge(&self, user_id: i64, badge_type: BadgeType) -> Result<(), WeaveError>;

    /// Revoke a badge. Revoking an absent badge is a no-op.
    async fn revoke_badge(&self, user_id: i64, badge_type: BadgeType) -> Result<(), WeaveError>;
}
