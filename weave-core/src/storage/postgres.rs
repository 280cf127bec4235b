//! Postgres-backed [`Storage`] implementation.

use crate::error::WeaveError;
use crate::models::{
    Badge, BadgeType, Connection, Introduction, IntroductionStatus, User,
};
use crate::storage::Storage;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

pub struct PgStorage {
    pool: PgPool,
}

impl PgStorage {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Storage for PgStorage {
    async fn list_users(&self) -> Result<Vec<User>, WeaveError> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT u.id, u.display_name, u.email, u.title, u.company, u.verified,
                   COALESCE(w.balance, 0) AS point_balance, u.created_at
            FROM users u
            LEFT JOIN wallet_accounts w ON w.user_id = u.id
            ORDER BY u.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    async fn list_connections(&self) -> Result<Vec<Connection>, WeaveError> {
        // ORDER BY (created_at, id) fixes adjacency order = insertion
        // order, which the ego extractor relies on for determinism.
        let connections = sqlx::query_as::<_, Connection>(
            r#"
            SELECT c.owner_id, c.peer_id, c.strength_raw, c.origin_exchange_id,
                   e.location AS origin_location, c.note, c.created_at
            FROM connections c
            LEFT JOIN exchanges e ON e.id = c.origin_exchange_id
            ORDER BY c.created_at, c.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(connections)
    }

    async fn list_introductions(&self) -> Result<Vec<Introduction>, WeaveError> {
        let rows = sqlx::query_as::<_, (i64, i64, String, DateTime<Utc>)>(
            r#"
            SELECT id, introducer_id, status, created_at
            FROM introductions
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(collect_introductions(rows))
    }

    async fn introductions_by_introducer(
        &self,
        user_id: i64,
    ) -> Result<Vec<Introduction>, WeaveError> {
        let rows = sqlx::query_as::<_, (i64, i64, String, DateTime<Utc>)>(
            r#"
            SELECT id, introducer_id, status, created_at
            FROM introductions
            WHERE introducer_id = $1
            ORDER BY id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(collect_introductions(rows))
    }

    async fn list_badges(&self, user_id: i64) -> Result<Vec<Badge>, WeaveError> {
        let rows = sqlx::query_as::<_, (Uuid, i64, String, DateTime<Utc>)>(
            r#"
            SELECT id, user_id, badge_type, earned_at
            FROM badges
            WHERE user_id = $1
            ORDER BY earned_at
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(collect_badges(rows))
    }

    async fn list_all_badges(&self) -> Result<Vec<Badge>, WeaveError> {
        let rows = sqlx::query_as::<_, (Uuid, i64, String, DateTime<Utc>)>(
            r#"
            SELECT id, user_id, badge_type, earned_at
            FROM badges
            ORDER BY earned_at
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(collect_badges(rows))
    }

    async fn point_balance(&self, user_id: i64) -> Result<i64, WeaveError> {
        let row: Option<(i64,)> =
            sqlx::query_as("SELECT balance FROM wallet_accounts WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(|(b,)| b).unwrap_or(0))
    }

    async fn grant_badge(&self, user_id: i64, badge_type: BadgeType) -> Result<(), WeaveError> {
        sqlx::query(
            r#"
            INSERT INTO badges (id, user_id, badge_type, earned_at)
            VALUES ($1, $2, $3, now())
            ON CONFLICT (user_id, badge_type) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(badge_type.as_str())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn revoke_badge(&self, user_id: i64, badge_type: BadgeType) -> Result<(), WeaveError> {
        sqlx::query("DELETE FROM badges WHERE user_id = $1 AND badge_type = $2")
            .bind(user_id)
            .bind(badge_type.as_str())
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

/// Map raw introduction rows to models, dropping rows whose status tag is
/// unknown. Malformed rows degrade to a warning rather than failing a
/// whole scoring pass.
fn collect_introductions(rows: Vec<(i64, i64, String, DateTime<Utc>)>) -> Vec<Introduction> {
    rows.into_iter()
        .filter_map(|(id, introducer_id, status, created_at)| {
            match IntroductionStatus::parse(&status) {
                Some(status) => Some(Introduction {
                    id,
                    introducer_id,
                    status,
                    created_at,
                }),
                None => {
                    tracing::warn!(id, status, "Skipping introduction with unknown status");
                    None
                }
            }
        })
        .collect()
}

fn collect_badges(rows: Vec<(Uuid, i64, String, DateTime<Utc>)>) -> Vec<Badge> {
    rows.into_iter()
        .filter_map(|(id, user_id, badge_type, earned_at)| {
            match BadgeType::parse(&badge_type) {
                Some(badge_type) => Some(Badge {
                    id,
                    user_id,
                    badge_type,
                    earned_at,
                }),
                None => {
                    tracing::warn!(%id, badge_type, "Skipping badge with unknown type");
                    None
                }
            }
        })
        .collect()
}
