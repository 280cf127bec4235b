//! In-memory [`Storage`] implementation.
//!
//! Deterministic fixture storage for tests and local experiments. Also
//! counts badge writes so synchronizer idempotence is directly
//! observable, and can be switched into a failing mode to exercise the
//! `DataUnavailable` path.

use crate::error::WeaveError;
use crate::models::{Badge, BadgeType, Connection, Introduction, User};
use crate::storage::Storage;
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Mutex;
use uuid::Uuid;

#[derive(Default)]
struct Inner {
    users: Vec<User>,
    connections: Vec<Connection>,
    introductions: Vec<Introduction>,
    badges: Vec<Badge>,
    write_count: usize,
    fail_reads: bool,
}

#[derive(Default)]
pub struct MemoryStorage {
    inner: Mutex<Inner>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_user(&self, user: User) {
        self.inner.lock().expect("storage lock").users.push(user);
    }

    pub fn add_connection(&self, connection: Connection) {
        self.inner
            .lock()
            .expect("storage lock")
            .connections
            .push(connection);
    }

    pub fn add_introduction(&self, introduction: Introduction) {
        self.inner
            .lock()
            .expect("storage lock")
            .introductions
            .push(introduction);
    }

    /// When set, every read fails. Used to verify that a snapshot build
    /// aborts with `DataUnavailable` instead of using partial data.
    pub fn set_fail_reads(&self, fail: bool) {
        self.inner.lock().expect("storage lock").fail_reads = fail;
    }

    /// Number of badge grant/revoke calls issued so far.
    pub fn write_count(&self) -> usize {
        self.inner.lock().expect("storage lock").write_count
    }

    fn read<T>(&self, f: impl FnOnce(&Inner) -> T) -> Result<T, WeaveError> {
        let inner = self.inner.lock().expect("storage lock");
        if inner.fail_reads {
            return Err(WeaveError::DataUnavailable(
                "fixture storage is in failing mode".to_string(),
            ));
        }
        Ok(f(&inner))
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn list_users(&self) -> Result<Vec<User>, WeaveError> {
        self.read(|inner| inner.users.clone())
    }

    async fn list_connections(&self) -> Result<Vec<Connection>, WeaveError> {
        self.read(|inner| inner.connections.clone())
    }

    async fn list_introductions(&self) -> Result<Vec<Introduction>, WeaveError> {
        self.read(|inner| inner.introductions.clone())
    }

    async fn introductions_by_introducer(
        &self,
        user_id: i64,
    ) -> Result<Vec<Introduction>, WeaveError> {
        self.read(|inner| {
            inner
                .introductions
                .iter()
                .filter(|i| i.introducer_id == user_id)
                .cloned()
                .collect()
        })
    }

    async fn list_badges(&self, user_id: i64) -> Result<Vec<Badge>, WeaveError> {
        self.read(|inner| {
            inner
                .badges
                .iter()
                .filter(|b| b.user_id == user_id)
                .cloned()
                .collect()
        })
    }

    async fn list_all_badges(&self) -> Result<Vec<Badge>, WeaveError> {
        self.read(|inner| inner.badges.clone())
    }

    async fn point_balance(&self, user_id: i64) -> Result<i64, WeaveError> {
        self.read(|inner| {
            inner
                .users
                .iter()
                .find(|u| u.id == user_id)
                .map(|u| u.point_balance)
                .unwrap_or(0)
        })
    }

    async fn grant_badge(&self, user_id: i64, badge_type: BadgeType) -> Result<(), WeaveError> {
        let mut inner = self.inner.lock().expect("storage lock");
        inner.write_count += 1;
        let already_held = inner
            .badges
            .iter()
            .any(|b| b.user_id == user_id && b.badge_type == badge_type);
        if !already_held {
            inner.badges.push(Badge {
                id: Uuid::new_v4(),
                user_id,
                badge_type,
                earned_at: Utc::now(),
            });
        }
        Ok(())
    }

    async fn revoke_badge(&self, user_id: i64, badge_type: BadgeType) -> Result<(), WeaveError> {
        let mut inner = self.inner.lock().expect("storage lock");
        inner.write_count += 1;
        inner
            .badges
            .retain(|b| !(b.user_id == user_id && b.badge_type == badge_type));
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
