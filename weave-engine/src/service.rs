//! Typed caller surface of the analytics engine.
//!
//! Each operation builds a fresh snapshot (plus one batched introduction
//! load where scoring is involved) and then runs pure in-memory
//! computation; the algorithms themselves never touch storage.

use crate::badges::{self, BadgeSyncReport};
use crate::ego;
use crate::scoring::{self, UserRank};
use crate::stats;
use std::collections::HashMap;
use weave_core::config::BadgeConfig;
use weave_core::models::{ConnectorProfile, EgoNetwork, IntroductionStats, NetworkStats};
use weave_core::storage::Storage;
use weave_core::{build_snapshot, WeaveError};

pub const MIN_DEPTH: u32 = 1;
pub const MAX_DEPTH: u32 = 5;
pub const MIN_LIMIT: usize = 1;
pub const MAX_LIMIT: usize = 50;

pub struct AnalyticsService<S> {
    storage: S,
    badge_config: BadgeConfig,
}

impl<S: Storage> AnalyticsService<S> {
    pub fn new(storage: S) -> Self {
        Self::with_badge_config(storage, BadgeConfig::default())
    }

    pub fn with_badge_config(storage: S, badge_config: BadgeConfig) -> Self {
        Self {
            storage,
            badge_config,
        }
    }

    /// Ego network at bounded depth; full graph when `center` is `None`.
    pub async fn ego_graph(
        &self,
        depth: u32,
        center: Option<i64>,
    ) -> Result<EgoNetwork, WeaveError> {
        if !(MIN_DEPTH..=MAX_DEPTH).contains(&depth) {
            return Err(WeaveError::Validation(format!(
                "depth must be between {MIN_DEPTH} and {MAX_DEPTH}, got {depth}"
            )));
        }
        let snapshot = build_snapshot(&self.storage).await?;
        ego::extract_ego_network(&snapshot, depth, center)
    }

    /// Network statistics for one user.
    pub async fn user_stats(&self, user_id: i64) -> Result<NetworkStats, WeaveError> {
        let snapshot = build_snapshot(&self.storage).await?;
        stats::network_stats(&snapshot, user_id)
    }

    /// Top connectors by composite strength score.
    pub async fn top_connectors(
        &self,
        limit: usize,
    ) -> Result<Vec<ConnectorProfile>, WeaveError> {
        if !(MIN_LIMIT..=MAX_LIMIT).contains(&limit) {
            return Err(WeaveError::Validation(format!(
                "limit must be between {MIN_LIMIT} and {MAX_LIMIT}, got {limit}"
            )));
        }
        let snapshot = build_snapshot(&self.storage).await?;
        let intro_stats = self.load_intro_stats().await?;
        let badges = self
            .storage
            .list_all_badges()
            .await
            .map_err(unavailable)?;
        Ok(scoring::super_connectors(
            &snapshot,
            &intro_stats,
            &badges,
            limit,
        ))
    }

    /// Whether the user's composite score reaches the top decile.
    pub async fn is_super_connector(&self, user_id: i64) -> Result<bool, WeaveError> {
        let snapshot = build_snapshot(&self.storage).await?;
        let intro_stats = self.load_intro_stats().await?;
        scoring::is_super_connector(&snapshot, &intro_stats, user_id)
    }

    /// Leaderboard position and percentile for one user.
    pub async fn user_rank(&self, user_id: i64) -> Result<UserRank, WeaveError> {
        let snapshot = build_snapshot(&self.storage).await?;
        let intro_stats = self.load_intro_stats().await?;
        scoring::user_rank(&snapshot, &intro_stats, user_id)
    }

    /// Run one badge refresh sweep. Callers schedule this periodically or
    /// after bulk data changes, not per request.
    pub async fn refresh_badges(&self) -> Result<BadgeSyncReport, WeaveError> {
        let snapshot = build_snapshot(&self.storage).await?;
        badges::refresh_badges(&self.storage, &snapshot, &self.badge_config).await
    }

    async fn load_intro_stats(
        &self,
    ) -> Result<HashMap<i64, IntroductionStats>, WeaveError> {
        let introductions = self
            .storage
            .list_introductions()
            .await
            .map_err(unavailable)?;
        Ok(scoring::introduction_stats_by_user(&introductions))
    }
}

/// Reads issued alongside the snapshot build share its failure semantics:
/// a collaborator failure means the whole operation is unavailable.
fn unavailable(e: WeaveError) -> WeaveError {
    match e {
        WeaveError::DataUnavailable(_) => e,
        other => WeaveError::DataUnavailable(other.to_string()),
    }
}
