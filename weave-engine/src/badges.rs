//! Badge synchronization — percentile and lifecycle badges.
//!
//! Qualification here uses raw connection count and point balance, not
//! the composite score from [`crate::scoring`]; the product runs both
//! metrics side by side and they must stay separate.
//!
//! The refresh is a set-difference sweep: the full qualifying set per
//! badge type is computed first, compared against the currently-badged
//! set, and only then are grants/revokes applied. Running the sweep twice
//! over unchanged data issues no writes the second time.

use std::collections::HashSet;
use weave_core::config::BadgeConfig;
use weave_core::models::BadgeType;
use weave_core::storage::Storage;
use weave_core::{GraphSnapshot, WeaveError};

/// Summary of one badge refresh sweep.
#[derive(Debug, Clone, Default)]
pub struct BadgeSyncReport {
    pub super_connector_granted: usize,
    pub super_connector_revoked: usize,
    pub top_earner_granted: usize,
    pub top_earner_revoked: usize,
    pub early_adopter_granted: usize,
    pub elapsed_ms: u64,
}

/// The users currently eligible for the super-connector badge: the top
/// `ceil(n * percentile)` by connection count, filtered to a minimum
/// count.
pub fn super_connector_qualifiers(
    snapshot: &GraphSnapshot,
    config: &BadgeConfig,
) -> HashSet<i64> {
    let mut by_count: Vec<(i64, usize)> = snapshot
        .user_ids()
        .iter()
        .map(|&id| (id, snapshot.out_degree(id)))
        .collect();
    by_count.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let cutoff = percentile_cutoff(by_count.len(), config.super_connector_percentile);
    by_count
        .into_iter()
        .take(cutoff)
        .filter(|&(_, count)| count >= config.super_connector_min_connections)
        .map(|(id, _)| id)
        .collect()
}

/// The users currently eligible for the top-earner badge: the top
/// `ceil(n * percentile)` by point balance, filtered to a minimum
/// balance.
pub fn top_earner_qualifiers(snapshot: &GraphSnapshot, config: &BadgeConfig) -> HashSet<i64> {
    let mut by_balance: Vec<(i64, i64)> = snapshot
        .user_ids()
        .iter()
        .filter_map(|&id| snapshot.user(id).map(|u| (id, u.point_balance)))
        .collect();
    by_balance.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let cutoff = percentile_cutoff(by_balance.len(), config.top_earner_percentile);
    by_balance
        .into_iter()
        .take(cutoff)
        .filter(|&(_, balance)| balance >= config.top_earner_min_balance)
        .map(|(id, _)| id)
        .collect()
}

/// The first `cutoff` signups by account-creation order (ties by id).
pub fn early_adopter_qualifiers(snapshot: &GraphSnapshot, config: &BadgeConfig) -> HashSet<i64> {
    let mut by_signup: Vec<(i64, chrono::DateTime<chrono::Utc>)> = snapshot
        .user_ids()
        .iter()
        .filter_map(|&id| snapshot.user(id).map(|u| (id, u.created_at)))
        .collect();
    by_signup.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));

    by_signup
        .into_iter()
        .take(config.early_adopter_cutoff)
        .map(|(id, _)| id)
        .collect()
}

fn percentile_cutoff(n: usize, percentile: f64) -> usize {
    ((n as f64) * percentile).ceil() as usize
}

/// Run one badge refresh sweep.
pub async fn refresh_badges<S: Storage + ?Sized>(
    storage: &S,
    snapshot: &GraphSnapshot,
    config: &BadgeConfig,
) -> Result<BadgeSyncReport, WeaveError> {
    let start = std::time::Instant::now();
    let mut report = BadgeSyncReport::default();

    let current = storage.list_all_badges().await?;
    let held = |badge_type: BadgeType| -> HashSet<i64> {
        current
            .iter()
            .filter(|b| b.badge_type == badge_type)
            .map(|b| b.user_id)
            .collect()
    };

    // Full qualifying sets are computed before any write so the badge
    // table never reflects a mix of old and new thresholds.
    let super_connectors = super_connector_qualifiers(snapshot, config);
    let top_earners = top_earner_qualifiers(snapshot, config);
    let early_adopters = early_adopter_qualifiers(snapshot, config);

    let held_super = held(BadgeType::SuperConnector);
    for &user_id in super_connectors.difference(&held_super) {
        storage
            .grant_badge(user_id, BadgeType::SuperConnector)
            .await?;
        report.super_connector_granted += 1;
    }
    for &user_id in held_super.difference(&super_connectors) {
        storage
            .revoke_badge(user_id, BadgeType::SuperConnector)
            .await?;
        report.super_connector_revoked += 1;
    }

    let held_earner = held(BadgeType::TopEarner);
    for &user_id in top_earners.difference(&held_earner) {
        storage.grant_badge(user_id, BadgeType::TopEarner).await?;
        report.top_earner_granted += 1;
    }
    for &user_id in held_earner.difference(&top_earners) {
        storage.revoke_badge(user_id, BadgeType::TopEarner).await?;
        report.top_earner_revoked += 1;
    }

    // Early adopter is permanent: grant-only, never revoked.
    let held_early = held(BadgeType::EarlyAdopter);
    for &user_id in early_adopters.difference(&held_early) {
        storage
            .grant_badge(user_id, BadgeType::EarlyAdopter)
            .await?;
        report.early_adopter_granted += 1;
    }

    report.elapsed_ms = start.elapsed().as_millis() as u64;
    tracing::info!(
        "Badge sweep complete: super_connector +{}/-{}, top_earner +{}/-{}, early_adopter +{} in {}ms",
        report.super_connector_granted,
        report.super_connector_revoked,
        report.top_earner_granted,
        report.top_earner_revoked,
        report.early_adopter_granted,
        report.elapsed_ms
    );

    Ok(report)
}

// ============================================================================
// TESTS
// ============================================================================
