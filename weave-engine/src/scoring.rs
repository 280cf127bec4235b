//! Connector-strength scoring and ranking.
//!
//! The composite 0–100 score combines four independently capped factors:
//! connection count, exchange-location diversity, introduction success
//! rate, and point balance. This is the discovery/ranking metric; badge
//! qualification in [`crate::badges`] deliberately uses raw connection
//! count instead — the two metrics coexist in the product and are kept
//! separate on purpose.

use std::collections::{HashMap, HashSet};
use weave_core::models::{Badge, BadgeType, ConnectorProfile, Introduction, IntroductionStats};
use weave_core::{GraphSnapshot, WeaveError};

/// Points per direct connection, and its cap.
const CONNECTION_POINTS: usize = 2;
const CONNECTION_CAP: f64 = 40.0;

/// Points per distinct exchange location, and its cap.
const LOCATION_POINTS: usize = 4;
const LOCATION_CAP: f64 = 20.0;

/// Maximum contribution of the introduction success rate.
const INTRO_CAP: f64 = 20.0;

/// Wallet points per score point, and the balance cap.
const BALANCE_DIVISOR: f64 = 50.0;
const BALANCE_CAP: f64 = 20.0;

/// Profile enrichment lists are truncated to this many entries.
const PROFILE_LIST_LIMIT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredUser {
    pub user_id: i64,
    pub score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserRank {
    /// 1-indexed position in the descending score order.
    pub rank: usize,
    /// round((1 - index/n) * 100).
    pub percentile: i64,
}

/// Group a batched introduction load by introducer.
pub fn introduction_stats_by_user(
    introductions: &[Introduction],
) -> HashMap<i64, IntroductionStats> {
    let mut stats: HashMap<i64, IntroductionStats> = HashMap::new();
    for introduction in introductions {
        stats
            .entry(introduction.introducer_id)
            .or_default()
            .record(introduction.status);
    }
    stats
}

/// Composite connector-strength score for one user, 0–100.
pub fn strength_score(
    snapshot: &GraphSnapshot,
    user_id: i64,
    intro_stats: IntroductionStats,
) -> f64 {
    let connections = snapshot.connections(user_id);

    let connection_score = ((connections.len() * CONNECTION_POINTS) as f64).min(CONNECTION_CAP);

    let distinct_locations: HashSet<&str> = connections
        .iter()
        .filter_map(|c| c.origin_location.as_deref())
        .collect();
    let location_score =
        ((distinct_locations.len() * LOCATION_POINTS) as f64).min(LOCATION_CAP);

    let intro_score = if intro_stats.initiated == 0 {
        0.0
    } else {
        (intro_stats.completed as f64 / intro_stats.initiated as f64) * INTRO_CAP
    };

    let balance = snapshot.user(user_id).map(|u| u.point_balance).unwrap_or(0);
    let balance_score = (balance as f64 / BALANCE_DIVISOR).clamp(0.0, BALANCE_CAP);

    (connection_score + location_score + intro_score + balance_score).round()
}

/// Score every user and sort descending. Ties break by ascending user id
/// so ranks and percentile thresholds are stable across runs.
pub fn score_all(
    snapshot: &GraphSnapshot,
    intro_stats: &HashMap<i64, IntroductionStats>,
) -> Vec<ScoredUser> {
    let mut scored: Vec<ScoredUser> = snapshot
        .user_ids()
        .iter()
        .map(|&user_id| ScoredUser {
            user_id,
            score: strength_score(
                snapshot,
                user_id,
                intro_stats.get(&user_id).copied().unwrap_or_default(),
            ),
        })
        .collect();

    scored.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.user_id.cmp(&b.user_id))
    });
    scored
}

/// Whether the user's composite score reaches the top decile.
///
/// The threshold is the score at rank `ceil(n * 0.10)`; the comparison is
/// `>=`, so ties at the threshold are included.
pub fn is_super_connector(
    snapshot: &GraphSnapshot,
    intro_stats: &HashMap<i64, IntroductionStats>,
    user_id: i64,
) -> Result<bool, WeaveError> {
    if !snapshot.contains(user_id) {
        return Err(WeaveError::NotFound(user_id));
    }

    let scored = score_all(snapshot, intro_stats);
    let n = scored.len();
    let cutoff_rank = ((n as f64) * 0.10).ceil().max(1.0) as usize;
    let threshold = scored[cutoff_rank - 1].score;

    let user_score = scored
        .iter()
        .find(|s| s.user_id == user_id)
        .map(|s| s.score)
        .unwrap_or(0.0);
    Ok(user_score >= threshold)
}

/// 1-indexed rank and percentile of one user in the descending score
/// order.
pub fn user_rank(
    snapshot: &GraphSnapshot,
    intro_stats: &HashMap<i64, IntroductionStats>,
    user_id: i64,
) -> Result<UserRank, WeaveError> {
    let scored = score_all(snapshot, intro_stats);
    let index = scored
        .iter()
        .position(|s| s.user_id == user_id)
        .ok_or(WeaveError::NotFound(user_id))?;

    let n = scored.len();
    let percentile = ((1.0 - index as f64 / n as f64) * 100.0).round() as i64;
    Ok(UserRank {
        rank: index + 1,
        percentile,
    })
}

/// The top `limit` users by composite score, with profile enrichment.
///
/// Industries come from neighbor companies and locations from the user's
/// exchange locations, both deduplicated in first-encountered order over
/// the user's connections and truncated to five entries.
pub fn super_connectors(
    snapshot: &GraphSnapshot,
    intro_stats: &HashMap<i64, IntroductionStats>,
    badges: &[Badge],
    limit: usize,
) -> Vec<ConnectorProfile> {
    let mut badges_by_user: HashMap<i64, Vec<BadgeType>> = HashMap::new();
    for badge in badges {
        badges_by_user
            .entry(badge.user_id)
            .or_default()
            .push(badge.badge_type);
    }

    score_all(snapshot, intro_stats)
        .into_iter()
        .take(limit)
        .filter_map(|scored| {
            let Some(user) = snapshot.user(scored.user_id) else {
                tracing::warn!(user_id = scored.user_id, "Scored user has no record, skipping profile");
                return None;
            };

            let mut industries = Vec::new();
            let mut locations = Vec::new();
            let mut seen_industries = HashSet::new();
            let mut seen_locations = HashSet::new();
            for connection in snapshot.connections(scored.user_id) {
                if industries.len() < PROFILE_LIST_LIMIT {
                    if let Some(company) =
                        snapshot.user(connection.peer_id).and_then(|p| p.company.clone())
                    {
                        if seen_industries.insert(company.clone()) {
                            industries.push(company);
                        }
                    }
                }
                if locations.len() < PROFILE_LIST_LIMIT {
                    if let Some(location) = connection.origin_location.clone() {
                        if seen_locations.insert(location.clone()) {
                            locations.push(location);
                        }
                    }
                }
            }

            Some(ConnectorProfile {
                user_id: user.id,
                display_name: user.display_name.clone(),
                connection_count: snapshot.out_degree(user.id),
                point_balance: user.point_balance,
                strength_score: scored.score,
                badges: badges_by_user.remove(&user.id).unwrap_or_default(),
                industries,
                locations,
            })
        })
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================
