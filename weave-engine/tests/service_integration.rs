//! End-to-end tests of the analytics service over fixture storage.
//!
//! Everything runs against `MemoryStorage`, so these exercise the full
//! path a caller takes: snapshot build, batched introduction load, pure
//! computation, and badge writes back through the collaborator.

use chrono::{Duration, Utc};
use weave_core::config::BadgeConfig;
use weave_core::models::{BadgeType, Connection, Introduction, IntroductionStatus, User};
use weave_core::storage::MemoryStorage;
use weave_core::WeaveError;
use weave_engine::AnalyticsService;

fn make_user(id: i64, balance: i64) -> User {
    User {
        id,
        display_name: format!("user-{id}"),
        email: format!("user{id}@example.com"),
        title: Some("Engineer".to_string()),
        company: Some(format!("company-{}", id % 3)),
        verified: id % 2 == 0,
        point_balance: balance,
        created_at: Utc::now() + Duration::seconds(id),
    }
}

fn connect(storage: &MemoryStorage, a: i64, b: i64, location: Option<&str>) {
    for (owner, peer) in [(a, b), (b, a)] {
        storage.add_connection(Connection {
            owner_id: owner,
            peer_id: peer,
            strength_raw: 60,
            origin_exchange_id: Some(owner * 1000 + peer),
            origin_location: location.map(str::to_string),
            note: None,
            created_at: Utc::now(),
        });
    }
}

/// A small community: a triangle (1, 2, 3), a spur to 4, and an isolated
/// user 5.
fn community() -> MemoryStorage {
    let storage = MemoryStorage::new();
    for id in 1..=5 {
        storage.add_user(make_user(id, id * 200));
    }
    connect(&storage, 1, 2, Some("Berlin"));
    connect(&storage, 1, 3, Some("Hamburg"));
    connect(&storage, 2, 3, None);
    connect(&storage, 3, 4, Some("Berlin"));
    storage
}

// ===========================================================================
// TEST 1: depth validation rejects out-of-range values
// ===========================================================================
#[tokio::test]
async fn test_ego_graph_depth_validation() {
    let service = AnalyticsService::new(community());

    for depth in [0, 6, 99] {
        let err = service.ego_graph(depth, None).await.expect_err("must fail");
        assert!(matches!(err, WeaveError::Validation(_)), "depth {depth}");
    }
    assert!(service.ego_graph(1, None).await.is_ok());
    assert!(service.ego_graph(5, None).await.is_ok());
}

// ===========================================================================
// TEST 2: ego graph from a center returns the bounded neighborhood
// ===========================================================================
#[tokio::test]
async fn test_ego_graph_from_center() {
    let service = AnalyticsService::new(community());

    let network = service.ego_graph(1, Some(1)).await.expect("ego");
    let mut ids: Vec<i64> = network.nodes.iter().map(|n| n.id).collect();
    ids.sort_unstable();
    assert_eq!(ids, vec![1, 2, 3]);

    let network = service.ego_graph(2, Some(1)).await.expect("ego");
    let mut ids: Vec<i64> = network.nodes.iter().map(|n| n.id).collect();
    ids.sort_unstable();
    assert_eq!(ids, vec![1, 2, 3, 4]); // user 5 is unreachable
}

// ===========================================================================
// TEST 3: unknown center and unknown stats user surface NotFound
// ===========================================================================
#[tokio::test]
async fn test_not_found_surfaces_unchanged() {
    let service = AnalyticsService::new(community());

    assert!(matches!(
        service.ego_graph(2, Some(77)).await,
        Err(WeaveError::NotFound(77))
    ));
    assert!(matches!(
        service.user_stats(77).await,
        Err(WeaveError::NotFound(77))
    ));
}

// ===========================================================================
// TEST 4: user stats for the triangle corner
// ===========================================================================
#[tokio::test]
async fn test_user_stats_triangle_corner() {
    let service = AnalyticsService::new(community());

    let stats = service.user_stats(2).await.expect("stats");
    assert_eq!(stats.direct_connections, 2);
    assert_eq!(stats.second_degree_connections, 1); // user 4 via 3
    assert_eq!(stats.network_size, 4);
    assert!((stats.clustering_coefficient - 1.0).abs() < f64::EPSILON);
}

// ===========================================================================
// TEST 5: limit validation and leaderboard ordering
// ===========================================================================
#[tokio::test]
async fn test_top_connectors_limit_and_order() {
    let service = AnalyticsService::new(community());

    for limit in [0, 51] {
        let err = service.top_connectors(limit).await.expect_err("must fail");
        assert!(matches!(err, WeaveError::Validation(_)), "limit {limit}");
    }

    let profiles = service.top_connectors(3).await.expect("leaderboard");
    assert_eq!(profiles.len(), 3);
    for pair in profiles.windows(2) {
        assert!(
            pair[0].strength_score >= pair[1].strength_score,
            "leaderboard must be sorted descending"
        );
    }
    // User 3 has the most connections (1, 2, 4) and a high balance.
    assert_eq!(profiles[0].user_id, 3);
    assert!(profiles[0].locations.contains(&"Berlin".to_string()));
}

// ===========================================================================
// TEST 6: introduction success feeds the composite score
// ===========================================================================
#[tokio::test]
async fn test_introductions_affect_score() {
    let storage = community();
    // User 1 brokered two introductions, one completed.
    storage.add_introduction(Introduction {
        id: 1,
        introducer_id: 1,
        status: IntroductionStatus::Completed,
        created_at: Utc::now(),
    });
    storage.add_introduction(Introduction {
        id: 2,
        introducer_id: 1,
        status: IntroductionStatus::Pending,
        created_at: Utc::now(),
    });
    let service = AnalyticsService::new(storage);

    let profiles = service.top_connectors(5).await.expect("leaderboard");
    let with_intros = profiles.iter().find(|p| p.user_id == 1).expect("user 1");

    // User 1: 2 connections (4) + 2 locations (8) + 0.5 intro rate (10)
    // + 200 balance (4) = 26.
    assert!((with_intros.strength_score - 26.0).abs() < f64::EPSILON);
}

// ===========================================================================
// TEST 7: badge refresh through the service is idempotent
// ===========================================================================
#[tokio::test]
async fn test_refresh_badges_idempotent() {
    let storage = MemoryStorage::new();
    storage.add_user(make_user(1, 10_000));
    for leaf in 2..=13 {
        storage.add_user(make_user(leaf, 0));
        connect(&storage, 1, leaf, None);
    }
    let service = AnalyticsService::with_badge_config(
        storage,
        BadgeConfig {
            early_adopter_cutoff: 5,
            ..BadgeConfig::default()
        },
    );

    let first = service.refresh_badges().await.expect("first sweep");
    assert_eq!(first.super_connector_granted, 1);
    assert_eq!(first.top_earner_granted, 1);
    assert_eq!(first.early_adopter_granted, 5);

    let second = service.refresh_badges().await.expect("second sweep");
    assert_eq!(second.super_connector_granted, 0);
    assert_eq!(second.super_connector_revoked, 0);
    assert_eq!(second.top_earner_granted, 0);
    assert_eq!(second.top_earner_revoked, 0);
    assert_eq!(second.early_adopter_granted, 0);
}

// ===========================================================================
// TEST 8: granted badges show up on leaderboard profiles
// ===========================================================================
#[tokio::test]
async fn test_badges_enrich_profiles() {
    let storage = MemoryStorage::new();
    storage.add_user(make_user(1, 10_000));
    for leaf in 2..=13 {
        storage.add_user(make_user(leaf, 0));
        connect(&storage, 1, leaf, None);
    }
    let service = AnalyticsService::new(storage);

    service.refresh_badges().await.expect("sweep");
    let profiles = service.top_connectors(1).await.expect("leaderboard");

    assert_eq!(profiles[0].user_id, 1);
    assert!(profiles[0].badges.contains(&BadgeType::SuperConnector));
    assert!(profiles[0].badges.contains(&BadgeType::TopEarner));
}

// ===========================================================================
// TEST 9: storage failure aborts with DataUnavailable
// ===========================================================================
#[tokio::test]
async fn test_storage_failure_aborts_operation() {
    let storage = community();
    storage.set_fail_reads(true);
    let service = AnalyticsService::new(storage);

    for result in [
        service.ego_graph(2, None).await.map(|_| ()),
        service.user_stats(1).await.map(|_| ()),
        service.top_connectors(5).await.map(|_| ()),
    ] {
        assert!(matches!(result, Err(WeaveError::DataUnavailable(_))));
    }
}

// ===========================================================================
// TEST 10: rank and percentile through the service
// ===========================================================================
#[tokio::test]
async fn test_user_rank_through_service() {
    let service = AnalyticsService::new(community());

    let rank = service.user_rank(3).await.expect("rank");
    assert_eq!(rank.rank, 1);
    assert_eq!(rank.percentile, 100);

    assert!(matches!(
        service.user_rank(77).await,
        Err(WeaveError::NotFound(77))
    ));
}
