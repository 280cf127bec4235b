//! Per-user network statistics.
//!
//! Four independent computations over the same snapshot. They could share
//! one exploration pass, but each must hold on its own, so each is its
//! own function and `network_stats` just composes them.

use std::collections::{HashMap, HashSet, VecDeque};
use weave_core::models::NetworkStats;
use weave_core::{GraphSnapshot, WeaveError};

/// Out-degree of the user in the snapshot.
pub fn direct_connections(snapshot: &GraphSnapshot, user_id: i64) -> usize {
    snapshot.out_degree(user_id)
}

/// Distinct ids exactly two hops out: peers of direct neighbors that are
/// neither the user nor already a direct neighbor.
pub fn second_degree_connections(snapshot: &GraphSnapshot, user_id: i64) -> usize {
    let direct: HashSet<i64> = snapshot
        .connections(user_id)
        .iter()
        .map(|c| c.peer_id)
        .collect();

    let mut second: HashSet<i64> = HashSet::new();
    for &neighbor in &direct {
        for connection in snapshot.connections(neighbor) {
            let peer = connection.peer_id;
            if peer != user_id && !direct.contains(&peer) {
                second.insert(peer);
            }
        }
    }
    second.len()
}

/// Size of the full BFS reachable set from the user, including the user
/// themselves. Dangling peer ids count as reachable nodes; missing user
/// records only matter when materializing display views.
pub fn network_size(snapshot: &GraphSnapshot, user_id: i64) -> usize {
    let mut visited: HashSet<i64> = HashSet::from([user_id]);
    let mut queue: VecDeque<i64> = VecDeque::from([user_id]);

    while let Some(id) = queue.pop_front() {
        for connection in snapshot.connections(id) {
            if visited.insert(connection.peer_id) {
                queue.push_back(connection.peer_id);
            }
        }
    }
    visited.len()
}

/// Fraction of the user's neighbor pairs that are themselves connected.
///
/// The check per unordered pair (x, y) is one-directional (x→y only),
/// matching the reference behavior; connections come in reciprocal pairs
/// in practice, so symmetrizing would silently change scores.
pub fn clustering_coefficient(snapshot: &GraphSnapshot, user_id: i64) -> f64 {
    let k = snapshot.out_degree(user_id);
    if k < 2 {
        return 0.0;
    }

    // Distinct neighbors in first-encountered order.
    let mut neighbors: Vec<i64> = Vec::new();
    let mut seen: HashSet<i64> = HashSet::new();
    for connection in snapshot.connections(user_id) {
        if seen.insert(connection.peer_id) {
            neighbors.push(connection.peer_id);
        }
    }

    let mut triangles = 0usize;
    for i in 0..neighbors.len() {
        for j in (i + 1)..neighbors.len() {
            let (x, y) = (neighbors[i], neighbors[j]);
            if snapshot.connections(x).iter().any(|c| c.peer_id == y) {
                triangles += 1;
            }
        }
    }

    (2 * triangles) as f64 / (k * (k - 1)) as f64
}

/// Mean BFS hop distance from the user to every reachable node, excluding
/// the user themselves. 0 when nothing is reachable — never NaN.
pub fn average_path_length(snapshot: &GraphSnapshot, user_id: i64) -> f64 {
    let mut distance: HashMap<i64, usize> = HashMap::from([(user_id, 0)]);
    let mut queue: VecDeque<i64> = VecDeque::from([user_id]);

    while let Some(id) = queue.pop_front() {
        let next = distance[&id] + 1;
        for connection in snapshot.connections(id) {
            if !distance.contains_key(&connection.peer_id) {
                distance.insert(connection.peer_id, next);
                queue.push_back(connection.peer_id);
            }
        }
    }

    let reached = distance.len() - 1; // exclude self
    if reached == 0 {
        return 0.0;
    }
    let total: usize = distance.values().sum();
    total as f64 / reached as f64
}

/// Compose all four statistics for one user. Fails with `NotFound` if the
/// user is absent from the snapshot.
pub fn network_stats(
    snapshot: &GraphSnapshot,
    user_id: i64,
) -> Result<NetworkStats, WeaveError> {
    if !snapshot.contains(user_id) {
        return Err(WeaveError::NotFound(user_id));
    }

    Ok(NetworkStats {
        user_id,
        direct_connections: direct_connections(snapshot, user_id),
        second_degree_connections: second_degree_connections(snapshot, user_id),
        network_size: network_size(snapshot, user_id),
        clustering_coefficient: clustering_coefficient(snapshot, user_id),
        average_path_length: average_path_length(snapshot, user_id),
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use weave_core::models::{Connection, User};

    fn make_user(id: i64) -> User {
        User {
            id,
            display_name: format!("user-{id}"),
            email: format!("user{id}@example.com"),
            title: None,
            company: None,
            verified: false,
            point_balance: 0,
            created_at: Utc::now(),
        }
    }

    fn make_connection(owner: i64, peer: i64) -> Connection {
        Connection {
            owner_id: owner,
            peer_id: peer,
            strength_raw: 50,
            origin_exchange_id: None,
            origin_location: None,
            note: None,
            created_at: Utc::now(),
        }
    }

    fn pair(connections: &mut Vec<Connection>, a: i64, b: i64) {
        connections.push(make_connection(a, b));
        connections.push(make_connection(b, a));
    }

    /// A↔B, A↔C, B↔C — the reciprocal triangle from the product scenarios.
    fn triangle() -> GraphSnapshot {
        let mut connections = Vec::new();
        pair(&mut connections, 1, 2);
        pair(&mut connections, 1, 3);
        pair(&mut connections, 2, 3);
        GraphSnapshot::from_parts(
            vec![make_user(1), make_user(2), make_user(3)],
            connections,
        )
    }

    // ========================================================================
    // TEST 1: triangle scenario — clustering 1.0, network size 3, degree 2
    // ========================================================================
    #[test]
    fn test_triangle_scenario() {
        let s = triangle();

        assert_eq!(direct_connections(&s, 1), 2);
        assert_eq!(network_size(&s, 1), 3);
        assert!((clustering_coefficient(&s, 1) - 1.0).abs() < f64::EPSILON);
    }

    // ========================================================================
    // TEST 2: direct connections equal out-degree
    // ========================================================================
    #[test]
    fn test_direct_connections_is_out_degree() {
        let s = triangle();
        for id in [1, 2, 3] {
            assert_eq!(direct_connections(&s, id), s.out_degree(id));
        }
        assert_eq!(direct_connections(&s, 99), 0);
    }

    // ========================================================================
    // TEST 3: second degree excludes self and direct neighbors
    // ========================================================================
    #[test]
    fn test_second_degree_excludes_self_and_direct() {
        // Chain: 1↔2, 2↔3, 3↔4. From 1: direct {2}, second {3}.
        let mut connections = Vec::new();
        pair(&mut connections, 1, 2);
        pair(&mut connections, 2, 3);
        pair(&mut connections, 3, 4);
        let s = GraphSnapshot::from_parts(
            vec![make_user(1), make_user(2), make_user(3), make_user(4)],
            connections,
        );

        assert_eq!(second_degree_connections(&s, 1), 1);
        // From 2: direct {1, 3}, second {4} (1's and 3's other peers are
        // 2 itself or direct neighbors).
        assert_eq!(second_degree_connections(&s, 2), 1);
    }

    // ========================================================================
    // TEST 4: clustering is 0 for fewer than two connections
    // ========================================================================
    #[test]
    fn test_clustering_zero_below_two_connections() {
        let mut connections = Vec::new();
        pair(&mut connections, 1, 2);
        let s = GraphSnapshot::from_parts(
            vec![make_user(1), make_user(2), make_user(3)],
            connections,
        );

        assert_eq!(clustering_coefficient(&s, 1), 0.0);
        assert_eq!(clustering_coefficient(&s, 3), 0.0);
    }

    // ========================================================================
    // TEST 5: clustering stays within [0, 1]
    // ========================================================================
    #[test]
    fn test_clustering_bounds() {
        // Star: center 1 with leaves 2..=5, no leaf-to-leaf edges.
        let mut connections = Vec::new();
        for leaf in 2..=5 {
            pair(&mut connections, 1, leaf);
        }
        let users = (1..=5).map(make_user).collect();
        let s = GraphSnapshot::from_parts(users, connections);

        let c = clustering_coefficient(&s, 1);
        assert_eq!(c, 0.0);

        let c = clustering_coefficient(&triangle(), 1);
        assert!((0.0..=1.0).contains(&c));
    }

    // ========================================================================
    // TEST 6: one-directional triangle check (x→y only)
    // ========================================================================
    #[test]
    fn test_clustering_check_is_one_directional() {
        // 1↔2, 1↔3, and only 3→2 (no 2→3). Neighbor order from 1 is
        // [2, 3], so the pair check asks for 2→3, which is absent.
        let mut connections = Vec::new();
        pair(&mut connections, 1, 2);
        pair(&mut connections, 1, 3);
        connections.push(make_connection(3, 2));
        let s = GraphSnapshot::from_parts(
            vec![make_user(1), make_user(2), make_user(3)],
            connections,
        );

        assert_eq!(clustering_coefficient(&s, 1), 0.0);
    }

    // ========================================================================
    // TEST 7: network size includes self and spans the reachable set
    // ========================================================================
    #[test]
    fn test_network_size_includes_self() {
        let mut connections = Vec::new();
        pair(&mut connections, 1, 2);
        pair(&mut connections, 2, 3);
        let s = GraphSnapshot::from_parts(
            vec![make_user(1), make_user(2), make_user(3), make_user(4)],
            connections,
        );

        assert_eq!(network_size(&s, 1), 3); // 1, 2, 3 — not isolated 4
        assert_eq!(network_size(&s, 4), 1); // just itself

        // networkSize(u) >= directConnections(u) + 1 whenever degree > 0.
        assert!(network_size(&s, 1) >= direct_connections(&s, 1) + 1);
    }

    // ========================================================================
    // TEST 8: average path length — chain distances
    // ========================================================================
    #[test]
    fn test_average_path_length_chain() {
        // Chain 1↔2↔3: from 1, distances are 1 and 2 → average 1.5.
        let mut connections = Vec::new();
        pair(&mut connections, 1, 2);
        pair(&mut connections, 2, 3);
        let s = GraphSnapshot::from_parts(
            vec![make_user(1), make_user(2), make_user(3)],
            connections,
        );

        assert!((average_path_length(&s, 1) - 1.5).abs() < f64::EPSILON);
        assert!((average_path_length(&s, 2) - 1.0).abs() < f64::EPSILON);
    }

    // ========================================================================
    // TEST 9: zero reachable neighbors — path length exactly 0, never NaN
    // ========================================================================
    #[test]
    fn test_average_path_length_isolated_user() {
        let s = GraphSnapshot::from_parts(vec![make_user(1)], vec![]);

        let avg = average_path_length(&s, 1);
        assert_eq!(avg, 0.0);
        assert!(!avg.is_nan());
    }

    // ========================================================================
    // TEST 10: network_stats composes and rejects unknown users
    // ========================================================================
    #[test]
    fn test_network_stats_composition() {
        let s = triangle();

        let stats = network_stats(&s, 1).expect("stats");
        assert_eq!(stats.user_id, 1);
        assert_eq!(stats.direct_connections, 2);
        assert_eq!(stats.second_degree_connections, 0);
        assert_eq!(stats.network_size, 3);
        assert!((stats.clustering_coefficient - 1.0).abs() < f64::EPSILON);
        assert!((stats.average_path_length - 1.0).abs() < f64::EPSILON);

        let err = network_stats(&s, 42).expect_err("must fail");
        assert!(matches!(err, WeaveError::NotFound(42)));
    }

    // ========================================================================
    // TEST 11: asymmetric edges are treated as directed data
    // ========================================================================
    #[test]
    fn test_asymmetric_edges_directed() {
        // Only 1→2 exists.
        let connections = vec![make_connection(1, 2)];
        let s = GraphSnapshot::from_parts(vec![make_user(1), make_user(2)], connections);

        assert_eq!(direct_connections(&s, 1), 1);
        assert_eq!(direct_connections(&s, 2), 0);
        assert_eq!(network_size(&s, 1), 2);
        assert_eq!(network_size(&s, 2), 1);
        assert_eq!(average_path_length(&s, 2), 0.0);
    }

    // ========================================================================
    // TEST 12: dangling peers still count for statistics
    // ========================================================================
    #[test]
    fn test_dangling_peers_count_in_stats() {
        let connections = vec![make_connection(1, 42)]; // 42 has no record
        let s = GraphSnapshot::from_parts(vec![make_user(1)], connections);

        assert_eq!(direct_connections(&s, 1), 1);
        assert_eq!(network_size(&s, 1), 2);
        assert!((average_path_length(&s, 1) - 1.0).abs() < f64::EPSILON);
    }
}
