//! Ego-network extraction — bounded-depth BFS over the snapshot.
//!
//! With a center: classic ego network, seeded at depth 0 from one user.
//! Without a center: the full graph at bounded depth, seeded from every
//! user simultaneously; each id is visited once globally.
//!
//! Nodes are emitted the first time they are dequeued and carry the
//! user's out-degree in the snapshot (not the degree within the view).
//! Edges are only expanded while `current_depth < depth`; an edge to an
//! already-visited node is still recorded as a link but does not
//! re-enqueue that node.

use std::collections::{HashSet, VecDeque};
use weave_core::models::{EgoLink, EgoNetwork, EgoNode};
use weave_core::{GraphSnapshot, WeaveError};

/// Map a 0–100 raw tie strength to the 1–5 display band (rounded up).
fn display_strength(raw: i16) -> u8 {
    (((raw.max(0) + 19) / 20).clamp(1, 5)) as u8
}

pub fn extract_ego_network(
    snapshot: &GraphSnapshot,
    depth: u32,
    center: Option<i64>,
) -> Result<EgoNetwork, WeaveError> {
    let mut queue: VecDeque<(i64, u32)> = VecDeque::new();
    let mut visited: HashSet<i64> = HashSet::new();

    match center {
        Some(id) => {
            if !snapshot.contains(id) {
                return Err(WeaveError::NotFound(id));
            }
            visited.insert(id);
            queue.push_back((id, 0));
        }
        None => {
            // Seed every user at depth 0, in snapshot load order so the
            // dequeue order (and therefore link dedup) is deterministic.
            for &id in snapshot.user_ids() {
                visited.insert(id);
                queue.push_back((id, 0));
            }
        }
    }

    let mut network = EgoNetwork::default();
    let mut link_seen: HashSet<(i64, i64)> = HashSet::new();

    while let Some((id, current_depth)) = queue.pop_front() {
        match snapshot.user(id) {
            Some(user) => network.nodes.push(EgoNode {
                id: user.id,
                label: user.display_name.clone(),
                email: user.email.clone(),
                title: user.title.clone(),
                company: user.company.clone(),
                verified: user.verified,
                connection_count: snapshot.out_degree(id),
                point_balance: user.point_balance,
            }),
            None => {
                tracing::warn!(user_id = id, "Dequeued id has no user record, skipping node");
                continue;
            }
        }

        if current_depth >= depth {
            continue;
        }

        for connection in snapshot.connections(id) {
            let peer = connection.peer_id;

            if !snapshot.contains(peer) {
                tracing::warn!(
                    owner_id = id,
                    peer_id = peer,
                    "Skipping dangling connection in ego view"
                );
                continue;
            }

            // Two directed edges between the same pair collapse into one
            // link; the first one encountered supplies the metadata.
            let pair = (id.min(peer), id.max(peer));
            if link_seen.insert(pair) {
                network.links.push(EgoLink {
                    source: id,
                    target: peer,
                    strength: display_strength(connection.strength_raw),
                    created_at: connection.created_at,
                    note: connection.note.clone(),
                });
            }

            if !visited.contains(&peer) {
                visited.insert(peer);
                queue.push_back((peer, current_depth + 1));
            }
        }
    }

    Ok(network)
}

// ============================================================================
// TESTS
// ============================================================================
