//! Immutable graph snapshot over users and connections.
//!
//! One snapshot backs one analytics operation: it is built from two
//! batched collaborator reads, never mutated afterwards, and discarded
//! when the operation finishes. Every downstream computation (ego
//! extraction, statistics, scoring, badge qualification) reads the same
//! snapshot, so nothing in the engine performs I/O per user.

use crate::error::WeaveError;
use crate::models::{Connection, User};
use crate::storage::Storage;
use std::collections::HashMap;

#[derive(Debug)]
pub struct GraphSnapshot {
    users: HashMap<i64, User>,
    adjacency: HashMap<i64, Vec<Connection>>,
    user_order: Vec<i64>,
}

impl GraphSnapshot {
    /// Build the adjacency structure in one O(E) pass. Connection order
    /// within each adjacency list is the input (insertion) order, which
    /// downstream traversal depends on for determinism.
    pub fn from_parts(users: Vec<User>, connections: Vec<Connection>) -> Self {
        let user_order: Vec<i64> = users.iter().map(|u| u.id).collect();
        let users: HashMap<i64, User> = users.into_iter().map(|u| (u.id, u)).collect();

        let mut adjacency: HashMap<i64, Vec<Connection>> = HashMap::new();
        for connection in connections {
            adjacency
                .entry(connection.owner_id)
                .or_default()
                .push(connection);
        }

        Self {
            users,
            adjacency,
            user_order,
        }
    }

    pub fn user(&self, id: i64) -> Option<&User> {
        self.users.get(&id)
    }

    pub fn contains(&self, id: i64) -> bool {
        self.users.contains_key(&id)
    }

    /// User ids in load order (deterministic seeding order for full-graph
    /// traversal).
    pub fn user_ids(&self) -> &[i64] {
        &self.user_order
    }

    pub fn user_count(&self) -> usize {
        self.user_order.len()
    }

    /// Outgoing connections of one user, in insertion order.
    pub fn connections(&self, id: i64) -> &[Connection] {
        self.adjacency.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn out_degree(&self, id: i64) -> usize {
        self.connections(id).len()
    }
}

/// Load the full user and connection sets and assemble a snapshot.
///
/// Any collaborator read failure aborts the build with `DataUnavailable`;
/// a partial snapshot is never returned.
pub async fn build_snapshot<S: Storage + ?Sized>(
    storage: &S,
) -> Result<GraphSnapshot, WeaveError> {
    let users = storage.list_users().await.map_err(unavailable)?;
    let connections = storage.list_connections().await.map_err(unavailable)?;

    let snapshot = GraphSnapshot::from_parts(users, connections);
    tracing::debug!(
        users = snapshot.user_count(),
        edges = snapshot
            .user_ids()
            .iter()
            .map(|&id| snapshot.out_degree(id))
            .sum::<usize>(),
        "Built graph snapshot"
    );
    Ok(snapshot)
}

fn unavailable(e: WeaveError) -> WeaveError {
    match e {
        WeaveError::DataUnavailable(_) => e,
        other => WeaveError::DataUnavailable(other.to_string()),
    }
}

// ============================================================================
// TESTS
// ============================================================================
