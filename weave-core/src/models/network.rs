//! Display-ready projections produced by the analytics engine.

use crate::models::BadgeType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One node of an ego-network view. `connection_count` is the user's
/// out-degree in the snapshot, not the degree within the extracted view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EgoNode {
    pub id: i64,
    pub label: String,
    pub email: String,
    pub title: Option<String>,
    pub company: Option<String>,
    pub verified: bool,
    pub connection_count: usize,
    pub point_balance: i64,
}

/// An undirected, de-duplicated link between two ego-network nodes.
/// `strength` is the raw 0–100 tie strength mapped to a 1–5 display band.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EgoLink {
    pub source: i64,
    pub target: i64,
    pub strength: u8,
    pub created_at: DateTime<Utc>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EgoNetwork {
    pub nodes: Vec<EgoNode>,
    pub links: Vec<EgoLink>,
}

/// Per-user network statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkStats {
    pub user_id: i64,
    pub direct_connections: usize,
    pub second_degree_connections: usize,
    /// Size of the full reachable set, including the user themselves.
    pub network_size: usize,
    /// Fraction of neighbor pairs that are themselves connected, in [0, 1].
    pub clustering_coefficient: f64,
    /// Mean BFS hop distance to every reachable node; 0 when nothing is
    /// reachable.
    pub average_path_length: f64,
}

/// Leaderboard entry for the top-connectors surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectorProfile {
    pub user_id: i64,
    pub display_name: String,
    pub connection_count: usize,
    pub point_balance: i64,
    /// Composite connector-strength score, 0–100.
    pub strength_score: f64,
    pub badges: Vec<BadgeType>,
    /// Up to 5 industries, first-encountered order over the user's
    /// connections.
    pub industries: Vec<String>,
    /// Up to 5 distinct exchange locations, first-encountered order.
    pub locations: Vec<String>,
}
