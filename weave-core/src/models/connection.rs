use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A directed who-knows-whom edge.
///
/// The product creates these in reciprocal pairs (A→B and B→A) when an
/// exchange is accepted, but nothing here assumes the mirror exists — an
/// asymmetric edge is treated as plain directed data.
///
/// `origin_location` is the accepting exchange's location, denormalized
/// into the row at load time so the location-diversity sub-score needs no
/// per-connection join.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Connection {
    pub owner_id: i64,
    pub peer_id: i64,
    /// Raw tie strength, 0–100.
    pub strength_raw: i16,
    pub origin_exchange_id: Option<i64>,
    pub origin_location: Option<String>,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}
