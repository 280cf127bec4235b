use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Status badge kinds awarded by the synchronizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeType {
    SuperConnector,
    TopEarner,
    EarlyAdopter,
}

impl BadgeType {
    /// Stable wire/database name.
    pub fn as_str(&self) -> &'static str {
        match self {
            BadgeType::SuperConnector => "super_connector",
            BadgeType::TopEarner => "top_earner",
            BadgeType::EarlyAdopter => "early_adopter",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "super_connector" => Some(BadgeType::SuperConnector),
            "top_earner" => Some(BadgeType::TopEarner),
            "early_adopter" => Some(BadgeType::EarlyAdopter),
            _ => None,
        }
    }
}

impl std::fmt::Display for BadgeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Badge {
    pub id: Uuid,
    pub user_id: i64,
    pub badge_type: BadgeType,
    pub earned_at: DateTime<Utc>,
}
