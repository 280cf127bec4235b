use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle of an introduction a user brokered between two contacts.
///
/// The original system attached an untyped metadata bag to each
/// introduction; the scorer only ever read the outcome, so the outcome is
/// a proper enum here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntroductionStatus {
    Pending,
    Completed,
    Declined,
}

impl IntroductionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntroductionStatus::Pending => "pending",
            IntroductionStatus::Completed => "completed",
            IntroductionStatus::Declined => "declined",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(IntroductionStatus::Pending),
            "completed" => Some(IntroductionStatus::Completed),
            "declined" => Some(IntroductionStatus::Declined),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Introduction {
    pub id: i64,
    pub introducer_id: i64,
    pub status: IntroductionStatus,
    pub created_at: DateTime<Utc>,
}

/// Per-user aggregate consumed by the introduction-success sub-score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IntroductionStats {
    pub initiated: usize,
    pub completed: usize,
}

impl IntroductionStats {
    pub fn record(&mut self, status: IntroductionStatus) {
        self.initiated += 1;
        if status == IntroductionStatus::Completed {
            self.completed += 1;
        }
    }
}
