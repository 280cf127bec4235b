pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod snapshot;
pub mod storage;

pub use config::WeaveConfig;
pub use error::WeaveError;
pub use models::{
    Badge, BadgeType, Connection, ConnectorProfile, EgoLink, EgoNetwork, EgoNode, Introduction,
    IntroductionStats, IntroductionStatus, NetworkStats, User,
};
pub use snapshot::{build_snapshot, GraphSnapshot};
pub use storage::{MemoryStorage, PgStorage, Storage};
