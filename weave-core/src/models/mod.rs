pub mod badge;
pub mod connection;
pub mod introduction;
pub mod network;
pub mod user;

pub use badge::{Badge, BadgeType};
pub use connection::Connection;
pub use introduction::{Introduction, IntroductionStats, IntroductionStatus};
pub use network::{ConnectorProfile, EgoLink, EgoNetwork, EgoNode, NetworkStats};
pub use user::User;
