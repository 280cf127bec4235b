//! Connection graph analytics engine.
//!
//! Four components over one immutable [`weave_core::GraphSnapshot`]:
//! - [`ego`] — bounded-depth ego-network extraction,
//! - [`stats`] — per-user network statistics,
//! - [`scoring`] — composite connector-strength scoring and ranking,
//! - [`badges`] — percentile/lifecycle badge synchronization,
//! plus [`service`], the typed facade callers go through.

pub mod badges;
pub mod ego;
pub mod scoring;
pub mod service;
pub mod stats;

pub use badges::BadgeSyncReport;
pub use scoring::{ScoredUser, UserRank};
pub use service::AnalyticsService;
