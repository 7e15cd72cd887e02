//! Leave lifecycle and eligibility projection.

pub mod classifier;
pub mod day_span;
pub mod lifecycle;
pub mod projection;

pub use lifecycle::LeaveManager;

use crate::store::mysql::MySqlStore;

/// Manager wired to the production store.
pub type AppLeaveManager = LeaveManager<MySqlStore>;
