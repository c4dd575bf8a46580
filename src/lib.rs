//! Offline-first learning progress core: SM-2 scheduling, mastery and streak
//! tracking, XP/levels, a sled-backed progress store and a background sync
//! coordinator for the remote store.

pub mod config;
pub mod constants;
pub mod logging;
pub mod rewards;
pub mod srs;
pub mod store;
pub mod streak;
pub mod sync;
pub mod validation;
pub mod xp;
