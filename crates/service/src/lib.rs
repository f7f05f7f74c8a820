//! Roster domain: the activity catalog and the rules for joining and
//! leaving an activity's roster.
//! - Holds the authoritative in-memory state of all activities.
//! - Exposes strict, symmetric signup/unregister operations.
//! - Provides clear error types for the HTTP adapter to map.

pub mod errors;
pub mod roster;
pub mod seed;
