//! Field resolution and derivation over raw provider payloads.
//!
//! Everything in here is a pure transform: untyped JSON in, normalized
//! record out. No I/O, no shared state, and no panics on malformed input —
//! a value that cannot be resolved is absent, never an error.

pub mod accessor;
pub mod activity;
pub mod body_battery;
pub mod floors;
pub mod health_metrics;
pub mod heart_rate;
pub mod running_goal;
pub mod shape;
pub mod sleep;
pub mod steps;
pub mod stress;
pub mod training;
