pub mod engine;

pub use engine::{fetch_health_payloads, SyncEngine};
