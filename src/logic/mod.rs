//! Logic modules — the pure combo resolution operations.
//!
//! # Modules
//!
//! - `availability` — Sequential lock and combo-backed option availability
//! - `pricing` — Exact-set combo price lookup for complete selections
//! - `authoring` — Admin combo proposals, orphan detection, duplicate report
//! - `resolver` — `ComboResolver`, the snapshot-bound entry point

pub mod authoring;
pub mod availability;
pub mod pricing;
pub mod resolver;
