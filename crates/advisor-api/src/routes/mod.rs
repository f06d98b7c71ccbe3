//! # API Route Modules
//!
//! - `info`: service description and health (unauthenticated).
//! - `reward`: batch reward calculation and single-deal simulation.
//! - `agent_class`: agent tier classification.
//! - `feedback`: feedback intake and listing.

pub mod agent_class;
pub mod feedback;
pub mod info;
pub mod reward;
