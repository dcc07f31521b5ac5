//! Services Layer
//!
//! Detection, analysis and scan lifecycle for policy pages.

pub mod analysis;
pub mod classifier;
pub mod digest;
pub mod generative;
pub mod heuristics;
pub mod page;
pub mod scan;
