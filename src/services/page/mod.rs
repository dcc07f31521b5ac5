//! Page Content
//!
//! Snapshots, structured text, classifier signals and the collector seam.

pub mod collector;
pub mod structure;

pub use collector::{PageContentCollector, StaticPageCollector};
pub use structure::{PageContent, PageSignal, PageSnapshot, StructuredText, BLOCK_SEPARATOR};
