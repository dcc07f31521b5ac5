//! Page Classifier
//!
//! Keyword taxonomies, the pure scorer, and the debounced host loop that
//! re-runs it on content changes.

pub mod debounce;
pub mod scorer;
pub mod taxonomy;

pub use debounce::{DetectionDebouncer, DetectionReporter};
pub use scorer::{classify, score_signal, ClassScores, ClassTally, PageClassifier};
pub use taxonomy::{KeywordTaxonomies, PolicyClass, Zone};
