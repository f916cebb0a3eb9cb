//! Pipeline components: the stage-by-stage collector and catalog
//! finalization.

pub mod orchestrator;

pub use orchestrator::{Collector, category_counts};
