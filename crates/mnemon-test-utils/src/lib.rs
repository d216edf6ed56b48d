//! Test helpers shared across mnemon crates.

pub mod extraction;
pub mod model;

pub use extraction::{FailingExtractor, FixedExtractor, RecordingExtractor, ScriptedExtractor};
pub use model::{FailingModel, FixedModel, RecordingModel, ScriptedModel};
