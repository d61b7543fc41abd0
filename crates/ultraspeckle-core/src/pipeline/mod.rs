pub mod config;
mod orchestrator;
mod types;

pub use orchestrator::{process_frame, process_frames, process_frames_reported};
pub use types::{PipelineStage, ProgressReporter};
