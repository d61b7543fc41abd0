/// Stage of the frame chain, used in log fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipelineStage {
    Normalizing,
    Diffusing,
    Cleaning,
    RegionSelection,
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normalizing => write!(f, "Normalizing"),
            Self::Diffusing => write!(f, "Speckle diffusion"),
            Self::Cleaning => write!(f, "Median + LoG cleanup"),
            Self::RegionSelection => write!(f, "Selecting region"),
        }
    }
}

/// Thread-safe progress reporting for batch processing.
///
/// Implementors can use this to drive progress bars, logging, or any other
/// UI feedback. All methods have default no-op implementations.
pub trait ProgressReporter: Send + Sync {
    /// A batch of `total_frames` frames has started.
    fn begin(&self, _total_frames: usize) {}

    /// `frames_done` frames have finished so far. Called from worker
    /// threads, in completion order.
    fn advance(&self, _frames_done: usize) {}

    /// The batch is finished (successfully or not).
    fn finish(&self) {}
}

/// No-op progress reporter, used when `process_frames` delegates.
pub(super) struct NoOpReporter;
impl ProgressReporter for NoOpReporter {}
