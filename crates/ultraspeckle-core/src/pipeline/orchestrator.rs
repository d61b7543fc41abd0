use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use ndarray::Array2;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::consts::PARALLEL_FRAME_THRESHOLD;
use crate::error::{Result, UltraspeckleError};
use crate::filters::cleanup::clean_frame;
use crate::filters::srad::diffuse_normalized_cancellable;
use crate::frame::{to_float, Sample};
use crate::normalize::try_normalize;
use crate::quality::total_variation;

use super::config::PipelineConfig;
use super::types::{NoOpReporter, PipelineStage, ProgressReporter};

/// Run one raw frame through the configured chain.
///
/// The frame is coerced to `f64`, normalized (constant frames are
/// rejected), diffused, and then cleaned and region-limited when those
/// stages are configured.
pub fn process_frame<T: Sample>(frame: &Array2<T>, config: &PipelineConfig) -> Result<Array2<f64>> {
    process_frame_cancellable(frame, config, &AtomicBool::new(false))
}

fn process_frame_cancellable<T: Sample>(
    frame: &Array2<T>,
    config: &PipelineConfig,
    cancel: &AtomicBool,
) -> Result<Array2<f64>> {
    let (rows, cols) = frame.dim();

    // Fail fast on a bad band before spending iterations on the frame.
    if let Some(roi) = &config.roi {
        roi.validated(rows)?;
    }
    if cancel.load(Ordering::Relaxed) {
        return Err(UltraspeckleError::Cancelled {
            completed: 0,
            total: config.srad.iterations,
        });
    }

    debug!(stage = %PipelineStage::Normalizing, rows, cols, dtype = T::DTYPE);
    let normalized = try_normalize(&to_float::<T, f64>(frame))?;
    let tv_before = total_variation(&normalized);

    debug!(stage = %PipelineStage::Diffusing, iterations = config.srad.iterations);
    let mut out = diffuse_normalized_cancellable(&normalized, &config.srad, cancel)?;

    if let Some(cleanup) = &config.cleanup {
        debug!(stage = %PipelineStage::Cleaning, median = cleanup.median_radius, sigma = cleanup.log_sigma);
        out = clean_frame(&out, cleanup)?;
    }

    if let Some(roi) = &config.roi {
        debug!(stage = %PipelineStage::RegionSelection, lower = roi.lower, upper = roi.upper);
        out = roi.apply(&out)?;
    }

    debug!(tv_before, tv_after = total_variation(&out), "Frame processed");
    Ok(out)
}

/// Process a batch of independent frames.
///
/// Frames are processed in parallel when there are enough of them; the
/// output order matches the input order. The first failure aborts the batch.
pub fn process_frames<T: Sample>(
    frames: &[Array2<T>],
    config: &PipelineConfig,
) -> Result<Vec<Array2<f64>>> {
    process_frames_reported(frames, config, &NoOpReporter, &AtomicBool::new(false))
}

/// Process a batch of frames with progress reporting and cancellation.
///
/// `cancel` is checked before each frame and between SRAD iterations.
pub fn process_frames_reported<T: Sample>(
    frames: &[Array2<T>],
    config: &PipelineConfig,
    reporter: &dyn ProgressReporter,
    cancel: &AtomicBool,
) -> Result<Vec<Array2<f64>>> {
    info!(
        frames = frames.len(),
        iterations = config.srad.iterations,
        lambda = config.srad.lambda,
        cleanup = config.cleanup.is_some(),
        "Processing frame batch"
    );
    reporter.begin(frames.len());

    let done = AtomicUsize::new(0);
    let run_one = |frame: &Array2<T>| -> Result<Array2<f64>> {
        let out = process_frame_cancellable(frame, config, cancel)?;
        let completed = done.fetch_add(1, Ordering::Relaxed) + 1;
        reporter.advance(completed);
        Ok(out)
    };

    let result: Result<Vec<Array2<f64>>> = if frames.len() >= PARALLEL_FRAME_THRESHOLD {
        frames.par_iter().map(run_one).collect()
    } else {
        frames.iter().map(run_one).collect()
    };

    reporter.finish();
    if result.is_ok() {
        info!(frames = frames.len(), "Frame batch complete");
    }
    result
}
