#[allow(dead_code)]
mod common;

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use ndarray::{s, Array2};

use ultraspeckle_core::error::UltraspeckleError;
use ultraspeckle_core::filters::cleanup::{clean_frame, CleanupParams};
use ultraspeckle_core::filters::roi::RoiBounds;
use ultraspeckle_core::filters::srad::{srad, SradParams};
use ultraspeckle_core::frame::min_max;
use ultraspeckle_core::normalize::{norm_check, normalize};
use ultraspeckle_core::pipeline::config::PipelineConfig;
use ultraspeckle_core::pipeline::{process_frame, process_frames, process_frames_reported, ProgressReporter};
use ultraspeckle_core::quality::total_variation;

fn short_config() -> PipelineConfig {
    PipelineConfig {
        srad: SradParams {
            iterations: 20,
            ..SradParams::default()
        },
        cleanup: Some(CleanupParams::default()),
        roi: None,
    }
}

/// Quantize a float frame to 8-bit, the way raw B-mode data arrives.
fn to_u8(frame: &Array2<f64>) -> Array2<u8> {
    let (mn, mx) = min_max(frame).unwrap();
    frame.mapv(|v| ((v - mn) / (mx - mn) * 255.0).round() as u8)
}

// ---------------------------------------------------------------------------
// Stage-by-stage chain
// ---------------------------------------------------------------------------

#[test]
fn test_end_to_end_reduces_total_variation() {
    let base = common::make_tongue_frame(64, 64);
    let noisy = common::add_speckle(&base, 0.25, 42);

    let normalized = normalize(&noisy);
    let diffused = srad(
        &normalized,
        &SradParams {
            iterations: 50,
            ..SradParams::default()
        },
    );
    norm_check(&diffused).expect("SRAD output stays in [0, 1]");
    let cleaned = clean_frame(&diffused, &CleanupParams::default()).unwrap();

    let tv_noisy = total_variation(&normalized);
    let tv_clean = total_variation(&cleaned);
    assert!(
        tv_clean < tv_noisy,
        "expected net denoising: noisy TV {tv_noisy}, cleaned TV {tv_clean}"
    );
}

// ---------------------------------------------------------------------------
// process_frame
// ---------------------------------------------------------------------------

#[test]
fn test_process_frame_matches_manual_chain() {
    let noisy = common::speckle_frame(32, 32, 5);
    let config = short_config();

    let manual = clean_frame(&srad(&noisy, &config.srad), config.cleanup.as_ref().unwrap()).unwrap();
    let piped = process_frame(&noisy, &config).unwrap();
    assert_eq!(piped, manual);
}

#[test]
fn test_process_frame_accepts_integer_frames() {
    let raw = to_u8(&common::speckle_frame(32, 40, 9));
    let out = process_frame(&raw, &short_config()).unwrap();
    assert_eq!(out.dim(), (32, 40));
    assert!(out.iter().all(|v| v.is_finite()));
}

#[test]
fn test_process_frame_applies_roi() {
    let noisy = common::speckle_frame(32, 32, 12);
    let config = PipelineConfig {
        roi: Some(RoiBounds::new(8, 24)),
        ..short_config()
    };
    let out = process_frame(&noisy, &config).unwrap();
    assert!(out.slice(s![..8, ..]).iter().all(|&v| v == 0.0));
    assert!(out.slice(s![24.., ..]).iter().all(|&v| v == 0.0));
    assert!(out.slice(s![8..24, ..]).iter().any(|&v| v != 0.0));
}

#[test]
fn test_process_frame_rejects_constant_frame() {
    let frame = common::make_frame(16, 16, 0.4);
    let err = process_frame(&frame, &short_config()).unwrap_err();
    assert!(matches!(err, UltraspeckleError::DegenerateFrame { .. }));
}

#[test]
fn test_process_frame_rejects_bad_roi_before_diffusing() {
    let noisy = common::speckle_frame(16, 16, 1);
    let config = PipelineConfig {
        roi: Some(RoiBounds::new(4, 40)),
        ..short_config()
    };
    let err = process_frame(&noisy, &config).unwrap_err();
    assert!(matches!(err, UltraspeckleError::RoiOutOfBounds { upper: 40, rows: 16 }));
}

// ---------------------------------------------------------------------------
// Batches
// ---------------------------------------------------------------------------

#[test]
fn test_process_frames_parallel_matches_sequential() {
    let frames: Vec<Array2<f64>> = (0..6).map(|i| common::speckle_frame(24, 24, 100 + i)).collect();
    let config = short_config();

    let batch = process_frames(&frames, &config).unwrap();
    assert_eq!(batch.len(), frames.len());
    for (frame, out) in frames.iter().zip(batch.iter()) {
        assert_eq!(*out, process_frame(frame, &config).unwrap());
    }
}

#[test]
fn test_process_frames_first_failure_aborts() {
    let mut frames: Vec<Array2<f64>> = (0..5).map(|i| common::speckle_frame(16, 16, i)).collect();
    frames[3] = common::make_frame(16, 16, 1.0);
    let err = process_frames(&frames, &short_config()).unwrap_err();
    assert!(matches!(err, UltraspeckleError::DegenerateFrame { .. }));
}

#[test]
fn test_process_frames_empty_batch() {
    let frames: Vec<Array2<f64>> = Vec::new();
    assert!(process_frames(&frames, &short_config()).unwrap().is_empty());
}

#[derive(Default)]
struct CountingReporter {
    total: AtomicUsize,
    advanced: AtomicUsize,
    max_done: AtomicUsize,
    finished: AtomicUsize,
}

impl ProgressReporter for CountingReporter {
    fn begin(&self, total_frames: usize) {
        self.total.store(total_frames, Ordering::SeqCst);
    }

    fn advance(&self, frames_done: usize) {
        self.advanced.fetch_add(1, Ordering::SeqCst);
        self.max_done.fetch_max(frames_done, Ordering::SeqCst);
    }

    fn finish(&self) {
        self.finished.fetch_add(1, Ordering::SeqCst);
    }
}

#[test]
fn test_process_frames_reports_progress() {
    let frames: Vec<Array2<f64>> = (0..5).map(|i| common::speckle_frame(16, 16, 7 + i)).collect();
    let reporter = CountingReporter::default();
    let cancel = AtomicBool::new(false);

    process_frames_reported(&frames, &short_config(), &reporter, &cancel).unwrap();

    assert_eq!(reporter.total.load(Ordering::SeqCst), 5);
    assert_eq!(reporter.advanced.load(Ordering::SeqCst), 5);
    assert_eq!(reporter.max_done.load(Ordering::SeqCst), 5);
    assert_eq!(reporter.finished.load(Ordering::SeqCst), 1);
}

#[test]
fn test_process_frames_cancelled() {
    let frames: Vec<Array2<f64>> = (0..3).map(|i| common::speckle_frame(16, 16, i)).collect();
    let reporter = CountingReporter::default();
    let cancel = AtomicBool::new(true);

    let err = process_frames_reported(&frames, &short_config(), &reporter, &cancel).unwrap_err();
    assert!(matches!(err, UltraspeckleError::Cancelled { completed: 0, total: 20 }));
    assert_eq!(reporter.advanced.load(Ordering::SeqCst), 0);
    assert_eq!(reporter.finished.load(Ordering::SeqCst), 1);
}
