use crate::{
    core::{FrameIndex, Progress},
    ease::Ease,
};

/// Map normalized progress to a frame index.
///
/// Pure: identical inputs always produce the identical index, independent of
/// call history, so a backward scrub deterministically revisits the exact
/// frames a forward scrub produced. The result is clamped to `[0, N-1]`.
pub fn frame_for_progress(p: Progress, ease: Ease, frame_count: u32) -> FrameIndex {
    if frame_count <= 1 {
        return FrameIndex(0);
    }
    let last = f64::from(frame_count - 1);
    let eased = ease.apply(p.value());
    let idx = (eased * last).round().clamp(0.0, last);
    FrameIndex(idx as u32)
}

/// Inverse of [`frame_for_progress`]: the progress value whose eased position
/// lands on `index`. Round-trips within one frame of tolerance (rounding in
/// the forward direction is lossy by design).
pub fn progress_for_frame(index: FrameIndex, ease: Ease, frame_count: u32) -> Progress {
    if frame_count <= 1 {
        return Progress::ZERO;
    }
    let last = f64::from(frame_count - 1);
    let eased = f64::from(index.0.min(frame_count - 1)) / last;
    Progress::new(ease.invert(eased))
}
