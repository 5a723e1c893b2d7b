//! Framescrub is a scroll-synchronized frame-sequence animation engine.
//!
//! It models the mechanics behind scroll-scrubbed product demos: a tall
//! scroll container drives a normalized progress value, progress eases into a
//! frame index over an image sequence, a windowed preloader keeps nearby
//! frames warm, a CPU surface draws the current frame under a cover/contain
//! fit, and an overlay scheduler fades captions in and out against the same
//! driver.
//!
//! # Pipeline overview
//!
//! 1. **Track**: raw scroll offsets -> coalesced per-frame [`Progress`]
//! 2. **Map**: `Progress + Ease -> FrameIndex` (pure, reverse-scrub safe)
//! 3. **Warm**: request a window of frames around the index, idempotently
//! 4. **Draw**: blit the ready frame, emit the source-to-CSS [`Transform`]
//! 5. **Schedule**: select and fade the caption for the current driver value
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic-by-default**: mapping and scheduling are pure functions
//!   of their inputs; backward scrubbing revisits the exact same frames.
//! - **No IO in the tick**: frame loading happens behind the [`FrameFetcher`]
//!   seam, polled rather than awaited; a not-yet-ready frame skips one draw
//!   and is retried the next tick.
//! - **Single writer per value**: the cache is mutated only by the preload
//!   path, and each draw replaces the transform wholesale.
#![forbid(unsafe_code)]

pub mod animator;
pub mod cache;
pub mod core;
pub mod ease;
pub mod error;
pub mod fetch;
pub mod mapper;
pub mod overlay;
pub mod playback;
pub mod render;
pub mod sequence;
pub mod tracker;

pub use animator::{
    Animator, AnimatorConfig, OverlayDriver, SeekResolution, SeekTarget, TickReport,
};
pub use cache::{FrameCache, LoadState};
pub use crate::core::{
    FitMode, FrameIndex, Point, Progress, ProjectedRegion, Rect, ScreenRegion, Transform, Vec2,
    Viewport,
};
pub use ease::Ease;
pub use error::{FramescrubError, FramescrubResult};
pub use fetch::{FrameFetcher, FsFetcher, PreparedFrame, decode_frame};
pub use mapper::{frame_for_progress, progress_for_frame};
pub use overlay::{OverlayPhase, OverlayRange, OverlayState, OverlayTrack};
pub use playback::{AlwaysAllow, PlaybackClock, PlaybackGate};
pub use render::{Rgba8, SurfaceRenderer};
pub use sequence::FrameSequence;
pub use tracker::{ScrollMetrics, ScrollTracker};
