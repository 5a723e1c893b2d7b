use crate::{
    cache::FrameCache,
    core::{FitMode, FrameIndex, Progress, ProjectedRegion, ScreenRegion, Transform},
    ease::Ease,
    error::{FramescrubError, FramescrubResult},
    fetch::FrameFetcher,
    mapper,
    overlay::{OverlayRange, OverlayState, OverlayTrack},
    playback::{PlaybackClock, PlaybackGate},
    render::SurfaceRenderer,
    sequence::FrameSequence,
    tracker::{ScrollMetrics, ScrollTracker},
};

/// Which scalar drives overlay scheduling.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlayDriver {
    /// Current frame index (scroll-scrubbed image sequences).
    #[default]
    FrameIndex,
    /// Normalized progress in [0, 1].
    Progress,
    /// Elapsed playback time in seconds (video-backed variant).
    PlaybackTime,
}

/// Full per-instance configuration surface.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct AnimatorConfig {
    pub frame_count: u32,
    /// Base path prefix for frame resources, e.g. `/hero/frames/frame_`.
    pub frame_base: String,
    #[serde(default = "default_pad")]
    pub frame_pad: usize,
    #[serde(default = "default_ext")]
    pub frame_ext: String,
    pub fit_mode: FitMode,
    pub ease: Ease,
    /// Fraction of rendered height to shift the image upward under cover fit.
    #[serde(default)]
    pub viewport_bias_y: f64,
    /// Overlay fade width, in overlay-driver units.
    pub fade_width: f64,
    #[serde(default = "default_warm_behind")]
    pub warm_behind: u32,
    #[serde(default = "default_warm_ahead")]
    pub warm_ahead: u32,
    /// Step toward the target frame instead of snapping to it, for drivers
    /// that jump (fast flicks, chapter seeks).
    #[serde(default)]
    pub smoothing: bool,
    #[serde(default)]
    pub overlay_driver: OverlayDriver,
    #[serde(default)]
    pub overlays: Vec<OverlayRange>,
    /// Optional source-pixel region dependent content pins itself to.
    #[serde(default)]
    pub screen_region: Option<ScreenRegion>,
}

fn default_pad() -> usize {
    4
}

fn default_ext() -> String {
    "jpg".to_string()
}

fn default_warm_behind() -> u32 {
    10
}

fn default_warm_ahead() -> u32 {
    20
}

impl AnimatorConfig {
    pub fn validate(&self) -> FramescrubResult<()> {
        self.sequence()?;
        if self.viewport_bias_y.abs() >= 1.0 {
            return Err(FramescrubError::validation(
                "viewport_bias_y must be within (-1, 1)",
            ));
        }
        OverlayTrack::new(self.overlays.clone(), self.fade_width)?;
        Ok(())
    }

    pub fn sequence(&self) -> FramescrubResult<FrameSequence> {
        FrameSequence::new(
            self.frame_base.clone(),
            self.frame_pad,
            self.frame_ext.clone(),
            self.frame_count,
        )
    }
}

/// Where a seek resolved to. Scroll-driven animators hand back the absolute
/// scroll offset for the host to apply; time-driven animators reposition
/// their own clock.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SeekResolution {
    ScrollOffset(f64),
    PlaybackTime(f64),
}

/// Programmatic reposition target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SeekTarget {
    Frame(FrameIndex),
    Progress(f64),
    Time(f64),
}

/// What one tick did, for hosts that poll instead of subscribing.
#[derive(Clone, Debug)]
pub struct TickReport {
    pub progress: Progress,
    pub frame: FrameIndex,
    pub drawn: bool,
    pub transform: Option<Transform>,
    pub overlay: OverlayState,
}

type ProgressFn = Box<dyn FnMut(Progress)>;
type FrameFn = Box<dyn FnMut(FrameIndex)>;
type TransformFn = Box<dyn FnMut(Transform)>;
type OverlayFn = Box<dyn FnMut(&OverlayState)>;

#[derive(Default)]
struct Observers {
    progress: Vec<ProgressFn>,
    frame: Vec<FrameFn>,
    transform: Vec<TransformFn>,
    overlay: Vec<OverlayFn>,
}

/// One animator instance owning all of its mutable state.
///
/// Everything the original event-listener soup kept in ambient globals
/// (current scroll offset, warm frame set, last transform) lives here behind
/// accessor methods. Data flows one way per tick: tracker -> mapper ->
/// {cache, renderer} -> transform -> overlay scheduler, and observers see
/// each stage through an explicit subscription rather than nested closures.
pub struct Animator {
    config: AnimatorConfig,
    tracker: ScrollTracker,
    cache: FrameCache,
    renderer: SurfaceRenderer,
    overlays: OverlayTrack,
    clock: Option<PlaybackClock>,
    current: FrameIndex,
    last_drawn: Option<FrameIndex>,
    last_transform: Option<Transform>,
    needs_redraw: bool,
    observers: Observers,
}

impl std::fmt::Debug for Animator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Animator")
            .field("frame_count", &self.config.frame_count)
            .field("current", &self.current)
            .field("last_drawn", &self.last_drawn)
            .finish()
    }
}

impl Animator {
    pub fn new(
        config: AnimatorConfig,
        css_width: f64,
        css_height: f64,
        dpr: f64,
    ) -> FramescrubResult<Self> {
        config.validate()?;
        let sequence = config.sequence()?;
        let overlays = OverlayTrack::new(config.overlays.clone(), config.fade_width)?;
        let renderer = SurfaceRenderer::new(
            css_width,
            css_height,
            dpr,
            config.fit_mode,
            config.viewport_bias_y,
        )?;
        Ok(Self {
            config,
            tracker: ScrollTracker::new(),
            cache: FrameCache::new(sequence),
            renderer,
            overlays,
            clock: None,
            current: FrameIndex(0),
            last_drawn: None,
            last_transform: None,
            needs_redraw: false,
            observers: Observers::default(),
        })
    }

    pub fn config(&self) -> &AnimatorConfig {
        &self.config
    }

    pub fn current_frame(&self) -> FrameIndex {
        self.current
    }

    pub fn progress(&self) -> Progress {
        self.tracker.current()
    }

    pub fn last_transform(&self) -> Option<Transform> {
        self.last_transform
    }

    pub fn renderer(&self) -> &SurfaceRenderer {
        &self.renderer
    }

    pub fn overlays(&self) -> &OverlayTrack {
        &self.overlays
    }

    /// The configured screen region projected through the latest transform.
    /// `None` until a first draw has produced a transform.
    pub fn projected_region(&self) -> Option<ProjectedRegion> {
        let region = self.config.screen_region.as_ref()?;
        let t = self.last_transform.as_ref()?;
        Some(region.project(t))
    }

    // -- observer registration -------------------------------------------

    pub fn on_progress(&mut self, f: impl FnMut(Progress) + 'static) {
        self.observers.progress.push(Box::new(f));
    }

    pub fn on_frame_change(&mut self, f: impl FnMut(FrameIndex) + 'static) {
        self.observers.frame.push(Box::new(f));
    }

    pub fn on_transform(&mut self, f: impl FnMut(Transform) + 'static) {
        self.observers.transform.push(Box::new(f));
    }

    pub fn on_overlay(&mut self, f: impl FnMut(&OverlayState) + 'static) {
        self.observers.overlay.push(Box::new(f));
    }

    // -- inbound control --------------------------------------------------

    /// Install fresh container metrics (mount, or layout settled late).
    pub fn remeasure(&mut self, metrics: ScrollMetrics) {
        self.tracker.remeasure(metrics);
    }

    /// Record a raw scroll offset; coalesced until the next tick.
    pub fn record_scroll(&mut self, offset: f64) {
        self.tracker.record_scroll(offset);
    }

    /// Resize the rendering surface and optionally re-measure the container.
    pub fn resize(
        &mut self,
        css_width: f64,
        css_height: f64,
        dpr: f64,
        metrics: Option<ScrollMetrics>,
    ) -> FramescrubResult<()> {
        self.renderer.resize(css_width, css_height, dpr)?;
        if let Some(m) = metrics {
            self.tracker.remeasure(m);
        }
        self.needs_redraw = true;
        Ok(())
    }

    /// Attach a playback clock for the time-driven variant.
    pub fn attach_clock(&mut self, duration: f64) -> FramescrubResult<()> {
        self.clock = Some(PlaybackClock::new(duration)?);
        Ok(())
    }

    pub fn clock(&self) -> Option<&PlaybackClock> {
        self.clock.as_ref()
    }

    /// Start playback through the host's autoplay policy. A rejection leaves
    /// the clock paused; callers retry on a user gesture.
    pub fn try_play(&mut self, gate: &dyn PlaybackGate) -> bool {
        match self.clock.as_mut() {
            Some(clock) => clock.try_play(gate),
            None => false,
        }
    }

    pub fn advance_clock(&mut self, dt: f64) {
        if let Some(clock) = self.clock.as_mut() {
            clock.advance(dt);
        }
    }

    // -- per-frame work ----------------------------------------------------

    /// Run one animation-frame tick.
    ///
    /// Samples the coalesced scroll offset, maps it to a target frame, warms
    /// the preload window, folds finished loads in, draws when the current
    /// frame is ready (skipping silently otherwise), and emits observer
    /// events. Safe to call at any rate; all work is idempotent per state.
    #[tracing::instrument(skip(self, fetcher), fields(frame = self.current.0))]
    pub fn tick(&mut self, fetcher: &mut dyn FrameFetcher) -> FramescrubResult<TickReport> {
        let progress = match self.tracker.sample() {
            Some(p) => p,
            None => self.tracker.current(),
        };
        for f in &mut self.observers.progress {
            f(progress);
        }

        let target = mapper::frame_for_progress(progress, self.config.ease, self.config.frame_count);
        let next = if self.config.smoothing {
            step_toward(self.current, target, self.config.frame_count)
        } else {
            target
        };
        if next != self.current {
            self.current = next;
            for f in &mut self.observers.frame {
                f(next);
            }
        }

        // Bias the warm window toward the direction of travel.
        let (behind, ahead) = if target >= self.current {
            (self.config.warm_behind, self.config.warm_ahead)
        } else {
            (self.config.warm_ahead, self.config.warm_behind)
        };
        self.cache.warm_window(self.current, behind, ahead, fetcher)?;
        self.cache.absorb(fetcher);

        let mut drawn = false;
        if self.last_drawn != Some(self.current) || self.needs_redraw {
            if let Some(frame) = self.cache.ready(self.current) {
                let transform = self.renderer.draw(frame)?;
                self.last_transform = Some(transform);
                self.last_drawn = Some(self.current);
                self.needs_redraw = false;
                drawn = true;
                for f in &mut self.observers.transform {
                    f(transform);
                }
            }
            // Not ready: previous surface contents stay; retried next tick.
        }

        let overlay = self.overlays.state_at(self.overlay_driver_value(progress));
        for f in &mut self.observers.overlay {
            f(&overlay);
        }

        Ok(TickReport {
            progress,
            frame: self.current,
            drawn,
            transform: self.last_transform,
            overlay,
        })
    }

    fn overlay_driver_value(&self, progress: Progress) -> f64 {
        match self.config.overlay_driver {
            OverlayDriver::FrameIndex => f64::from(self.current.0),
            OverlayDriver::Progress => progress.value(),
            OverlayDriver::PlaybackTime => self.clock.as_ref().map_or(0.0, |c| c.time()),
        }
    }

    /// Resolve a programmatic reposition.
    ///
    /// Scroll-driven targets resolve to the absolute scroll offset that
    /// reproduces the target (also recorded locally, so the next tick lands
    /// there); time targets reposition the playback clock.
    #[tracing::instrument(skip(self))]
    pub fn seek_to(&mut self, target: SeekTarget) -> FramescrubResult<SeekResolution> {
        match target {
            SeekTarget::Frame(index) => {
                if !self.cache.sequence().contains(index) {
                    return Err(FramescrubError::seek(format!(
                        "frame {} out of range 0..{}",
                        index.0, self.config.frame_count
                    )));
                }
                let p = mapper::progress_for_frame(index, self.config.ease, self.config.frame_count);
                self.seek_to_progress(p)
            }
            SeekTarget::Progress(p) => self.seek_to_progress(Progress::new(p)),
            SeekTarget::Time(t) => match self.clock.as_mut() {
                Some(clock) => {
                    clock.seek(t);
                    Ok(SeekResolution::PlaybackTime(clock.time()))
                }
                None => Err(FramescrubError::seek(
                    "time seek requires an attached playback clock",
                )),
            },
        }
    }

    fn seek_to_progress(&mut self, p: Progress) -> FramescrubResult<SeekResolution> {
        let offset = self
            .tracker
            .offset_for_progress(p)
            .ok_or_else(|| FramescrubError::seek("container has not been measured yet"))?;
        self.tracker.record_scroll(offset);
        Ok(SeekResolution::ScrollOffset(offset))
    }

    /// Driver value (or scroll offset) that makes the labeled overlay range
    /// active, for chapter-dot navigation.
    pub fn jump_to_overlay(&mut self, label: &str) -> FramescrubResult<SeekResolution> {
        let driver = self.overlays.jump_to(label)?;
        match self.config.overlay_driver {
            OverlayDriver::FrameIndex => {
                let clamped = (driver.max(0.0) as u32).min(self.config.frame_count - 1);
                self.seek_to(SeekTarget::Frame(FrameIndex(clamped)))
            }
            OverlayDriver::Progress => self.seek_to(SeekTarget::Progress(driver)),
            OverlayDriver::PlaybackTime => self.seek_to(SeekTarget::Time(driver)),
        }
    }
}

/// One smoothing step toward the target: at least one frame, otherwise 30%
/// of the remaining distance, so large jumps settle fast without snapping.
fn step_toward(current: FrameIndex, target: FrameIndex, frame_count: u32) -> FrameIndex {
    if current == target {
        return current;
    }
    let diff = f64::from(target.0) - f64::from(current.0);
    let step = diff.signum() * (diff.abs() * 0.3).max(1.0);
    let next = (f64::from(current.0) + step).round();
    let last = f64::from(frame_count.saturating_sub(1));
    FrameIndex(next.clamp(0.0, last) as u32)
}
