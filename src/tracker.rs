use crate::core::Progress;

/// Measured geometry of the scroll container, in CSS pixels.
///
/// Recomputed on mount and on resize; deliberately stale between recomputes.
/// The effective scroll range is guarded by a 1px minimum denominator so a
/// degenerate container (height <= viewport) never divides by a non-positive
/// value.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScrollMetrics {
    /// Absolute document offset where the tracked range begins.
    pub start: f64,
    /// Absolute document offset where progress reaches 1. Always > `start`.
    pub end: f64,
    /// Viewport height at measurement time.
    pub viewport_height: f64,
}

impl ScrollMetrics {
    /// Measure from a container's document-space top and total height.
    ///
    /// The scrollable range is the container height minus one viewport (the
    /// sticky stage stays pinned for exactly that distance).
    pub fn measure(container_top: f64, container_height: f64, viewport_height: f64) -> Self {
        let range = (container_height - viewport_height).max(1.0);
        Self {
            start: container_top,
            end: container_top + range,
            viewport_height,
        }
    }

    /// Metrics over an explicit sub-range of a taller container, so several
    /// trackers (e.g. a hero phase and a demo phase) can share one scroll.
    pub fn segment(start: f64, end: f64, viewport_height: f64) -> Self {
        Self {
            start,
            end: start + (end - start).max(1.0),
            viewport_height,
        }
    }

    fn range(&self) -> f64 {
        (self.end - self.start).max(1.0)
    }

    pub fn progress_at(&self, scroll_offset: f64) -> Progress {
        Progress::new((scroll_offset - self.start) / self.range())
    }

    pub fn offset_for_progress(&self, p: Progress) -> f64 {
        self.start + p.value() * self.range()
    }
}

/// Observes raw scroll offsets and hands out at most one progress computation
/// per animation frame.
///
/// Scroll events arrive far faster than the display presents; listeners feed
/// every offset into [`ScrollTracker::record_scroll`], and the per-frame tick
/// calls [`ScrollTracker::sample`], which consumes only the latest pending
/// offset. Progress is not monotonic over time (the user scrolls both ways);
/// nothing here assumes it is.
#[derive(Debug, Default)]
pub struct ScrollTracker {
    metrics: Option<ScrollMetrics>,
    pending: Option<f64>,
    last_offset: f64,
}

impl ScrollTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install fresh metrics (mount or resize). Does not retroactively adjust
    /// progress; the next sample picks up the new geometry.
    pub fn remeasure(&mut self, metrics: ScrollMetrics) {
        self.metrics = Some(metrics);
    }

    pub fn metrics(&self) -> Option<&ScrollMetrics> {
        self.metrics.as_ref()
    }

    /// Record a raw scroll offset. Coalesces: only the most recent offset
    /// since the last [`ScrollTracker::sample`] survives.
    pub fn record_scroll(&mut self, offset: f64) {
        self.pending = Some(offset);
    }

    /// Consume the pending offset and return the progress it maps to, or
    /// `None` when no scroll arrived since the last sample (nothing to do
    /// this frame). Before the container has been measured, progress is 0.
    pub fn sample(&mut self) -> Option<Progress> {
        let offset = self.pending.take()?;
        self.last_offset = offset;
        Some(self.progress_at(offset))
    }

    /// Progress for the most recently sampled offset.
    pub fn current(&self) -> Progress {
        self.progress_at(self.last_offset)
    }

    fn progress_at(&self, offset: f64) -> Progress {
        match &self.metrics {
            Some(m) => m.progress_at(offset),
            None => Progress::ZERO,
        }
    }

    /// Absolute scroll offset that would produce `p`. `None` until measured.
    pub fn offset_for_progress(&self, p: Progress) -> Option<f64> {
        self.metrics.as_ref().map(|m| m.offset_for_progress(p))
    }
}
