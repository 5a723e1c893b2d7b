use crate::error::{FramescrubError, FramescrubResult};

/// A labeled interval of driver values during which a caption is shown.
///
/// Units are whatever drives the animator: frame indices for scroll-scrubbed
/// sequences, seconds for video playback. `start..=end` is inclusive.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct OverlayRange {
    pub label: String,
    pub start: f64,
    pub end: f64,
    pub headline: String,
    #[serde(default)]
    pub subtext: String,
}

impl OverlayRange {
    pub fn contains(&self, driver: f64) -> bool {
        self.start <= driver && driver <= self.end
    }
}

/// Where inside its range a caption currently sits. Recomputed from scratch
/// every call; there is no persisted transition history.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OverlayPhase {
    Inactive,
    FadingIn,
    Held,
    FadingOut,
}

/// Scheduler result for one driver value.
#[derive(Clone, Debug, PartialEq)]
pub struct OverlayState {
    /// Index into the track's range list, if any range contains the driver.
    pub active: Option<usize>,
    pub opacity: f64,
    pub phase: OverlayPhase,
}

/// Ordered list of caption ranges with a shared fade width.
///
/// Opacity rises linearly from 0 to 1 over the first `fade_width` driver
/// units inside a range, holds at 1, and falls linearly over the last
/// `fade_width` units. Ranges are non-overlapping by convention; when fades
/// do overlap, each range's opacity is still well defined via `opacity_of`.
#[derive(Clone, Debug)]
pub struct OverlayTrack {
    ranges: Vec<OverlayRange>,
    fade_width: f64,
}

impl OverlayTrack {
    pub fn new(ranges: Vec<OverlayRange>, fade_width: f64) -> FramescrubResult<Self> {
        if fade_width < 0.0 || fade_width.is_nan() {
            return Err(FramescrubError::validation(
                "OverlayTrack fade_width must be >= 0",
            ));
        }
        for range in &ranges {
            if !(range.start <= range.end) {
                return Err(FramescrubError::validation(format!(
                    "overlay range '{}' has start > end",
                    range.label
                )));
            }
        }
        if !ranges.windows(2).all(|w| w[0].start <= w[1].start) {
            return Err(FramescrubError::validation(
                "overlay ranges must be ordered by start",
            ));
        }
        Ok(Self { ranges, fade_width })
    }

    pub fn ranges(&self) -> &[OverlayRange] {
        &self.ranges
    }

    pub fn fade_width(&self) -> f64 {
        self.fade_width
    }

    pub fn opacity_of(&self, index: usize, driver: f64) -> f64 {
        let Some(range) = self.ranges.get(index) else {
            return 0.0;
        };
        if !range.contains(driver) {
            return 0.0;
        }
        if self.fade_width == 0.0 {
            return 1.0;
        }
        let fade_in_end = range.start + self.fade_width;
        if driver < fade_in_end {
            return ((driver - range.start) / self.fade_width).clamp(0.0, 1.0);
        }
        let fade_out_start = range.end - self.fade_width;
        if driver > fade_out_start {
            return ((range.end - driver) / self.fade_width).clamp(0.0, 1.0);
        }
        1.0
    }

    pub fn phase_of(&self, index: usize, driver: f64) -> OverlayPhase {
        let Some(range) = self.ranges.get(index) else {
            return OverlayPhase::Inactive;
        };
        if !range.contains(driver) {
            return OverlayPhase::Inactive;
        }
        if self.fade_width == 0.0 {
            return OverlayPhase::Held;
        }
        if driver < range.start + self.fade_width {
            OverlayPhase::FadingIn
        } else if driver > range.end - self.fade_width {
            OverlayPhase::FadingOut
        } else {
            OverlayPhase::Held
        }
    }

    /// The single active range (first whose interval contains the driver)
    /// and its opacity. No range active means opacity 0.
    pub fn state_at(&self, driver: f64) -> OverlayState {
        for (i, range) in self.ranges.iter().enumerate() {
            if range.contains(driver) {
                return OverlayState {
                    active: Some(i),
                    opacity: self.opacity_of(i, driver),
                    phase: self.phase_of(i, driver),
                };
            }
        }
        OverlayState {
            active: None,
            opacity: 0.0,
            phase: OverlayPhase::Inactive,
        }
    }

    /// All ranges with nonzero opacity (more than one only inside overlapping
    /// fade windows).
    pub fn visible_at(&self, driver: f64) -> Vec<(usize, f64)> {
        (0..self.ranges.len())
            .filter_map(|i| {
                let o = self.opacity_of(i, driver);
                (o > 0.0).then_some((i, o))
            })
            .collect()
    }

    /// Driver value that makes the labeled range active, for explicit
    /// navigation controls (chapter dots).
    pub fn jump_to(&self, label: &str) -> FramescrubResult<f64> {
        self.ranges
            .iter()
            .find(|r| r.label == label)
            .map(|r| r.start)
            .ok_or_else(|| FramescrubError::seek(format!("no overlay range labeled '{label}'")))
    }

    /// Index of the last range whose start the driver has passed, for
    /// highlighting the current chapter dot. 0 before the first range.
    pub fn chapter_at(&self, driver: f64) -> usize {
        self.ranges
            .iter()
            .enumerate()
            .rev()
            .find(|(_, r)| driver >= r.start)
            .map(|(i, _)| i)
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(label: &str, start: f64, end: f64) -> OverlayRange {
        OverlayRange {
            label: label.to_string(),
            start,
            end,
            headline: format!("{label} headline"),
            subtext: String::new(),
        }
    }

    fn demo_track() -> OverlayTrack {
        // Frame-unit ranges mirroring a five-chapter demo table.
        OverlayTrack::new(
            vec![
                range("dashboard", 1.0, 90.0),
                range("sessions", 91.0, 180.0),
                range("explanations", 181.0, 630.0),
                range("supervisor", 631.0, 780.0),
                range("recall", 781.0, 827.0),
            ],
            15.0,
        )
        .unwrap()
    }

    #[test]
    fn exactly_one_range_held_outside_fades() {
        let track = demo_track();
        let state = track.state_at(135.0);
        assert_eq!(state.active, Some(1));
        assert_eq!(state.opacity, 1.0);
        assert_eq!(state.phase, OverlayPhase::Held);
        assert_eq!(track.visible_at(135.0), vec![(1, 1.0)]);
    }

    #[test]
    fn fade_is_linear() {
        let track = demo_track();
        // Halfway through the fade-in window opacity is exactly 0.5.
        let o = track.opacity_of(1, 91.0 + 7.5);
        assert!((o - 0.5).abs() < 1e-12);
        assert_eq!(track.phase_of(1, 91.0 + 7.5), OverlayPhase::FadingIn);

        let o = track.opacity_of(1, 180.0 - 7.5);
        assert!((o - 0.5).abs() < 1e-12);
        assert_eq!(track.phase_of(1, 180.0 - 7.5), OverlayPhase::FadingOut);
    }

    #[test]
    fn outside_every_range_nothing_is_visible() {
        let track = demo_track();
        let state = track.state_at(0.5);
        assert_eq!(state.active, None);
        assert_eq!(state.opacity, 0.0);
        assert_eq!(state.phase, OverlayPhase::Inactive);
        assert!(track.visible_at(90.5).is_empty());
    }

    #[test]
    fn zero_fade_holds_across_whole_range() {
        let track = OverlayTrack::new(vec![range("only", 10.0, 20.0)], 0.0).unwrap();
        assert_eq!(track.opacity_of(0, 10.0), 1.0);
        assert_eq!(track.opacity_of(0, 20.0), 1.0);
        assert_eq!(track.phase_of(0, 15.0), OverlayPhase::Held);
    }

    #[test]
    fn jump_to_returns_range_start() {
        let track = demo_track();
        assert_eq!(track.jump_to("supervisor").unwrap(), 631.0);
        assert!(track.jump_to("missing").is_err());
    }

    #[test]
    fn chapter_tracks_last_passed_start() {
        let track = demo_track();
        assert_eq!(track.chapter_at(0.0), 0);
        assert_eq!(track.chapter_at(91.0), 1);
        assert_eq!(track.chapter_at(500.0), 2);
        assert_eq!(track.chapter_at(9000.0), 4);
    }

    #[test]
    fn validation_rejects_misordered_ranges() {
        let err = OverlayTrack::new(
            vec![range("b", 50.0, 60.0), range("a", 10.0, 20.0)],
            5.0,
        );
        assert!(err.is_err());
        assert!(OverlayTrack::new(vec![range("x", 9.0, 3.0)], 5.0).is_err());
        assert!(OverlayTrack::new(vec![], -1.0).is_err());
    }

    #[test]
    fn overlapping_fades_can_coexist() {
        let track = OverlayTrack::new(
            vec![range("a", 0.0, 20.0), range("b", 15.0, 40.0)],
            10.0,
        )
        .unwrap();
        let visible = track.visible_at(17.0);
        assert_eq!(visible.len(), 2);
        assert!(visible.iter().all(|(_, o)| *o > 0.0 && *o < 1.0));
    }
}
