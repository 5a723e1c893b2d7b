use crate::error::{FramescrubError, FramescrubResult};

pub use kurbo::{Point, Rect, Vec2};

/// Zero-based index into a [`crate::FrameSequence`].
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u32);

impl FrameIndex {
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

/// Normalized scroll position in `[0, 1]`.
///
/// Construction clamps defensively: out-of-range and non-finite inputs are
/// folded into the valid interval rather than rejected, because raw scroll
/// offsets routinely land outside the tracked container.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, serde::Serialize, serde::Deserialize)]
pub struct Progress(f64);

impl Progress {
    pub const ZERO: Self = Self(0.0);
    pub const ONE: Self = Self(1.0);

    pub fn new(p: f64) -> Self {
        if p.is_nan() {
            return Self(0.0);
        }
        Self(p.clamp(0.0, 1.0))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

/// Rendering surface size in device pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> FramescrubResult<Self> {
        if width == 0 || height == 0 {
            return Err(FramescrubError::validation(
                "Viewport width/height must be > 0",
            ));
        }
        Ok(Self { width, height })
    }
}

/// How a source frame is scaled into the rendering surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitMode {
    /// Fill the surface, cropping overflow (centered, optionally biased).
    Cover,
    /// Fit inside the surface, letterboxing the remainder (centered).
    Contain,
}

/// Source-to-surface mapping in CSS pixels.
///
/// `x`/`y` are the surface-space coordinates where the source frame's origin
/// lands after fitting; `scale` converts source pixels to CSS pixels. Emitted
/// wholesale on every draw; consumers must treat each emission as a complete
/// replacement, never a partial update.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Transform {
    pub x: f64,
    pub y: f64,
    pub scale: f64,
}

impl Transform {
    /// Map a point in source-frame pixels to CSS pixels.
    pub fn apply(&self, p: Point) -> Point {
        Point::new(self.x + p.x * self.scale, self.y + p.y * self.scale)
    }
}

/// Axis-aligned region of the source frame, in source pixels, with rounded
/// corners. Used to pin dependent content (e.g. a phone-screen cutout) to a
/// sub-rectangle of the rendered frame.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScreenRegion {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    pub radius: f64,
}

impl ScreenRegion {
    pub fn new(left: f64, top: f64, width: f64, height: f64, radius: f64) -> FramescrubResult<Self> {
        if width <= 0.0 || height <= 0.0 {
            return Err(FramescrubError::validation(
                "ScreenRegion width/height must be > 0",
            ));
        }
        if radius < 0.0 {
            return Err(FramescrubError::validation("ScreenRegion radius must be >= 0"));
        }
        Ok(Self {
            left,
            top,
            width,
            height,
            radius,
        })
    }

    /// Project through a frame transform into CSS-pixel space.
    pub fn project(&self, t: &Transform) -> ProjectedRegion {
        let origin = t.apply(Point::new(self.left, self.top));
        ProjectedRegion {
            rect: Rect::new(
                origin.x,
                origin.y,
                origin.x + self.width * t.scale,
                origin.y + self.height * t.scale,
            ),
            radius: self.radius * t.scale,
        }
    }
}

/// A [`ScreenRegion`] after projection into CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectedRegion {
    pub rect: Rect,
    pub radius: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_clamps_and_swallows_nan() {
        assert_eq!(Progress::new(-0.5).value(), 0.0);
        assert_eq!(Progress::new(1.5).value(), 1.0);
        assert_eq!(Progress::new(f64::NAN).value(), 0.0);
        assert_eq!(Progress::new(0.25).value(), 0.25);
    }

    #[test]
    fn viewport_rejects_zero_extent() {
        assert!(Viewport::new(0, 10).is_err());
        assert!(Viewport::new(10, 0).is_err());
        assert!(Viewport::new(1, 1).is_ok());
    }

    #[test]
    fn region_projects_through_transform() {
        let region = ScreenRegion::new(222.0, 332.0, 660.0, 1200.0, 36.0).unwrap();
        let t = Transform {
            x: 10.0,
            y: -20.0,
            scale: 0.5,
        };
        let p = region.project(&t);
        assert_eq!(p.rect.x0, 10.0 + 222.0 * 0.5);
        assert_eq!(p.rect.y0, -20.0 + 332.0 * 0.5);
        assert_eq!(p.rect.width(), 330.0);
        assert_eq!(p.rect.height(), 600.0);
        assert_eq!(p.radius, 18.0);
    }
}
