use crate::{
    core::{FitMode, Transform, Viewport},
    error::{FramescrubError, FramescrubResult},
    fetch::PreparedFrame,
};

pub type Rgba8 = [u8; 4];

/// CPU surface that draws one frame per tick under a fit strategy.
///
/// The backing buffer is sized to the device-pixel-ratio-scaled CSS bounds.
/// Every draw recomputes and returns the full source-to-CSS [`Transform`] so
/// dependent overlays stay pixel-aligned across resizes. A tick whose frame
/// is not ready simply does not call `draw`; the previous contents remain.
#[derive(Debug)]
pub struct SurfaceRenderer {
    css_width: f64,
    css_height: f64,
    dpr: f64,
    fit: FitMode,
    /// Fraction of the rendered height to shift the centered image upward,
    /// to keep the subject framed on tall viewports.
    bias_y: f64,
    clear_rgba: Rgba8,
    device: Viewport,
    pixels: Vec<u8>,
}

impl SurfaceRenderer {
    pub fn new(
        css_width: f64,
        css_height: f64,
        dpr: f64,
        fit: FitMode,
        bias_y: f64,
    ) -> FramescrubResult<Self> {
        let mut renderer = Self {
            css_width: 0.0,
            css_height: 0.0,
            dpr: 1.0,
            fit,
            bias_y,
            clear_rgba: [0, 0, 0, 0],
            device: Viewport {
                width: 1,
                height: 1,
            },
            pixels: vec![0; 4],
        };
        renderer.resize(css_width, css_height, dpr)?;
        Ok(renderer)
    }

    pub fn set_clear_rgba(&mut self, rgba: Rgba8) {
        self.clear_rgba = rgba;
    }

    /// Resize to new CSS bounds / device pixel ratio.
    ///
    /// The backing resolution is brought in line immediately so the next draw
    /// paints at the new size instead of stretching stale pixels.
    pub fn resize(&mut self, css_width: f64, css_height: f64, dpr: f64) -> FramescrubResult<()> {
        if !(css_width > 0.0 && css_height > 0.0) {
            return Err(FramescrubError::validation(
                "surface CSS bounds must be > 0",
            ));
        }
        let dpr = dpr.max(1.0);
        let width = (css_width * dpr).floor().max(1.0) as u32;
        let height = (css_height * dpr).floor().max(1.0) as u32;
        let device = Viewport::new(width, height)?;
        if device != self.device {
            self.pixels = vec![0; (width as usize) * (height as usize) * 4];
        }
        self.css_width = css_width;
        self.css_height = css_height;
        self.dpr = dpr;
        self.device = device;
        Ok(())
    }

    pub fn device_viewport(&self) -> Viewport {
        self.device
    }

    /// Most recent CSS bounds, as passed to `new`/`resize`.
    pub fn css_bounds(&self) -> (f64, f64) {
        (self.css_width, self.css_height)
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Fit geometry in device pixels: (scale, offset_x, offset_y).
    fn fit_geometry(&self, iw: f64, ih: f64) -> (f64, f64, f64) {
        let w = f64::from(self.device.width);
        let h = f64::from(self.device.height);
        let s = match self.fit {
            FitMode::Cover => (w / iw).max(h / ih),
            FitMode::Contain => (w / iw).min(h / ih),
        };
        let rw = iw * s;
        let rh = ih * s;
        let x = (w - rw) / 2.0;
        let y = (h - rh) / 2.0 - rh * self.bias_y;
        (s, x, y)
    }

    /// The transform `draw` would emit for a source of the given size,
    /// without touching pixels. Useful for overlay layout before the first
    /// frame arrives.
    pub fn transform_for(&self, source_width: u32, source_height: u32) -> Transform {
        let (s, x, y) = self.fit_geometry(f64::from(source_width), f64::from(source_height));
        Transform {
            x: x / self.dpr,
            y: y / self.dpr,
            scale: s / self.dpr,
        }
    }

    /// Draw a frame and return the CSS-pixel transform it was placed under.
    pub fn draw(&mut self, frame: &PreparedFrame) -> FramescrubResult<Transform> {
        if frame.width == 0 || frame.height == 0 {
            return Err(FramescrubError::validation("frame has zero extent"));
        }
        let iw = f64::from(frame.width);
        let ih = f64::from(frame.height);
        let (s, x, y) = self.fit_geometry(iw, ih);

        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&self.clear_rgba);
        }

        let w = i64::from(self.device.width);
        let h = i64::from(self.device.height);
        let x0 = x.floor().max(0.0) as i64;
        let y0 = y.floor().max(0.0) as i64;
        let x1 = ((x + iw * s).ceil() as i64).min(w);
        let y1 = ((y + ih * s).ceil() as i64).min(h);

        let src = frame.rgba8.as_slice();
        for dy in y0..y1 {
            let sy = (((dy as f64 + 0.5) - y) / s).floor();
            if sy < 0.0 || sy >= ih {
                continue;
            }
            let sy = sy as usize;
            let dst_row = (dy as usize) * (self.device.width as usize) * 4;
            let src_row = sy * (frame.width as usize) * 4;
            for dx in x0..x1 {
                let sx = (((dx as f64 + 0.5) - x) / s).floor();
                if sx < 0.0 || sx >= iw {
                    continue;
                }
                let sx = sx as usize;
                let d = dst_row + (dx as usize) * 4;
                let s4 = src_row + sx * 4;
                self.pixels[d..d + 4].copy_from_slice(&src[s4..s4 + 4]);
            }
        }

        Ok(Transform {
            x: x / self.dpr,
            y: y / self.dpr,
            scale: s / self.dpr,
        })
    }
}
