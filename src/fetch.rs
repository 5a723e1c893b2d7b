use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;

use crate::{
    core::FrameIndex,
    error::{FramescrubError, FramescrubResult},
};

/// Decoded frame image in straight (non-premultiplied) RGBA8.
#[derive(Clone, Debug)]
pub struct PreparedFrame {
    pub width: u32,
    pub height: u32,
    /// Row-major, tightly packed RGBA8.
    pub rgba8: Arc<Vec<u8>>,
}

pub fn decode_frame(bytes: &[u8]) -> FramescrubResult<PreparedFrame> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|err| FramescrubError::decode(format!("decode frame image: {err}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(PreparedFrame {
        width,
        height,
        rgba8: Arc::new(rgba.into_raw()),
    })
}

/// Fire-and-forget frame loading seam.
///
/// `begin` starts a load and must not block the tick; finished loads are
/// observed later via `take_completed`. The cache polls rather than awaits,
/// so a frame that is not ready simply skips one draw and is retried the
/// next tick. Superseded loads are never cancelled; a late result still
/// lands in the cache for possible reuse.
pub trait FrameFetcher {
    fn begin(&mut self, index: FrameIndex, uri: &str);

    /// Drain loads that finished since the last call.
    fn take_completed(&mut self) -> Vec<(FrameIndex, FramescrubResult<PreparedFrame>)>;
}

/// Filesystem fetcher decoding frames relative to a root directory.
///
/// Loads queued by `begin` complete on the next `take_completed` call, which
/// reproduces the one-tick latency of asynchronous image loading: a frame
/// requested this tick is at best drawable the following tick.
#[derive(Debug)]
pub struct FsFetcher {
    root: PathBuf,
    queued: Vec<(FrameIndex, String)>,
}

impl FsFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            queued: Vec::new(),
        }
    }

    fn resolve(&self, uri: &str) -> PathBuf {
        // Resource names use URL-style absolute paths; anchor them at root.
        self.root.join(uri.trim_start_matches('/'))
    }
}

impl FrameFetcher for FsFetcher {
    fn begin(&mut self, index: FrameIndex, uri: &str) {
        self.queued.push((index, uri.to_string()));
    }

    fn take_completed(&mut self) -> Vec<(FrameIndex, FramescrubResult<PreparedFrame>)> {
        std::mem::take(&mut self.queued)
            .into_iter()
            .map(|(index, uri)| {
                let path = self.resolve(&uri);
                let result = read_and_decode(&path);
                (index, result)
            })
            .collect()
    }
}

fn read_and_decode(path: &Path) -> FramescrubResult<PreparedFrame> {
    let bytes =
        std::fs::read(path).with_context(|| format!("read frame '{}'", path.display()))?;
    decode_frame(&bytes)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn png_bytes(w: u32, h: u32) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(w, h, image::Rgba([9, 9, 9, 255]));
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn decode_frame_keeps_dimensions() {
        let prepared = decode_frame(&png_bytes(3, 2)).unwrap();
        assert_eq!(prepared.width, 3);
        assert_eq!(prepared.height, 2);
        assert_eq!(prepared.rgba8.len(), 3 * 2 * 4);
    }

    #[test]
    fn fs_fetcher_completes_one_poll_later() {
        let tmp = std::env::temp_dir().join(format!(
            "framescrub_fetch_{}_{}",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        std::fs::create_dir_all(&tmp).unwrap();
        std::fs::write(tmp.join("frame_0001.png"), png_bytes(2, 2)).unwrap();

        let mut fetcher = FsFetcher::new(&tmp);
        fetcher.begin(FrameIndex(0), "/frame_0001.png");
        fetcher.begin(FrameIndex(1), "/frame_0002.png");

        let done = fetcher.take_completed();
        assert_eq!(done.len(), 2);
        assert!(done[0].1.is_ok());
        // Missing file surfaces as a failed load, not a panic.
        assert!(done[1].1.is_err());
        assert!(fetcher.take_completed().is_empty());

        std::fs::remove_dir_all(&tmp).ok();
    }
}
