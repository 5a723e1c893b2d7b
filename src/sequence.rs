use crate::{
    core::FrameIndex,
    error::{FramescrubError, FramescrubResult},
};

/// An ordered, finite list of frame image resources.
///
/// Frames are addressed by a fixed naming convention: `base` + 1-based index
/// zero-padded to `pad` digits + `.` + `ext` (index 6 with pad 4 becomes
/// `frame_0007.jpg` under base `frame_`). Immutable once constructed.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FrameSequence {
    pub base: String,
    pub pad: usize,
    pub ext: String,
    pub frame_count: u32,
}

impl FrameSequence {
    pub fn new(
        base: impl Into<String>,
        pad: usize,
        ext: impl Into<String>,
        frame_count: u32,
    ) -> FramescrubResult<Self> {
        let base = base.into();
        let ext = ext.into();
        if frame_count == 0 {
            return Err(FramescrubError::validation(
                "FrameSequence frame_count must be > 0",
            ));
        }
        if pad == 0 || pad > 9 {
            return Err(FramescrubError::validation(
                "FrameSequence pad must be in 1..=9",
            ));
        }
        if ext.is_empty() || ext.starts_with('.') {
            return Err(FramescrubError::validation(
                "FrameSequence ext must be non-empty without a leading dot",
            ));
        }
        Ok(Self {
            base,
            pad,
            ext,
            frame_count,
        })
    }

    pub fn last_index(&self) -> FrameIndex {
        FrameIndex(self.frame_count - 1)
    }

    pub fn contains(&self, index: FrameIndex) -> bool {
        index.0 < self.frame_count
    }

    /// Resource name for a zero-based frame index (stored names are 1-based).
    pub fn uri(&self, index: FrameIndex) -> FramescrubResult<String> {
        if !self.contains(index) {
            return Err(FramescrubError::validation(format!(
                "frame index {} out of range 0..{}",
                index.0, self.frame_count
            )));
        }
        Ok(format!(
            "{}{:0pad$}.{}",
            self.base,
            index.0 + 1,
            self.ext,
            pad = self.pad
        ))
    }
}
