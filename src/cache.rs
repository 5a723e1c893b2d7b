use std::collections::HashMap;

use crate::{
    core::FrameIndex,
    error::FramescrubResult,
    fetch::{FrameFetcher, PreparedFrame},
    sequence::FrameSequence,
};

/// Load state of one frame resource.
///
/// Pending and Failed are recognized transients, not errors: a draw that
/// finds its frame not Ready skips silently and retries the next tick.
#[derive(Clone, Debug)]
pub enum LoadState {
    Pending,
    Ready(PreparedFrame),
    Failed,
}

/// Windowed set of warm frame resources around the current index.
///
/// Mutated only by the preload path (`warm_window`/`absorb`), read by the
/// renderer through `ready`. Warm-up is idempotent: a frame is requested at
/// most once for the cache's lifetime, regardless of how often the window
/// passes over it.
#[derive(Debug)]
pub struct FrameCache {
    sequence: FrameSequence,
    states: HashMap<u32, LoadState>,
}

impl FrameCache {
    pub fn new(sequence: FrameSequence) -> Self {
        Self {
            sequence,
            states: HashMap::new(),
        }
    }

    pub fn sequence(&self) -> &FrameSequence {
        &self.sequence
    }

    /// Request every not-yet-requested frame in a window around `center`.
    ///
    /// The window is asymmetric, biased toward the direction of travel
    /// (typically fewer frames behind than ahead).
    pub fn warm_window(
        &mut self,
        center: FrameIndex,
        behind: u32,
        ahead: u32,
        fetcher: &mut dyn FrameFetcher,
    ) -> FramescrubResult<()> {
        let last = self.sequence.frame_count - 1;
        let center = center.0.min(last);
        let start = center.saturating_sub(behind);
        let end = center.saturating_add(ahead).min(last);
        for i in start..=end {
            if self.states.contains_key(&i) {
                continue;
            }
            let index = FrameIndex(i);
            let uri = self.sequence.uri(index)?;
            fetcher.begin(index, &uri);
            self.states.insert(i, LoadState::Pending);
        }
        Ok(())
    }

    /// Fold finished loads into the cache. Late results for frames the window
    /// has since moved away from are kept; fetched bytes are never wasted.
    pub fn absorb(&mut self, fetcher: &mut dyn FrameFetcher) {
        for (index, result) in fetcher.take_completed() {
            let state = match result {
                Ok(frame) => LoadState::Ready(frame),
                Err(err) => {
                    tracing::debug!(frame = index.0, %err, "frame load failed");
                    LoadState::Failed
                }
            };
            self.states.insert(index.0, state);
        }
    }

    pub fn state(&self, index: FrameIndex) -> Option<&LoadState> {
        self.states.get(&index.0)
    }

    /// The frame if and only if it has finished loading.
    pub fn ready(&self, index: FrameIndex) -> Option<&PreparedFrame> {
        match self.states.get(&index.0) {
            Some(LoadState::Ready(frame)) => Some(frame),
            _ => None,
        }
    }

    pub fn requested_count(&self) -> usize {
        self.states.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records begins; completes frames only when told to.
    #[derive(Default)]
    struct ManualFetcher {
        begun: Vec<(FrameIndex, String)>,
        finished: Vec<(FrameIndex, FramescrubResult<PreparedFrame>)>,
    }

    impl FrameFetcher for ManualFetcher {
        fn begin(&mut self, index: FrameIndex, uri: &str) {
            self.begun.push((index, uri.to_string()));
        }

        fn take_completed(&mut self) -> Vec<(FrameIndex, FramescrubResult<PreparedFrame>)> {
            std::mem::take(&mut self.finished)
        }
    }

    fn frame_1x1() -> PreparedFrame {
        PreparedFrame {
            width: 1,
            height: 1,
            rgba8: std::sync::Arc::new(vec![0, 0, 0, 255]),
        }
    }

    fn cache_240() -> FrameCache {
        FrameCache::new(FrameSequence::new("frame_", 4, "jpg", 240).unwrap())
    }

    #[test]
    fn warm_window_clamps_at_both_ends() {
        let mut cache = cache_240();
        let mut fetcher = ManualFetcher::default();
        cache
            .warm_window(FrameIndex(0), 10, 20, &mut fetcher)
            .unwrap();
        assert_eq!(fetcher.begun.len(), 21); // 0..=20
        fetcher.begun.clear();

        cache
            .warm_window(FrameIndex(239), 10, 20, &mut fetcher)
            .unwrap();
        assert_eq!(fetcher.begun.len(), 11); // 229..=239
    }

    #[test]
    fn warm_window_is_idempotent() {
        let mut cache = cache_240();
        let mut fetcher = ManualFetcher::default();
        cache
            .warm_window(FrameIndex(50), 10, 20, &mut fetcher)
            .unwrap();
        let first = fetcher.begun.len();
        cache
            .warm_window(FrameIndex(50), 10, 20, &mut fetcher)
            .unwrap();
        assert_eq!(fetcher.begun.len(), first);

        // Sliding by one requests exactly the one new frame at the leading edge.
        cache
            .warm_window(FrameIndex(51), 10, 20, &mut fetcher)
            .unwrap();
        assert_eq!(fetcher.begun.len(), first + 1);
        assert_eq!(fetcher.begun.last().unwrap().0, FrameIndex(71));
    }

    #[test]
    fn pending_then_ready_then_readable() {
        let mut cache = cache_240();
        let mut fetcher = ManualFetcher::default();
        cache
            .warm_window(FrameIndex(5), 0, 0, &mut fetcher)
            .unwrap();
        assert!(matches!(
            cache.state(FrameIndex(5)),
            Some(LoadState::Pending)
        ));
        assert!(cache.ready(FrameIndex(5)).is_none());

        fetcher.finished.push((FrameIndex(5), Ok(frame_1x1())));
        cache.absorb(&mut fetcher);
        assert!(cache.ready(FrameIndex(5)).is_some());
    }

    #[test]
    fn failed_load_is_recorded_not_fatal() {
        let mut cache = cache_240();
        let mut fetcher = ManualFetcher::default();
        cache
            .warm_window(FrameIndex(7), 0, 0, &mut fetcher)
            .unwrap();
        fetcher.finished.push((
            FrameIndex(7),
            Err(crate::error::FramescrubError::decode("bad bytes")),
        ));
        cache.absorb(&mut fetcher);
        assert!(matches!(
            cache.state(FrameIndex(7)),
            Some(LoadState::Failed)
        ));
        assert!(cache.ready(FrameIndex(7)).is_none());
    }

    #[test]
    fn uses_one_based_padded_names() {
        let mut cache = cache_240();
        let mut fetcher = ManualFetcher::default();
        cache
            .warm_window(FrameIndex(6), 0, 0, &mut fetcher)
            .unwrap();
        assert_eq!(fetcher.begun[0].1, "frame_0007.jpg");
    }
}
