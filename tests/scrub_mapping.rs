use framescrub::{Ease, FrameIndex, Progress, frame_for_progress, progress_for_frame};

#[test]
fn mapping_is_deterministic() {
    for i in 0..=100 {
        let p = Progress::new(f64::from(i) / 100.0);
        let a = frame_for_progress(p, Ease::InOutQuad, 240);
        let b = frame_for_progress(p, Ease::InOutQuad, 240);
        assert_eq!(a, b);
    }
}

#[test]
fn out_of_range_progress_clamps_into_sequence() {
    for raw in [-10.0, -0.0001, 1.0001, 42.0, f64::NAN] {
        let idx = frame_for_progress(Progress::new(raw), Ease::InOutQuad, 240);
        assert!(idx.0 < 240);
    }
    assert_eq!(
        frame_for_progress(Progress::new(-1.0), Ease::InOutQuad, 240),
        FrameIndex(0)
    );
    assert_eq!(
        frame_for_progress(Progress::new(2.0), Ease::InOutQuad, 240),
        FrameIndex(239)
    );
}

#[test]
fn endpoints_hit_first_and_last_frame() {
    for n in [2u32, 3, 24, 240, 827] {
        for ease in Ease::ALL {
            assert_eq!(frame_for_progress(Progress::ZERO, ease, n), FrameIndex(0));
            assert_eq!(
                frame_for_progress(Progress::ONE, ease, n),
                FrameIndex(n - 1)
            );
        }
    }
}

#[test]
fn decreasing_progress_yields_non_increasing_indices() {
    for ease in Ease::ALL {
        let mut prev = u32::MAX;
        for i in (0..=1000).rev() {
            let p = Progress::new(f64::from(i) / 1000.0);
            let idx = frame_for_progress(p, ease, 240);
            assert!(idx.0 <= prev, "{ease:?} backtracked at p={}", p.value());
            prev = idx.0;
        }
    }
}

#[test]
fn worked_example_240_frames_midpoint() {
    // InOutQuad at p = 0.5 eases to exactly 0.5; round(0.5 * 239) = 120.
    let idx = frame_for_progress(Progress::new(0.5), Ease::InOutQuad, 240);
    assert_eq!(idx, FrameIndex(120));
}

#[test]
fn forward_backward_scrub_revisits_identical_frames() {
    let forward: Vec<_> = (0..=200)
        .map(|i| frame_for_progress(Progress::new(f64::from(i) / 200.0), Ease::InOutCubic, 827))
        .collect();
    let backward: Vec<_> = (0..=200)
        .rev()
        .map(|i| frame_for_progress(Progress::new(f64::from(i) / 200.0), Ease::InOutCubic, 827))
        .collect();
    let mut reversed = backward;
    reversed.reverse();
    assert_eq!(forward, reversed);
}

#[test]
fn inverse_mapping_round_trips_within_one_frame() {
    for ease in Ease::ALL {
        for f in (0..240).step_by(7) {
            let p = progress_for_frame(FrameIndex(f), ease, 240);
            let back = frame_for_progress(p, ease, 240);
            assert!(back.0.abs_diff(f) <= 1, "{ease:?} frame {f} -> {}", back.0);
        }
    }
}
