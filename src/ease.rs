/// Easing curves applied to normalized scroll progress before frame mapping.
///
/// Every variant is strictly monotonic on `[0, 1]` with fixed endpoints, which
/// is what makes reverse scrubbing reproduce earlier frames exactly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Ease {
    Linear,
    InQuad,
    OutQuad,
    InOutQuad,
    InCubic,
    OutCubic,
    InOutCubic,
    SmoothStep,
}

impl Ease {
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::InQuad => t * t,
            Self::OutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Self::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(2) / 2.0)
                }
            }
            Self::InCubic => t * t * t,
            Self::OutCubic => 1.0 - (1.0 - t).powi(3),
            Self::InOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(3) / 2.0)
                }
            }
            Self::SmoothStep => t * t * (3.0 - 2.0 * t),
        }
    }

    /// Exact inverse of [`Ease::apply`] on `[0, 1]`.
    ///
    /// Needed by seek: to land on a frame we must recover the progress value
    /// that eases to that frame's position. Monotonicity guarantees the
    /// inverse is single-valued.
    pub fn invert(self, e: f64) -> f64 {
        let e = e.clamp(0.0, 1.0);
        match self {
            Self::Linear => e,
            Self::InQuad => e.sqrt(),
            Self::OutQuad => 1.0 - (1.0 - e).sqrt(),
            Self::InOutQuad => {
                if e < 0.5 {
                    (e / 2.0).sqrt()
                } else {
                    1.0 - ((1.0 - e) / 2.0).sqrt()
                }
            }
            Self::InCubic => e.cbrt(),
            Self::OutCubic => 1.0 - (1.0 - e).cbrt(),
            Self::InOutCubic => {
                if e < 0.5 {
                    (e / 4.0).cbrt()
                } else {
                    1.0 - ((1.0 - e) / 4.0).cbrt()
                }
            }
            // Closed-form trigonometric inverse of 3t^2 - 2t^3.
            Self::SmoothStep => 0.5 - ((1.0 - 2.0 * e).asin() / 3.0).sin(),
        }
    }

    pub const ALL: [Self; 8] = [
        Self::Linear,
        Self::InQuad,
        Self::OutQuad,
        Self::InOutQuad,
        Self::InCubic,
        Self::OutCubic,
        Self::InOutCubic,
        Self::SmoothStep,
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_are_stable() {
        for ease in Ease::ALL {
            assert_eq!(ease.apply(0.0), 0.0);
            assert!((ease.apply(1.0) - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn monotonic_spot_check() {
        for ease in Ease::ALL {
            let a = ease.apply(0.25);
            let b = ease.apply(0.5);
            let c = ease.apply(0.75);
            assert!(a < b, "{ease:?}");
            assert!(b < c, "{ease:?}");
        }
    }

    #[test]
    fn invert_round_trips() {
        for ease in Ease::ALL {
            for i in 0..=20 {
                let t = f64::from(i) / 20.0;
                let back = ease.invert(ease.apply(t));
                assert!((back - t).abs() < 1e-9, "{ease:?} t={t} back={back}");
            }
        }
    }

    #[test]
    fn in_out_quad_midpoint() {
        assert!((Ease::InOutQuad.apply(0.5) - 0.5).abs() < 1e-12);
    }
}
