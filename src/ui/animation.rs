use serde::Deserialize;

/// Easing curve applied to scroll animations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum Easing {
    /// Constant speed interpolation.
    Linear,
    /// Cubic ease-in-out: slow start, fast middle, slow end.
    EaseInOut,
    /// Cubic ease-out: fast start, slow end (deceleration).
    EaseOut,
    /// Circular ease-out. Snappier than cubic at the start, used for scrolling.
    CircOut,
}

/// Apply an easing function to a linear progress value `t` in [0, 1].
/// Output stays within [0, 1] for every curve.
pub fn ease(t: f32, easing: Easing) -> f32 {
    let t = t.clamp(0.0, 1.0);
    match easing {
        Easing::Linear => t,
        Easing::EaseInOut => {
            // Cubic ease-in-out: 4t³ for t<0.5, 1-(-2t+2)³/2 for t>=0.5
            if t < 0.5 {
                4.0 * t * t * t
            } else {
                let f = -2.0 * t + 2.0;
                1.0 - f * f * f / 2.0
            }
        }
        Easing::EaseOut => {
            // Cubic ease-out: 1-(1-t)³
            let f = 1.0 - t;
            1.0 - f * f * f
        }
        Easing::CircOut => {
            // sqrt(1-(t-1)²)
            let f = t - 1.0;
            (1.0 - f * f).max(0.0).sqrt()
        }
    }
}
