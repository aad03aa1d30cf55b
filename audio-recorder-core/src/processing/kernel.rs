//! Windowed-sinc kernel math.
//!
//! See: <https://en.wikipedia.org/wiki/Lanczos_resampling>

use std::f64::consts::PI;

/// Default Lanczos window half-width, commonly denoted `a`.
pub const DEFAULT_LANCZOS_WINDOW: usize = 3;

/// Normalized sinc: 1 at `x = 0`, `sin(πx) / (πx)` elsewhere.
pub fn sinc(x: f64) -> f64 {
    if x == 0.0 {
        return 1.0;
    }
    let pi_x = PI * x;
    pi_x.sin() / pi_x
}

/// Lanczos kernel: `sinc(x) * sinc(x / a)` for `-a < x < a`, 0 otherwise.
pub fn lanczos(x: f64, a: f64) -> f64 {
    if -a < x && x < a {
        sinc(x) * sinc(x / a)
    } else {
        0.0
    }
}
