//! Numeric helpers driving the projection and the animation.

use crate::error::{Error, Result};

/// Aspect ratio of a viewport, `width / height`.
///
/// A zero height has no meaningful projection and is reported as
/// [`Error::InvalidViewport`] instead of yielding infinity.
///
/// ```
/// assert_eq!(mannequin_core::calc_aspect(800, 400).unwrap(), 2.0);
/// assert!(mannequin_core::calc_aspect(800, 0).is_err());
/// ```
pub fn calc_aspect(width: u32, height: u32) -> Result<f32> {
    if height == 0 {
        return Err(Error::InvalidViewport { width, height });
    }
    Ok(width as f32 / height as f32)
}

/// Rotation angle in radians after `elapsed_ms` at `speed` radians per ms.
///
/// The angle grows without bound; callers that need it wrapped do so
/// themselves.
pub fn calc_rotation(elapsed_ms: f64, speed: f64) -> f64 {
    elapsed_ms * speed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calc_aspect() {
        assert_eq!(calc_aspect(800, 400).unwrap(), 2.0);
        assert_eq!(calc_aspect(400, 800).unwrap(), 0.5);
        assert_eq!(calc_aspect(1, 1).unwrap(), 1.0);
    }

    #[test]
    fn test_calc_aspect_zero_height() {
        match calc_aspect(640, 0) {
            Err(Error::InvalidViewport { width, height }) => {
                assert_eq!(width, 640);
                assert_eq!(height, 0);
            }
            other => panic!("Expected InvalidViewport, got {:?}", other),
        }
    }

    #[test]
    fn test_calc_aspect_zero_width() {
        assert_eq!(calc_aspect(0, 480).unwrap(), 0.0);
    }

    #[test]
    fn test_calc_rotation() {
        assert_eq!(calc_rotation(1000.0, 0.001), 1.0);
        assert_eq!(calc_rotation(2000.0, 0.001), 2.0);
        assert_eq!(calc_rotation(0.0, 0.001), 0.0);
    }

    #[test]
    fn test_calc_rotation_monotonic() {
        let speed = 0.001;
        let mut previous = f64::NEG_INFINITY;
        for step in 0..1000 {
            let t = step as f64 * 16.6;
            let angle = calc_rotation(t, speed);
            assert!(angle >= previous, "angle decreased at t={}", t);
            previous = angle;
        }
    }

    #[test]
    fn test_calc_rotation_does_not_wrap() {
        let angle = calc_rotation(3_600_000.0, 0.001);
        assert!(angle > std::f64::consts::TAU);
        assert_eq!(angle, 3600.0);
    }
}
