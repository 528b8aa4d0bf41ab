//! Small geometry helpers reusable by systems.

use glam::Vec2;

/// Squared-distance check, avoids the sqrt on hot paths.
#[inline]
pub fn within(a: Vec2, b: Vec2, r: f32) -> bool {
    a.distance_squared(b) <= r * r
}

/// Predicted intercept point for pursuit anticipation: where the target
/// will be after `lead_s` seconds at its current velocity.
#[inline]
pub fn predicted_intercept(target_pos: Vec2, target_vel: Vec2, lead_s: f32) -> Vec2 {
    target_pos + target_vel * lead_s
}

/// Unit vector on the ring at index `k` of `n` evenly spaced points.
#[inline]
pub fn ring_dir(k: u32, n: u32) -> Vec2 {
    let a = (k as f32) / (n as f32) * std::f32::consts::TAU;
    Vec2::new(a.cos(), a.sin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::vec2;

    #[test]
    fn within_is_inclusive() {
        assert!(within(vec2(0.0, 0.0), vec2(3.0, 4.0), 5.0));
        assert!(!within(vec2(0.0, 0.0), vec2(3.0, 4.0), 4.99));
    }

    #[test]
    fn intercept_leads_moving_target() {
        let p = predicted_intercept(vec2(10.0, 0.0), vec2(100.0, 0.0), 0.5);
        assert_eq!(p, vec2(60.0, 0.0));
    }

    #[test]
    fn ring_dirs_are_unit() {
        for k in 0..8 {
            assert!((ring_dir(k, 8).length() - 1.0).abs() < 1e-5);
        }
    }
}
