//! Shared smoothing, clamping, and angle helpers used by both controllers.

use glam::Vec3;

/// Frame-rate-independent smoothing factor `1 - e^(-damp * dt)`.
///
/// Interpolating by this factor each frame converges at the same apparent
/// rate regardless of step size; halving `dt` does not double the lag.
#[must_use]
pub fn exp_smooth_factor(damp: f32, dt: f32) -> f32 {
    1.0 - (-damp * dt).exp()
}

/// Linear interpolation.
#[must_use]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Step `cur` toward `target` by at most `max_delta`, never overshooting.
#[must_use]
pub fn move_toward(cur: f32, target: f32, max_delta: f32) -> f32 {
    let delta = target - cur;
    if delta.abs() <= max_delta {
        target
    } else {
        cur + max_delta.copysign(delta)
    }
}

/// Wrap a degree angle into [-180, 180).
#[must_use]
pub fn normalize_angle_deg(a: f32) -> f32 {
    (a + 180.0).rem_euclid(360.0) - 180.0
}

/// Project onto the XZ plane and normalize; zero for near-vertical input.
#[must_use]
pub fn flatten_to_xz(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z).normalize_or_zero()
}
