//! Camera-relative locomotion: grounded/airborne acceleration, coyote-time
//! jumps, asymmetric gravity, and turn-to-face smoothing.

use crate::input::InputSample;
use crate::util::{flatten_to_xz, move_toward};
use collision_query::{CharacterBody, LayerMask, StaticIndex};
use glam::{Quat, Vec3};

/// Downward sphere probe dimensions, independent of the capsule radius.
const GROUND_PROBE_RADIUS: f32 = 0.2;
const GROUND_PROBE_LIFT: f32 = 0.05;
/// Seated bias while grounded; keeps the capsule pressed into the floor so
/// the contact flag does not flicker at exactly zero velocity.
const GROUNDED_STICK_VELOCITY: f32 = -2.0;
/// Grace window for accel/decel selection only. Intentionally much tighter
/// than the jump coyote window; the two must never be merged.
const ACCEL_GRACE_S: f32 = 0.02;

#[derive(Clone, Copy, Debug)]
pub struct LocomotionCfg {
    pub move_speed: f32,
    pub sprint_speed: f32,
    pub acceleration: f32,
    pub deceleration: f32,
    /// Fraction in [0, 1] of ground acceleration available while airborne.
    pub air_control: f32,
    pub jump_height: f32,
    pub gravity: f32,
    /// Extra gravity scale while falling, for a snappier descent.
    pub fall_multiplier: f32,
    pub coyote_time: f32,
    pub ground_mask: LayerMask,
    pub ground_check_distance: f32,
    pub slope_limit_deg: f32,
    /// Facing slerp rate. Linear in time by design (`turn_speed * dt`), not
    /// the exponential form the camera uses; turning feel was tuned against
    /// this curve.
    pub turn_speed: f32,
}

impl Default for LocomotionCfg {
    fn default() -> Self {
        Self {
            move_speed: 4.0,
            sprint_speed: 6.5,
            acceleration: 12.0,
            deceleration: 14.0,
            air_control: 0.5,
            jump_height: 1.3,
            gravity: 20.0,
            fall_multiplier: 1.5,
            coyote_time: 0.1,
            ground_mask: LayerMask::ALL,
            ground_check_distance: 0.2,
            slope_limit_deg: 45.0,
            turn_speed: 10.0,
        }
    }
}

impl LocomotionCfg {
    /// Overlay data-driven tuning on top of the defaults.
    #[must_use]
    pub fn from_data(data: &data_runtime::configs::controls::MovementCfg) -> Self {
        let d = Self::default();
        Self {
            move_speed: data.move_speed.unwrap_or(d.move_speed),
            sprint_speed: data.sprint_speed.unwrap_or(d.sprint_speed),
            acceleration: data.acceleration.unwrap_or(d.acceleration),
            deceleration: data.deceleration.unwrap_or(d.deceleration),
            air_control: data.air_control.unwrap_or(d.air_control),
            jump_height: data.jump_height.unwrap_or(d.jump_height),
            gravity: data.gravity.unwrap_or(d.gravity),
            fall_multiplier: data.fall_multiplier.unwrap_or(d.fall_multiplier),
            coyote_time: data.coyote_time.unwrap_or(d.coyote_time),
            ground_mask: d.ground_mask,
            ground_check_distance: data.ground_check_distance.unwrap_or(d.ground_check_distance),
            slope_limit_deg: data.slope_limit_deg.unwrap_or(d.slope_limit_deg),
            turn_speed: data.turn_speed.unwrap_or(d.turn_speed),
        }
    }
}

/// Per-character locomotion state. Owns mutation of the subject transform;
/// the camera only ever reads the committed position.
#[derive(Clone, Copy, Debug)]
pub struct Locomotion {
    cfg: LocomotionCfg,
    vertical_velocity: f32,
    current_speed: f32,
    last_grounded_time: f32,
    inert: bool,
}

impl Locomotion {
    /// Bind against the character body; pushes the slope limit down into the
    /// collision layer, which owns slope resolution during `move_by`.
    #[must_use]
    pub fn bind(cfg: LocomotionCfg, body: &mut CharacterBody) -> Self {
        body.slope_limit_deg = cfg.slope_limit_deg;
        Self {
            cfg,
            vertical_velocity: 0.0,
            current_speed: 0.0,
            last_grounded_time: f32::NEG_INFINITY,
            inert: false,
        }
    }

    /// Controller with no camera reference resolvable: warns once and stays
    /// inert for its lifetime.
    #[must_use]
    pub fn unbound(cfg: LocomotionCfg) -> Self {
        log::warn!("locomotion: no camera bound; controller is inert");
        Self {
            cfg,
            vertical_velocity: 0.0,
            current_speed: 0.0,
            last_grounded_time: f32::NEG_INFINITY,
            inert: true,
        }
    }

    /// One frame of movement. `cam_forward`/`cam_right` are the previous
    /// frame's committed camera basis; `now` is the host monotonic clock in
    /// seconds.
    #[allow(clippy::too_many_arguments)]
    pub fn update(
        &mut self,
        input: &InputSample,
        cam_forward: Vec3,
        cam_right: Vec3,
        now: f32,
        dt: f32,
        body: &mut CharacterBody,
        facing: &mut Quat,
        world: &StaticIndex,
    ) {
        if self.inert {
            return;
        }
        let move_axes = input.move_axes.clamp_length_max(1.0);
        let fwd = flatten_to_xz(cam_forward);
        let right = flatten_to_xz(cam_right);
        let desired = (fwd * move_axes.y + right * move_axes.x).normalize_or_zero();

        let base = if input.sprint_held {
            self.cfg.sprint_speed
        } else {
            self.cfg.move_speed
        };
        let target_speed = base * move_axes.length();

        // Accel selection uses the instantaneous contact flag plus a very
        // short grace, not the coyote window.
        let recently_grounded =
            body.is_grounded() || (now - self.last_grounded_time) <= ACCEL_GRACE_S;
        let accel = if recently_grounded {
            self.cfg.acceleration
        } else {
            self.cfg.acceleration * self.cfg.air_control
        };
        let decel = if recently_grounded {
            self.cfg.deceleration
        } else {
            // Airborne deceleration never fully vanishes.
            self.cfg.deceleration * (0.5 + 0.5 * self.cfg.air_control)
        };
        let rate = if target_speed > self.current_speed {
            accel
        } else {
            decel
        };
        self.current_speed = move_toward(self.current_speed, target_speed, rate * dt);

        let grounded = self.ground_check(body, world);
        if grounded {
            self.last_grounded_time = now;
            if self.vertical_velocity < 0.0 {
                self.vertical_velocity = GROUNDED_STICK_VELOCITY;
            }
        }

        let coyote_ok = (now - self.last_grounded_time) <= self.cfg.coyote_time;
        if input.jump_pressed && (grounded || coyote_ok) {
            // Closed-form takeoff speed: apex height equals jump_height under
            // constant gravity.
            self.vertical_velocity = (2.0 * self.cfg.gravity * self.cfg.jump_height).sqrt();
        }

        let g = self.cfg.gravity
            * if self.vertical_velocity < 0.0 {
                self.cfg.fall_multiplier
            } else {
                1.0
            };
        self.vertical_velocity -= g * dt;

        let horizontal = desired * self.current_speed;
        let motion = horizontal * dt + Vec3::Y * self.vertical_velocity * dt;
        body.move_by(motion, world);

        let look = Vec3::new(horizontal.x, 0.0, horizontal.z);
        if look.length_squared() > 1e-4 {
            let target = Quat::from_rotation_y(look.x.atan2(look.z));
            *facing = facing.slerp(target, (self.cfg.turn_speed * dt).min(1.0));
        }
    }

    /// Grounded when the capsule reported a supporting contact, or when an
    /// independent downward sphere probe finds one.
    fn ground_check(&self, body: &CharacterBody, world: &StaticIndex) -> bool {
        if body.is_grounded() {
            return true;
        }
        let origin = body.pos + Vec3::Y * GROUND_PROBE_LIFT;
        let dist = body.skin_width + self.cfg.ground_check_distance;
        world
            .sphere_cast(
                origin,
                GROUND_PROBE_RADIUS,
                -Vec3::Y,
                dist,
                self.cfg.ground_mask,
                true,
            )
            .is_some()
    }

    #[must_use]
    pub fn vertical_velocity(&self) -> f32 {
        self.vertical_velocity
    }

    #[must_use]
    pub fn current_speed(&self) -> f32 {
        self.current_speed
    }

    #[must_use]
    pub fn last_grounded_time(&self) -> f32 {
        self.last_grounded_time
    }

    #[must_use]
    pub fn is_inert(&self) -> bool {
        self.inert
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use collision_query::{Aabb, ShapeRef, StaticCollider};
    use glam::Vec2;

    fn floor_world() -> StaticIndex {
        StaticIndex {
            colliders: vec![StaticCollider::solid(ShapeRef::Box(Aabb {
                min: Vec3::new(-50.0, -1.0, -50.0),
                max: Vec3::new(50.0, 0.0, 50.0),
            }))],
        }
    }

    fn rig() -> (Locomotion, CharacterBody, Quat) {
        let mut body = CharacterBody::new(Vec3::ZERO, 0.3, 1.8);
        let loco = Locomotion::bind(LocomotionCfg::default(), &mut body);
        (loco, body, Quat::IDENTITY)
    }

    #[test]
    fn accel_grace_is_tighter_than_coyote_window() {
        let world = floor_world();
        let empty = StaticIndex::default();
        let (mut loco, mut body, mut facing) = rig();
        let idle = InputSample::default();
        // Ground once at t=0 to stamp last_grounded_time.
        loco.update(&idle, Vec3::Z, Vec3::X, 0.0, 0.016, &mut body, &mut facing, &world);
        assert_abs_diff_eq!(loco.last_grounded_time(), 0.0, epsilon = 1e-6);
        // Airborne at t=0.05: inside the coyote window, outside the accel
        // grace, so the speed ramp uses the air rate.
        body.pos.y = 5.0;
        body.move_by(Vec3::ZERO, &empty); // clears the stale contact flag
        let fwd = InputSample {
            move_axes: Vec2::new(0.0, 1.0),
            ..Default::default()
        };
        let dt = 0.016;
        loco.update(&fwd, Vec3::Z, Vec3::X, 0.05, dt, &mut body, &mut facing, &empty);
        let cfg = LocomotionCfg::default();
        let air_rate = cfg.acceleration * cfg.air_control;
        assert_abs_diff_eq!(loco.current_speed(), air_rate * dt, epsilon = 1e-5);
        assert!(loco.current_speed() < cfg.acceleration * dt);
    }

    #[test]
    fn zero_input_decelerates_to_rest() {
        let world = floor_world();
        let (mut loco, mut body, mut facing) = rig();
        let fwd = InputSample {
            move_axes: Vec2::new(0.0, 1.0),
            ..Default::default()
        };
        let idle = InputSample::default();
        let dt = 0.016;
        let mut now = 0.0;
        for _ in 0..120 {
            loco.update(&fwd, Vec3::Z, Vec3::X, now, dt, &mut body, &mut facing, &world);
            now += dt;
        }
        assert!(loco.current_speed() > 3.9);
        for _ in 0..120 {
            loco.update(&idle, Vec3::Z, Vec3::X, now, dt, &mut body, &mut facing, &world);
            now += dt;
        }
        assert_abs_diff_eq!(loco.current_speed(), 0.0, epsilon = 1e-4);
    }

    #[test]
    fn facing_turns_toward_motion() {
        let world = floor_world();
        let (mut loco, mut body, mut facing) = rig();
        let strafe = InputSample {
            move_axes: Vec2::new(1.0, 0.0),
            ..Default::default()
        };
        let dt = 0.016;
        let mut now = 0.0;
        for _ in 0..200 {
            loco.update(&strafe, Vec3::Z, Vec3::X, now, dt, &mut body, &mut facing, &world);
            now += dt;
        }
        // Body ends up facing +X (the motion direction).
        let f = facing * Vec3::Z;
        assert!(f.x > 0.95, "facing should converge to +X, got {f}");
    }

    #[test]
    fn inert_controller_is_a_noop() {
        let world = floor_world();
        let mut body = CharacterBody::new(Vec3::ZERO, 0.3, 1.8);
        let mut facing = Quat::IDENTITY;
        let mut loco = Locomotion::unbound(LocomotionCfg::default());
        let fwd = InputSample {
            move_axes: Vec2::new(0.0, 1.0),
            jump_pressed: true,
            ..Default::default()
        };
        loco.update(&fwd, Vec3::Z, Vec3::X, 0.0, 0.016, &mut body, &mut facing, &world);
        assert!(loco.is_inert());
        assert_abs_diff_eq!(body.pos.x, 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(loco.vertical_velocity(), 0.0, epsilon = 1e-6);
    }
}
