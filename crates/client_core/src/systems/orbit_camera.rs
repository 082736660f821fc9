//! Orbit camera rig: yaw/pitch/zoom integration, frame-rate-independent
//! smoothing, and sphere-cast occlusion push-in.

use crate::util::{exp_smooth_factor, lerp, normalize_angle_deg};
use collision_query::{LayerMask, StaticIndex};
use glam::{EulerRot, Quat, Vec2, Vec3};

/// Keeps the view usable when geometry presses in: the occlusion clamp never
/// shortens the boom below this fraction of `min_distance`.
const OCCLUSION_FLOOR_FRAC: f32 = 0.4;
/// Below this pivot-to-camera separation the cast direction is degenerate and
/// the occlusion query is skipped for the frame.
const MIN_SEPARATION: f32 = 1e-3;

#[derive(Clone, Copy, Debug)]
pub struct OrbitCameraCfg {
    /// Yaw speed in degrees per second per unit of look input.
    pub mouse_x_sensitivity: f32,
    /// Pitch speed in degrees per second per unit of look input.
    pub mouse_y_sensitivity: f32,
    pub min_pitch_deg: f32,
    pub max_pitch_deg: f32,
    pub rotation_damp: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub distance_damp: f32,
    pub collision_mask: LayerMask,
    pub collision_radius: f32,
    pub collision_buffer: f32,
    /// Pivot offset from the subject position (usually head height).
    pub target_offset: Vec3,
}

impl Default for OrbitCameraCfg {
    fn default() -> Self {
        Self {
            mouse_x_sensitivity: 150.0,
            mouse_y_sensitivity: 120.0,
            min_pitch_deg: -35.0,
            max_pitch_deg: 70.0,
            rotation_damp: 12.0,
            min_distance: 1.2,
            max_distance: 6.0,
            distance_damp: 10.0,
            collision_mask: LayerMask::ALL,
            collision_radius: 0.25,
            collision_buffer: 0.1,
            target_offset: Vec3::new(0.0, 1.6, 0.0),
        }
    }
}

impl OrbitCameraCfg {
    /// Overlay data-driven tuning on top of the defaults.
    #[must_use]
    pub fn from_data(data: &data_runtime::configs::controls::CameraCfg) -> Self {
        let d = Self::default();
        Self {
            mouse_x_sensitivity: data.mouse_x_sensitivity.unwrap_or(d.mouse_x_sensitivity),
            mouse_y_sensitivity: data.mouse_y_sensitivity.unwrap_or(d.mouse_y_sensitivity),
            min_pitch_deg: data.min_pitch_deg.unwrap_or(d.min_pitch_deg),
            max_pitch_deg: data.max_pitch_deg.unwrap_or(d.max_pitch_deg),
            rotation_damp: data.rotation_damp.unwrap_or(d.rotation_damp),
            min_distance: data.min_distance.unwrap_or(d.min_distance),
            max_distance: data.max_distance.unwrap_or(d.max_distance),
            distance_damp: data.distance_damp.unwrap_or(d.distance_damp),
            collision_mask: d.collision_mask,
            collision_radius: data.collision_radius.unwrap_or(d.collision_radius),
            collision_buffer: data.collision_buffer.unwrap_or(d.collision_buffer),
            target_offset: Vec3::new(
                0.0,
                data.target_offset_y.unwrap_or(d.target_offset.y),
                0.0,
            ),
        }
    }
}

/// Committed camera transform for a frame. The locomotion controller reads
/// the previous frame's pose for its movement basis.
#[derive(Clone, Copy, Debug)]
pub struct CameraPose {
    pub eye: Vec3,
    pub rotation: Quat,
}

impl Default for CameraPose {
    fn default() -> Self {
        Self {
            eye: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

impl CameraPose {
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }

    #[must_use]
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }
}

/// Orbit rig state. Yaw is unbounded (wraps through the quaternion); pitch
/// and both distances stay inside their configured bounds at all times.
#[derive(Clone, Copy, Debug)]
pub struct OrbitCamera {
    cfg: OrbitCameraCfg,
    yaw_deg: f32,
    pitch_deg: f32,
    desired_distance: f32,
    current_distance: f32,
    current_pivot: Vec3,
    pose: CameraPose,
    inert: bool,
}

impl OrbitCamera {
    /// Seed the rig from a hand-placed starting shot relative to the subject,
    /// so designers control the initial framing.
    #[must_use]
    pub fn bind(
        cfg: OrbitCameraCfg,
        camera_pos: Vec3,
        camera_rot: Quat,
        subject_pos: Vec3,
    ) -> Self {
        let pivot = subject_pos + cfg.target_offset;
        let desired = (camera_pos - pivot)
            .length()
            .clamp(cfg.min_distance, cfg.max_distance);
        let (yaw_rad, pitch_rad, _) = camera_rot.to_euler(EulerRot::YXZ);
        // Normalize into [-180, 180) before clamping so a start pose near the
        // 360 wrap does not snap to the wrong bound.
        let pitch_deg = normalize_angle_deg(pitch_rad.to_degrees())
            .clamp(cfg.min_pitch_deg, cfg.max_pitch_deg);
        Self {
            cfg,
            yaw_deg: yaw_rad.to_degrees(),
            pitch_deg,
            desired_distance: desired,
            current_distance: desired,
            current_pivot: pivot,
            pose: CameraPose {
                eye: camera_pos,
                rotation: camera_rot,
            },
            inert: false,
        }
    }

    /// Rig with no subject bound: warns once and stays inert for its
    /// lifetime. Rebinding requires constructing a new rig.
    #[must_use]
    pub fn unbound(cfg: OrbitCameraCfg) -> Self {
        log::warn!("orbit camera: no subject bound; controller is inert");
        Self {
            cfg,
            yaw_deg: 0.0,
            pitch_deg: 0.0,
            desired_distance: cfg.min_distance,
            current_distance: cfg.min_distance,
            current_pivot: Vec3::ZERO,
            pose: CameraPose::default(),
            inert: true,
        }
    }

    /// One frame of orbit/zoom/occlusion. Must run after the subject's
    /// position for this frame has been committed.
    pub fn update(&mut self, look: Vec2, zoom: f32, subject_pos: Vec3, dt: f32, world: &StaticIndex) {
        if self.inert {
            return;
        }
        self.yaw_deg += look.x * self.cfg.mouse_x_sensitivity * dt;
        self.pitch_deg = (self.pitch_deg - look.y * self.cfg.mouse_y_sensitivity * dt)
            .clamp(self.cfg.min_pitch_deg, self.cfg.max_pitch_deg);
        self.desired_distance =
            (self.desired_distance - zoom).clamp(self.cfg.min_distance, self.cfg.max_distance);

        let target_rot = Quat::from_euler(
            EulerRot::YXZ,
            self.yaw_deg.to_radians(),
            self.pitch_deg.to_radians(),
            0.0,
        );
        let k = exp_smooth_factor(self.cfg.rotation_damp, dt);
        let rotation = self.pose.rotation.slerp(target_rot, k).normalize();
        self.current_pivot = self
            .current_pivot
            .lerp(subject_pos + self.cfg.target_offset, k);
        self.current_distance = lerp(
            self.current_distance,
            self.desired_distance,
            exp_smooth_factor(self.cfg.distance_damp, dt),
        );

        let mut eye = self.current_pivot - rotation * Vec3::Z * self.current_distance;
        let to_cam = eye - self.current_pivot;
        let dist = to_cam.length();
        if dist > MIN_SEPARATION {
            let dir = to_cam / dist;
            if let Some(hit) = world.sphere_cast(
                self.current_pivot,
                self.cfg.collision_radius,
                dir,
                dist + self.cfg.collision_buffer,
                self.cfg.collision_mask,
                true,
            ) {
                let safe = (hit.distance - self.cfg.collision_buffer)
                    .clamp(self.cfg.min_distance * OCCLUSION_FLOOR_FRAC, dist);
                eye = self.current_pivot + dir * safe;
            }
        }
        self.pose = CameraPose { eye, rotation };
    }

    #[must_use]
    pub fn pose(&self) -> CameraPose {
        self.pose
    }

    #[must_use]
    pub fn pivot(&self) -> Vec3 {
        self.current_pivot
    }

    #[must_use]
    pub fn pitch_deg(&self) -> f32 {
        self.pitch_deg
    }

    #[must_use]
    pub fn yaw_deg(&self) -> f32 {
        self.yaw_deg
    }

    #[must_use]
    pub fn desired_distance(&self) -> f32 {
        self.desired_distance
    }

    #[must_use]
    pub fn current_distance(&self) -> f32 {
        self.current_distance
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

    #[test]
    fn bind_seeds_from_start_pose() {
        let cfg = OrbitCameraCfg::default();
        let cam = OrbitCamera::bind(
            cfg,
            Vec3::new(0.0, 1.6, -4.0),
            Quat::IDENTITY,
            Vec3::ZERO,
        );
        assert_abs_diff_eq!(cam.desired_distance(), 4.0, epsilon = 1e-4);
        assert_abs_diff_eq!(cam.yaw_deg(), 0.0, epsilon = 1e-3);
        assert!(!cam.is_inert());
    }

    #[test]
    fn bind_clamps_out_of_range_start_distance() {
        let cfg = OrbitCameraCfg::default();
        let cam = OrbitCamera::bind(
            cfg,
            Vec3::new(0.0, 1.6, -50.0),
            Quat::IDENTITY,
            Vec3::ZERO,
        );
        assert_abs_diff_eq!(cam.desired_distance(), cfg.max_distance, epsilon = 1e-4);
    }

    #[test]
    fn unbound_rig_is_inert() {
        let mut cam = OrbitCamera::unbound(OrbitCameraCfg::default());
        let before = cam.pose();
        cam.update(
            Vec2::new(100.0, 50.0),
            3.0,
            Vec3::new(9.0, 0.0, 9.0),
            0.016,
            &StaticIndex::default(),
        );
        assert!(cam.is_inert());
        assert_abs_diff_eq!(cam.pose().eye.x, before.eye.x, epsilon = 1e-6);
    }

    #[test]
    fn near_zero_separation_skips_occlusion() {
        let cfg = OrbitCameraCfg {
            min_distance: 0.0,
            ..Default::default()
        };
        let mut cam = OrbitCamera::bind(cfg, Vec3::new(0.0, 1.6, 0.0), Quat::IDENTITY, Vec3::ZERO);
        // Degenerate: camera exactly at the pivot. Must not panic or emit NaN.
        cam.update(Vec2::ZERO, 0.0, Vec3::ZERO, 0.016, &StaticIndex::default());
        assert!(cam.pose().eye.is_finite());
    }
}
