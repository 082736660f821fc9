use client_core::input::InputSample;
use client_core::systems::locomotion::{Locomotion, LocomotionCfg};
use collision_query::{Aabb, CharacterBody, ShapeRef, StaticCollider, StaticIndex};
use glam::{Quat, Vec2, Vec3};

fn floor_world() -> StaticIndex {
    StaticIndex {
        colliders: vec![StaticCollider::solid(ShapeRef::Box(Aabb {
            min: Vec3::new(-200.0, -1.0, -200.0),
            max: Vec3::new(200.0, 0.0, 200.0),
        }))],
    }
}

#[test]
fn forward_input_follows_yawed_camera() {
    let world = floor_world();
    let mut body = CharacterBody::new(Vec3::ZERO, 0.3, 1.8);
    // Face the body away from where the camera will send it; movement must
    // ignore the body's own facing.
    let mut facing = Quat::from_rotation_y(std::f32::consts::PI);
    let mut loco = Locomotion::bind(LocomotionCfg::default(), &mut body);
    let fwd = InputSample {
        move_axes: Vec2::new(0.0, 1.0),
        ..Default::default()
    };
    // Camera yawed 90 degrees: its flattened forward is +X.
    let cam_rot = Quat::from_rotation_y(std::f32::consts::FRAC_PI_2);
    let cam_forward = cam_rot * Vec3::Z;
    let cam_right = cam_rot * Vec3::X;
    let dt = 0.016;
    let mut now = 0.0;
    for _ in 0..60 {
        loco.update(&fwd, cam_forward, cam_right, now, dt, &mut body, &mut facing, &world);
        now += dt;
    }
    assert!(body.pos.x > 1.0, "should move along camera +X, x={}", body.pos.x);
    assert!(
        body.pos.z.abs() < 1e-3,
        "no drift off the camera axis, z={}",
        body.pos.z
    );
}

#[test]
fn strafe_input_follows_camera_right() {
    let world = floor_world();
    let mut body = CharacterBody::new(Vec3::ZERO, 0.3, 1.8);
    let mut facing = Quat::IDENTITY;
    let mut loco = Locomotion::bind(LocomotionCfg::default(), &mut body);
    let strafe = InputSample {
        move_axes: Vec2::new(-1.0, 0.0),
        ..Default::default()
    };
    let dt = 0.016;
    let mut now = 0.0;
    for _ in 0..60 {
        loco.update(&strafe, Vec3::Z, Vec3::X, now, dt, &mut body, &mut facing, &world);
        now += dt;
    }
    assert!(body.pos.x < -1.0, "left strafe moves -X, x={}", body.pos.x);
}
