//! Per-frame orchestration.
//!
//! Ordering contract: within one frame the locomotion update commits the
//! subject position first, then the orbit camera reads it, so the camera
//! always frames the latest position. The camera basis the locomotion
//! consumes is the pose committed at the end of the *previous* frame; that
//! one-frame lag is part of the tuned feel and must stay.

use crate::input::InputSample;
use crate::systems::locomotion::Locomotion;
use crate::systems::orbit_camera::OrbitCamera;
use collision_query::{CharacterBody, StaticIndex};
use glam::Quat;

/// Host-supplied clock for one frame: monotonic seconds plus the elapsed
/// step.
#[derive(Clone, Copy, Debug)]
pub struct FrameCtx {
    pub now: f32,
    pub dt: f32,
}

/// The controlled subject: capsule body plus facing. The locomotion
/// controller owns mutation; everything else reads.
#[derive(Clone, Copy, Debug)]
pub struct PlayerRig {
    pub body: CharacterBody,
    pub facing: Quat,
    pub locomotion: Locomotion,
}

/// Advance both controllers one frame in dependency order.
pub fn advance(
    player: &mut PlayerRig,
    camera: &mut OrbitCamera,
    input: &InputSample,
    ctx: FrameCtx,
    world: &StaticIndex,
) {
    // Previous frame's committed camera basis.
    let basis = camera.pose();
    player.locomotion.update(
        input,
        basis.forward(),
        basis.right(),
        ctx.now,
        ctx.dt,
        &mut player.body,
        &mut player.facing,
        world,
    );
    // Camera reads the position committed just above.
    camera.update(input.look, input.zoom, player.body.pos, ctx.dt, world);
}
