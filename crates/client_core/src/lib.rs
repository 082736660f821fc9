//! Client-side third-person control core: per-frame input samples, the orbit
//! camera rig, and the camera-relative locomotion controller.
//!
//! Both controllers are pure per-frame state machines; the windowing /
//! rendering host feeds them `InputSample`s and a collision index, and reads
//! the committed camera and subject transforms back out.

#![deny(warnings, clippy::all, clippy::pedantic)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_panics_doc,
    clippy::struct_excessive_bools
)]

pub mod input {
    use glam::Vec2;

    /// Resolved input sample for one simulation frame.
    ///
    /// Device binding happens upstream; the controllers only ever see this
    /// struct. `jump_pressed` is a one-shot: the host sets it on key-press
    /// and clears it after the frame so holding the key does not repeat-jump.
    #[derive(Default, Debug, Clone, Copy)]
    pub struct InputSample {
        /// Look delta (mouse counts or stick deflection) for this frame.
        pub look: Vec2,
        /// Scroll/zoom delta; positive zooms in.
        pub zoom: f32,
        /// Movement axes, x = strafe, y = forward. Clamped to unit length
        /// by the locomotion controller.
        pub move_axes: Vec2,
        pub jump_pressed: bool,
        pub sprint_held: bool,
    }

    impl InputSample {
        pub fn clear(&mut self) {
            *self = Self::default();
        }
    }
}

pub mod systems;
pub mod telemetry;
pub mod util;
