//! Per-frame systems: locomotion, orbit camera, frame ordering, cursor mode.
//!
//! Hosts lightweight, testable logic used by the renderer host.

pub mod cursor;
pub mod frame;
pub mod locomotion;
pub mod orbit_camera;
