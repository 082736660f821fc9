//! Cursor-lock mode as explicit state with an edge-triggered toggle.
//!
//! The actual pointer lock/visibility syscalls belong to the windowing host;
//! this module only owns the flag and emits requests.

use tracing::info;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CursorMode {
    #[default]
    Locked,
    Free,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct CursorState {
    pub mode: CursorMode,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HostEvent {
    PointerLockRequest(bool),
}

/// Initial state at activation; `lock_on_start` mirrors the shipped config.
#[must_use]
pub fn initial(lock_on_start: bool, out: &mut Vec<HostEvent>) -> CursorState {
    let mode = if lock_on_start {
        CursorMode::Locked
    } else {
        CursorMode::Free
    };
    out.push(HostEvent::PointerLockRequest(mode == CursorMode::Locked));
    CursorState { mode }
}

/// Handle the edge-triggered toggle (Esc / Start). Runs outside the per-frame
/// simulation tick and touches no simulation state.
pub fn handle_toggle(state: &mut CursorState, out: &mut Vec<HostEvent>) {
    let prev = state.mode;
    state.mode = match state.mode {
        CursorMode::Locked => CursorMode::Free,
        CursorMode::Free => CursorMode::Locked,
    };
    info!(target: "controls", from = ?prev, to = ?state.mode, reason = "cursor_toggle");
    out.push(HostEvent::PointerLockRequest(state.mode == CursorMode::Locked));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_flips_mode_and_requests_lock() {
        let mut ev = Vec::new();
        let mut s = initial(true, &mut ev);
        assert_eq!(s.mode, CursorMode::Locked);
        assert!(matches!(ev.as_slice(), [HostEvent::PointerLockRequest(true)]));

        ev.clear();
        handle_toggle(&mut s, &mut ev);
        assert_eq!(s.mode, CursorMode::Free);
        assert!(matches!(ev.as_slice(), [HostEvent::PointerLockRequest(false)]));

        ev.clear();
        handle_toggle(&mut s, &mut ev);
        assert_eq!(s.mode, CursorMode::Locked);
        assert!(matches!(ev.as_slice(), [HostEvent::PointerLockRequest(true)]));
    }
}
