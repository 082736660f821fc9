//! data_runtime: runtime-loaded tuning data for the control stack.
//!
//! Values live in TOML under `data/config/`; every key is optional so the
//! shipped defaults apply wherever a file or key is absent.

#![deny(warnings, clippy::all, clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

pub mod configs {
    pub mod controls;
}
