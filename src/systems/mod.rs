//! Engine systems.
//!
//! Submodules overview
//! - [`input`] – poll the input backend and update [`crate::resources::input::InputState`]
//! - [`scene`] – advance the active scene one frame
//! - [`time`] – update simulation time and delta

pub mod input;
pub mod scene;
pub mod time;
