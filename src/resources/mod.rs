//! ECS resources made available to systems.
//!
//! Overview
//! - `activescene` – the scene the frame schedule updates
//! - `appconfig` – INI-backed settings for the frame loop
//! - `input` – per-frame keyboard and mouse snapshot with edge states
//! - `rendertuning` – LUT and wrap-lighting toggles owned by the scene layer
//! - `worldtime` – simulation time and delta
pub mod activescene;
pub mod appconfig;
pub mod input;
pub mod rendertuning;
pub mod worldtime;
