//! Behaviour engine library.
//!
//! A component/entity composition core: game objects own ordered lists of
//! polymorphic behaviour components with an awake/update/debug-UI lifecycle
//! and JSON round-tripping, driven frame by frame from a `bevy_ecs` world
//! that holds the input snapshot, the clock and the active scene.
//!
//! - [`components`] – the component contract and the built-in behaviours
//! - [`scene`] – game objects, scenes, the on-disk format and the type registry
//! - [`resources`] – ECS resources: input, time, configuration, render tuning
//! - [`systems`] – ECS systems run by the frame schedule
//! - [`layers`] – application layers hooked into the frame loop
//! - [`app`] – the application host tying world, schedule and layers together

pub mod app;
pub mod components;
pub mod error;
pub mod layers;
pub mod resources;
pub mod scene;
pub mod systems;
