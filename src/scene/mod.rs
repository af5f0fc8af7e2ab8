//! Scenes and the objects they own.
//!
//! - [`gameobject`] – a named object holding ordered component slots
//! - [`graph`] – the [`Scene`](graph::Scene): object storage, traversal, load/save
//! - [`format`] – serde layout of scene files and component blob helpers
//! - [`registry`] – component type name to JSON factory table

pub mod format;
pub mod gameobject;
pub mod graph;
pub mod registry;
