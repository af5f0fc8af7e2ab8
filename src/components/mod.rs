//! Behaviour components attached to game objects.
//!
//! Submodules overview:
//! - [`behaviour`] – the [`GameComponent`](behaviour::GameComponent) contract, ids and sibling references
//! - [`movementbehaviour`] – WASD-driven impulses applied to a sibling rigid body
//! - [`rigidbody`] – physics body accumulating impulses into velocity

pub mod behaviour;
pub mod movementbehaviour;
pub mod rigidbody;
