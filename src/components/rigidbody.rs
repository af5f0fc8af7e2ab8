//! Physics body component.
//!
//! The [`RigidBody`] is the integration point between behaviours and the
//! physics simulation. Behaviours call [`RigidBody::apply_impulse`]; the
//! impulses are queued and folded into the body's velocity on the body's own
//! `update`, after which the velocity moves the owning game object.
//!
//! Only dynamic bodies respond to impulses. Static bodies never move and
//! kinematic bodies move with whatever velocity game logic assigns.
//!
//! JSON schema: `{ "mass": <float>, "type": "static" | "kinematic" | "dynamic" }`.

use log::debug;
use nalgebra::Vector3;
use serde_json::{Value, json};
use smallvec::SmallVec;

use crate::components::behaviour::{ComponentBase, ComponentContext, ComponentType, GameComponent};
use crate::error::{LoadError, Result};
use crate::scene::format::{require_f32, require_str};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyType {
    Static,
    Kinematic,
    Dynamic,
}

impl BodyType {
    fn as_str(self) -> &'static str {
        match self {
            BodyType::Static => "static",
            BodyType::Kinematic => "kinematic",
            BodyType::Dynamic => "dynamic",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value {
            "static" => Some(BodyType::Static),
            "kinematic" => Some(BodyType::Kinematic),
            "dynamic" => Some(BodyType::Dynamic),
            _ => None,
        }
    }
}

/// Physics body attached to a game object.
#[derive(Debug, Clone)]
pub struct RigidBody {
    base: ComponentBase,
    /// Mass in kilograms. Must be positive for dynamic bodies.
    pub mass: f32,
    pub body_type: BodyType,
    /// Current velocity in world units per second.
    pub velocity: Vector3<f32>,
    pending_impulses: SmallVec<[Vector3<f32>; 4]>,
}

impl Default for RigidBody {
    fn default() -> Self {
        Self::dynamic(1.0)
    }
}

impl RigidBody {
    pub fn new(body_type: BodyType, mass: f32) -> Self {
        Self {
            base: ComponentBase::default(),
            mass,
            body_type,
            velocity: Vector3::zeros(),
            pending_impulses: SmallVec::new(),
        }
    }

    pub fn dynamic(mass: f32) -> Self {
        Self::new(BodyType::Dynamic, mass)
    }

    pub fn fixed() -> Self {
        Self::new(BodyType::Static, 0.0)
    }

    /// Queue an impulse (mass × Δvelocity) for the next physics step.
    ///
    /// Ignored by static and kinematic bodies, and by disabled bodies since
    /// nothing would drain the queue.
    pub fn apply_impulse(&mut self, impulse: Vector3<f32>) {
        if !self.base.enabled {
            debug!("Ignoring impulse {:?} on disabled body", impulse);
            return;
        }
        if self.body_type != BodyType::Dynamic {
            debug!(
                "Ignoring impulse {:?} on {} body",
                impulse,
                self.body_type.as_str()
            );
            return;
        }
        self.pending_impulses.push(impulse);
    }

    /// Impulses queued since the last step, in call order.
    pub fn pending_impulses(&self) -> &[Vector3<f32>] {
        &self.pending_impulses
    }

    /// Fold queued impulses into the velocity. Returns the velocity change.
    pub fn integrate_impulses(&mut self) -> Vector3<f32> {
        if self.pending_impulses.is_empty() || self.mass <= 0.0 {
            self.pending_impulses.clear();
            return Vector3::zeros();
        }
        let total: Vector3<f32> = self.pending_impulses.drain(..).sum();
        let delta_v = total / self.mass;
        self.velocity += delta_v;
        delta_v
    }
}

impl GameComponent for RigidBody {
    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }

    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn update(&mut self, ctx: &mut ComponentContext<'_>, delta_time: f32) {
        if self.body_type == BodyType::Static {
            return;
        }
        self.integrate_impulses();
        ctx.owner_mut().translate(self.velocity * delta_time);
    }

    fn render_imgui(&mut self, ui: &imgui::Ui) {
        ui.text(format!("Type: {}", self.body_type.as_str()));
        imgui::Drag::new("Mass")
            .speed(0.1)
            .range(0.0, f32::MAX)
            .build(ui, &mut self.mass);
        ui.text(format!(
            "Velocity: ({:.3}, {:.3}, {:.3})",
            self.velocity.x, self.velocity.y, self.velocity.z
        ));
    }

    fn to_json(&self) -> Value {
        json!({
            "mass": self.mass,
            "type": self.body_type.as_str(),
        })
    }
}

impl ComponentType for RigidBody {
    const TYPE_NAME: &'static str = "RigidBody";

    fn from_json(blob: &Value) -> Result<Self> {
        let mass = require_f32(blob, Self::TYPE_NAME, "mass")?;
        let body_type = BodyType::parse(require_str(blob, Self::TYPE_NAME, "type")?).ok_or_else(
            || LoadError::InvalidField {
                component: Self::TYPE_NAME.to_string(),
                field: "type",
                expected: "one of \"static\", \"kinematic\", \"dynamic\"",
            },
        )?;
        if body_type == BodyType::Dynamic && mass <= 0.0 {
            return Err(LoadError::InvalidField {
                component: Self::TYPE_NAME.to_string(),
                field: "mass",
                expected: "a positive number for dynamic bodies",
            });
        }
        Ok(Self::new(body_type, mass))
    }
}
