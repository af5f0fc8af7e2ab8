//! Keyboard-driven movement through physics impulses.
//!
//! [`MovementBehaviour`] looks up a sibling [`RigidBody`] when it wakes up
//! and, every frame, pushes that body with a fixed-size impulse chosen from
//! the WASD keys. The keys are checked as an exclusive priority chain
//! (W, then A, then S, then D), so at most one impulse fires per frame and
//! diagonal movement is impossible. Holding the left mouse button suppresses
//! movement entirely.
//!
//! The impulse magnitude is `speed` per frame and is not scaled by the frame
//! time, so the resulting motion depends on the frame rate.
//!
//! JSON schema: `{ "speed": <float> }`.

use log::{debug, warn};
use nalgebra::Vector3;
use serde_json::{Value, json};

use crate::components::behaviour::{
    ComponentBase, ComponentContext, ComponentId, ComponentRef, ComponentType, GameComponent,
};
use crate::components::rigidbody::RigidBody;
use crate::error::Result;
use crate::resources::input::{ButtonState, InputState, Key, MouseButton};
use crate::scene::format::require_f32;
use crate::scene::gameobject::GameObject;

const DEFAULT_SPEED: f32 = 0.05;

/// Key checked first; its impulse wins over every other key.
pub const FORWARD_KEY: Key = Key::W;
pub const LEFT_KEY: Key = Key::A;
pub const BACK_KEY: Key = Key::S;
pub const RIGHT_KEY: Key = Key::D;
/// Holding this button suppresses all movement.
pub const FIRE_BUTTON: MouseButton = MouseButton::Left;

/// Applies input-driven impulses to the owner's rigid body.
#[derive(Debug, Clone)]
pub struct MovementBehaviour {
    base: ComponentBase,
    speed: f32,
    body: Option<ComponentRef<RigidBody>>,
    /// Optional link to a UI panel component. Not serialized.
    pub panel: Option<ComponentId>,
}

impl Default for MovementBehaviour {
    fn default() -> Self {
        Self::new(DEFAULT_SPEED)
    }
}

impl MovementBehaviour {
    pub fn new(speed: f32) -> Self {
        Self {
            base: ComponentBase::default(),
            speed,
            body: None,
            panel: None,
        }
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    /// The body resolved at awake, if any.
    pub fn body(&self) -> Option<ComponentRef<RigidBody>> {
        self.body
    }

    /// The impulse this frame's input asks for, if any.
    pub fn impulse_for(&self, input: &InputState) -> Option<Vector3<f32>> {
        if input.is_mouse_button_down(FIRE_BUTTON) {
            return None;
        }
        let down = |key: Key| input.key_state(key) == ButtonState::Down;

        if down(FORWARD_KEY) {
            Some(Vector3::new(0.0, self.speed, 0.0))
        } else if down(LEFT_KEY) {
            Some(Vector3::new(-self.speed, 0.0, 0.0))
        } else if down(BACK_KEY) {
            Some(Vector3::new(0.0, -self.speed, 0.0))
        } else if down(RIGHT_KEY) {
            Some(Vector3::new(self.speed, 0.0, 0.0))
        } else {
            None
        }
    }
}

impl GameComponent for MovementBehaviour {
    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }

    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn awake(&mut self, owner: &GameObject) {
        self.body = owner.find_component_ref::<RigidBody>();
        if self.body.is_none() {
            warn!(
                "MovementBehaviour on '{}' found no RigidBody; disabling",
                owner.name()
            );
            self.base.enabled = false;
        }
    }

    fn update(&mut self, ctx: &mut ComponentContext<'_>, _delta_time: f32) {
        let impulse = self.impulse_for(ctx.input());

        let body = match self.body {
            Some(body) => ctx.owner_mut().resolve_mut(body),
            None => None,
        };
        let Some(body) = body else {
            warn!(
                "MovementBehaviour on '{}' lost its RigidBody; disabling",
                ctx.owner().name()
            );
            self.base.enabled = false;
            return;
        };

        if let Some(impulse) = impulse {
            debug!("Applying impulse {:?}", impulse);
            body.apply_impulse(impulse);
        }
    }

    fn render_imgui(&mut self, ui: &imgui::Ui) {
        imgui::Drag::new("Speed").speed(1.0).build(ui, &mut self.speed);
    }

    fn to_json(&self) -> Value {
        json!({ "speed": self.speed })
    }
}

impl ComponentType for MovementBehaviour {
    const TYPE_NAME: &'static str = "MovementBehaviour";

    fn from_json(blob: &Value) -> Result<Self> {
        let speed = require_f32(blob, Self::TYPE_NAME, "speed")?;
        Ok(Self::new(speed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::input::RawInput;

    /// Apply the same raw sample twice so held inputs reach `Down`.
    fn held(raw: RawInput) -> InputState {
        let mut input = InputState::new();
        input.apply_snapshot(&raw);
        input.apply_snapshot(&raw);
        input
    }

    fn player(speed: f32) -> GameObject {
        GameObject::new("player")
            .with_component(RigidBody::dynamic(1.0))
            .with_component(MovementBehaviour::new(speed))
    }

    fn pending(go: &GameObject) -> Vec<Vector3<f32>> {
        go.get_component::<RigidBody>()
            .unwrap()
            .pending_impulses()
            .to_vec()
    }

    #[test]
    fn test_default_speed() {
        assert_eq!(MovementBehaviour::default().speed(), 0.05);
    }

    #[test]
    fn test_awake_without_body_disables() {
        let mut go = GameObject::new("ghost").with_component(MovementBehaviour::default());
        go.awake_pending();
        let movement = go.get_component::<MovementBehaviour>().unwrap();
        assert!(!movement.is_enabled());
        assert!(movement.body().is_none());
    }

    #[test]
    fn test_awake_with_body_resolves_it() {
        let mut go = player(1.0);
        go.awake_pending();
        let movement = go.get_component::<MovementBehaviour>().unwrap();
        assert!(movement.is_enabled());
        let body = movement.body().unwrap();
        assert!(go.resolve(body).is_some());
    }

    #[test]
    fn test_awake_finds_body_attached_after_behaviour() {
        let mut go = GameObject::new("late")
            .with_component(MovementBehaviour::default())
            .with_component(RigidBody::dynamic(1.0));
        go.awake_pending();
        assert!(go.get_component::<MovementBehaviour>().unwrap().is_enabled());
    }

    #[test]
    fn test_forward_impulse_with_default_speed() {
        // Update the behaviour only; the body's own update would consume the impulse.
        let mut go = player(0.05);
        let input = held(RawInput::new().with_key(Key::W));
        let movement_id = go.component_ids()[1];
        let mut behaviour = go.remove_component(movement_id).unwrap();
        behaviour.awake(&go);
        behaviour.update(&mut ComponentContext::new(&mut go, &input), 0.016);
        assert_eq!(pending(&go), vec![Vector3::new(0.0, 0.05, 0.0)]);
    }

    #[test]
    fn test_priority_chain_is_exclusive() {
        let movement = MovementBehaviour::new(2.0);
        let cases = [
            ([Key::W, Key::A], Vector3::new(0.0, 2.0, 0.0)),
            ([Key::A, Key::S], Vector3::new(-2.0, 0.0, 0.0)),
            ([Key::S, Key::D], Vector3::new(0.0, -2.0, 0.0)),
            ([Key::D, Key::D], Vector3::new(2.0, 0.0, 0.0)),
            ([Key::D, Key::W], Vector3::new(0.0, 2.0, 0.0)),
        ];
        for (keys, expected) in cases {
            let raw = RawInput::new().with_key(keys[0]).with_key(keys[1]);
            assert_eq!(movement.impulse_for(&held(raw)), Some(expected));
        }
    }

    #[test]
    fn test_fire_button_suppresses_movement() {
        let movement = MovementBehaviour::new(1.0);
        let input = held(
            RawInput::new()
                .with_key(Key::W)
                .with_key(Key::D)
                .with_mouse(MouseButton::Left),
        );
        assert_eq!(movement.impulse_for(&input), None);
    }

    #[test]
    fn test_key_pressed_this_frame_does_not_move_yet() {
        let movement = MovementBehaviour::new(1.0);
        let mut input = InputState::new();
        input.apply_snapshot(&RawInput::new().with_key(Key::W));
        assert_eq!(movement.impulse_for(&input), None);
    }

    #[test]
    fn test_no_keys_no_impulse() {
        let movement = MovementBehaviour::new(1.0);
        assert_eq!(movement.impulse_for(&held(RawInput::new())), None);
    }

    #[test]
    fn test_speed_not_scaled_by_delta_time() {
        let input = held(RawInput::new().with_key(Key::D));
        for dt in [0.0, 0.016, 1.0] {
            let mut go = player(0.5);
            let id = go.component_ids()[1];
            let mut behaviour = go.remove_component(id).unwrap();
            behaviour.awake(&go);
            behaviour.update(&mut ComponentContext::new(&mut go, &input), dt);
            assert_eq!(pending(&go), vec![Vector3::new(0.5, 0.0, 0.0)]);
        }
    }

    #[test]
    fn test_lost_body_disables_during_update() {
        let mut go = player(1.0);
        go.awake_pending();
        let body_id = go.component_ids()[0];
        go.remove_component(body_id);

        go.update(&InputState::default(), 0.016);
        assert!(!go.get_component::<MovementBehaviour>().unwrap().is_enabled());
    }

    #[test]
    fn test_disabled_body_does_not_accumulate_impulses() {
        let mut go = player(1.0);
        go.awake_pending();
        go.get_component_mut::<RigidBody>().unwrap().set_enabled(false);

        let input = held(RawInput::new().with_key(Key::W));
        for _ in 0..1000 {
            go.update(&input, 0.016);
        }
        assert!(pending(&go).is_empty());
        assert!(go.get_component::<MovementBehaviour>().unwrap().is_enabled());

        // Re-enabling must not release a backlog.
        go.get_component_mut::<RigidBody>().unwrap().set_enabled(true);
        go.update(&InputState::default(), 0.016);
        let body = go.get_component::<RigidBody>().unwrap();
        assert_eq!(body.velocity, Vector3::zeros());
        assert_eq!(go.position, Vector3::zeros());
    }

    #[test]
    fn test_json_round_trip() {
        let blob = json!({ "speed": 0.25 });
        let movement = MovementBehaviour::from_json(&blob).unwrap();
        assert_eq!(movement.speed(), 0.25);
        assert_eq!(movement.to_json(), blob);
    }

    #[test]
    fn test_from_to_json_preserves_any_speed() {
        for speed in [0.05_f32, -3.7, 0.0, 1e-7, 12345.678] {
            let original = MovementBehaviour::new(speed);
            let restored = MovementBehaviour::from_json(&original.to_json()).unwrap();
            assert_eq!(restored.speed().to_bits(), speed.to_bits());
        }
    }

    #[test]
    fn test_from_json_missing_speed() {
        let err = MovementBehaviour::from_json(&json!({ "velocity": 1.0 })).unwrap_err();
        assert!(err.is_missing_field());
    }

    #[test]
    fn test_from_json_rejects_speed_outside_f32() {
        let err = MovementBehaviour::from_json(&json!({ "speed": 1e39 })).unwrap_err();
        assert!(matches!(
            err,
            crate::error::LoadError::InvalidField { field: "speed", .. }
        ));
    }
}
