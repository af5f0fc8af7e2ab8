//! Game objects: ordered containers of behaviour components.
//!
//! A [`GameObject`] owns its components exclusively. Each component sits in a
//! slot with a stable [`ComponentId`]; while a component runs a lifecycle
//! hook its slot is temporarily vacated so the component can be handed a
//! mutable view of its owner (and therefore of its siblings). Lookups skip
//! vacated slots.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use log::debug;
use nalgebra::Vector3;
use smallvec::SmallVec;

use crate::components::behaviour::{ComponentContext, ComponentId, ComponentRef, GameComponent};
use crate::resources::input::InputState;

static NEXT_OBJECT_ID: AtomicU64 = AtomicU64::new(1);

/// Process-wide unique identifier of a game object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GameObjectId(u64);

impl GameObjectId {
    fn next() -> Self {
        GameObjectId(NEXT_OBJECT_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for GameObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "go#{}", self.0)
    }
}

struct ComponentSlot {
    id: ComponentId,
    awake: bool,
    component: Option<Box<dyn GameComponent>>,
}

/// A named object in a scene holding an ordered list of components.
pub struct GameObject {
    id: GameObjectId,
    name: String,
    /// World-space position, integrated by rigid bodies.
    pub position: Vector3<f32>,
    slots: SmallVec<[ComponentSlot; 4]>,
    next_component_id: u32,
}

impl GameObject {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: GameObjectId::next(),
            name: name.into(),
            position: Vector3::zeros(),
            slots: SmallVec::new(),
            next_component_id: 0,
        }
    }

    /// Builder-style helper setting the initial position.
    pub fn with_position(mut self, position: Vector3<f32>) -> Self {
        self.position = position;
        self
    }

    /// Builder-style helper attaching a component.
    pub fn with_component<C: GameComponent>(mut self, component: C) -> Self {
        self.add_component(component);
        self
    }

    pub fn id(&self) -> GameObjectId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn translate(&mut self, delta: Vector3<f32>) {
        self.position += delta;
    }

    // ========== Component management ==========

    /// Attach a component at the end of the list.
    pub fn add_component<C: GameComponent>(&mut self, component: C) -> ComponentId {
        self.add_boxed(Box::new(component))
    }

    /// Attach an already boxed component, e.g. one built by the registry.
    pub fn add_boxed(&mut self, mut component: Box<dyn GameComponent>) -> ComponentId {
        let id = ComponentId(self.next_component_id);
        self.next_component_id += 1;
        component.base_mut().owner = Some(self.id);
        debug!(
            "Attached {} {} to '{}'",
            component.type_name(),
            id,
            self.name
        );
        self.slots.push(ComponentSlot {
            id,
            awake: false,
            component: Some(component),
        });
        id
    }

    /// Detach a component and hand it back to the caller with its owner
    /// reference cleared.
    pub fn remove_component(&mut self, id: ComponentId) -> Option<Box<dyn GameComponent>> {
        let index = self.slots.iter().position(|s| s.id == id)?;
        let mut component = self.slots.remove(index).component?;
        component.base_mut().owner = None;
        Some(component)
    }

    /// First component of type `T` in attachment order.
    pub fn get_component<T: GameComponent>(&self) -> Option<&T> {
        self.slots
            .iter()
            .filter_map(|s| s.component.as_deref())
            .find_map(|c| c.as_any().downcast_ref::<T>())
    }

    pub fn get_component_mut<T: GameComponent>(&mut self) -> Option<&mut T> {
        self.slots
            .iter_mut()
            .filter_map(|s| s.component.as_deref_mut())
            .find_map(|c| c.as_any_mut().downcast_mut::<T>())
    }

    /// Non-owning reference to the first component of type `T`.
    pub fn find_component_ref<T: GameComponent>(&self) -> Option<ComponentRef<T>> {
        self.slots
            .iter()
            .find(|s| {
                s.component
                    .as_deref()
                    .is_some_and(|c| c.as_any().is::<T>())
            })
            .map(|s| ComponentRef::new(s.id))
    }

    pub fn resolve<T: GameComponent>(&self, component: ComponentRef<T>) -> Option<&T> {
        self.component(component.id())?
            .as_any()
            .downcast_ref::<T>()
    }

    pub fn resolve_mut<T: GameComponent>(&mut self, component: ComponentRef<T>) -> Option<&mut T> {
        self.component_mut(component.id())?
            .as_any_mut()
            .downcast_mut::<T>()
    }

    pub fn component(&self, id: ComponentId) -> Option<&dyn GameComponent> {
        self.slots
            .iter()
            .find(|s| s.id == id)
            .and_then(|s| s.component.as_deref())
    }

    pub fn component_mut(&mut self, id: ComponentId) -> Option<&mut (dyn GameComponent + 'static)> {
        self.slots
            .iter_mut()
            .find(|s| s.id == id)
            .and_then(|s| s.component.as_deref_mut())
    }

    /// All present components in attachment order.
    pub fn components(&self) -> impl Iterator<Item = (ComponentId, &dyn GameComponent)> {
        self.slots
            .iter()
            .filter_map(|s| s.component.as_deref().map(|c| (s.id, c)))
    }

    pub fn component_ids(&self) -> SmallVec<[ComponentId; 4]> {
        self.slots.iter().map(|s| s.id).collect()
    }

    pub fn has_component<T: GameComponent>(&self) -> bool {
        self.get_component::<T>().is_some()
    }

    pub fn component_count(&self) -> usize {
        self.slots.len()
    }

    // ========== Lifecycle ==========

    /// Run `awake` on every component attached since the last call.
    /// Returns how many components were awoken.
    pub fn awake_pending(&mut self) -> usize {
        let pending: SmallVec<[ComponentId; 4]> = self
            .slots
            .iter()
            .filter(|s| !s.awake)
            .map(|s| s.id)
            .collect();

        let mut awoken = 0;
        for id in pending {
            let ran = self.with_vacated(id, |component, owner| component.awake(owner));
            if ran.is_some() {
                if let Some(slot) = self.slots.iter_mut().find(|s| s.id == id) {
                    slot.awake = true;
                }
                awoken += 1;
            }
        }
        awoken
    }

    /// Run pending awakes, then `update` every enabled component once, in
    /// attachment order. Components attached during this pass wait for the
    /// next frame. Returns how many updates ran.
    pub fn update(&mut self, input: &InputState, delta_time: f32) -> usize {
        self.awake_pending();

        let mut updated = 0;
        for id in self.component_ids() {
            let ran = self.with_vacated(id, |component, owner| {
                if !component.is_enabled() {
                    return false;
                }
                let mut ctx = ComponentContext::new(owner, input);
                component.update(&mut ctx, delta_time);
                true
            });
            if ran == Some(true) {
                updated += 1;
            }
        }
        updated
    }

    /// Take the component out of its slot, run `f` with it and a mutable
    /// view of the owner, then put it back. If `f` removed the slot, the
    /// component is dropped.
    fn with_vacated<R>(
        &mut self,
        id: ComponentId,
        f: impl FnOnce(&mut dyn GameComponent, &mut GameObject) -> R,
    ) -> Option<R> {
        let mut component = self
            .slots
            .iter_mut()
            .find(|s| s.id == id)?
            .component
            .take()?;

        let result = f(component.as_mut(), self);

        if let Some(slot) = self.slots.iter_mut().find(|s| s.id == id) {
            slot.component = Some(component);
        }
        Some(result)
    }

    /// Debug widgets: position plus a collapsible section per component.
    pub fn render_imgui(&mut self, ui: &imgui::Ui) {
        let mut position = [self.position.x, self.position.y, self.position.z];
        if imgui::Drag::new("Position")
            .speed(0.1)
            .build_array(ui, &mut position)
        {
            self.position = Vector3::new(position[0], position[1], position[2]);
        }

        for slot in self.slots.iter_mut() {
            let Some(component) = slot.component.as_deref_mut() else {
                continue;
            };
            let _id = ui.push_id_usize(slot.id.0 as usize);
            if ui.collapsing_header(component.type_name(), imgui::TreeNodeFlags::DEFAULT_OPEN) {
                let mut enabled = component.is_enabled();
                if ui.checkbox("Enabled", &mut enabled) {
                    component.set_enabled(enabled);
                }
                component.render_imgui(ui);
            }
        }
    }
}

impl fmt::Debug for GameObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let components: Vec<&str> = self.components().map(|(_, c)| c.type_name()).collect();
        f.debug_struct("GameObject")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("position", &self.position)
            .field("components", &components)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::movementbehaviour::MovementBehaviour;
    use crate::components::rigidbody::RigidBody;

    #[test]
    fn test_new_object_is_empty() {
        let go = GameObject::new("Empty");
        assert_eq!(go.name(), "Empty");
        assert_eq!(go.component_count(), 0);
        assert!(go.get_component::<RigidBody>().is_none());
    }

    #[test]
    fn test_id_labels_keep_high_bits() {
        let low = GameObjectId(5);
        let high = GameObjectId((1 << 32) + 5);
        assert_eq!(low.to_string(), "go#5");
        assert_eq!(high.to_string(), "go#4294967301");
        assert_ne!(low.to_string(), high.to_string());
    }

    #[test]
    fn test_ids_are_unique() {
        let a = GameObject::new("a");
        let b = GameObject::new("b");
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_add_component_sets_owner() {
        let mut go = GameObject::new("Player");
        go.add_component(RigidBody::dynamic(1.0));
        let body = go.get_component::<RigidBody>().unwrap();
        assert_eq!(body.owner(), Some(go.id()));
    }

    #[test]
    fn test_get_component_returns_first_match() {
        let mut go = GameObject::new("Twin");
        go.add_component(MovementBehaviour::new(1.0));
        go.add_component(MovementBehaviour::new(2.0));
        assert_eq!(go.get_component::<MovementBehaviour>().unwrap().speed(), 1.0);
    }

    #[test]
    fn test_remove_component_clears_owner() {
        let mut go = GameObject::new("Player");
        let id = go.add_component(RigidBody::dynamic(1.0));
        let removed = go.remove_component(id).unwrap();
        assert_eq!(removed.owner(), None);
        assert!(!go.has_component::<RigidBody>());
        assert!(go.remove_component(id).is_none());
    }

    #[test]
    fn test_component_ref_stops_resolving_after_removal() {
        let mut go = GameObject::new("Player");
        let id = go.add_component(RigidBody::dynamic(1.0));
        let body_ref = go.find_component_ref::<RigidBody>().unwrap();
        assert_eq!(body_ref.id(), id);
        assert!(go.resolve(body_ref).is_some());

        go.remove_component(id);
        assert!(go.resolve(body_ref).is_none());
    }

    #[test]
    fn test_component_ref_is_type_checked() {
        let mut go = GameObject::new("Player");
        go.add_component(RigidBody::dynamic(1.0));
        assert!(go.find_component_ref::<MovementBehaviour>().is_none());
    }

    #[test]
    fn test_awake_runs_once() {
        let mut go = GameObject::new("Player");
        go.add_component(RigidBody::dynamic(1.0));
        assert_eq!(go.awake_pending(), 1);
        assert_eq!(go.awake_pending(), 0);
        go.add_component(MovementBehaviour::default());
        assert_eq!(go.awake_pending(), 1);
    }
}
